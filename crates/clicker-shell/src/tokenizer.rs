//! Command-line tokenizer.
//!
//! A line is an opcode character followed by space-separated tokens. A
//! double-quoted span keeps its spaces; a token that starts with a quote has
//! the wrapping quotes removed. A quote with no partner later on the line is
//! an ordinary character.

use std::borrow::Cow;

use clicker_types::error::{ClickerError, Result};

/// A parsed command line.
///
/// `args()[0]` is the first token of the line (the one carrying the opcode);
/// the verb's own arguments are [`Command::operands`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    opcode: char,
    args: Vec<String>,
}

impl Command {
    /// The first non-space character of the line.
    pub fn opcode(&self) -> char {
        self.opcode
    }

    /// All tokens, opcode token included.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Tokens after the opcode token.
    pub fn operands(&self) -> &[String] {
        &self.args[1..]
    }

    /// Operand `i` (0-based, opcode excluded).
    pub fn operand(&self, i: usize) -> Option<&str> {
        self.operands().get(i).map(String::as_str)
    }
}

/// Tokenize one line (without its trailing newline).
pub fn tokenize(line: &str) -> Result<Command> {
    let opcode = line
        .chars()
        .find(|c| !c.is_whitespace())
        .ok_or_else(|| ClickerError::Parse("empty command".to_string()))?;

    let args: Vec<String> = split_raw(line).into_iter().map(unwrap_quotes).collect();
    if args.is_empty() {
        // `operands` slices past the first token.
        return Err(ClickerError::Parse("empty command".to_string()));
    }
    Ok(Command { opcode, args })
}

/// Split on spaces outside quoted spans. Quote characters are kept.
fn split_raw(line: &str) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    // A quote can only open a span if another quote follows it. An unmatched
    // quote is an ordinary character: it does not swallow the rest of the
    // line into one token.
    let last_quote = chars.iter().rposition(|&c| c == '"');

    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for (i, &ch) in chars.iter().enumerate() {
        match ch {
            '"' if in_quotes => {
                in_quotes = false;
                current.push(ch);
            },
            '"' if last_quote.is_some_and(|last| i < last) => {
                in_quotes = true;
                current.push(ch);
            },
            ' ' if !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            },
            c if c.is_whitespace() && !in_quotes && current.is_empty() => {},
            _ => current.push(ch),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn unwrap_quotes(token: String) -> String {
    if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') {
        token[1..token.len() - 1].to_string()
    } else {
        token
    }
}

/// Quote a token if the tokenizer would otherwise split or drop it.
pub fn quote_token(token: &str) -> Cow<'_, str> {
    if token.is_empty() || token.contains(' ') {
        Cow::Owned(format!("\"{token}\""))
    } else {
        Cow::Borrowed(token)
    }
}

/// Rejoin tokens into storable command text.
///
/// Tokenizing the result yields `tokens` again (for tokens without quote
/// characters).
pub fn join_tokens<S: AsRef<str>>(tokens: &[S]) -> String {
    let quoted: Vec<Cow<'_, str>> = tokens.iter().map(|t| quote_token(t.as_ref())).collect();
    quoted.join(" ").trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &str) -> Vec<String> {
        tokenize(line).unwrap().args().to_vec()
    }

    #[test]
    fn simple_split() {
        let cmd = tokenize("@ a K x").unwrap();
        assert_eq!(cmd.opcode(), '@');
        assert_eq!(cmd.args(), ["@", "a", "K", "x"]);
        assert_eq!(cmd.operands(), ["a", "K", "x"]);
        assert_eq!(cmd.operand(0), Some("a"));
        assert_eq!(cmd.operand(3), None);
    }

    #[test]
    fn leading_and_repeated_spaces() {
        let cmd = tokenize("   C   1  ").unwrap();
        assert_eq!(cmd.opcode(), 'C');
        assert_eq!(cmd.args(), ["C", "1"]);
    }

    #[test]
    fn opcode_glued_to_first_token() {
        let cmd = tokenize("#ab").unwrap();
        assert_eq!(cmd.opcode(), '#');
        assert_eq!(cmd.args(), ["#ab"]);
        assert!(cmd.operands().is_empty());
    }

    #[test]
    fn empty_and_blank_lines_fail() {
        assert!(matches!(tokenize(""), Err(ClickerError::Parse(_))));
        assert!(matches!(tokenize("    "), Err(ClickerError::Parse(_))));
        assert!(matches!(tokenize("\t "), Err(ClickerError::Parse(_))));
    }

    #[test]
    fn quoted_span_keeps_spaces() {
        assert_eq!(args("P \"hello  world\" !"), ["P", "hello  world", "!"]);
    }

    #[test]
    fn empty_quotes_make_empty_token() {
        assert_eq!(args("! leader \"\""), ["!", "leader", ""]);
    }

    #[test]
    fn quotes_inside_token_are_kept() {
        assert_eq!(args("P a\"b c\"d"), ["P", "a\"b c\"d"]);
    }

    #[test]
    fn unbalanced_quote_is_literal() {
        assert_eq!(args("P \"abc def"), ["P", "\"abc", "def"]);
        assert_ne!(args("P \"abc def"), ["P", "abc def"]);
        assert_eq!(args("S it\"s"), ["S", "it\"s"]);
    }

    #[test]
    fn trailing_unmatched_quote_after_span() {
        assert_eq!(args("P \"a b\"c\""), ["P", "a b\"c"]);
    }

    #[test]
    fn quote_token_only_when_needed() {
        assert_eq!(quote_token("abc"), "abc");
        assert_eq!(quote_token(""), "\"\"");
        assert_eq!(quote_token("a b"), "\"a b\"");
    }

    #[test]
    fn join_requotes_spaces() {
        assert_eq!(join_tokens(&["P", "x  y", "z"]), "P \"x  y\" z");
        assert_eq!(join_tokens(&["K", "a"]), "K a");
        let empty: [&str; 0] = [];
        assert_eq!(join_tokens(&empty), "");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn join_then_tokenize_roundtrips(
                opcode in "[A-Z#@*^]",
                rest in proptest::collection::vec("[a-z0-9 ]{0,8}", 0..5),
            ) {
                let mut tokens = vec![opcode.clone()];
                tokens.extend(rest);
                let line = join_tokens(&tokens);
                let cmd = tokenize(&line).unwrap();
                prop_assert_eq!(cmd.args(), tokens.as_slice());
                prop_assert_eq!(cmd.opcode().to_string(), opcode);
            }

            #[test]
            fn unquoted_tokens_never_contain_spaces(line in "[a-z ]{1,40}") {
                if let Ok(cmd) = tokenize(&line) {
                    for arg in cmd.args() {
                        prop_assert!(!arg.contains(' '));
                        prop_assert!(!arg.is_empty());
                    }
                }
            }
        }
    }
}
