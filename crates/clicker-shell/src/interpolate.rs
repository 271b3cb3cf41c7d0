//! `@<register>` expansion for printed text.

use crate::slots::{RegisterId, SlotKey};

/// Replace every `@` followed by a letter with that register's text.
///
/// Empty registers expand to nothing. Any other character, including an `@`
/// not followed by a letter, is copied through.
pub fn interpolate<F>(text: &str, lookup: F) -> String
where
    F: Fn(RegisterId) -> Option<String>,
{
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '@'
            && let Some(&next) = chars.peek()
            && next.is_ascii_alphabetic()
        {
            chars.next();
            if let Some(value) = RegisterId::from_char(next).and_then(&lookup) {
                out.push_str(&value);
            }
            continue;
        }
        out.push(ch);
    }
    out
}
