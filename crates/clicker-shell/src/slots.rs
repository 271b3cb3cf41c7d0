//! Keyed slot tables for registers and hotkeys.
//!
//! Each slot holds optional command text behind its own lock. Locks are held
//! only for a single read or write, never across a verb, so concurrent tasks
//! can interleave read-modify-write sequences on the same slot: the last
//! writer wins and intermediate values are visible. Everything goes through
//! [`SlotTable`], which is the one place to tighten that if needed.

use std::marker::PhantomData;

use clicker_types::error::{ClickerError, Result, SlotKind};
use parking_lot::RwLock;

/// Identity of a slot in a [`SlotTable`].
pub trait SlotKey: Copy + Send + Sync + 'static {
    const KIND: SlotKind;
    const COUNT: usize;

    fn from_char(c: char) -> Option<Self>;
    fn from_index(index: usize) -> Option<Self>;
    fn index(self) -> usize;
    fn to_char(self) -> char;

    /// Resolve a verb argument (its first character) to a slot.
    fn parse(arg: &str) -> Result<Self> {
        let mut chars = arg.chars();
        match chars.next() {
            Some(c) => Self::from_char(c).ok_or_else(|| ClickerError::InvalidKey {
                kind: Self::KIND,
                key: c.to_string(),
            }),
            None => Err(ClickerError::InvalidKey {
                kind: Self::KIND,
                key: String::new(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Registers: a-z, A-Z, 0-9
// ---------------------------------------------------------------------------

/// One of the 62 registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegisterId(u8);

impl RegisterId {
    /// Clicks-per-sample auto-register.
    pub const CPS: Self = Self(26 + 2);
    /// Last cursor position auto-register.
    pub const LAST_LOCATION: Self = Self(26 + 11);
}

impl SlotKey for RegisterId {
    const KIND: SlotKind = SlotKind::Register;
    const COUNT: usize = 62;

    fn from_char(c: char) -> Option<Self> {
        match c {
            'a'..='z' => Some(Self(c as u8 - b'a')),
            'A'..='Z' => Some(Self(26 + (c as u8 - b'A'))),
            '0'..='9' => Some(Self(52 + (c as u8 - b'0'))),
            _ => None,
        }
    }

    fn from_index(index: usize) -> Option<Self> {
        (index < Self::COUNT).then(|| Self(index as u8))
    }

    fn index(self) -> usize {
        usize::from(self.0)
    }

    fn to_char(self) -> char {
        match self.0 {
            i @ 0..=25 => char::from(b'a' + i),
            i @ 26..=51 => char::from(b'A' + (i - 26)),
            i => char::from(b'0' + (i - 52)),
        }
    }
}

// ---------------------------------------------------------------------------
// Hotkeys: printable ASCII ' '..='~'
// ---------------------------------------------------------------------------

/// One of the 95 hotkey triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HotkeyId(u8);

impl SlotKey for HotkeyId {
    const KIND: SlotKind = SlotKind::Hotkey;
    const COUNT: usize = 95;

    fn from_char(c: char) -> Option<Self> {
        (' '..='~').contains(&c).then(|| Self(c as u8 - b' '))
    }

    fn from_index(index: usize) -> Option<Self> {
        (index < Self::COUNT).then(|| Self(index as u8))
    }

    fn index(self) -> usize {
        usize::from(self.0)
    }

    fn to_char(self) -> char {
        char::from(b' ' + self.0)
    }
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// Fixed-size table of optional command text, shared by all tasks.
pub struct SlotTable<K: SlotKey> {
    slots: Box<[RwLock<Option<String>>]>,
    _key: PhantomData<K>,
}

impl<K: SlotKey> SlotTable<K> {
    /// A table with every slot empty.
    pub fn new() -> Self {
        Self {
            slots: (0..K::COUNT).map(|_| RwLock::new(None)).collect(),
            _key: PhantomData,
        }
    }

    /// Snapshot of a slot's text.
    pub fn get(&self, key: K) -> Option<String> {
        self.slots[key.index()].read().clone()
    }

    /// Snapshot of a slot's text, failing when the slot is empty.
    pub fn require(&self, key: K) -> Result<String> {
        self.get(key).ok_or(ClickerError::EmptySlot {
            kind: K::KIND,
            key: key.to_char(),
        })
    }

    /// Overwrite a slot.
    pub fn set(&self, key: K, text: impl Into<String>) {
        *self.slots[key.index()].write() = Some(text.into());
    }

    /// Empty a slot.
    pub fn clear(&self, key: K) {
        *self.slots[key.index()].write() = None;
    }

    /// Non-empty slots in index order.
    pub fn entries(&self) -> Vec<(K, String)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| {
                let text = slot.read().clone()?;
                K::from_index(i).map(|key| (key, text))
            })
            .collect()
    }
}

impl<K: SlotKey> Default for SlotTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: SlotKey> std::fmt::Debug for SlotTable<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotTable")
            .field("kind", &K::KIND)
            .field("occupied", &self.entries().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_mapping_ranges() {
        assert_eq!(RegisterId::from_char('a').unwrap().index(), 0);
        assert_eq!(RegisterId::from_char('z').unwrap().index(), 25);
        assert_eq!(RegisterId::from_char('A').unwrap().index(), 26);
        assert_eq!(RegisterId::from_char('Z').unwrap().index(), 51);
        assert_eq!(RegisterId::from_char('0').unwrap().index(), 52);
        assert_eq!(RegisterId::from_char('9').unwrap().index(), 61);
    }

    #[test]
    fn register_mapping_is_bijective() {
        for i in 0..RegisterId::COUNT {
            let id = RegisterId::from_index(i).unwrap();
            assert_eq!(RegisterId::from_char(id.to_char()), Some(id));
            assert_eq!(id.index(), i);
        }
        assert_eq!(RegisterId::from_index(RegisterId::COUNT), None);
    }

    #[test]
    fn hotkey_mapping_is_bijective() {
        for i in 0..HotkeyId::COUNT {
            let id = HotkeyId::from_index(i).unwrap();
            assert_eq!(HotkeyId::from_char(id.to_char()), Some(id));
        }
        assert_eq!(HotkeyId::from_char(' ').unwrap().index(), 0);
        assert_eq!(HotkeyId::from_char('~').unwrap().index(), 94);
        assert_eq!(HotkeyId::from_index(HotkeyId::COUNT), None);
    }

    #[test]
    fn out_of_range_characters_are_invalid() {
        for c in ['%', ' ', '_', '\n', 'é'] {
            assert_eq!(RegisterId::from_char(c), None, "{c:?}");
        }
        for c in ['\t', '\u{7f}', 'é'] {
            assert_eq!(HotkeyId::from_char(c), None, "{c:?}");
        }
    }

    #[test]
    fn reserved_registers() {
        assert_eq!(RegisterId::CPS.to_char(), 'C');
        assert_eq!(RegisterId::LAST_LOCATION.to_char(), 'L');
    }

    #[test]
    fn parse_uses_first_character() {
        assert_eq!(RegisterId::parse("abc").unwrap().to_char(), 'a');
        assert!(matches!(
            RegisterId::parse("!"),
            Err(ClickerError::InvalidKey {
                kind: SlotKind::Register,
                ..
            })
        ));
        assert!(RegisterId::parse("").is_err());
        assert_eq!(HotkeyId::parse(" ").unwrap().to_char(), ' ');
    }

    #[test]
    fn empty_slot_is_absent_not_empty_string() {
        let table: SlotTable<RegisterId> = SlotTable::new();
        let a = RegisterId::from_char('a').unwrap();
        assert_eq!(table.get(a), None);
        table.set(a, "");
        assert_eq!(table.get(a), Some(String::new()));
        table.clear(a);
        assert!(matches!(
            table.require(a),
            Err(ClickerError::EmptySlot { key: 'a', .. })
        ));
    }

    #[test]
    fn set_overwrites() {
        let table: SlotTable<HotkeyId> = SlotTable::new();
        let k = HotkeyId::from_char('k').unwrap();
        table.set(k, "K a");
        table.set(k, "K b");
        assert_eq!(table.require(k).unwrap(), "K b");
    }

    #[test]
    fn entries_in_index_order() {
        let table: SlotTable<RegisterId> = SlotTable::new();
        for c in ['5', 'B', 'a'] {
            table.set(RegisterId::from_char(c).unwrap(), c.to_string());
        }
        let chars: Vec<char> = table.entries().iter().map(|(k, _)| k.to_char()).collect();
        assert_eq!(chars, vec!['a', 'B', '5']);
    }

    #[test]
    fn concurrent_writers_last_one_wins() {
        let table = std::sync::Arc::new(SlotTable::<RegisterId>::new());
        let a = RegisterId::from_char('a').unwrap();
        let handles: Vec<_> = (0..4)
            .map(|n| {
                let table = std::sync::Arc::clone(&table);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        table.set(a, format!("{n}:{i}"));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert!(table.require(a).unwrap().ends_with(":99"));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn register_chars_roundtrip(c in "[a-zA-Z0-9]") {
                let c = c.chars().next().unwrap();
                let id = RegisterId::from_char(c).unwrap();
                prop_assert_eq!(id.to_char(), c);
                prop_assert_eq!(RegisterId::from_index(id.index()), Some(id));
            }

            #[test]
            fn non_alphanumerics_are_not_registers(c in any::<char>()) {
                prop_assume!(!c.is_ascii_alphanumeric());
                prop_assert_eq!(RegisterId::from_char(c), None);
            }

            #[test]
            fn hotkey_chars_roundtrip(c in proptest::char::range(' ', '~')) {
                let id = HotkeyId::from_char(c).unwrap();
                prop_assert_eq!(id.to_char(), c);
            }
        }
    }
}
