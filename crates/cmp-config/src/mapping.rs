//! Key-mapping collaborators
//!
//! The normalizer rewrites every entry of the `mapping` option through two
//! pluggable collaborators:
//!
//! - a [`KeyNormalizer`] that canonicalizes key notation (`<c-space>` and
//!   `<C-SPACE>` both become `<C-Space>`), so two spellings of the same key
//!   collapse to one mapping entry;
//! - a [`MappingBinder`] that turns a raw mapping action into a binding scoped
//!   to a set of modes.
//!
//! Hosts with their own keymap machinery plug in their implementations; the
//! defaults here are self-contained.

use crate::value::{ConfigValue, Table};
use regex::{Captures, Regex};
use std::fmt;
use std::sync::LazyLock;

/// Canonicalizes key notation
pub trait KeyNormalizer {
    fn normalize(&self, raw: &str) -> String;
}

/// Converts a raw mapping action into a binding scoped to `modes`
pub trait MappingBinder {
    fn bind(&self, action: ConfigValue, modes: &[MappingMode]) -> ConfigValue;
}

/// Editor mode a mapping is active in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MappingMode {
    Insert,
    Cmdline,
    Select,
}

impl MappingMode {
    /// Single-letter mode key, as used in bound mapping tables
    pub fn as_str(&self) -> &'static str {
        match self {
            MappingMode::Insert => "i",
            MappingMode::Cmdline => "c",
            MappingMode::Select => "s",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "i" => Some(MappingMode::Insert),
            "c" => Some(MappingMode::Cmdline),
            "s" => Some(MappingMode::Select),
            _ => None,
        }
    }
}

impl fmt::Display for MappingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static KEY_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([^<>]+)>").expect("key token pattern is valid"));

/// Canonical spellings of named keys, looked up case-insensitively
const NAMED_KEYS: &[(&str, &str)] = &[
    ("cr", "CR"),
    ("return", "CR"),
    ("enter", "CR"),
    ("nl", "NL"),
    ("tab", "Tab"),
    ("esc", "Esc"),
    ("escape", "Esc"),
    ("space", "Space"),
    ("bs", "BS"),
    ("backspace", "BS"),
    ("del", "Del"),
    ("delete", "Del"),
    ("up", "Up"),
    ("down", "Down"),
    ("left", "Left"),
    ("right", "Right"),
    ("home", "Home"),
    ("end", "End"),
    ("pageup", "PageUp"),
    ("pagedown", "PageDown"),
    ("insert", "Insert"),
    ("bar", "Bar"),
    ("bslash", "Bslash"),
    ("lt", "lt"),
    ("nop", "Nop"),
    ("leader", "Leader"),
    ("plug", "Plug"),
];

/// Default [`KeyNormalizer`] for angle-bracket key notation.
///
/// Modifiers are emitted in the order `C-`, `M-`, `S-`, `D-` (`A-` folds into
/// `M-`), named keys take their canonical spelling, and a single character
/// under `C-` is upper-cased since control chords ignore case. Other
/// modifiers keep the character as written. Text outside `<...>` is left
/// untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyNotation;

impl KeyNotation {
    fn canonical_token(inner: &str) -> String {
        let mut rest = inner;
        let mut modifiers = [false; 4]; // C, M, S, D
        while rest.len() > 2 && rest.as_bytes()[1] == b'-' {
            let slot = match rest.as_bytes()[0].to_ascii_uppercase() {
                b'C' => 0,
                b'M' | b'A' => 1,
                b'S' => 2,
                b'D' => 3,
                _ => break,
            };
            modifiers[slot] = true;
            rest = &rest[2..];
        }

        let key = Self::canonical_key(rest, modifiers[0]);

        let mut out = String::from("<");
        for (set, prefix) in modifiers.iter().zip(["C-", "M-", "S-", "D-"]) {
            if *set {
                out.push_str(prefix);
            }
        }
        out.push_str(&key);
        out.push('>');
        out
    }

    fn canonical_key(key: &str, ctrl: bool) -> String {
        let mut chars = key.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return if ctrl {
                c.to_uppercase().collect()
            } else {
                c.to_string()
            };
        }

        let lower = key.to_ascii_lowercase();
        if let Some((_, canonical)) = NAMED_KEYS.iter().find(|(name, _)| *name == lower) {
            return (*canonical).to_string();
        }

        // Function keys: f1..f37
        if let Some(number) = lower.strip_prefix('f') {
            if !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()) {
                return format!("F{}", number);
            }
        }

        key.to_string()
    }
}

impl KeyNormalizer for KeyNotation {
    fn normalize(&self, raw: &str) -> String {
        KEY_TOKEN
            .replace_all(raw, |caps: &Captures<'_>| Self::canonical_token(&caps[1]))
            .into_owned()
    }
}

/// Default [`MappingBinder`].
///
/// An action that is already a mode-keyed table (every key one of `i`, `c`, `s`)
/// is returned unchanged. Anything else is bound to each requested mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModeBinder;

impl ModeBinder {
    fn is_bound(action: &ConfigValue) -> bool {
        match action {
            ConfigValue::Table(table) => {
                !table.is_empty() && table.keys().all(|k| MappingMode::from_key(k).is_some())
            }
            _ => false,
        }
    }
}

impl MappingBinder for ModeBinder {
    fn bind(&self, action: ConfigValue, modes: &[MappingMode]) -> ConfigValue {
        if Self::is_bound(&action) {
            return action;
        }
        let bound: Table = modes
            .iter()
            .map(|mode| (mode.as_str().to_string(), action.clone()))
            .collect();
        ConfigValue::Table(bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("<c-space>", "<C-Space>")]
    #[case("<C-SPACE>", "<C-Space>")]
    #[case("<cr>", "<CR>")]
    #[case("<Enter>", "<CR>")]
    #[case("<s-tab>", "<S-Tab>")]
    #[case("<a-j>", "<M-j>")]
    #[case("<M-J>", "<M-J>")]
    #[case("<s-a>", "<S-a>")]
    #[case("<d-s>", "<D-s>")]
    #[case("<m-c-k>", "<C-M-K>")]
    #[case("<s-c-n>", "<C-S-N>")]
    #[case("<c-x><c-o>", "<C-X><C-O>")]
    #[case("<f12>", "<F12>")]
    #[case("<C-->", "<C-->")]
    #[case("<Plug>(custom)", "<Plug>(custom)")]
    #[case("jk", "jk")]
    fn test_key_notation(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(KeyNotation.normalize(raw), expected);
    }

    #[rstest]
    #[case("<c-space>")]
    #[case("<s-c-tab>")]
    #[case("<Esc>")]
    fn test_key_notation_is_idempotent(#[case] raw: &str) {
        let once = KeyNotation.normalize(raw);
        assert_eq!(KeyNotation.normalize(&once), once);
    }

    #[test]
    fn test_binder_wraps_raw_action_per_mode() {
        let action = ConfigValue::from("confirm");
        let bound = ModeBinder.bind(action.clone(), &[MappingMode::Insert, MappingMode::Cmdline]);

        assert_eq!(bound.get("i"), Some(&action));
        assert_eq!(bound.get("c"), Some(&action));
        assert_eq!(bound.get("s"), None);
    }

    #[test]
    fn test_binder_keeps_mode_tables() {
        let mut table = Table::new();
        table.insert("c".to_string(), ConfigValue::from("select_next"));
        let action = ConfigValue::Table(table);

        assert_eq!(ModeBinder.bind(action.clone(), &[MappingMode::Insert]), action);
    }

    #[test]
    fn test_binder_wraps_non_mode_tables() {
        let mut table = Table::new();
        table.insert("behavior".to_string(), ConfigValue::from("replace"));
        let action = ConfigValue::Table(table);

        let bound = ModeBinder.bind(action.clone(), &[MappingMode::Insert]);
        assert_eq!(bound.get("i"), Some(&action));
    }
}
