//! HID keycode database.
//!
//! The database of bindable keys is embedded in the binary at compile time
//! and provides O(1) name-to-code resolution (including aliases) plus the
//! reverse lookup used when displaying a bound key.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;

/// One bindable key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KeycodeDefinition {
    /// Canonical display name (e.g. "print screen").
    pub name: String,
    /// USB HID usage code sent by the firmware.
    pub code: u8,
    /// Alternative names accepted on input.
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Database schema from keycodes.json.
#[derive(Debug, Deserialize)]
struct KeycodeDatabase {
    #[allow(dead_code)]
    version: String,
    keycodes: Vec<KeycodeDefinition>,
}

/// HID keycode database with name and code lookup.
#[derive(Debug, Clone)]
pub struct KeycodeDb {
    keycodes: Vec<KeycodeDefinition>,
    /// Normalized name or alias -> index into `keycodes`.
    lookup: HashMap<String, usize>,
}

/// Normalizes user input: lowercase, underscores read as spaces.
fn normalize(name: &str) -> String {
    name.trim().to_lowercase().replace('_', " ")
}

impl KeycodeDb {
    /// Loads the keycode database from the embedded JSON file.
    pub fn load() -> Result<Self> {
        let json_data = include_str!("keycodes.json");
        let db: KeycodeDatabase =
            serde_json::from_str(json_data).context("Failed to parse embedded keycodes.json")?;

        let mut lookup = HashMap::new();
        for (idx, keycode) in db.keycodes.iter().enumerate() {
            lookup.insert(normalize(&keycode.name), idx);
            for alias in &keycode.aliases {
                lookup.insert(normalize(alias), idx);
            }
        }

        Ok(Self {
            keycodes: db.keycodes,
            lookup,
        })
    }

    /// Resolves a key name (or alias) to its HID code.
    #[must_use]
    pub fn code_for(&self, name: &str) -> Option<u8> {
        self.lookup
            .get(&normalize(name))
            .map(|&idx| self.keycodes[idx].code)
    }

    /// Canonical display name for a HID code, if known.
    #[must_use]
    pub fn label_for(&self, code: u8) -> Option<&str> {
        self.keycodes
            .iter()
            .find(|k| k.code == code)
            .map(|k| k.name.as_str())
    }

    /// Canonical key names, in database order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.keycodes.iter().map(|k| k.name.as_str())
    }

    /// Number of distinct key definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keycodes.len()
    }

    /// Whether the database is empty (it never is for the embedded data).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keycodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_db() -> KeycodeDb {
        KeycodeDb::load().expect("Failed to load keycode database")
    }

    #[test]
    fn test_load_database() {
        let db = get_test_db();
        assert!(db.len() > 70);
    }

    #[test]
    fn test_code_for_basic_keys() {
        let db = get_test_db();
        assert_eq!(db.code_for("a"), Some(0x04));
        assert_eq!(db.code_for("z"), Some(0x1D));
        assert_eq!(db.code_for("1"), Some(0x1E));
        assert_eq!(db.code_for("esc"), Some(0x29));
        assert_eq!(db.code_for("space"), Some(0x2C));
    }

    #[test]
    fn test_code_for_normalizes_input() {
        let db = get_test_db();
        assert_eq!(db.code_for("Print Screen"), Some(0x46));
        assert_eq!(db.code_for("print_screen"), Some(0x46));
        assert_eq!(db.code_for("PAGE_UP"), Some(0x4B));
    }

    #[test]
    fn test_code_for_aliases() {
        let db = get_test_db();
        assert_eq!(db.code_for("imp pant"), db.code_for("print screen"));
        assert_eq!(db.code_for("supr"), db.code_for("delete"));
        assert_eq!(db.code_for("flecha arriba"), db.code_for("up"));
        assert_eq!(db.code_for("mayusculas"), db.code_for("shift"));
    }

    #[test]
    fn test_code_for_unknown() {
        let db = get_test_db();
        assert_eq!(db.code_for("hyperkey"), None);
        assert_eq!(db.code_for(""), None);
    }

    #[test]
    fn test_label_for_prefers_canonical_name() {
        let db = get_test_db();
        assert_eq!(db.label_for(0x46), Some("print screen"));
        assert_eq!(db.label_for(0x04), Some("a"));
        assert_eq!(db.label_for(0x29), Some("esc"));
        assert_eq!(db.label_for(0xFF), None);
    }
}
