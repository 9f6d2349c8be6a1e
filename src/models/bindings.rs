//! The in-memory binding table for one session.

use serde_json::{Map, Value};

use super::button::{Button, BUTTONS};

/// Authoritative button-to-keycode mapping for a running session.
///
/// Invariant: there is exactly one entry per button in [`BUTTONS`], where
/// `None` means "unbound". Loading filters out unknown buttons and defaults
/// missing ones, so the invariant holds regardless of what the persisted
/// file contained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingTable {
    codes: Vec<Option<u8>>,
}

impl BindingTable {
    /// Creates a table with every button unbound.
    #[must_use]
    pub fn new() -> Self {
        Self {
            codes: vec![None; BUTTONS.len()],
        }
    }

    /// Builds a table from a persisted JSON object keyed by button name.
    ///
    /// Unknown buttons are dropped; missing buttons default to unbound.
    /// Non-numeric values are treated as unbound.
    #[must_use]
    pub fn from_json_map(map: &Map<String, Value>) -> Self {
        let mut table = Self::new();
        for button in BUTTONS {
            if let Some(value) = map.get(button.name) {
                let code = value.as_u64().and_then(|c| u8::try_from(c).ok());
                table.codes[button.index()] = code;
            }
        }
        table
    }

    /// Snapshot of the table as a JSON object keyed by button name,
    /// `null` for unbound buttons.
    #[must_use]
    pub fn to_json_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        for button in BUTTONS {
            let value = match self.codes[button.index()] {
                Some(code) => Value::from(code),
                None => Value::Null,
            };
            map.insert(button.name.to_string(), value);
        }
        map
    }

    /// Current keycode bound to `button`, if any.
    #[must_use]
    pub fn get(&self, button: Button) -> Option<u8> {
        self.codes[button.index()]
    }

    /// Binds `button` to `code` (or unbinds it with `None`).
    pub fn set(&mut self, button: Button, code: Option<u8>) {
        self.codes[button.index()] = code;
    }

    /// Unbinds every button.
    pub fn clear(&mut self) {
        self.codes.fill(None);
    }

    /// Iterates entries in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Button, Option<u8>)> + '_ {
        BUTTONS.iter().map(|b| (*b, self.codes[b.index()]))
    }
}

impl Default for BindingTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_table_is_complete_and_unbound() {
        let table = BindingTable::new();
        assert_eq!(table.iter().count(), BUTTONS.len());
        assert!(table.iter().all(|(_, code)| code.is_none()));
    }

    #[test]
    fn test_from_json_drops_unknown_and_defaults_missing() {
        let raw = json!({
            "select": 0x04,
            "bogus": 0x05,
            "start": null,
        });
        let table = BindingTable::from_json_map(raw.as_object().unwrap());
        assert_eq!(table.iter().count(), BUTTONS.len());
        assert_eq!(table.get(Button::parse("select").unwrap()), Some(0x04));
        assert_eq!(table.get(Button::parse("start").unwrap()), None);
        assert_eq!(table.get(Button::parse("cross").unwrap()), None);
        assert!(!table.to_json_map().contains_key("bogus"));
    }

    #[test]
    fn test_set_and_clear_preserve_completeness() {
        let mut table = BindingTable::new();
        let select = Button::parse("select").unwrap();
        table.set(select, Some(0x1A));
        assert_eq!(table.get(select), Some(0x1A));
        assert_eq!(table.iter().count(), BUTTONS.len());

        table.set(select, None);
        assert_eq!(table.get(select), None);

        table.set(select, Some(0x1A));
        table.clear();
        assert!(table.iter().all(|(_, code)| code.is_none()));
        assert_eq!(table.iter().count(), BUTTONS.len());
    }

    #[test]
    fn test_json_round_trip() {
        let mut table = BindingTable::new();
        table.set(Button::parse("circle").unwrap(), Some(0x29));
        let map = table.to_json_map();
        assert_eq!(map.len(), BUTTONS.len());
        assert_eq!(BindingTable::from_json_map(&map), table);
    }
}
