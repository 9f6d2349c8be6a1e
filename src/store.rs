//! Reading and writing the binding file on the board's filesystem.

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::BINDINGS_FILE_NAME;
use crate::error::PadmapError;
use crate::models::BindingTable;

/// Full path of the binding file inside the board directory.
#[must_use]
pub fn bindings_path(board_dir: &Path) -> PathBuf {
    board_dir.join(BINDINGS_FILE_NAME)
}

/// Loads the binding table from `bindings.json` in `board_dir`.
///
/// A missing file yields a table with every button unbound. Buttons the
/// firmware does not know are dropped; buttons missing from the file are
/// defaulted to unbound.
pub fn read_bindings(board_dir: &Path) -> Result<BindingTable> {
    let path = bindings_path(board_dir);
    if !path.exists() {
        debug!(path = %path.display(), "binding file absent, starting unbound");
        return Ok(BindingTable::new());
    }

    let raw = fs::read_to_string(&path)
        .map_err(|e| PadmapError::persistence(format!("Failed to read {}: {e}", path.display())))?;
    let value: Value = serde_json::from_str(&raw).map_err(|e| {
        PadmapError::persistence(format!("Binding file {} is not valid JSON: {e}", path.display()))
    })?;
    let map = value
        .as_object()
        .ok_or_else(|| {
            PadmapError::persistence(format!(
                "Binding file {} must contain a JSON object",
                path.display()
            ))
        })
        .context("Failed to load bindings")?;

    Ok(BindingTable::from_json_map(map))
}

/// Overwrites `bindings.json` in `board_dir` with the whole table.
pub fn write_bindings(board_dir: &Path, table: &BindingTable) -> Result<()> {
    let path = bindings_path(board_dir);
    let json = serde_json::to_string_pretty(&Value::Object(table.to_json_map()))
        .context("Failed to serialize bindings")?;
    fs::write(&path, json + "\n")
        .map_err(|e| PadmapError::persistence(format!("Failed to write {}: {e}", path.display())))?;
    debug!(path = %path.display(), "bindings written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Button;

    #[test]
    fn test_read_missing_file_defaults_unbound() {
        let dir = tempfile::tempdir().unwrap();
        let table = read_bindings(dir.path()).unwrap();
        assert!(table.iter().all(|(_, code)| code.is_none()));
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut table = BindingTable::new();
        table.set(Button::parse("select").unwrap(), Some(0x04));
        table.set(Button::parse("start").unwrap(), Some(0x29));

        write_bindings(dir.path(), &table).unwrap();
        let loaded = read_bindings(dir.path()).unwrap();
        assert_eq!(loaded, table);
    }

    #[test]
    fn test_read_filters_unknown_buttons() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            bindings_path(dir.path()),
            r#"{"select": 4, "mystery": 9, "cross": null}"#,
        )
        .unwrap();

        let table = read_bindings(dir.path()).unwrap();
        assert_eq!(table.get(Button::parse("select").unwrap()), Some(4));
        assert_eq!(table.get(Button::parse("cross").unwrap()), None);
        assert!(!table.to_json_map().contains_key("mystery"));
    }

    #[test]
    fn test_read_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(bindings_path(dir.path()), "not json").unwrap();
        assert!(read_bindings(dir.path()).is_err());
    }
}
