//! Bind one button to a key.

use anyhow::Result;
use clap::Args;

use super::{persist_and_reload, CliContext};
use crate::error::PadmapError;
use crate::keycodes::KeycodeDb;
use crate::models::Button;
use crate::store;

/// Bind a pad button to a keyboard key
#[derive(Debug, Clone, Args)]
pub struct BindArgs {
    /// Button name or ordinal (e.g. "select" or "1")
    #[arg(value_name = "BUTTON")]
    pub button: String,

    /// Key name (e.g. "a", "space", "print screen")
    #[arg(value_name = "KEY")]
    pub key: String,
}

impl BindArgs {
    /// Execute the bind command.
    pub fn execute(&self, ctx: &CliContext) -> Result<()> {
        let button = Button::parse(&self.button).ok_or_else(|| {
            PadmapError::invalid(format!(
                "'{}' does not match any existing button.",
                self.button
            ))
        })?;
        let db = KeycodeDb::load()?;
        let code = db.code_for(&self.key).ok_or_else(|| {
            PadmapError::invalid(format!("'{}' does not match any existing key.", self.key))
        })?;

        let mut table = store::read_bindings(&ctx.board_dir)?;
        table.set(button, Some(code));
        persist_and_reload(ctx, &table)?;

        println!("Bound {} to '{}' (0x{code:02X}).", button.name, self.key);
        Ok(())
    }
}
