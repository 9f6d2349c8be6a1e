//! Unbind one button.

use anyhow::Result;
use clap::Args;

use super::{persist_and_reload, CliContext};
use crate::error::PadmapError;
use crate::models::Button;
use crate::store;

/// Remove the binding of a pad button
#[derive(Debug, Clone, Args)]
pub struct RemoveArgs {
    /// Button name or ordinal (e.g. "select" or "1")
    #[arg(value_name = "BUTTON")]
    pub button: String,
}

impl RemoveArgs {
    /// Execute the remove command.
    pub fn execute(&self, ctx: &CliContext) -> Result<()> {
        let button = Button::parse(&self.button).ok_or_else(|| {
            PadmapError::invalid(format!(
                "'{}' does not match any existing button.",
                self.button
            ))
        })?;

        let mut table = store::read_bindings(&ctx.board_dir)?;
        table.set(button, None);
        persist_and_reload(ctx, &table)?;

        println!("Unbound {}.", button.name);
        Ok(())
    }
}
