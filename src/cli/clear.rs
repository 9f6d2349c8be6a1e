//! Unbind every button.

use anyhow::Result;
use clap::Args;

use super::{persist_and_reload, CliContext};
use crate::store;

/// Remove all bindings
#[derive(Debug, Clone, Default, Args)]
pub struct ClearArgs {}

impl ClearArgs {
    /// Execute the clear command.
    pub fn execute(&self, ctx: &CliContext) -> Result<()> {
        let mut table = store::read_bindings(&ctx.board_dir)?;
        table.clear();
        persist_and_reload(ctx, &table)?;

        println!("All bindings removed.");
        Ok(())
    }
}
