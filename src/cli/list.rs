//! List current bindings.

use anyhow::Result;
use clap::Args;
use serde_json::Value;

use super::CliContext;
use crate::keycodes::KeycodeDb;
use crate::store;

/// Print every button with its bound key
#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// Output as JSON (button name to HID code, null for unbound)
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    /// Execute the list command.
    pub fn execute(&self, ctx: &CliContext) -> Result<()> {
        let table = store::read_bindings(&ctx.board_dir)?;

        if self.json {
            let value = Value::Object(table.to_json_map());
            println!("{}", serde_json::to_string_pretty(&value)?);
            return Ok(());
        }

        let db = KeycodeDb::load()?;
        for (button, code) in table.iter() {
            let label = match code {
                Some(code) => db
                    .label_for(code)
                    .map_or_else(|| format!("0x{code:02X}"), str::to_string),
                None => "--".to_string(),
            };
            println!("{:>2}  {:<10} {label}", button.ordinal, button.name);
        }
        Ok(())
    }
}
