//! List bindable key names.

use anyhow::Result;
use clap::Args;

use crate::keycodes::KeycodeDb;

/// List the key names accepted by `bind`
#[derive(Debug, Clone, Default, Args)]
pub struct KeysArgs {
    /// Output as JSON (array of key names)
    #[arg(long)]
    pub json: bool,
}

impl KeysArgs {
    /// Execute the keys command.
    pub fn execute(&self) -> Result<()> {
        let db = KeycodeDb::load()?;

        if self.json {
            let names: Vec<&str> = db.names().collect();
            println!("{}", serde_json::to_string_pretty(&names)?);
            return Ok(());
        }

        for name in db.names() {
            if let Some(code) = db.code_for(name) {
                println!("{name:<14} 0x{code:02X}");
            }
        }
        Ok(())
    }
}
