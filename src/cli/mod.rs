//! Non-interactive CLI commands.
//!
//! Each command is a clap `Args` struct with an `execute` method, sharing
//! the resolved board context. Validation happens up front: an unknown
//! button or key name is rejected before anything is written.

pub mod bind;
pub mod clear;
pub mod keys;
pub mod list;
pub mod remove;

pub use bind::BindArgs;
pub use clear::ClearArgs;
pub use keys::KeysArgs;
pub use list::ListArgs;
pub use remove::RemoveArgs;

use anyhow::Result;
use std::path::PathBuf;
use tracing::debug;

use crate::device::{self, DeviceChannel};
use crate::models::BindingTable;
use crate::store;

/// Shared context for commands that touch the board.
pub struct CliContext {
    /// Directory holding the binding file.
    pub board_dir: PathBuf,
    /// Report what would change without writing or reloading.
    pub dry_run: bool,
    /// Notify the board after a successful write.
    pub reload: bool,
    /// Explicit serial port override.
    pub port: Option<String>,
}

/// Writes the table and, if enabled, tells the board to re-read it.
pub(crate) fn persist_and_reload(ctx: &CliContext, table: &BindingTable) -> Result<()> {
    if ctx.dry_run {
        println!("Dry run: bindings not written.");
        return Ok(());
    }
    store::write_bindings(&ctx.board_dir, table)?;
    if ctx.reload {
        let port = device::locate_port(ctx.port.as_deref())?;
        debug!(port, "notifying board");
        let mut channel = DeviceChannel::new(port);
        channel.notify_reload()?;
    }
    Ok(())
}
