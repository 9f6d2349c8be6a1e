//! Scoped ownership of the terminal and the input hook.

use anyhow::{Context, Result};
use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;

use super::bridge::{InputHook, KeyEventBridge};

/// RAII guard for one interactive session.
///
/// Acquisition enables raw mode, enters the alternate screen, asks the
/// terminal to report key release events, and starts the input hook
/// thread. Drop undoes all of it, so teardown runs on every exit path out
/// of the session, including propagated failures.
pub struct SessionGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    hook: InputHook,
}

impl SessionGuard {
    /// Takes exclusive ownership of the terminal and starts the hook.
    pub fn acquire(bridge: Arc<KeyEventBridge>) -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        // REPORT_EVENT_TYPES makes supporting terminals send key releases,
        // which the escape-hold protocol listens for. Terminals without the
        // protocol simply never deliver releases; the hold timeout still
        // fires.
        execute!(
            stdout,
            EnterAlternateScreen,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )
        .context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).context("Failed to create terminal")?;
        let hook = InputHook::start(bridge);
        Ok(Self { terminal, hook })
    }

    /// The terminal the session draws to.
    pub fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<io::Stdout>> {
        &mut self.terminal
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        // Stop reading stdin before restoring the terminal modes.
        self.hook.stop();
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            PopKeyboardEnhancementFlags,
            LeaveAlternateScreen
        );
        let _ = self.terminal.show_cursor();
    }
}
