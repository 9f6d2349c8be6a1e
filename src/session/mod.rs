//! The interactive rebinding session.
//!
//! A reader thread feeds key transitions into a single-slot latch
//! ([`bridge`]); the session loop polls it and drives a three-mode state
//! machine: navigating the button list, awaiting a key to capture, and
//! waiting out a held Escape. Commits mutate the in-memory binding table
//! and, depending on the session options, persist it and notify the board.

pub mod bridge;
pub mod render;
pub mod terminal;

pub use bridge::{EventLatch, InputHook, KeyEventBridge};
pub use terminal::SessionGuard;

use anyhow::Result;
use crossterm::event::{KeyCode, ModifierKeyCode};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::constants::{ESCAPE_HOLD_TIMEOUT, ESCAPE_KEYCODE, LATCH_POLL_INTERVAL};
use crate::device::DeviceChannel;
use crate::keycodes::KeycodeDb;
use crate::models::{BindingTable, Button, BUTTONS};
use crate::store;

/// How commits interact with persistence and the board.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    /// Never write the binding file or notify the board.
    pub dry_run: bool,
    /// Accumulate commits in memory; write and reload once at session end.
    pub defer_write: bool,
    /// Notify the board after each write.
    pub reload: bool,
}

/// Session mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Moving focus through the button list.
    Navigating,
    /// Waiting for the next press to capture.
    AwaitingKey,
    /// Escape is down during capture; waiting to classify tap vs hold.
    CancelPending,
}

/// Mutable session state: mode, focus, and the pending escape timestamp.
#[derive(Debug)]
pub struct SessionState {
    /// Current mode.
    pub mode: Mode,
    /// Index of the focused button; always valid, wraps modulo the list.
    pub focus: usize,
    /// When the pending Escape press was observed, while cancel is pending.
    pub pending_escape: Option<Instant>,
}

/// Whether the session loop keeps running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep polling.
    Continue,
    /// Terminate the session.
    Quit,
}

/// Persistence and reload side effects of a session.
///
/// Split out so tests can count calls; the real implementation writes the
/// binding file and pokes the serial channel.
pub trait BindingSink {
    /// Overwrites persisted state with the whole table.
    fn persist(&mut self, table: &BindingTable) -> Result<()>;
    /// Tells the board to re-read its binding file.
    fn notify_reload(&mut self) -> Result<()>;
}

/// [`BindingSink`] backed by the board filesystem and serial channel.
pub struct StoreSink {
    board_dir: PathBuf,
    channel: Option<DeviceChannel>,
}

impl StoreSink {
    /// Creates a sink writing to `board_dir`, notifying `channel` if given.
    #[must_use]
    pub fn new(board_dir: PathBuf, channel: Option<DeviceChannel>) -> Self {
        Self { board_dir, channel }
    }
}

impl BindingSink for StoreSink {
    fn persist(&mut self, table: &BindingTable) -> Result<()> {
        store::write_bindings(&self.board_dir, table)
    }

    fn notify_reload(&mut self) -> Result<()> {
        match self.channel.as_mut() {
            Some(channel) => channel.notify_reload(),
            None => Ok(()),
        }
    }
}

/// The navigation + capture state machine.
///
/// Owns the binding table for the session; collaborator failures propagate
/// out unhandled so the caller's guard can restore the terminal first.
pub struct Session<S: BindingSink> {
    table: BindingTable,
    state: SessionState,
    options: SessionOptions,
    sink: S,
    db: KeycodeDb,
    dirty: bool,
}

impl<S: BindingSink> Session<S> {
    /// Creates a session over `table` starting in navigation mode.
    pub fn new(table: BindingTable, options: SessionOptions, sink: S, db: KeycodeDb) -> Self {
        Self {
            table,
            state: SessionState {
                mode: Mode::Navigating,
                focus: 0,
                pending_escape: None,
            },
            options,
            sink,
            db,
            dirty: false,
        }
    }

    /// Current binding table.
    #[must_use]
    pub fn table(&self) -> &BindingTable {
        &self.table
    }

    /// Current session state.
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Keycode database used for labels and capture mapping.
    #[must_use]
    pub fn db(&self) -> &KeycodeDb {
        &self.db
    }

    /// Button the focus is on.
    #[must_use]
    pub fn focused_button(&self) -> Button {
        BUTTONS[self.state.focus]
    }

    /// Handles a press while navigating.
    pub fn on_navigate_key(&mut self, key: KeyCode) -> Result<Flow> {
        match key {
            KeyCode::Up | KeyCode::Char('k') => {
                self.state.focus = (self.state.focus + BUTTONS.len() - 1) % BUTTONS.len();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.state.focus = (self.state.focus + 1) % BUTTONS.len();
            }
            KeyCode::Enter | KeyCode::Char(' ' | 'r') => {
                debug!(button = %self.focused_button(), "capture started");
                self.state.mode = Mode::AwaitingKey;
            }
            KeyCode::Esc | KeyCode::Char('q') => {
                self.finish()?;
                return Ok(Flow::Quit);
            }
            _ => {}
        }
        Ok(Flow::Continue)
    }

    /// Handles the press that arrived while awaiting a key.
    ///
    /// Escape starts the hold-to-cancel wait; any other mappable key
    /// commits immediately. Keys without a HID mapping are ignored and the
    /// session keeps waiting.
    pub fn on_capture_press(&mut self, key: KeyCode) -> Result<()> {
        if key == KeyCode::Esc {
            self.state.mode = Mode::CancelPending;
            self.state.pending_escape = Some(Instant::now());
            return Ok(());
        }
        if let Some(code) = hid_for_key(&self.db, key) {
            self.commit(code)?;
        }
        Ok(())
    }

    /// Applies the outcome of the escape-hold wait.
    ///
    /// A hold cancels the capture and leaves the previous binding showing.
    /// A tap falls through to the normal bind path with Escape itself as
    /// the captured key.
    pub fn resolve_escape(&mut self, canceled: bool) -> Result<()> {
        self.state.pending_escape = None;
        if canceled {
            debug!(button = %self.focused_button(), "capture canceled");
            self.state.mode = Mode::Navigating;
            return Ok(());
        }
        self.commit(ESCAPE_KEYCODE)
    }

    fn commit(&mut self, code: u8) -> Result<()> {
        let button = self.focused_button();
        self.table.set(button, Some(code));
        self.state.mode = Mode::Navigating;
        self.dirty = true;
        debug!(button = %button, code, "binding committed");
        if !self.options.defer_write {
            self.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if self.options.dry_run || !self.dirty {
            return Ok(());
        }
        self.sink.persist(&self.table)?;
        if self.options.reload {
            self.sink.notify_reload()?;
        }
        self.dirty = false;
        Ok(())
    }

    /// Runs end-of-session side effects (the deferred write, if any).
    pub fn finish(&mut self) -> Result<()> {
        if self.options.defer_write {
            self.flush()?;
        }
        Ok(())
    }
}

/// Maps a terminal key to the HID code the firmware should send.
#[must_use]
pub fn hid_for_key(db: &KeycodeDb, key: KeyCode) -> Option<u8> {
    match key {
        KeyCode::Char(' ') => db.code_for("space"),
        KeyCode::Char(c) => db.code_for(&c.to_ascii_lowercase().to_string()),
        KeyCode::F(n) => db.code_for(&format!("f{n}")),
        KeyCode::Esc => db.code_for("esc"),
        KeyCode::Enter => db.code_for("enter"),
        KeyCode::Backspace => db.code_for("backspace"),
        KeyCode::Tab => db.code_for("tab"),
        KeyCode::Delete => db.code_for("delete"),
        KeyCode::Insert => db.code_for("insert"),
        KeyCode::Home => db.code_for("home"),
        KeyCode::End => db.code_for("end"),
        KeyCode::PageUp => db.code_for("page up"),
        KeyCode::PageDown => db.code_for("page down"),
        KeyCode::CapsLock => db.code_for("caps lock"),
        KeyCode::Left => db.code_for("left"),
        KeyCode::Right => db.code_for("right"),
        KeyCode::Up => db.code_for("up"),
        KeyCode::Down => db.code_for("down"),
        KeyCode::PrintScreen => db.code_for("print screen"),
        KeyCode::ScrollLock => db.code_for("scroll lock"),
        KeyCode::Pause => db.code_for("pause"),
        KeyCode::Menu => db.code_for("menu"),
        KeyCode::Modifier(m) => match m {
            ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift => db.code_for("shift"),
            ModifierKeyCode::LeftControl | ModifierKeyCode::RightControl => db.code_for("ctrl"),
            ModifierKeyCode::LeftAlt | ModifierKeyCode::RightAlt => db.code_for("alt"),
            ModifierKeyCode::LeftSuper => db.code_for("left windows"),
            _ => None,
        },
        _ => None,
    }
}

/// Blocks until a press is latched, or until `timeout` elapses if given.
///
/// The latch is cleared immediately after the press is consumed, starting
/// the next poll cycle. The wait itself is a tight loop with a short
/// sleep; swapping in a blocking primitive would not change the callers.
pub fn next_press(bridge: &KeyEventBridge, timeout: Option<Duration>) -> Option<KeyCode> {
    let start = Instant::now();
    loop {
        if let Some(key) = bridge.poll().last_press {
            bridge.clear();
            return Some(key);
        }
        if let Some(limit) = timeout {
            if start.elapsed() > limit {
                return None;
            }
        }
        std::thread::sleep(LATCH_POLL_INTERVAL);
    }
}

/// Waits out a pending Escape during capture.
///
/// Returns `true` (canceled) when no Escape release arrives within
/// `timeout` of `started`; the release is synthesized and the capture is
/// abandoned. Returns `false` (tapped) when the release shows up in time.
pub fn wait_for_escape_release(
    bridge: &KeyEventBridge,
    started: Instant,
    timeout: Duration,
) -> bool {
    loop {
        if started.elapsed() > timeout {
            return true;
        }
        if let Some(key) = bridge.poll().last_release {
            bridge.clear();
            if key == KeyCode::Esc {
                return false;
            }
        }
        std::thread::sleep(LATCH_POLL_INTERVAL);
    }
}

/// Runs the interactive session against the board at `board_dir`.
///
/// The terminal and input hook are released on every exit path; errors
/// from persistence or the serial channel surface after that teardown.
pub fn run_interactive(
    board_dir: &Path,
    options: SessionOptions,
    channel: Option<DeviceChannel>,
) -> Result<()> {
    let db = KeycodeDb::load()?;
    let table = store::read_bindings(board_dir)?;
    let sink = StoreSink::new(board_dir.to_path_buf(), channel);
    let mut session = Session::new(table, options, sink, db);

    let bridge = Arc::new(KeyEventBridge::new());
    let mut guard = SessionGuard::acquire(Arc::clone(&bridge))?;
    let result = run_loop(&mut session, &bridge, &mut guard);
    drop(guard);
    result
}

fn run_loop<S: BindingSink>(
    session: &mut Session<S>,
    bridge: &KeyEventBridge,
    guard: &mut SessionGuard,
) -> Result<()> {
    loop {
        guard
            .terminal_mut()
            .draw(|f| render::draw(f, session))?;

        match session.state().mode {
            Mode::Navigating => {
                if let Some(key) = next_press(bridge, None) {
                    if session.on_navigate_key(key)? == Flow::Quit {
                        return Ok(());
                    }
                }
            }
            Mode::AwaitingKey => {
                if let Some(key) = next_press(bridge, None) {
                    session.on_capture_press(key)?;
                }
            }
            Mode::CancelPending => {
                let started = session
                    .state()
                    .pending_escape
                    .unwrap_or_else(Instant::now);
                let canceled = wait_for_escape_release(bridge, started, ESCAPE_HOLD_TIMEOUT);
                session.resolve_escape(canceled)?;
            }
        }
    }
}
