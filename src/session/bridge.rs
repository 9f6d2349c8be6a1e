//! Key event delivery from the terminal input hook to the session loop.
//!
//! Events cross from the reader thread to the polling session through a
//! single-slot latch, not a queue: the first press (and, independently, the
//! first release) since the last clear wins, later ones are dropped. The
//! session only needs "did a key go down / come up since I last looked", so
//! at-most-one-pending keeps the consumer from falling behind under key
//! repeat, at the cost of missing transitions at extreme repeat rates.

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::debug;

/// Pending key transitions, shared between producer and consumer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventLatch {
    /// First press since the last clear.
    pub last_press: Option<KeyCode>,
    /// First release since the last clear.
    pub last_release: Option<KeyCode>,
}

/// Single-slot latch between the input hook and the polling session.
#[derive(Debug, Default)]
pub struct KeyEventBridge {
    latch: Mutex<EventLatch>,
}

impl KeyEventBridge {
    /// Creates an empty bridge.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, EventLatch> {
        // The latch holds two plain Options; a poisoned lock cannot leave
        // them in an inconsistent state, so recover the guard.
        self.latch.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Records a press. Dropped if a press is already latched.
    pub fn on_press(&self, key: KeyCode) {
        let mut latch = self.lock();
        if latch.last_press.is_none() {
            latch.last_press = Some(key);
        }
    }

    /// Records a release. Dropped if a release is already latched.
    pub fn on_release(&self, key: KeyCode) {
        let mut latch = self.lock();
        if latch.last_release.is_none() {
            latch.last_release = Some(key);
        }
    }

    /// Non-blocking read of the current latch contents.
    #[must_use]
    pub fn poll(&self) -> EventLatch {
        *self.lock()
    }

    /// Empties both slots. The consumer calls this before each poll cycle.
    pub fn clear(&self) {
        *self.lock() = EventLatch::default();
    }
}

/// Reader thread feeding terminal key events into a [`KeyEventBridge`].
///
/// Runs until [`InputHook::stop`] (or drop). Key repeats are ignored; only
/// genuine press and release transitions reach the latch.
pub struct InputHook {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl InputHook {
    /// Spawns the reader thread. The terminal must already be in raw mode.
    #[must_use]
    pub fn start(bridge: Arc<KeyEventBridge>) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let thread_running = Arc::clone(&running);
        let handle = std::thread::spawn(move || {
            while thread_running.load(Ordering::Relaxed) {
                match event::poll(Duration::from_millis(50)) {
                    Ok(true) => {
                        if let Ok(Event::Key(key)) = event::read() {
                            match key.kind {
                                KeyEventKind::Press => bridge.on_press(key.code),
                                KeyEventKind::Release => bridge.on_release(key.code),
                                KeyEventKind::Repeat => {}
                            }
                        }
                    }
                    Ok(false) => {}
                    Err(_) => break,
                }
            }
            debug!("input hook thread stopped");
        });

        Self {
            running,
            handle: Some(handle),
        }
    }

    /// Stops the reader thread and waits for it to exit.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for InputHook {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latch_keeps_first_press() {
        let bridge = KeyEventBridge::new();
        bridge.on_press(KeyCode::Char('a'));
        bridge.on_press(KeyCode::Char('b'));
        bridge.on_press(KeyCode::Char('c'));

        let latch = bridge.poll();
        assert_eq!(latch.last_press, Some(KeyCode::Char('a')));
        assert_eq!(latch.last_release, None);
    }

    #[test]
    fn test_press_and_release_latch_independently() {
        let bridge = KeyEventBridge::new();
        bridge.on_release(KeyCode::Esc);
        bridge.on_press(KeyCode::Char('x'));
        bridge.on_release(KeyCode::Char('x'));

        let latch = bridge.poll();
        assert_eq!(latch.last_press, Some(KeyCode::Char('x')));
        assert_eq!(latch.last_release, Some(KeyCode::Esc));
    }

    #[test]
    fn test_clear_opens_the_slot_again() {
        let bridge = KeyEventBridge::new();
        bridge.on_press(KeyCode::Char('a'));
        bridge.clear();
        assert_eq!(bridge.poll(), EventLatch::default());

        bridge.on_press(KeyCode::Char('b'));
        assert_eq!(bridge.poll().last_press, Some(KeyCode::Char('b')));
    }

    #[test]
    fn test_poll_does_not_consume() {
        let bridge = KeyEventBridge::new();
        bridge.on_press(KeyCode::Enter);
        assert_eq!(bridge.poll().last_press, Some(KeyCode::Enter));
        assert_eq!(bridge.poll().last_press, Some(KeyCode::Enter));
    }

    #[test]
    fn test_concurrent_producers_coalesce_to_one_press() {
        let bridge = Arc::new(KeyEventBridge::new());
        let mut handles = Vec::new();
        for c in ['a', 'b', 'c', 'd'] {
            let bridge = Arc::clone(&bridge);
            handles.push(std::thread::spawn(move || {
                bridge.on_press(KeyCode::Char(c));
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let latch = bridge.poll();
        let first = latch.last_press.unwrap();
        assert!(matches!(first, KeyCode::Char('a' | 'b' | 'c' | 'd')));
        // Whatever won stays until cleared.
        assert_eq!(bridge.poll().last_press, Some(first));
    }
}
