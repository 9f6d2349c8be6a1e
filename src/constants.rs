//! Application-wide constants.

use std::time::Duration;

/// The display name of the application.
pub const APP_NAME: &str = "padmap";

/// Name of the binding file on the board's filesystem.
pub const BINDINGS_FILE_NAME: &str = "bindings.json";

/// Volume label the CircuitPython firmware exposes its filesystem under.
pub const BOARD_VOLUME_LABEL: &str = "CIRCUITPY";

/// The fixed 6-byte command the firmware polls for on its data UART.
pub const RELOAD_COMMAND: &[u8] = b"rebind";

/// Baud rate of the board's data serial port.
pub const SERIAL_BAUD_RATE: u32 = 9600;

/// Holding Escape past this duration during capture cancels the capture.
/// A quicker tap falls through and binds the Escape keycode itself.
pub const ESCAPE_HOLD_TIMEOUT: Duration = Duration::from_millis(1000);

/// Sleep between latch polls in the session's busy-wait loop.
pub const LATCH_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// HID usage code for the Escape key.
pub const ESCAPE_KEYCODE: u8 = 0x29;
