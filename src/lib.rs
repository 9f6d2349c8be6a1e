//! padmap library.
//!
//! Core functionality for the padmap binary: the fixed button model, the
//! HID keycode database, binding persistence on the board's filesystem,
//! board and serial port discovery, and the interactive rebinding session.

// Module declarations
pub mod board;
pub mod cli;
pub mod config;
pub mod constants;
pub mod device;
pub mod error;
pub mod keycodes;
pub mod models;
pub mod session;
pub mod store;
