//! Serial link to the board.
//!
//! After a binding write the firmware is told to re-read its binding file
//! with a fixed `rebind` command on its data UART. The command is
//! fire-and-forget: nothing is read back.

use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::constants::{RELOAD_COMMAND, SERIAL_BAUD_RATE};
use crate::error::PadmapError;

/// Resolves the serial port the board listens on.
///
/// An explicit port is validated to exist; otherwise ports carrying a USB
/// serial number are enumerated and the last one (sorted by name) is
/// picked, matching how the board's data port enumerates after its console
/// port.
pub fn locate_port(explicit: Option<&str>) -> Result<String> {
    if let Some(port) = explicit {
        if cfg!(unix) && !Path::new(port).exists() {
            return Err(
                PadmapError::not_found(format!("The specified port could not be found: {port}"))
                    .into(),
            );
        }
        return Ok(port.to_string());
    }

    let ports = serialport::available_ports().context("Failed to enumerate serial ports")?;
    let mut candidates: Vec<String> = ports
        .into_iter()
        .filter(|info| match &info.port_type {
            serialport::SerialPortType::UsbPort(usb) => usb.serial_number.is_some(),
            _ => false,
        })
        .map(|info| info.port_name)
        .collect();
    candidates.sort();

    candidates.pop().ok_or_else(|| {
        PadmapError::not_found(
            "Board port could not be detected automatically. \
             Specify it with --port or skip reloading with --no-reload.",
        )
        .into()
    })
}

/// An open-on-demand serial channel to the board.
///
/// The connection is opened lazily on the first notification and then kept
/// open and reused for the rest of the program.
pub struct DeviceChannel {
    port_name: String,
    conn: Option<Box<dyn serialport::SerialPort>>,
}

impl DeviceChannel {
    /// Creates a channel for `port_name` without opening it yet.
    #[must_use]
    pub fn new(port_name: String) -> Self {
        Self {
            port_name,
            conn: None,
        }
    }

    /// Port this channel talks to.
    #[must_use]
    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    fn connection(&mut self) -> Result<&mut dyn serialport::SerialPort> {
        if self.conn.is_none() {
            let conn = serialport::new(&self.port_name, SERIAL_BAUD_RATE)
                .parity(serialport::Parity::None)
                .timeout(Duration::from_millis(500))
                .open()
                .map_err(|e| {
                    PadmapError::unreachable(format!(
                        "Failed to open serial port {}: {e}",
                        self.port_name
                    ))
                })?;
            debug!(port = %self.port_name, "serial port opened");
            self.conn = Some(conn);
        }
        match self.conn.as_mut() {
            Some(conn) => Ok(conn.as_mut()),
            None => unreachable!(),
        }
    }

    /// Sends the reload command. Fire-and-forget, no acknowledgement.
    pub fn notify_reload(&mut self) -> Result<()> {
        let port_name = self.port_name.clone();
        let conn = self.connection()?;
        conn.write_all(RELOAD_COMMAND)
            .and_then(|()| conn.flush())
            .map_err(|e| {
                PadmapError::unreachable(format!("Failed to write to serial port {port_name}: {e}"))
            })?;
        debug!(port = %port_name, "reload command sent");
        Ok(())
    }
}
