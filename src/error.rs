//! Domain error taxonomy.
//!
//! These are the failures a caller can meaningfully distinguish; everything
//! else travels as `anyhow` context on top of one of these.

use thiserror::Error;

/// Errors surfaced by board discovery, serial communication, input
/// validation, and binding persistence.
#[derive(Debug, Error)]
pub enum PadmapError {
    /// No mountable board filesystem or serial port could be discovered.
    #[error("{0}")]
    DeviceNotFound(String),

    /// A port was found or specified but could not be opened or written.
    #[error("{0}")]
    DeviceUnreachable(String),

    /// A binding references an unknown button or key name.
    #[error("{0}")]
    InvalidInput(String),

    /// The binding file could not be read or written.
    #[error("{0}")]
    PersistenceFailure(String),
}

impl PadmapError {
    /// Convenience constructor for [`PadmapError::DeviceNotFound`].
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::DeviceNotFound(msg.into())
    }

    /// Convenience constructor for [`PadmapError::DeviceUnreachable`].
    pub fn unreachable(msg: impl Into<String>) -> Self {
        Self::DeviceUnreachable(msg.into())
    }

    /// Convenience constructor for [`PadmapError::InvalidInput`].
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Convenience constructor for [`PadmapError::PersistenceFailure`].
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::PersistenceFailure(msg.into())
    }
}
