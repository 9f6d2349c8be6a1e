//! The fixed set of physical pad buttons.

use std::fmt;

/// One physical button position on the pad.
///
/// The set is fixed at build time and mirrors the GPIO pin table in the
/// board firmware; display order follows `ordinal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Button {
    /// 1-based position in display order.
    pub ordinal: u8,
    /// Canonical lowercase name, as written in the binding file.
    pub name: &'static str,
}

/// All pad buttons, in ordinal order.
pub const BUTTONS: &[Button] = &[
    Button { ordinal: 1, name: "select" },
    Button { ordinal: 2, name: "cross" },
    Button { ordinal: 3, name: "left" },
    Button { ordinal: 4, name: "triangle" },
    Button { ordinal: 5, name: "down" },
    Button { ordinal: 6, name: "up" },
    Button { ordinal: 7, name: "square" },
    Button { ordinal: 8, name: "right" },
    Button { ordinal: 9, name: "circle" },
    Button { ordinal: 10, name: "start" },
];

impl Button {
    /// Resolves user input to a button.
    ///
    /// Accepts the button name (case-insensitive, spaces and underscores
    /// interchangeable) or its ordinal as a decimal string.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        if let Ok(ordinal) = input.trim().parse::<u8>() {
            return BUTTONS.iter().find(|b| b.ordinal == ordinal).copied();
        }
        let normalized = input.trim().to_lowercase().replace(' ', "_");
        BUTTONS.iter().find(|b| b.name == normalized).copied()
    }

    /// Index of this button in [`BUTTONS`].
    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.ordinal) - 1
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
