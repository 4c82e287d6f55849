//! Session ownership modes.

use std::fmt;

/// How a session relates to the server process it talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Borrows an already-running server. Detaching never stops it.
    Persistent,
    /// Owns a throwaway server started for this session. Detaching stops it.
    Ephemeral,
}

impl SessionMode {
    /// Whether detaching must terminate the target process.
    pub const fn owns_process(self) -> bool {
        matches!(self, Self::Ephemeral)
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Persistent => f.write_str("persistent"),
            Self::Ephemeral => f.write_str("ephemeral"),
        }
    }
}
