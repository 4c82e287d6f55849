//! Control signals delivered to a server process.
//!
//! Signals are fire-and-forget: a successful send only means the operating
//! system accepted the signal for the target PID. It does not mean the
//! server finished (or even started) acting on it.

use std::fmt;

/// A transient instruction for the server's master process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// Hot-reload the configuration without restarting the OS process.
    Reload,
    /// Request a graceful shutdown.
    Terminate,
    /// Any other signal, by name (`USR1`, `SIGUSR1`) or number (`10`).
    Custom(String),
}

/// A signal reduced to a form the OS adapter can resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalSpec {
    /// Canonical `SIG`-prefixed upper-case name.
    Named(String),
    /// Raw signal number.
    Number(i32),
}

impl Signal {
    /// Reduce the signal to a canonical name or number.
    ///
    /// Custom names are trimmed, upper-cased and given a `SIG` prefix when
    /// missing. Returns `None` for an empty custom value.
    pub fn spec(&self) -> Option<SignalSpec> {
        match self {
            Self::Reload => Some(SignalSpec::Named("SIGHUP".to_string())),
            Self::Terminate => Some(SignalSpec::Named("SIGTERM".to_string())),
            Self::Custom(raw) => {
                let raw = raw.trim();
                if raw.is_empty() {
                    return None;
                }
                if let Ok(number) = raw.parse::<i32>() {
                    return Some(SignalSpec::Number(number));
                }
                let upper = raw.to_ascii_uppercase();
                let name = if upper.starts_with("SIG") {
                    upper
                } else {
                    format!("SIG{upper}")
                };
                Some(SignalSpec::Named(name))
            }
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reload => f.write_str("reload"),
            Self::Terminate => f.write_str("terminate"),
            Self::Custom(raw) => write!(f, "signal {raw}"),
        }
    }
}
