//! Server binary discovery.
//!
//! Finds the application server executable once per invocation and caches
//! the outcome.

mod locate;
mod validate;

pub use locate::{BINARY_ENV_VAR, BinaryLocator, CANDIDATE_NAMES, WELL_KNOWN_DIRS};
pub use validate::is_executable;
