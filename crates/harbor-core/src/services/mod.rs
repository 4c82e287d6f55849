//! Core services built on the ports.

mod migrations;
mod session_bridge;

pub use migrations::apply_batch;
pub use session_bridge::{Session, SessionBridge};
