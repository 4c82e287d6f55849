//! Configuration rendering and persistence.

mod atomic;
mod coordinator;
mod renderer;

pub use atomic::write_atomic;
pub use coordinator::ConfigCoordinator;
pub use renderer::{PlaceholderRenderer, render_placeholders};
