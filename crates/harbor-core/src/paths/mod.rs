//! Path layout of a harbor project.
//!
//! Every file harbor reads or writes is resolved here so the CLI, the
//! process controller and the tests agree on locations.

mod layout;

pub use layout::{
    ENVIRONMENT_FILE, MIGRATIONS_DIR, ProjectLayout, ResolvedPaths, SETTINGS_FILE, STATE_DIR,
};
