//! PID record management.
//!
//! The server writes its own PID record (`pid` directive in the rendered
//! configuration). harbor only reads it, probes it, and removes it after a
//! stop.
//!
//! Format: a single decimal PID, optionally followed by a newline.

mod io;

pub use io::{delete_pid_record, parse_pid_record, read_pid_record, write_pid_record};
