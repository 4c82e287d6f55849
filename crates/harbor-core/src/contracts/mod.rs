//! Wire contracts shared by the CLI and server runtimes.

pub mod control;

pub use control::{
    EXEC_PATH, ExecReply, ExecRequestBody, MIGRATE_PATH, MigrateReply, MigrateRequestBody,
};
