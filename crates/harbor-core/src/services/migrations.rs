//! Reference execution of a migration batch.
//!
//! A server runtime receiving a `/_harbor/migrate` request runs the batch
//! with these semantics:
//!
//! 1. ensure the migrations table exists
//! 2. read the keys already recorded as applied
//! 3. for each remaining step in ascending key order, run it and record it
//!    as applied before the next step starts
//! 4. stop at the first failure
//!
//! Because bookkeeping happens per step, a failed batch leaves every earlier
//! step recorded and re-running the same batch resumes at the failed step.

use tracing::{debug, warn};

use crate::contracts::MigrateReply;
use crate::domain::{MigrationKey, MigrationStep};
use crate::ports::{MigrationStore, RemoteFailure};

/// Apply every pending step of `steps` against `store`.
pub fn apply_batch<S>(store: &mut S, steps: &[MigrationStep]) -> MigrateReply
where
    S: MigrationStore + ?Sized,
{
    let mut reply = MigrateReply {
        ok: true,
        ..MigrateReply::default()
    };

    if let Err(failure) = store.ensure_table() {
        return failed(reply, None, failure);
    }

    let already_applied = match store.applied() {
        Ok(keys) => keys,
        Err(failure) => return failed(reply, None, failure),
    };

    let mut ordered: Vec<&MigrationStep> = steps.iter().collect();
    ordered.sort_by(|a, b| a.key.cmp(&b.key));

    for step in ordered {
        if already_applied.contains(&step.key) || reply.applied.contains(&step.key) {
            reply.skipped += 1;
            continue;
        }

        debug!(step = %step.key, "Running migration");
        if let Err(failure) = store.apply(step) {
            warn!(step = %step.key, error = %failure.message, "Migration failed");
            return failed(reply, Some(step.key.clone()), failure);
        }
        reply.applied.push(step.key.clone());
    }

    reply
}

fn failed(
    mut reply: MigrateReply,
    step: Option<MigrationKey>,
    failure: RemoteFailure,
) -> MigrateReply {
    reply.ok = false;
    reply.failed_step = step;
    reply.error = Some(failure.message);
    reply.traceback = failure.traceback;
    reply
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    /// In-memory store that fails the step named in `fail_on`.
    #[derive(Default)]
    struct MemoryStore {
        table: bool,
        recorded: Vec<MigrationKey>,
        ran: Vec<MigrationKey>,
        fail_on: Option<MigrationKey>,
    }

    impl MigrationStore for MemoryStore {
        fn ensure_table(&mut self) -> Result<(), RemoteFailure> {
            self.table = true;
            Ok(())
        }

        fn applied(&self) -> Result<BTreeSet<MigrationKey>, RemoteFailure> {
            Ok(self.recorded.iter().cloned().collect())
        }

        fn run_step(&mut self, step: &MigrationStep) -> Result<(), RemoteFailure> {
            assert!(self.table, "table must exist before any step runs");
            self.ran.push(step.key.clone());
            if self.fail_on.as_ref() == Some(&step.key) {
                return Err(RemoteFailure::new(format!("{} exploded", step.code)));
            }
            Ok(())
        }

        fn record_applied(&mut self, key: &MigrationKey) -> Result<(), RemoteFailure> {
            self.recorded.push(key.clone());
            Ok(())
        }
    }

    fn keys(list: &[&str]) -> Vec<MigrationKey> {
        list.iter().map(|k| MigrationKey::new(*k)).collect()
    }

    fn steps() -> Vec<MigrationStep> {
        vec![
            MigrationStep::new("3", "add_column"),
            MigrationStep::new("1", "create_table"),
            MigrationStep::new("2", "create_index"),
        ]
    }

    #[test]
    fn applies_in_ascending_order_and_records_each() {
        let mut store = MemoryStore::default();
        let reply = apply_batch(&mut store, &steps());

        assert!(reply.ok);
        assert_eq!(reply.applied, keys(&["1", "2", "3"]));
        assert_eq!(store.ran, keys(&["1", "2", "3"]));
        assert_eq!(store.recorded, keys(&["1", "2", "3"]));
    }

    #[test]
    fn only_pending_steps_run() {
        let mut store = MemoryStore {
            recorded: keys(&["1"]),
            ..MemoryStore::default()
        };
        let batch = vec![
            MigrationStep::new("1", "create_table"),
            MigrationStep::new("2", "create_index"),
        ];

        let reply = apply_batch(&mut store, &batch);

        assert!(reply.ok);
        assert_eq!(store.ran, keys(&["2"]));
        assert_eq!(store.recorded, keys(&["1", "2"]));
        assert_eq!(reply.skipped, 1);
    }

    #[test]
    fn rerun_after_failure_resumes_at_failed_step() {
        let mut store = MemoryStore {
            fail_on: Some("2".into()),
            ..MemoryStore::default()
        };

        let first = apply_batch(&mut store, &steps());
        assert!(!first.ok);
        assert_eq!(first.failed_step, Some("2".into()));
        assert_eq!(first.error.as_deref(), Some("create_index exploded"));
        assert_eq!(store.recorded, keys(&["1"]));

        store.fail_on = None;
        store.ran.clear();
        let second = apply_batch(&mut store, &steps());

        assert!(second.ok);
        assert_eq!(store.ran, keys(&["2", "3"]));
        assert_eq!(store.recorded, keys(&["1", "2", "3"]));
    }

    #[test]
    fn duplicate_keys_run_once() {
        let mut store = MemoryStore::default();
        let batch = vec![
            MigrationStep::new("1", "first"),
            MigrationStep::new("1", "second"),
        ];

        let reply = apply_batch(&mut store, &batch);
        assert_eq!(store.ran, keys(&["1"]));
        assert_eq!(reply.skipped, 1);
    }
}
