//! Migration steps stored as files.
//!
//! Each file in `migrations/` is one step. The key is the file stem up to
//! the first `_`: `001_create_users.sql` has key `001`, `seed.lua` has key
//! `seed`. Hidden files are ignored.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use harbor_core::domain::sort_steps;
use harbor_core::{HarborError, MigrationSource, MigrationStep};
use tracing::debug;

/// [`MigrationSource`] over a directory.
#[derive(Debug, Clone)]
pub struct FsMigrationSource {
    dir: PathBuf,
}

impl FsMigrationSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl MigrationSource for FsMigrationSource {
    fn load(&self) -> Result<Vec<MigrationStep>, HarborError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(dir = %self.dir.display(), "No migrations directory");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut steps = Vec::new();
        let mut keys = BTreeSet::new();

        for entry in entries {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if stem.starts_with('.') {
                continue;
            }

            let key = stem.split_once('_').map_or(stem, |(key, _)| key);
            if key.is_empty() {
                debug!(path = %path.display(), "Skipping migration file without a key");
                continue;
            }
            if !keys.insert(key.to_string()) {
                return Err(HarborError::Io(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("duplicate migration key '{key}' in {}", self.dir.display()),
                )));
            }

            steps.push(MigrationStep::new(key, fs::read_to_string(&path)?));
        }

        sort_steps(&mut steps);
        debug!(count = steps.len(), "Loaded migrations");
        Ok(steps)
    }
}
