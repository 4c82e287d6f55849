//! Binary search order and memoization.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use harbor_core::HarborError;
use tracing::debug;

use super::validate::is_executable;

/// Environment variable naming the server executable.
pub const BINARY_ENV_VAR: &str = "HARBOR_SERVER_BIN";

/// Command names tried in every search location, in order.
pub const CANDIDATE_NAMES: [&str; 2] = ["openresty", "nginx"];

/// Install directories searched before `PATH`.
pub const WELL_KNOWN_DIRS: [&str; 6] = [
    "/usr/local/openresty/nginx/sbin",
    "/usr/local/opt/openresty/bin",
    "/opt/openresty/nginx/sbin",
    "/usr/local/nginx/sbin",
    "/usr/sbin",
    "/usr/local/sbin",
];

/// Locates the server executable.
///
/// The first call performs the search; every later call returns the same
/// outcome, success or failure.
#[derive(Debug)]
pub struct BinaryLocator {
    explicit: Option<PathBuf>,
    search_dirs: Vec<PathBuf>,
    names: Vec<String>,
    search_path: bool,
    outcome: OnceLock<Result<PathBuf, Vec<PathBuf>>>,
}

impl BinaryLocator {
    /// Locator over the well-known install directories and `PATH`.
    ///
    /// `explicit`, when set, is the only candidate considered.
    pub fn new(explicit: Option<PathBuf>) -> Self {
        Self {
            explicit,
            search_dirs: WELL_KNOWN_DIRS.into_iter().map(PathBuf::from).collect(),
            names: CANDIDATE_NAMES.into_iter().map(str::to_string).collect(),
            search_path: true,
            outcome: OnceLock::new(),
        }
    }

    /// Locator over custom directories, without `PATH` lookup.
    pub fn with_search_dirs(
        explicit: Option<PathBuf>,
        search_dirs: Vec<PathBuf>,
        names: &[&str],
    ) -> Self {
        Self {
            explicit,
            search_dirs,
            names: names.iter().map(|n| (*n).to_string()).collect(),
            search_path: false,
            outcome: OnceLock::new(),
        }
    }

    /// Path of the server executable.
    pub fn locate(&self) -> Result<PathBuf, HarborError> {
        self.outcome
            .get_or_init(|| self.search())
            .clone()
            .map_err(|searched| HarborError::BinaryNotFound { searched })
    }

    fn search(&self) -> Result<PathBuf, Vec<PathBuf>> {
        if let Some(explicit) = &self.explicit {
            return Self::check_explicit(explicit);
        }

        let mut searched = Vec::new();

        for dir in &self.search_dirs {
            for name in &self.names {
                let candidate = dir.join(name);
                if is_executable(&candidate) {
                    debug!(path = %candidate.display(), "Found server binary");
                    return Ok(candidate);
                }
                searched.push(candidate);
            }
        }

        if self.search_path {
            for name in &self.names {
                if let Ok(found) = which::which(name) {
                    debug!(path = %found.display(), "Found server binary on PATH");
                    return Ok(found);
                }
                searched.push(PathBuf::from(name));
            }
        }

        Err(searched)
    }

    /// A bare command name is looked up on `PATH`; anything else must be an
    /// executable file.
    fn check_explicit(explicit: &Path) -> Result<PathBuf, Vec<PathBuf>> {
        let bare_name = explicit.components().count() == 1 && !explicit.is_absolute();
        if bare_name && !explicit.exists() {
            return which::which(explicit).map_err(|_| vec![explicit.to_path_buf()]);
        }

        if is_executable(explicit) {
            debug!(path = %explicit.display(), "Using configured server binary");
            Ok(explicit.to_path_buf())
        } else {
            Err(vec![explicit.to_path_buf()])
        }
    }
}
