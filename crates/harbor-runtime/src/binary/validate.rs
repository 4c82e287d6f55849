//! Executable checks for candidate binaries.

use std::path::Path;

/// Whether `path` is a regular file the current user may execute.
///
/// On Unix this requires at least one execute bit; elsewhere any existing
/// file qualifies.
pub fn is_executable(path: &Path) -> bool {
    let Ok(metadata) = path.metadata() else {
        return false;
    };

    if !metadata.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }

    #[cfg(not(unix))]
    {
        true
    }
}
