//! Source of migration steps.

use super::HarborError;
use crate::domain::MigrationStep;

/// Supplies the project's migration steps.
///
/// Order of the returned steps does not matter; batches are always sorted
/// by key before they are sent.
pub trait MigrationSource: Send + Sync {
    fn load(&self) -> Result<Vec<MigrationStep>, HarborError>;
}
