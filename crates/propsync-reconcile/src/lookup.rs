use propsync_directory::{DirectoryResult, EntityKind};
use tracing::error;

/// Collapse a failed lookup into "not found" after logging it.
pub(crate) fn or_absent<T>(
    kind: EntityKind,
    key: &str,
    result: DirectoryResult<Option<T>>,
) -> Option<T> {
    match result {
        Ok(found) => found,
        Err(e) => {
            error!(entity = %kind, key, error = %e, "Lookup failed; treating as not found");
            None
        }
    }
}
