//! The tabular store contract.

use crate::error::SheetResult;
use crate::workbook::Workbook;

/// Access to a workbook and a way to save it.
///
/// Mutations made through [`TabularStore::workbook_mut`] are only durable
/// after [`TabularStore::persist`] returns `Ok`.
pub trait TabularStore {
    fn workbook(&self) -> &Workbook;

    fn workbook_mut(&mut self) -> &mut Workbook;

    /// Save the current workbook.
    fn persist(&mut self) -> SheetResult<()>;
}

/// A store that only lives in memory. Used by tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    workbook: Workbook,
    persisted: Vec<Workbook>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(workbook: Workbook) -> Self {
        Self {
            workbook,
            persisted: Vec::new(),
        }
    }

    /// Number of successful persists.
    #[must_use]
    pub fn persist_count(&self) -> usize {
        self.persisted.len()
    }

    /// Snapshots taken at each persist, oldest first.
    #[must_use]
    pub fn snapshots(&self) -> &[Workbook] {
        &self.persisted
    }

    #[must_use]
    pub fn into_workbook(self) -> Workbook {
        self.workbook
    }
}

impl TabularStore for MemoryStore {
    fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    fn workbook_mut(&mut self) -> &mut Workbook {
        &mut self.workbook
    }

    fn persist(&mut self) -> SheetResult<()> {
        self.persisted.push(self.workbook.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Environment, SiteRecord};

    #[test]
    fn test_memory_store_snapshots_on_persist() {
        let mut store = MemoryStore::new(Workbook::new(
            vec![SiteRecord {
                name: "Paris".into(),
                ..Default::default()
            }],
            vec![],
            vec![],
        ));

        store.persist().unwrap();
        store.workbook_mut().sites.records[0]
            .ids
            .set(Environment::NonProduction, "s-1");
        store.persist().unwrap();

        assert_eq!(store.persist_count(), 2);
        assert_eq!(store.snapshots()[0].site_id("Paris", Environment::NonProduction), None);
        assert_eq!(
            store.snapshots()[1].site_id("Paris", Environment::NonProduction),
            Some("s-1")
        );
    }
}
