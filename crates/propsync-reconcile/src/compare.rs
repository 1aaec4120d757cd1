//! Field comparison rules.
//!
//! Scalars compare exactly. Collections compare by containment: the remote
//! side may hold more than the workbook expects, never less.

use std::collections::HashSet;

use propsync_directory::EntityKind;
use tracing::warn;

use crate::report::FieldMismatch;

/// Accumulates mismatching fields for one entity.
#[derive(Debug, Default)]
pub struct MismatchList(Vec<FieldMismatch>);

impl MismatchList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact string equality.
    pub fn exact(&mut self, field: &str, local: &str, remote: &str) {
        if local != remote {
            self.push(field, local, remote);
        }
    }

    /// Every `expected` value must be present in `actual`.
    pub fn contains_all<'a, I>(&mut self, field: &str, expected: &[String], actual: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let actual: Vec<&str> = actual.into_iter().collect();
        if !missing_from(expected, &actual).is_empty() {
            self.push(field, &expected.join(", "), &actual.join(", "));
        }
    }

    /// A condition that must hold, described by its local and remote values.
    pub fn require(&mut self, field: &str, holds: bool, local: &str, remote: &str) {
        if !holds {
            self.push(field, local, remote);
        }
    }

    pub fn push(&mut self, field: &str, local: &str, remote: &str) {
        self.0.push(FieldMismatch {
            field: field.to_string(),
            local: local.to_string(),
            remote: remote.to_string(),
        });
    }

    /// Log one warning per differing field.
    pub fn warn(&self, entity: EntityKind, key: &str) {
        for m in &self.0 {
            warn!(
                entity = %entity,
                key,
                field = %m.field,
                local = %m.local,
                remote = %m.remote,
                "Mismatch with directory"
            );
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Field names, in the order they were checked.
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        self.0.iter().map(|m| m.field.as_str()).collect()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<FieldMismatch> {
        self.0
    }
}

/// Values of `expected` that are absent from `actual`, in `expected` order.
#[must_use]
pub fn missing_from<'a>(expected: &'a [String], actual: &[&str]) -> Vec<&'a str> {
    let actual: HashSet<&str> = actual.iter().copied().collect();
    expected
        .iter()
        .map(String::as_str)
        .filter(|e| !actual.contains(e))
        .collect()
}
