//! In-memory workbook: three typed collections plus name lookups.

use crate::layout::RowLayout;
use crate::records::{AdminRecord, Environment, GroupRecord, SiteRecord};

/// One collection: its header row and its records in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    pub header: Vec<String>,
    pub records: Vec<T>,
}

impl<T: RowLayout> Collection<T> {
    /// A collection with the default header.
    #[must_use]
    pub fn new(records: Vec<T>) -> Self {
        Self {
            header: T::HEADERS.iter().map(|h| (*h).to_string()).collect(),
            records,
        }
    }

    /// Decode raw rows; the first row is the header.
    #[must_use]
    pub fn from_rows(mut rows: Vec<Vec<String>>) -> Self {
        if rows.is_empty() {
            return Self::new(Vec::new());
        }
        let header = rows.remove(0);
        let records = rows
            .iter()
            .enumerate()
            .map(|(i, cells)| T::decode(i + 2, cells))
            .collect();
        Self { header, records }
    }

    /// Encode back to raw rows, header first.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        std::iter::once(self.header.clone())
            .chain(self.records.iter().map(RowLayout::encode))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<T: RowLayout> Default for Collection<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Collection<SiteRecord> {
    /// Remote id for `env` of the first site named `name`.
    #[must_use]
    pub fn id_of(&self, name: &str, env: Environment) -> Option<&str> {
        self.records
            .iter()
            .find(|s| s.name == name)
            .and_then(|s| s.ids.get(env))
    }
}

impl Collection<AdminRecord> {
    /// Remote ids for `env` of every admin attached to `site_name`.
    #[must_use]
    pub fn ids_for_site(&self, site_name: &str, env: Environment) -> Vec<String> {
        self.records
            .iter()
            .filter(|a| a.site_name == site_name)
            .filter_map(|a| a.ids.get(env).map(str::to_string))
            .collect()
    }
}

/// The Sites, Admins and Groups collections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub sites: Collection<SiteRecord>,
    pub admins: Collection<AdminRecord>,
    pub groups: Collection<GroupRecord>,
}

impl Workbook {
    #[must_use]
    pub fn new(sites: Vec<SiteRecord>, admins: Vec<AdminRecord>, groups: Vec<GroupRecord>) -> Self {
        Self {
            sites: Collection::new(sites),
            admins: Collection::new(admins),
            groups: Collection::new(groups),
        }
    }

    /// Remote id of the named site for `env`. `None` when the site is not
    /// listed or has not been reconciled in that environment.
    #[must_use]
    pub fn site_id(&self, name: &str, env: Environment) -> Option<&str> {
        self.sites.id_of(name, env)
    }

    /// Remote ids of every admin attached to `site_name`, in source order.
    /// Admins without an id for `env` contribute nothing.
    #[must_use]
    pub fn admin_ids_for_site(&self, site_name: &str, env: Environment) -> Vec<String> {
        self.admins.ids_for_site(site_name, env)
    }
}
