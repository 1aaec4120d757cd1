//! Tabular source of truth for the reconciliation engine.
//!
//! The workbook holds three collections (Sites, Admins, Groups). Rows are
//! decoded once into typed records; the [`TabularStore`] trait hides where
//! the workbook lives and how it is saved.

pub mod csv_store;
pub mod error;
pub mod layout;
pub mod records;
pub mod store;
pub mod workbook;

pub use csv_store::CsvWorkbookStore;
pub use error::{SheetError, SheetResult};
pub use layout::{CollectionKind, RowLayout};
pub use records::{AdminRecord, Environment, GroupRecord, RemoteIds, SiteRecord};
pub use store::{MemoryStore, TabularStore};
pub use workbook::{Collection, Workbook};
