//! Reconciliation engine.
//!
//! Runs the Sites, Admins and Groups stages against a [`DirectoryClient`],
//! always in that order. Each stage looks every record up by name, creates
//! what is missing, compares what exists, and writes remote ids back into the
//! workbook. Nothing is ever deleted or corrected remotely; drift is reported.
//!
//! [`DirectoryClient`]: propsync_directory::DirectoryClient

pub mod admins;
pub mod compare;
pub mod config;
pub mod error;
pub mod groups;
mod lookup;
pub mod orchestrator;
pub mod report;
pub mod sites;
pub mod stage;

pub use admins::AdminReconciler;
pub use config::{DeviceDefaults, EngineConfig, GroupDescription};
pub use error::{ReconcileError, ReconcileResult};
pub use groups::GroupReconciler;
pub use orchestrator::Orchestrator;
pub use report::{
    FieldMismatch, RecordOutcome, RecordReport, RunReport, SkipReason, StageIssue, StageReport,
    StageSummary,
};
pub use sites::SiteReconciler;
pub use stage::{Stage, StageSet};
