//! Per-record outcomes and their aggregation into stage and run reports.

use chrono::{DateTime, Utc};
use propsync_sheet::Environment;
use serde::Serialize;

use crate::stage::Stage;

/// A field whose local and remote values disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMismatch {
    pub field: String,
    pub local: String,
    pub remote: String,
}

/// Why a record was not processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// The referenced site is not listed, or has no id for this environment.
    MissingSite { site_name: String },
}

/// What happened to one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecordOutcome {
    /// Created remotely. `written_back` is false when the id was deliberately
    /// not stored in the workbook.
    Created { remote_id: String, written_back: bool },
    Matched { remote_id: String },
    Mismatched {
        remote_id: String,
        fields: Vec<FieldMismatch>,
    },
    Skipped { reason: SkipReason },
    Failed { error: String },
}

impl RecordOutcome {
    /// Remote id the record resolved to, if any.
    #[must_use]
    pub fn remote_id(&self) -> Option<&str> {
        match self {
            Self::Created { remote_id, .. }
            | Self::Matched { remote_id }
            | Self::Mismatched { remote_id, .. } => Some(remote_id),
            Self::Skipped { .. } | Self::Failed { .. } => None,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Created { .. } => "created",
            Self::Matched { .. } => "matched",
            Self::Mismatched { .. } => "mismatched",
            Self::Skipped { .. } => "skipped",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Outcome of one record plus anything worth a follow-up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordReport {
    /// Row in the source collection.
    pub row: usize,
    pub key: String,
    pub outcome: RecordOutcome,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl RecordReport {
    #[must_use]
    pub fn new(row: usize, key: impl Into<String>, outcome: RecordOutcome) -> Self {
        Self {
            row,
            key: key.into(),
            outcome,
            warnings: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }
}

/// A stage-level problem not tied to one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StageIssue {
    /// A configured default supervisor could not be found.
    UnresolvedSupervisor { name: String },
}

/// Counts by outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StageSummary {
    pub total: usize,
    pub created: usize,
    pub matched: usize,
    pub mismatched: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl StageSummary {
    fn add(&mut self, outcome: &RecordOutcome) {
        self.total += 1;
        match outcome {
            RecordOutcome::Created { .. } => self.created += 1,
            RecordOutcome::Matched { .. } => self.matched += 1,
            RecordOutcome::Mismatched { .. } => self.mismatched += 1,
            RecordOutcome::Skipped { .. } => self.skipped += 1,
            RecordOutcome::Failed { .. } => self.failed += 1,
        }
    }

    fn merge(&mut self, other: &StageSummary) {
        self.total += other.total;
        self.created += other.created;
        self.matched += other.matched;
        self.mismatched += other.mismatched;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

/// Everything one stage did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageReport {
    pub stage: Stage,
    pub records: Vec<RecordReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<StageIssue>,
}

impl StageReport {
    #[must_use]
    pub fn new(stage: Stage) -> Self {
        Self {
            stage,
            records: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn push(&mut self, record: RecordReport) {
        self.records.push(record);
    }

    #[must_use]
    pub fn summary(&self) -> StageSummary {
        let mut summary = StageSummary::default();
        for record in &self.records {
            summary.add(&record.outcome);
        }
        summary
    }

    /// Report for the record with this key.
    #[must_use]
    pub fn record(&self, key: &str) -> Option<&RecordReport> {
        self.records.iter().find(|r| r.key == key)
    }

    /// Skipped records plus unresolved supervisors.
    #[must_use]
    pub fn missing_dependencies(&self) -> usize {
        let skipped = self
            .records
            .iter()
            .filter(|r| matches!(r.outcome, RecordOutcome::Skipped { .. }))
            .count();
        let unresolved = self
            .issues
            .iter()
            .filter(|i| matches!(i, StageIssue::UnresolvedSupervisor { .. }))
            .count();
        skipped + unresolved
    }

    /// Number of records that carry warnings.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.records.iter().filter(|r| !r.warnings.is_empty()).count()
    }
}

/// Reports of every executed stage, in execution order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub environment: Environment,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub stages: Vec<StageReport>,
}

impl RunReport {
    #[must_use]
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            started_at: Utc::now(),
            finished_at: None,
            stages: Vec::new(),
        }
    }

    #[must_use]
    pub fn stage(&self, stage: Stage) -> Option<&StageReport> {
        self.stages.iter().find(|s| s.stage == stage)
    }

    /// Summary over all stages.
    #[must_use]
    pub fn totals(&self) -> StageSummary {
        let mut totals = StageSummary::default();
        for stage in &self.stages {
            totals.merge(&stage.summary());
        }
        totals
    }
}
