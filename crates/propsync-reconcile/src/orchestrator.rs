//! Stage sequencing and persistence.

use chrono::Utc;
use propsync_directory::DirectoryClient;
use propsync_sheet::TabularStore;
use tracing::{info, warn};

use crate::admins::AdminReconciler;
use crate::config::EngineConfig;
use crate::error::{ReconcileError, ReconcileResult};
use crate::groups::GroupReconciler;
use crate::report::{RunReport, StageReport};
use crate::sites::SiteReconciler;
use crate::stage::{Stage, StageSet};

/// Runs the requested stages in canonical order against one directory.
pub struct Orchestrator<'a, D: DirectoryClient + ?Sized> {
    directory: &'a D,
    config: &'a EngineConfig,
}

impl<'a, D: DirectoryClient + ?Sized> Orchestrator<'a, D> {
    pub fn new(directory: &'a D, config: &'a EngineConfig) -> Self {
        Self { directory, config }
    }

    /// Run `stages` (Sites, then Admins, then Groups), persisting the store
    /// after each one so later stages and later runs see the written ids.
    ///
    /// Record-level failures are in the returned report. Only an empty stage
    /// set or a failed persist is an error.
    pub async fn process<S>(&self, store: &mut S, stages: &StageSet) -> ReconcileResult<RunReport>
    where
        S: TabularStore + ?Sized,
    {
        if stages.is_empty() {
            return Err(ReconcileError::NoStages);
        }

        let mut run = RunReport::new(self.config.environment);
        info!(
            environment = %self.config.environment,
            stages = ?stages.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
            "Starting reconciliation"
        );

        for stage in stages.iter() {
            info!(stage = %stage, "Starting stage");
            let report = self.run_stage(stage, store).await;
            store.persist()?;
            log_summary(&report);
            run.stages.push(report);
        }

        run.finished_at = Some(Utc::now());
        let totals = run.totals();
        info!(
            total = totals.total,
            created = totals.created,
            matched = totals.matched,
            mismatched = totals.mismatched,
            skipped = totals.skipped,
            failed = totals.failed,
            "Reconciliation finished"
        );
        Ok(run)
    }

    async fn run_stage<S>(&self, stage: Stage, store: &mut S) -> StageReport
    where
        S: TabularStore + ?Sized,
    {
        let workbook = store.workbook_mut();
        match stage {
            Stage::Sites => {
                SiteReconciler::new(self.directory, self.config)
                    .run(workbook)
                    .await
            }
            Stage::Admins => {
                AdminReconciler::new(self.directory, self.config)
                    .run(workbook)
                    .await
            }
            Stage::Groups => {
                GroupReconciler::new(self.directory, self.config)
                    .run(workbook)
                    .await
            }
        }
    }
}

fn log_summary(report: &StageReport) {
    let summary = report.summary();
    info!(
        stage = %report.stage,
        total = summary.total,
        created = summary.created,
        matched = summary.matched,
        mismatched = summary.mismatched,
        skipped = summary.skipped,
        failed = summary.failed,
        "Stage complete"
    );
    if !report.issues.is_empty() {
        warn!(stage = %report.stage, issues = report.issues.len(), "Stage reported issues");
    }
}
