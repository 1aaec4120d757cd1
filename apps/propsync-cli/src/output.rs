//! Run summary printed when processing finishes.

use std::fmt::Write as _;

use propsync_reconcile::{RecordOutcome, RunReport, SkipReason, StageIssue};

/// Render the per-stage table followed by the records that need attention.
#[must_use]
pub fn render_summary(report: &RunReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Environment: {}", report.environment);
    let _ = writeln!(
        out,
        "{:<8} {:>6} {:>8} {:>8} {:>11} {:>8} {:>7} {:>9}",
        "STAGE", "TOTAL", "CREATED", "MATCHED", "MISMATCHED", "SKIPPED", "FAILED", "WARNINGS"
    );
    let _ = writeln!(out, "{}", "-".repeat(72));

    for stage in &report.stages {
        let s = stage.summary();
        let _ = writeln!(
            out,
            "{:<8} {:>6} {:>8} {:>8} {:>11} {:>8} {:>7} {:>9}",
            stage.stage.as_str(),
            s.total,
            s.created,
            s.matched,
            s.mismatched,
            s.skipped,
            s.failed,
            stage.warning_count()
        );
    }

    for stage in &report.stages {
        for issue in &stage.issues {
            match issue {
                StageIssue::UnresolvedSupervisor { name } => {
                    let _ = writeln!(out, "[{}] supervisor not found: {name}", stage.stage);
                }
            }
        }
        for record in &stage.records {
            let detail = match &record.outcome {
                RecordOutcome::Created { .. } | RecordOutcome::Matched { .. } => None,
                RecordOutcome::Mismatched { fields, .. } => Some(
                    fields
                        .iter()
                        .map(|f| f.field.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                ),
                RecordOutcome::Skipped {
                    reason: SkipReason::MissingSite { site_name },
                } => Some(format!("site '{site_name}' has no id")),
                RecordOutcome::Failed { error } => Some(error.clone()),
            };
            if let Some(detail) = detail {
                let _ = writeln!(
                    out,
                    "[{}] row {} {}: {} ({detail})",
                    stage.stage,
                    record.row,
                    record.key,
                    record.outcome.label()
                );
            }
            for warning in &record.warnings {
                let _ = writeln!(
                    out,
                    "[{}] row {} {}: warning: {warning}",
                    stage.stage, record.row, record.key
                );
            }
        }
    }

    out
}

pub fn print_summary(report: &RunReport) {
    print!("{}", render_summary(report));
}
