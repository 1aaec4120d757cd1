//! Groups stage.
//!
//! Needs site ids from the Sites stage and admin ids from the Admins stage.
//! A group's expected supervisors are the admins sharing its site.

use propsync_directory::{DirectoryClient, EntityKind, Group, NewGroup};
use propsync_sheet::{GroupRecord, RowLayout, Workbook};
use tracing::{debug, error, info, warn};

use crate::compare::MismatchList;
use crate::config::EngineConfig;
use crate::lookup::or_absent;
use crate::report::{RecordOutcome, RecordReport, SkipReason, StageReport};
use crate::stage::Stage;

/// Reconciles the Groups collection.
pub struct GroupReconciler<'a, D: DirectoryClient + ?Sized> {
    directory: &'a D,
    config: &'a EngineConfig,
}

impl<'a, D: DirectoryClient + ?Sized> GroupReconciler<'a, D> {
    pub fn new(directory: &'a D, config: &'a EngineConfig) -> Self {
        Self { directory, config }
    }

    pub async fn run(&self, workbook: &mut Workbook) -> StageReport {
        let env = self.config.environment;
        let mut report = StageReport::new(Stage::Groups);

        let Workbook {
            sites,
            admins,
            groups,
        } = workbook;
        for group in &mut groups.records {
            if group.key().is_empty() {
                debug!(row = group.row, "Skipping group row without a target name");
                continue;
            }

            let Some(site_id) = sites.id_of(&group.site_name, env) else {
                error!(
                    group = %group.target_name,
                    site = %group.site_name,
                    "Site has no id for {env}; skipping group"
                );
                report.push(RecordReport::new(
                    group.row,
                    group.target_name.clone(),
                    RecordOutcome::Skipped {
                        reason: SkipReason::MissingSite {
                            site_name: group.site_name.clone(),
                        },
                    },
                ));
                continue;
            };
            let site_id = site_id.to_string();
            let expected = admins.ids_for_site(&group.site_name, env);

            let record = self.reconcile(group, &site_id, &expected).await;
            report.push(record);
        }

        report
    }

    async fn reconcile(
        &self,
        group: &mut GroupRecord,
        site_id: &str,
        expected: &[String],
    ) -> RecordReport {
        let found = or_absent(
            EntityKind::Group,
            &group.target_name,
            self.directory.find_group(&group.target_name).await,
        );

        match found {
            Some(remote) => self.compare_existing(group, remote, site_id, expected).await,
            None => self.create(group, site_id, expected).await,
        }
    }

    async fn compare_existing(
        &self,
        group: &mut GroupRecord,
        remote: Group,
        site_id: &str,
        expected: &[String],
    ) -> RecordReport {
        let env = self.config.environment;
        let mut list = MismatchList::new();

        let remote_site = remote.site_id().unwrap_or_default();
        list.exact("site", site_id, remote_site);
        list.contains_all("supervisors", expected, remote.supervisor_ids());
        list.require(
            "observedByAll",
            !remote.observed_by_all,
            "false",
            &remote.observed_by_all.to_string(),
        );

        let members = match self.directory.list_group_members(&remote.id).await {
            Ok(members) => members,
            Err(e) => {
                error!(group = %group.target_name, error = %e, "Failed to list group members");
                Vec::new()
            }
        };
        list.contains_all("members", expected, members.iter().map(String::as_str));

        if let Some(cached) = group.ids.get(env) {
            list.exact("id", cached, &remote.id);
        }

        group.ids.set(env, remote.id.clone());

        let outcome = if list.is_empty() {
            info!(group = %group.target_name, id = %remote.id, "Group matches");
            RecordOutcome::Matched {
                remote_id: remote.id,
            }
        } else {
            list.warn(EntityKind::Group, &group.target_name);
            RecordOutcome::Mismatched {
                remote_id: remote.id,
                fields: list.into_vec(),
            }
        };
        RecordReport::new(group.row, group.target_name.clone(), outcome)
    }

    async fn create(
        &self,
        group: &mut GroupRecord,
        site_id: &str,
        expected: &[String],
    ) -> RecordReport {
        let env = self.config.environment;
        info!(group = %group.target_name, "Group not in directory; creating");

        let payload = NewGroup {
            target_name: group.target_name.clone(),
            description: self.config.group_description.describe(&group.target_name),
            site: site_id.to_string(),
            supervisors: expected.to_vec(),
            observed_by_all: false,
        };

        let created = match self.directory.create_group(&payload).await {
            Ok(created) => created,
            Err(e) => {
                error!(group = %group.target_name, error = %e, "Failed to create group");
                return RecordReport::new(
                    group.row,
                    group.target_name.clone(),
                    RecordOutcome::Failed {
                        error: e.to_string(),
                    },
                );
            }
        };
        info!(group = %group.target_name, id = %created.id, "Created group");

        let mut warnings = Vec::new();
        let mut added = Vec::new();
        for person_id in expected {
            match self
                .directory
                .add_group_member(&group.target_name, &self.config.default_shift, person_id)
                .await
            {
                Ok(member) => added.push(member.recipient.id),
                Err(e) => {
                    error!(
                        group = %group.target_name,
                        member = %person_id,
                        error = %e,
                        "Failed to add roster member"
                    );
                    warnings.push(format!("roster add failed for {person_id}: {e}"));
                }
            }
        }

        let written_back = !added.is_empty();
        if written_back {
            debug!(group = %group.target_name, members = added.len(), "Added roster members");
            group.ids.set(env, created.id.clone());
        } else {
            warn!(
                group = %group.target_name,
                id = %created.id,
                "No roster member was added; id not written to the workbook"
            );
            warnings.push("no roster member was added; id not written back".to_string());
        }

        RecordReport::new(
            group.row,
            group.target_name.clone(),
            RecordOutcome::Created {
                remote_id: created.id,
                written_back,
            },
        )
        .with_warnings(warnings)
    }
}
