//! Admins stage.
//!
//! Needs the Sites stage to have written site ids: an admin whose site has
//! no id for the active environment is skipped.

use std::collections::BTreeMap;

use propsync_directory::{DirectoryClient, EntityKind, NewEmailDevice, NewPerson, Person};
use propsync_sheet::{AdminRecord, Collection, Environment, RowLayout, SiteRecord, Workbook};
use tracing::{debug, error, info, warn};

use crate::compare::MismatchList;
use crate::config::EngineConfig;
use crate::lookup::or_absent;
use crate::report::{RecordOutcome, RecordReport, SkipReason, StageIssue, StageReport};
use crate::stage::Stage;

/// Reconciles the Admins collection against directory people.
pub struct AdminReconciler<'a, D: DirectoryClient + ?Sized> {
    directory: &'a D,
    config: &'a EngineConfig,
}

impl<'a, D: DirectoryClient + ?Sized> AdminReconciler<'a, D> {
    pub fn new(directory: &'a D, config: &'a EngineConfig) -> Self {
        Self { directory, config }
    }

    pub async fn run(&self, workbook: &mut Workbook) -> StageReport {
        let mut report = StageReport::new(Stage::Admins);
        let supervisors = self.resolve_supervisors(&mut report).await;

        let Workbook { sites, admins, .. } = workbook;
        for admin in &mut admins.records {
            if admin.key().is_empty() {
                debug!(row = admin.row, "Skipping admin row without a target name");
                continue;
            }
            let record = self.reconcile(admin, sites, &supervisors).await;
            report.push(record);
        }

        report
    }

    /// Look up every configured default supervisor once. Names that do not
    /// resolve are reported and left out.
    async fn resolve_supervisors(&self, report: &mut StageReport) -> Vec<String> {
        let mut ids = Vec::with_capacity(self.config.default_supervisors.len());

        for name in &self.config.default_supervisors {
            let found = or_absent(
                EntityKind::Person,
                name,
                self.directory.find_person(name).await,
            );
            match found {
                Some(person) => {
                    debug!(supervisor = %name, id = %person.id, "Resolved default supervisor");
                    ids.push(person.id);
                }
                None => {
                    error!(supervisor = %name, "Default supervisor not found in directory");
                    report
                        .issues
                        .push(StageIssue::UnresolvedSupervisor { name: name.clone() });
                }
            }
        }

        ids
    }

    async fn reconcile(
        &self,
        admin: &mut AdminRecord,
        sites: &Collection<SiteRecord>,
        supervisors: &[String],
    ) -> RecordReport {
        let env = self.config.environment;

        let Some(site_id) = sites.id_of(&admin.site_name, env) else {
            error!(
                admin = %admin.target_name,
                site = %admin.site_name,
                "Site has no id for {env}; skipping admin"
            );
            return RecordReport::new(
                admin.row,
                admin.target_name.clone(),
                RecordOutcome::Skipped {
                    reason: SkipReason::MissingSite {
                        site_name: admin.site_name.clone(),
                    },
                },
            );
        };

        let found = or_absent(
            EntityKind::Person,
            &admin.target_name,
            self.directory.find_person(&admin.target_name).await,
        );

        match found {
            Some(person) => self.compare_existing(admin, person, env),
            None => {
                let site_id = site_id.to_string();
                self.create(admin, &site_id, supervisors).await
            }
        }
    }

    fn compare_existing(
        &self,
        admin: &mut AdminRecord,
        person: Person,
        env: Environment,
    ) -> RecordReport {
        let mut list = MismatchList::new();
        let remote_property = person
            .property_text(&self.config.property_name)
            .unwrap_or_default();
        list.exact(&self.config.property_name, &admin.property_value, &remote_property);
        list.exact("firstName", &admin.first_name, &person.first_name);
        list.exact("lastName", &admin.last_name, &person.last_name);
        list.contains_all("roles", &admin.roles, person.role_names());
        if let Some(cached) = admin.ids.get(env) {
            list.exact("id", cached, &person.id);
        }

        admin.ids.set(env, person.id.clone());

        let outcome = if list.is_empty() {
            info!(admin = %admin.target_name, id = %person.id, "Admin matches");
            RecordOutcome::Matched {
                remote_id: person.id,
            }
        } else {
            list.warn(EntityKind::Person, &admin.target_name);
            RecordOutcome::Mismatched {
                remote_id: person.id,
                fields: list.into_vec(),
            }
        };
        RecordReport::new(admin.row, admin.target_name.clone(), outcome)
    }

    async fn create(
        &self,
        admin: &mut AdminRecord,
        site_id: &str,
        supervisors: &[String],
    ) -> RecordReport {
        let env = self.config.environment;
        info!(admin = %admin.target_name, "Admin not in directory; creating");

        let payload = NewPerson {
            target_name: admin.target_name.clone(),
            site: site_id.to_string(),
            supervisors: supervisors.to_vec(),
            properties: BTreeMap::from([(
                self.config.property_name.clone(),
                admin.property_value.clone(),
            )]),
            first_name: admin.first_name.clone(),
            last_name: admin.last_name.clone(),
            roles: admin.roles.clone(),
        };

        let person = match self.directory.create_person(&payload).await {
            Ok(person) => person,
            Err(e) => {
                error!(admin = %admin.target_name, error = %e, "Failed to create admin");
                return RecordReport::new(
                    admin.row,
                    admin.target_name.clone(),
                    RecordOutcome::Failed {
                        error: e.to_string(),
                    },
                );
            }
        };
        info!(admin = %admin.target_name, id = %person.id, "Created admin");
        admin.ids.set(env, person.id.clone());

        let mut warnings = Vec::new();
        if admin.email.is_empty() {
            warn!(admin = %admin.target_name, "No email address; device not created");
            warnings.push("no email address; device not created".to_string());
        } else {
            let device = NewEmailDevice::new(
                person.id.clone(),
                self.config.device.name.clone(),
                self.config.device.device_type.clone(),
                admin.email.clone(),
            );
            match self.directory.add_device(&device).await {
                Ok(created) => {
                    debug!(admin = %admin.target_name, device = %created.id, "Added email device");
                }
                Err(e) => {
                    error!(admin = %admin.target_name, error = %e, "Failed to add email device");
                    warnings.push(format!("device creation failed: {e}"));
                }
            }
        }

        RecordReport::new(
            admin.row,
            admin.target_name.clone(),
            RecordOutcome::Created {
                remote_id: person.id,
                written_back: true,
            },
        )
        .with_warnings(warnings)
    }
}
