//! Sites stage.

use propsync_directory::{DirectoryClient, EntityKind, NewSite, Site};
use propsync_sheet::{Environment, RowLayout, SiteRecord, Workbook};
use tracing::{debug, error, info};

use crate::compare::MismatchList;
use crate::config::EngineConfig;
use crate::lookup::or_absent;
use crate::report::{RecordOutcome, RecordReport, StageReport};
use crate::stage::Stage;

/// Reconciles the Sites collection. Depends on nothing else.
pub struct SiteReconciler<'a, D: DirectoryClient + ?Sized> {
    directory: &'a D,
    config: &'a EngineConfig,
}

impl<'a, D: DirectoryClient + ?Sized> SiteReconciler<'a, D> {
    pub fn new(directory: &'a D, config: &'a EngineConfig) -> Self {
        Self { directory, config }
    }

    pub async fn run(&self, workbook: &mut Workbook) -> StageReport {
        let mut report = StageReport::new(Stage::Sites);

        for site in &mut workbook.sites.records {
            if site.key().is_empty() {
                debug!(row = site.row, "Skipping site row without a name");
                continue;
            }
            let record = self.reconcile(site).await;
            report.push(record);
        }

        report
    }

    async fn reconcile(&self, site: &mut SiteRecord) -> RecordReport {
        let env = self.config.environment;
        let found = or_absent(
            EntityKind::Site,
            &site.name,
            self.directory.find_site(&site.name).await,
        );

        let outcome = match found {
            Some(remote) => {
                let mismatches = compare(site, &remote, env);
                site.ids.set(env, remote.id.clone());
                site.latitude = remote.latitude.map(coordinate_cell);
                site.longitude = remote.longitude.map(coordinate_cell);

                if mismatches.is_empty() {
                    info!(site = %site.name, id = %remote.id, "Site matches");
                    RecordOutcome::Matched {
                        remote_id: remote.id,
                    }
                } else {
                    mismatches.warn(EntityKind::Site, &site.name);
                    RecordOutcome::Mismatched {
                        remote_id: remote.id,
                        fields: mismatches.into_vec(),
                    }
                }
            }
            None => {
                info!(site = %site.name, "Site not in directory; creating");
                match self.directory.create_site(&payload(site)).await {
                    Ok(created) => {
                        site.ids.set(env, created.id.clone());
                        info!(site = %site.name, id = %created.id, "Created site");
                        RecordOutcome::Created {
                            remote_id: created.id,
                            written_back: true,
                        }
                    }
                    Err(e) => {
                        error!(site = %site.name, error = %e, "Failed to create site");
                        RecordOutcome::Failed {
                            error: e.to_string(),
                        }
                    }
                }
            }
        };

        RecordReport::new(site.row, site.name.clone(), outcome)
    }
}

fn compare(local: &SiteRecord, remote: &Site, env: Environment) -> MismatchList {
    let mut list = MismatchList::new();
    list.exact("address1", &local.address1, &remote.address1);
    if !remote.address2.is_empty() {
        list.exact(
            "address2",
            local.address2.as_deref().unwrap_or_default(),
            &remote.address2,
        );
    }
    list.exact("city", &local.city, &remote.city);
    list.exact("country", &local.country, &remote.country);
    list.exact("language", &local.language, &remote.language);
    list.exact("postalCode", &local.postal_code, &remote.postal_code);
    list.exact("state", &local.state, &remote.state);
    list.exact("timezone", &local.timezone, &remote.timezone);
    if let Some(cached) = local.ids.get(env) {
        list.exact("id", cached, &remote.id);
    }
    list
}

fn payload(site: &SiteRecord) -> NewSite {
    NewSite {
        name: site.name.clone(),
        address1: site.address1.clone(),
        address2: site.address2.clone(),
        city: site.city.clone(),
        country: site.country.clone(),
        language: site.language.clone(),
        postal_code: site.postal_code.clone(),
        state: site.state.clone(),
        timezone: site.timezone.clone(),
        latitude: site.latitude.as_deref().map(coordinate),
        longitude: site.longitude.as_deref().map(coordinate),
    }
}

/// Cell text for a remote coordinate. Whole numbers keep their `.0`.
fn coordinate_cell(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Numeric cells go out as JSON numbers, anything else as entered.
fn coordinate(cell: &str) -> serde_json::Value {
    cell.trim()
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map_or_else(|| serde_json::Value::String(cell.to_string()), serde_json::Value::Number)
}
