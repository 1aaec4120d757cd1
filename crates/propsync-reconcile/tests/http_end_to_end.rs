//! The engine driving the real HTTP client against a mock directory.

mod common;

use common::{init_test_logging, site_record};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use propsync_directory::{Credentials, DirectoryConfig, HttpDirectoryClient};
use propsync_reconcile::{EngineConfig, Orchestrator, RecordOutcome, Stage, StageSet};
use propsync_sheet::{Environment, MemoryStore, SiteRecord, TabularStore, Workbook};

fn paris() -> SiteRecord {
    SiteRecord {
        row: 2,
        label: "PAR".into(),
        name: "Paris".into(),
        address1: "1 Rue".into(),
        city: "Paris".into(),
        country: "FR".into(),
        language: "fr".into(),
        postal_code: "75001".into(),
        state: String::new(),
        timezone: "Europe/Paris".into(),
        ..Default::default()
    }
}

fn client(server: &MockServer) -> HttpDirectoryClient {
    HttpDirectoryClient::new(DirectoryConfig::new(
        server.uri(),
        Credentials::basic("svc.sync", "s3cret"),
    ))
    .unwrap()
}

#[tokio::test]
async fn test_paris_is_created_once_and_id_written_to_production_column() {
    init_test_logging();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/xm/1/sites/Paris"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": 404,
            "reason": "Not Found",
            "message": "Site Paris not found"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/xm/1/sites"))
        .and(body_json(json!({
            "name": "Paris",
            "address1": "1 Rue",
            "city": "Paris",
            "country": "FR",
            "language": "fr",
            "postalCode": "75001",
            "state": "",
            "timezone": "Europe/Paris"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "site-paris",
            "name": "Paris"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let directory = client(&server);
    let config = EngineConfig::new(Environment::Production, "Property Code");
    let mut store = MemoryStore::new(Workbook::new(
        vec![paris()],
        vec![],
        vec![],
    ));

    let report = Orchestrator::new(&directory, &config)
        .process(&mut store, &StageSet::only(Stage::Sites))
        .await
        .unwrap();

    assert_eq!(
        report.stage(Stage::Sites).unwrap().records[0].outcome,
        RecordOutcome::Created {
            remote_id: "site-paris".into(),
            written_back: true
        }
    );
    let site = &store.workbook().sites.records[0];
    assert_eq!(site.ids.get(Environment::Production), Some("site-paris"));
    assert_eq!(site.ids.get(Environment::NonProduction), None);
    assert_eq!(store.persist_count(), 1);
}

#[tokio::test]
async fn test_server_error_on_create_is_reported_not_fatal() {
    init_test_logging();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/xm/1/sites/Paris"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/xm/1/sites"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": 400,
            "reason": "Bad Request",
            "message": "Invalid timezone"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let directory = client(&server);
    let config = EngineConfig::new(Environment::NonProduction, "Property Code");
    let mut store = MemoryStore::new(Workbook::new(
        vec![site_record("Paris", None)],
        vec![],
        vec![],
    ));

    let report = Orchestrator::new(&directory, &config)
        .process(&mut store, &StageSet::only(Stage::Sites))
        .await
        .unwrap();

    match &report.stage(Stage::Sites).unwrap().records[0].outcome {
        RecordOutcome::Failed { error } => assert!(error.contains("Invalid timezone")),
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(
        store.workbook().site_id("Paris", Environment::NonProduction),
        None
    );
}
