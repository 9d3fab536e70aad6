//! Test helpers: build AppState and router for integration tests.
//!
//! Every test app runs against local storage in a temp directory, the
//! in-memory metadata tracker (behind a `FaultyTracker` whose failures are
//! off by default) and a `FixedClock` the test can move.

#![allow(dead_code)]

pub mod fixtures;
pub mod storage;
pub mod tracker;

use axum_test::TestServer;
use chrono::{DateTime, TimeZone, Utc};
use linkdrop_api::setup::{build_state, routes};
use linkdrop_core::{Config, FixedClock};
use linkdrop_db::InMemoryMetadataTracker;
use linkdrop_storage::LocalStorage;
use std::sync::Arc;
use storage::RecordingStorage;
use tempfile::TempDir;
use tracker::FaultyTracker;

/// Upload instant used by every test app.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 7, 1, 10, 0, 0).unwrap()
}

/// Test application: server and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub clock: Arc<FixedClock>,
    pub storage: Arc<RecordingStorage>,
    pub tracker: Arc<InMemoryMetadataTracker>,
    pub faults: Arc<FaultyTracker>,
    pub temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn test_config(storage_path: &str, environment: &str) -> Config {
    let storage_path = storage_path.to_string();
    let environment = environment.to_string();
    Config::from_lookup(move |key| match key {
        "ENVIRONMENT" => Some(environment.clone()),
        "STORAGE_BACKEND" => Some("local".to_string()),
        "LOCAL_STORAGE_PATH" => Some(storage_path.clone()),
        "METADATA_BACKEND" => Some("memory".to_string()),
        _ => None,
    })
    .expect("test config is valid")
}

/// Setup test app with isolated local storage and metadata.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_in("development").await
}

/// Same as [`setup_test_app`] with `ENVIRONMENT=production`.
pub async fn setup_production_app() -> TestApp {
    setup_test_app_in("production").await
}

async fn setup_test_app_in(environment: &str) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let config = test_config(&temp_dir.path().to_string_lossy(), environment);

    let local = LocalStorage::new(temp_dir.path())
        .await
        .expect("Failed to create local storage");
    let storage = Arc::new(RecordingStorage::new(local));
    let tracker = Arc::new(InMemoryMetadataTracker::new());
    let faults = Arc::new(FaultyTracker::new(tracker.clone()));
    let clock = Arc::new(FixedClock::new(t0()));

    let state = build_state(config.clone(), storage.clone(), faults.clone(), clock.clone());
    let router = routes::setup_routes(&config, state);
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        clock,
        storage,
        tracker,
        faults,
        temp_dir,
    }
}
