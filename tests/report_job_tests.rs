mod common;

use assert_matches::assert_matches;
use common::{engine, hm, utc, write_source_csvs, StoreFixture};
use std::time::Duration;
use store_uptime::config::Config;
use store_uptime::report::REPORT_HEADER;
use store_uptime::storage::MemoryStorage;
use store_uptime::{ReportService, ReportStatus, StorageType, StoreStatus, UptimeError};
use tempfile::tempdir;
use uuid::Uuid;

const POLL: Duration = Duration::from_millis(10);

#[tokio::test]
async fn test_trigger_writes_csv_artifact() {
    let out = tempdir().unwrap();
    let storage = MemoryStorage::new();
    StoreFixture::new(&storage, "b")
        .timezone("UTC")
        .open_daily(hm(0, 0), hm(12, 0))
        .saw(utc(2024, 1, 15, 11, 0), StoreStatus::Inactive);
    StoreFixture::new(&storage, "a").saw(utc(2024, 1, 15, 11, 30), StoreStatus::Active);

    let service = ReportService::new(engine(&storage), out.path());
    let id = service.trigger_report();
    assert!(matches!(service.get_report(id), Ok(_)));

    let status = service.wait_for(id, POLL).await.unwrap();
    let path = match status {
        ReportStatus::Complete(path) => path,
        other => panic!("unexpected status {:?}", other),
    };
    assert_eq!(path, out.path().join(format!("{}.csv", id)));

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], REPORT_HEADER.join(","));
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("a,"));
    // Store b: open until noon, inactive since 11:00, now is 11:30
    assert!(lines[2].starts_with("b,0,"), "{}", lines[2]);
}

#[tokio::test]
async fn test_each_trigger_gets_its_own_id() {
    let out = tempdir().unwrap();
    let storage = MemoryStorage::new();
    StoreFixture::new(&storage, "a").saw(utc(2024, 1, 15, 11, 30), StoreStatus::Active);
    let service = ReportService::new(engine(&storage), out.path());

    let first = service.trigger_report();
    let second = service.trigger_report();
    assert_ne!(first, second);
    service.wait_for(first, POLL).await.unwrap();
    service.wait_for(second, POLL).await.unwrap();
    assert!(service.report_path(first).exists());
    assert!(service.report_path(second).exists());
}

#[tokio::test]
async fn test_storage_failure_marks_job_failed() {
    let out = tempdir().unwrap();
    let storage = MemoryStorage::new();
    StoreFixture::new(&storage, "a").saw(utc(2024, 1, 15, 11, 30), StoreStatus::Active);
    storage.set_unavailable(true);

    let service = ReportService::new(engine(&storage), out.path());
    let id = service.trigger_report();
    let status = service.wait_for(id, POLL).await.unwrap();
    assert_matches!(status, ReportStatus::Failed(_));
    assert_eq!(status.as_str(), "failed");
}

#[tokio::test]
async fn test_unknown_report_id() {
    let out = tempdir().unwrap();
    let service = ReportService::new(engine(&MemoryStorage::new()), out.path());
    assert_matches!(service.get_report(Uuid::new_v4()), Err(UptimeError::NotFound(_)));
}

#[tokio::test]
async fn test_service_from_config() {
    let data = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_source_csvs(
        data.path(),
        "store_id,status,timestamp_utc\ns1,active,2024-01-15 11:00:00 UTC\n",
        None,
        None,
    );

    let mut config = Config::default();
    config.storage.storage_type = StorageType::Csv;
    config.storage.base_path = data.path().to_string_lossy().into_owned();
    config.report.output_dir = out.path().join("reports").to_string_lossy().into_owned();

    let service = ReportService::from_config(&config).await.unwrap();
    let id = service.trigger_report();
    let status = service.wait_for(id, POLL).await.unwrap();
    assert!(status.is_finished());
    assert_eq!(status, ReportStatus::Complete(service.report_path(id)));
    assert!(service.output_dir().ends_with("reports"));
}
