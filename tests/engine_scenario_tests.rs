mod common;

use common::{engine, hm, utc, StoreFixture};
use store_uptime::storage::MemoryStorage;
use store_uptime::StoreStatus;

#[tokio::test]
async fn test_day_window_counts_only_open_hours() {
    let storage = MemoryStorage::new();
    // UTC-5 all year: local 09:00-17:00 is 14:00-22:00Z
    StoreFixture::new(&storage, "s1")
        .timezone("Etc/GMT+5")
        .open_daily(hm(9, 0), hm(17, 0))
        .saw(utc(2024, 1, 15, 14, 30), StoreStatus::Active)
        .saw(utc(2024, 1, 15, 20, 0), StoreStatus::Inactive);
    // Another store pins "now" to local midnight of Jan 16 for s1
    StoreFixture::new(&storage, "clock").saw(utc(2024, 1, 16, 5, 0), StoreStatus::Active);

    let engine = engine(&storage);
    let now = engine.now_utc().await.unwrap();
    assert_eq!(now, utc(2024, 1, 16, 5, 0));

    let row = engine.report_for_store("s1", now).await.unwrap();
    assert_eq!(row.uptime_last_day, 6.0);
    assert_eq!(row.downtime_last_day, 2.0);
    assert_eq!(row.uptime_last_hour, 0);
    assert_eq!(row.downtime_last_hour, 0);
    // Six earlier days padded active from the first reading, plus Jan 15
    assert_eq!(row.uptime_last_week, 54.0);
    assert_eq!(row.downtime_last_week, 2.0);
}

#[tokio::test]
async fn test_never_observed_store_gets_full_uptime() {
    let storage = MemoryStorage::new();
    StoreFixture::new(&storage, "ghost")
        .timezone("UTC")
        .open_daily(hm(10, 0), hm(14, 0));

    let engine = engine(&storage);
    let rows = engine
        .generate(&["ghost".to_string()], utc(2024, 1, 15, 12, 0))
        .await
        .unwrap();
    let row = &rows[0];
    assert_eq!(row.uptime_last_hour, 60);
    assert_eq!(row.uptime_last_day, 4.0);
    assert_eq!(row.uptime_last_week, 28.0);
    assert_eq!(row.downtime_last_day, 0.0);
}

#[tokio::test]
async fn test_single_inactive_reading_at_midpoint() {
    let storage = MemoryStorage::new();
    StoreFixture::new(&storage, "s1")
        .timezone("America/Chicago")
        .saw(utc(2024, 1, 15, 11, 30), StoreStatus::Inactive)
        .saw(utc(2024, 1, 15, 12, 0), StoreStatus::Inactive);

    let engine = engine(&storage);
    let row = engine.report_for_store("s1", utc(2024, 1, 15, 12, 0)).await.unwrap();
    assert_eq!(row.downtime_last_hour, 60);
    assert_eq!(row.uptime_last_hour, 0);
    assert_eq!(row.downtime_last_week, 168.0);
}

#[tokio::test]
async fn test_store_closed_on_days_without_hours() {
    let storage = MemoryStorage::new();
    // Open Mondays only (day 1, weeks counted from Sunday)
    StoreFixture::new(&storage, "s1")
        .timezone("UTC")
        .open_on(1, hm(9, 0), hm(17, 0))
        .saw(utc(2024, 1, 16, 12, 0), StoreStatus::Active);

    let engine = engine(&storage);
    // Tuesday noon: the last day covers Monday 12:00 onwards
    let row = engine.report_for_store("s1", utc(2024, 1, 16, 12, 0)).await.unwrap();
    assert_eq!(row.uptime_last_hour, 0);
    assert_eq!(row.uptime_last_day, 5.0);
    assert_eq!(row.uptime_last_week, 8.0);
}

#[tokio::test]
async fn test_week_across_dst_change() {
    let storage = MemoryStorage::new();
    StoreFixture::new(&storage, "ny")
        .timezone("America/New_York")
        .open_daily(hm(9, 0), hm(17, 0))
        .saw(utc(2024, 3, 1, 0, 0), StoreStatus::Active);

    let engine = engine(&storage);
    // Clocks moved forward on 2024-03-10; every day still has 8 open hours
    let row = engine.report_for_store("ny", utc(2024, 3, 12, 0, 0)).await.unwrap();
    assert_eq!(row.uptime_last_week, 56.0);
    assert_eq!(row.downtime_last_week, 0.0);
}

#[tokio::test]
async fn test_invalid_timezone_uses_default() {
    let storage = MemoryStorage::new();
    StoreFixture::new(&storage, "s1")
        .timezone("Mars/Olympus_Mons")
        .open_daily(hm(9, 0), hm(17, 0))
        .saw(utc(2024, 1, 15, 16, 0), StoreStatus::Active);

    let engine = engine(&storage);
    // America/Chicago: 09:00-17:00 CST is 15:00-23:00Z
    let row = engine.report_for_store("s1", utc(2024, 1, 15, 16, 0)).await.unwrap();
    assert_eq!(row.uptime_last_hour, 60);
}
