// src/report/csv.rs

//! CSV report artifacts.

use std::io::Write;
use std::path::Path;

use tokio::fs;

use crate::core::report::ReportRow;
use crate::error::{Result, UptimeError};

/// Header of every report artifact.
pub const REPORT_HEADER: [&str; 7] = [
    "store_id",
    "uptime_last_hour(in minutes)",
    "uptime_last_day(in hours)",
    "uptime_last_week(in hours)",
    "downtime_last_hour(in minutes)",
    "downtime_last_day(in hours)",
    "downtime_last_week(in hours)",
];

/// Writes `rows` as CSV to `writer`. Hour values are written with two decimals.
pub fn write_report<W: Write>(writer: W, rows: &[ReportRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(REPORT_HEADER)?;
    for row in rows {
        wtr.write_record([
            row.store_id.clone(),
            row.uptime_last_hour.to_string(),
            format!("{:.2}", row.uptime_last_day),
            format!("{:.2}", row.uptime_last_week),
            row.downtime_last_hour.to_string(),
            format!("{:.2}", row.downtime_last_day),
            format!("{:.2}", row.downtime_last_week),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Renders `rows` into an in-memory CSV document.
pub fn render_report(rows: &[ReportRow]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_report(&mut buf, rows)?;
    Ok(buf)
}

/// Writes `rows` to `path`, creating parent directories as needed.
pub async fn write_report_file(path: &Path, rows: &[ReportRow]) -> Result<()> {
    let data = render_report(rows)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await.map_err(|e| {
            UptimeError::storage(format!("Failed to create report directory '{}': {}", parent.display(), e))
        })?;
    }
    fs::write(path, data).await?;
    log::debug!("Wrote {} report rows to {}", rows.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn row(id: &str) -> ReportRow {
        ReportRow {
            store_id: id.to_string(),
            uptime_last_hour: 45,
            uptime_last_day: 6.0,
            uptime_last_week: 40.25,
            downtime_last_hour: 15,
            downtime_last_day: 2.5,
            downtime_last_week: 0.0,
        }
    }

    #[test]
    fn test_header_and_formatting() {
        let out = String::from_utf8(render_report(&[row("s1")]).unwrap()).unwrap();
        let mut lines = out.lines();
        assert_eq!(
            lines.next(),
            Some("store_id,uptime_last_hour(in minutes),uptime_last_day(in hours),uptime_last_week(in hours),downtime_last_hour(in minutes),downtime_last_day(in hours),downtime_last_week(in hours)")
        );
        assert_eq!(lines.next(), Some("s1,45,6.00,40.25,15,2.50,0.00"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_empty_report_has_header_only() {
        let out = String::from_utf8(render_report(&[]).unwrap()).unwrap();
        assert_eq!(out.lines().count(), 1);
    }

    #[tokio::test]
    async fn test_write_report_file_creates_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("r.csv");
        write_report_file(&path, &[row("a"), row("b")]).await.unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 3);
    }
}
