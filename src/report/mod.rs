// src/report/mod.rs

//! Report runs over a storage backend and their CSV artifacts.

pub mod csv;
pub mod engine;

pub use self::csv::{render_report, write_report, write_report_file, REPORT_HEADER};
pub use engine::ReportEngine;
