//! Core type definitions for store uptime reporting

mod log_level;
mod status;
mod storage;
mod week;

pub use log_level::LogLevel;
pub use status::StoreStatus;
pub use storage::StorageType;
pub use week::WeekStart;
