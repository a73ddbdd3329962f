use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Supported storage backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    /// In-memory storage (for testing and embedding)
    Memory,
    /// A directory of source CSV files
    Csv,
}

impl Default for StorageType {
    fn default() -> Self {
        Self::Csv
    }
}
