use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The two-valued status carried by every observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum StoreStatus {
    /// The store was up when sampled.
    Active,
    /// The store was down when sampled.
    Inactive,
}

impl StoreStatus {
    /// `true` for [`StoreStatus::Active`].
    pub fn is_active(&self) -> bool {
        matches!(self, StoreStatus::Active)
    }
}

impl Default for StoreStatus {
    fn default() -> Self {
        StoreStatus::Active
    }
}
