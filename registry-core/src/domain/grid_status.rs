use serde::{Deserialize, Serialize};

/// Grid-wide production/consumption snapshot, keyed externally by timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridStatus {
    pub total_production: f64,
    pub total_consumption: f64,
}

impl GridStatus {
    /// Net balance. Derived on every read and never stored, so it cannot
    /// drift from its inputs.
    pub fn balance(&self) -> f64 {
        self.total_production - self.total_consumption
    }
}
