use serde::{Deserialize, Serialize};

/// Static metadata for a registered energy producer. The producer identity
/// is the store key, not a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Producer {
    pub energy_type: String,
    pub capacity: f64,
}

/// A single production report. Keyed externally by (producer identity,
/// timestamp); the amount may be negative for net-metering producers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionRecord {
    pub amount: f64,
}
