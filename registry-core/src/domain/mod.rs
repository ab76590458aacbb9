mod grid_status;
mod producer;

pub use grid_status::GridStatus;
pub use producer::{Producer, ProductionRecord};
