pub mod clock;
pub mod domain;
pub mod store;

pub use clock::{Clock, ManualClock, MonotonicClock, SystemClock};
pub use store::{KeyValueStore, MemoryStore, StoreError};
