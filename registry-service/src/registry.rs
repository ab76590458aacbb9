use std::sync::Arc;

use registry_core::domain::{Producer, ProductionRecord};
use registry_core::{Clock, KeyValueStore};
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::error::RegistryError;
use crate::validate;

const PRODUCER_PREFIX: &str = "producer/";
const PRODUCTION_PREFIX: &str = "production/";

fn producer_key(id: &str) -> String {
    format!("{PRODUCER_PREFIX}{id}")
}

fn production_key(id: &str, ts: OffsetDateTime) -> String {
    format!("{PRODUCTION_PREFIX}{id}/{}", ts.unix_timestamp_nanos())
}

/// Registry of energy producers and their timestamped production reports.
///
/// Writes serialize through a single mutex so the derive-timestamp-then-put
/// sequence of one writer never interleaves with another's.
pub struct ProducerRegistry {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    write_lock: Mutex<()>,
}

impl ProducerRegistry {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    /// Insert or overwrite the producer record keyed by the caller identity.
    /// Re-registration replaces the previous metadata.
    pub async fn register_producer(
        &self,
        caller: &str,
        energy_type: &str,
        capacity: f64,
    ) -> Result<(), RegistryError> {
        validate::finite("capacity", capacity)?;
        validate::non_negative("capacity", capacity)?;

        let producer = Producer {
            energy_type: energy_type.to_string(),
            capacity,
        };
        let bytes = serde_json::to_vec(&producer)?;

        let _guard = self.write_lock.lock().await;
        self.store.put(&producer_key(caller), bytes).await?;

        metrics::counter!("producers_registered_total").increment(1);
        tracing::info!(producer = %caller, energy_type, capacity, "producer registered");
        Ok(())
    }

    /// Record a production report for an already-registered caller.
    ///
    /// Returns the timestamp the record was keyed by, so the caller can
    /// read it back exactly without re-deriving "now". An unregistered
    /// caller gets `NotFound` and nothing is written.
    pub async fn record_production(
        &self,
        caller: &str,
        amount: f64,
    ) -> Result<OffsetDateTime, RegistryError> {
        validate::finite("amount", amount)?;

        let _guard = self.write_lock.lock().await;
        if self.store.get(&producer_key(caller)).await?.is_none() {
            metrics::counter!("production_rejected_total").increment(1);
            tracing::warn!(producer = %caller, "production report from unregistered producer");
            return Err(RegistryError::NotFound);
        }

        let ts = self.clock.now();
        let bytes = serde_json::to_vec(&ProductionRecord { amount })?;
        self.store.put(&production_key(caller, ts), bytes).await?;

        metrics::counter!("production_records_total").increment(1);
        tracing::info!(producer = %caller, amount, "production recorded");
        Ok(ts)
    }

    /// Producer metadata; `None` when the identity was never registered.
    pub async fn producer_info(
        &self,
        producer_id: &str,
    ) -> Result<Option<Producer>, RegistryError> {
        match self.store.get(&producer_key(producer_id)).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Exact-key production lookup; no range queries.
    pub async fn production(
        &self,
        producer_id: &str,
        ts: OffsetDateTime,
    ) -> Result<Option<ProductionRecord>, RegistryError> {
        match self.store.get(&production_key(producer_id, ts)).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use registry_core::{ManualClock, MemoryStore};
    use time::macros::datetime;

    fn fixtures() -> (Arc<MemoryStore>, Arc<ManualClock>, ProducerRegistry) {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(datetime!(2024-06-01 12:00:00 UTC)));
        let registry = ProducerRegistry::new(store.clone(), clock.clone());
        (store, clock, registry)
    }

    #[tokio::test]
    async fn register_then_info_round_trips() {
        let (_, _, registry) = fixtures();

        registry
            .register_producer("producer1", "solar", 1000.0)
            .await
            .unwrap();

        let info = registry.producer_info("producer1").await.unwrap().unwrap();
        assert_eq!(info.energy_type, "solar");
        assert_eq!(info.capacity, 1000.0);
    }

    #[tokio::test]
    async fn info_for_unknown_producer_is_none_not_an_error() {
        let (_, _, registry) = fixtures();
        assert_eq!(registry.producer_info("nobody").await.unwrap(), None);
    }

    #[tokio::test]
    async fn reregistration_overwrites_metadata() {
        let (_, _, registry) = fixtures();

        registry
            .register_producer("producer1", "solar", 1000.0)
            .await
            .unwrap();
        registry
            .register_producer("producer1", "wind", 2500.0)
            .await
            .unwrap();

        let info = registry.producer_info("producer1").await.unwrap().unwrap();
        assert_eq!(info.energy_type, "wind");
        assert_eq!(info.capacity, 2500.0);
    }

    #[tokio::test]
    async fn record_production_for_unregistered_producer_writes_nothing() {
        let (store, _, registry) = fixtures();

        let err = registry
            .record_production("unregistered", 500.0)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotFound));

        let entries = store.scan_prefix(PRODUCTION_PREFIX).await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn recorded_production_reads_back_at_the_returned_timestamp() {
        let (_, _, registry) = fixtures();

        registry
            .register_producer("producer1", "solar", 1000.0)
            .await
            .unwrap();
        let ts = registry.record_production("producer1", 500.0).await.unwrap();

        let record = registry
            .production("producer1", ts)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.amount, 500.0);
    }

    #[tokio::test]
    async fn production_lookup_misses_on_other_timestamps() {
        let (_, clock, registry) = fixtures();

        registry
            .register_producer("producer1", "solar", 1000.0)
            .await
            .unwrap();
        let ts = registry.record_production("producer1", 500.0).await.unwrap();

        clock.advance(time::Duration::seconds(1));
        let other = clock.now();
        assert_ne!(ts, other);
        assert_eq!(registry.production("producer1", other).await.unwrap(), None);
    }

    #[tokio::test]
    async fn same_timestamp_writes_keep_the_last_one() {
        // A stuck clock makes both records share a key: documented
        // last-write-wins, prevented in the default wiring by MonotonicClock.
        let (_, _, registry) = fixtures();

        registry
            .register_producer("producer1", "solar", 1000.0)
            .await
            .unwrap();
        let first = registry.record_production("producer1", 100.0).await.unwrap();
        let second = registry.record_production("producer1", 200.0).await.unwrap();
        assert_eq!(first, second);

        let record = registry
            .production("producer1", second)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.amount, 200.0);
    }

    #[tokio::test]
    async fn negative_capacity_is_rejected() {
        let (store, _, registry) = fixtures();

        let err = registry
            .register_producer("producer1", "solar", -1.0)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidInput(_)));
        assert!(store.scan_prefix(PRODUCER_PREFIX).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_finite_amount_is_rejected_before_the_registration_check() {
        let (store, _, registry) = fixtures();

        registry
            .register_producer("producer1", "solar", 1000.0)
            .await
            .unwrap();
        let err = registry
            .record_production("producer1", f64::NAN)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidInput(_)));
        assert!(store.scan_prefix(PRODUCTION_PREFIX).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn negative_amount_is_accepted() {
        let (_, _, registry) = fixtures();

        registry
            .register_producer("house-7", "solar", 5.0)
            .await
            .unwrap();
        let ts = registry.record_production("house-7", -2.5).await.unwrap();

        let record = registry.production("house-7", ts).await.unwrap().unwrap();
        assert_eq!(record.amount, -2.5);
    }
}
