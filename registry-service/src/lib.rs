pub mod auth;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod ledger;
pub mod observability;
pub mod registry;
pub mod validate;

use std::sync::Arc;

use registry_core::{MemoryStore, MonotonicClock, SystemClock};

pub use dispatch::{CallOutcome, ErrorKind};
pub use error::RegistryError;
pub use ledger::GridStatusLedger;
pub use registry::ProducerRegistry;

use auth::SingleOwner;
use config::AppConfig;

/// Default in-process composition: one shared in-memory store, a strictly
/// increasing wall clock, and single-owner authorization from config.
/// Embedders with a durable backend or their own clock/authorization wire
/// the components directly instead.
pub fn build(cfg: &AppConfig) -> (ProducerRegistry, GridStatusLedger) {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(MonotonicClock::new(SystemClock));
    let authorizer = Arc::new(SingleOwner::new(cfg.grid.owner_identity.clone()));

    let registry = ProducerRegistry::new(store.clone(), clock.clone());
    let ledger = GridStatusLedger::new(store, clock, authorizer);
    (registry, ledger)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn build_wires_the_owner_from_config() {
        observability::init_tracing();

        let cfg: AppConfig = toml::from_str(
            r#"
            [grid]
            owner_identity = "grid-operator"
            "#,
        )
        .unwrap();

        let (registry, ledger) = build(&cfg);

        registry
            .register_producer("producer1", "solar", 1000.0)
            .await
            .unwrap();
        assert!(registry.producer_info("producer1").await.unwrap().is_some());

        assert!(ledger
            .update_grid_status("grid-operator", 10.0, 5.0)
            .await
            .is_ok());
        assert!(matches!(
            ledger.update_grid_status("intruder", 10.0, 5.0).await,
            Err(RegistryError::NotAuthorized)
        ));
    }

    #[tokio::test]
    async fn default_clock_never_collides_consecutive_writes() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [grid]
            owner_identity = "grid-operator"
            "#,
        )
        .unwrap();
        let (_, ledger) = build(&cfg);

        let a = ledger
            .update_grid_status("grid-operator", 1.0, 0.0)
            .await
            .unwrap();
        let b = ledger
            .update_grid_status("grid-operator", 2.0, 0.0)
            .await
            .unwrap();
        assert!(b > a);

        // Both snapshots are independently retrievable.
        assert!(ledger.grid_status(a).await.unwrap().is_some());
        assert!(ledger.grid_status(b).await.unwrap().is_some());
    }
}
