use std::sync::Arc;

use registry_core::domain::GridStatus;
use registry_core::{Clock, KeyValueStore, StoreError};
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::auth::Authorizer;
use crate::error::RegistryError;
use crate::validate;

const GRID_STATUS_PREFIX: &str = "grid-status/";

fn status_key(ts: OffsetDateTime) -> String {
    format!("{GRID_STATUS_PREFIX}{}", ts.unix_timestamp_nanos())
}

/// Timestamp encoded in a grid-status key. Keys are compared numerically,
/// not lexicographically, so suffixes of different digit counts order
/// correctly.
fn key_timestamp(key: &str) -> Option<i128> {
    key.strip_prefix(GRID_STATUS_PREFIX)?.parse().ok()
}

/// Owner-gated ledger of grid-wide production/consumption snapshots.
pub struct GridStatusLedger {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    authorizer: Arc<dyn Authorizer>,
    write_lock: Mutex<()>,
}

impl GridStatusLedger {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        authorizer: Arc<dyn Authorizer>,
    ) -> Self {
        Self {
            store,
            clock,
            authorizer,
            write_lock: Mutex::new(()),
        }
    }

    /// Record a grid-wide snapshot keyed by "now".
    ///
    /// The authorization check runs before anything else; a rejected
    /// caller leaves no trace. Returns the timestamp the snapshot was
    /// keyed by. The balance is derived on read, never stored.
    pub async fn update_grid_status(
        &self,
        caller: &str,
        total_production: f64,
        total_consumption: f64,
    ) -> Result<OffsetDateTime, RegistryError> {
        if !self.authorizer.is_authorized(caller) {
            metrics::counter!("grid_status_rejected_total").increment(1);
            tracing::warn!(caller = %caller, "grid status update from non-owner");
            return Err(RegistryError::NotAuthorized);
        }

        validate::finite("total_production", total_production)?;
        validate::non_negative("total_production", total_production)?;
        validate::finite("total_consumption", total_consumption)?;
        validate::non_negative("total_consumption", total_consumption)?;

        let status = GridStatus {
            total_production,
            total_consumption,
        };
        let bytes = serde_json::to_vec(&status)?;

        let _guard = self.write_lock.lock().await;
        let ts = self.clock.now();
        self.store.put(&status_key(ts), bytes).await?;

        metrics::counter!("grid_status_updates_total").increment(1);
        tracing::info!(
            total_production,
            total_consumption,
            balance = status.balance(),
            "grid status updated"
        );
        Ok(ts)
    }

    /// Exact-key snapshot lookup; `None` when nothing was written at `ts`.
    pub async fn grid_status(
        &self,
        ts: OffsetDateTime,
    ) -> Result<Option<GridStatus>, RegistryError> {
        match self.store.get(&status_key(ts)).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// The snapshot stored at the maximum timestamp key, with that
    /// timestamp. An empty ledger is an explicit `EmptyLedger` error.
    pub async fn latest_grid_status(
        &self,
    ) -> Result<(OffsetDateTime, GridStatus), RegistryError> {
        let entries = self.store.scan_prefix(GRID_STATUS_PREFIX).await?;

        let mut latest: Option<(i128, &Vec<u8>)> = None;
        for (key, value) in &entries {
            let Some(nanos) = key_timestamp(key) else {
                continue;
            };
            if latest.map_or(true, |(best, _)| nanos > best) {
                latest = Some((nanos, value));
            }
        }

        let (nanos, bytes) = latest.ok_or(RegistryError::EmptyLedger)?;
        let status: GridStatus = serde_json::from_slice(bytes)?;
        let ts = OffsetDateTime::from_unix_timestamp_nanos(nanos).map_err(|e| {
            RegistryError::Store(StoreError::Backend(format!(
                "corrupt grid-status key timestamp: {e}"
            )))
        })?;
        Ok((ts, status))
    }
}
