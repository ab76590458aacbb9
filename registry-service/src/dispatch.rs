//! String-method call boundary, one dispatcher per component.
//!
//! Method names, argument order, error codes and wire field names match
//! the on-chain style interface the components replace (kebab-case:
//! `register-producer`, `energy-type`, `ERR_NOT_FOUND`): args arrive as a
//! loosely-typed JSON sequence, the sender identity rides alongside, and
//! failures come back as values rather than panics. Timestamps cross this
//! boundary as i64 unix nanoseconds.

use registry_core::domain::{GridStatus, Producer, ProductionRecord};
use serde_json::{json, Value};
use time::OffsetDateTime;

use crate::error::RegistryError;
use crate::ledger::GridStatusLedger;
use crate::registry::ProducerRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    NotAuthorized,
    EmptyLedger,
    InvalidInput,
    BadArgs,
    UnknownMethod,
    Internal,
}

impl ErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound => "ERR_NOT_FOUND",
            Self::NotAuthorized => "ERR_NOT_AUTHORIZED",
            Self::EmptyLedger => "ERR_EMPTY_LEDGER",
            Self::InvalidInput => "ERR_INVALID_INPUT",
            Self::BadArgs => "ERR_BAD_ARGS",
            Self::UnknownMethod => "ERR_UNKNOWN_METHOD",
            Self::Internal => "ERR_INTERNAL",
        }
    }
}

impl serde::Serialize for ErrorKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl From<&RegistryError> for ErrorKind {
    fn from(e: &RegistryError) -> Self {
        match e {
            RegistryError::NotFound => Self::NotFound,
            RegistryError::NotAuthorized => Self::NotAuthorized,
            RegistryError::EmptyLedger => Self::EmptyLedger,
            RegistryError::InvalidInput(_) => Self::InvalidInput,
            RegistryError::Store(_) | RegistryError::Codec(_) => Self::Internal,
        }
    }
}

/// Result envelope of the call boundary. Callers check `success` before
/// reading `value`; an absent `value` on a successful read means the key
/// holds nothing.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CallOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
}

impl CallOutcome {
    fn ok() -> Self {
        Self {
            success: true,
            value: None,
            error: None,
        }
    }

    fn ok_with(value: Value) -> Self {
        Self {
            success: true,
            value: Some(value),
            error: None,
        }
    }

    fn err(kind: ErrorKind) -> Self {
        Self {
            success: false,
            value: None,
            error: Some(kind),
        }
    }
}

fn fail(e: RegistryError) -> CallOutcome {
    let kind = ErrorKind::from(&e);
    if kind == ErrorKind::Internal {
        tracing::error!(error = %e, "internal error at the call boundary");
    }
    CallOutcome::err(kind)
}

fn str_arg<'a>(args: &'a [Value], idx: usize) -> Option<&'a str> {
    args.get(idx)?.as_str()
}

fn f64_arg(args: &[Value], idx: usize) -> Option<f64> {
    args.get(idx)?.as_f64()
}

fn ts_arg(args: &[Value], idx: usize) -> Option<OffsetDateTime> {
    let nanos = args.get(idx)?.as_i64()?;
    OffsetDateTime::from_unix_timestamp_nanos(nanos as i128).ok()
}

fn ts_nanos(ts: OffsetDateTime) -> i64 {
    ts.unix_timestamp_nanos() as i64
}

fn written_at(ts: OffsetDateTime) -> Value {
    json!({ "timestamp": ts_nanos(ts) })
}

fn producer_value(producer: &Producer) -> Value {
    json!({
        "energy-type": producer.energy_type,
        "capacity": producer.capacity,
    })
}

fn production_value(record: &ProductionRecord) -> Value {
    json!({ "amount": record.amount })
}

fn status_value(ts: OffsetDateTime, status: &GridStatus) -> Value {
    json!({
        "timestamp": ts_nanos(ts),
        "total-production": status.total_production,
        "total-consumption": status.total_consumption,
        "balance": status.balance(),
    })
}

impl ProducerRegistry {
    /// Dispatch one producer-registry method. `sender` is the caller
    /// identity; write methods return the timestamp they keyed by so wire
    /// callers can do exact readbacks.
    pub async fn call(&self, method: &str, args: &[Value], sender: &str) -> CallOutcome {
        match method {
            "register-producer" => {
                let (Some(energy_type), Some(capacity)) = (str_arg(args, 0), f64_arg(args, 1))
                else {
                    return CallOutcome::err(ErrorKind::BadArgs);
                };
                match self.register_producer(sender, energy_type, capacity).await {
                    Ok(()) => CallOutcome::ok(),
                    Err(e) => fail(e),
                }
            }
            "record-production" => {
                let Some(amount) = f64_arg(args, 0) else {
                    return CallOutcome::err(ErrorKind::BadArgs);
                };
                match self.record_production(sender, amount).await {
                    Ok(ts) => CallOutcome::ok_with(written_at(ts)),
                    Err(e) => fail(e),
                }
            }
            "get-producer-info" => {
                let Some(producer_id) = str_arg(args, 0) else {
                    return CallOutcome::err(ErrorKind::BadArgs);
                };
                match self.producer_info(producer_id).await {
                    Ok(Some(producer)) => CallOutcome::ok_with(producer_value(&producer)),
                    Ok(None) => CallOutcome::ok(),
                    Err(e) => fail(e),
                }
            }
            "get-production" => {
                let (Some(producer_id), Some(ts)) = (str_arg(args, 0), ts_arg(args, 1)) else {
                    return CallOutcome::err(ErrorKind::BadArgs);
                };
                match self.production(producer_id, ts).await {
                    Ok(Some(record)) => CallOutcome::ok_with(production_value(&record)),
                    Ok(None) => CallOutcome::ok(),
                    Err(e) => fail(e),
                }
            }
            _ => CallOutcome::err(ErrorKind::UnknownMethod),
        }
    }
}

impl GridStatusLedger {
    /// Dispatch one grid-ledger method. Snapshot values carry the derived
    /// balance alongside the stored totals.
    pub async fn call(&self, method: &str, args: &[Value], sender: &str) -> CallOutcome {
        match method {
            "update-grid-status" => {
                let (Some(production), Some(consumption)) = (f64_arg(args, 0), f64_arg(args, 1))
                else {
                    return CallOutcome::err(ErrorKind::BadArgs);
                };
                match self
                    .update_grid_status(sender, production, consumption)
                    .await
                {
                    Ok(ts) => CallOutcome::ok_with(written_at(ts)),
                    Err(e) => fail(e),
                }
            }
            "get-grid-status" => {
                let Some(ts) = ts_arg(args, 0) else {
                    return CallOutcome::err(ErrorKind::BadArgs);
                };
                match self.grid_status(ts).await {
                    Ok(Some(status)) => CallOutcome::ok_with(status_value(ts, &status)),
                    Ok(None) => CallOutcome::ok(),
                    Err(e) => fail(e),
                }
            }
            "get-latest-grid-status" => match self.latest_grid_status().await {
                Ok((ts, status)) => CallOutcome::ok_with(status_value(ts, &status)),
                Err(e) => fail(e),
            },
            _ => CallOutcome::err(ErrorKind::UnknownMethod),
        }
    }
}
