//! Batch engine
//!
//! Packs heterogeneous requests into one `/v3/batch` call and decodes the
//! positional response. Every stage runs through
//! [`run_with_partial_failure`]: all items are attempted, and any failures
//! surface together as one [`BatchError`] holding the outcome of every
//! position.

use std::sync::Arc;

use domain::{ApiVersion, RouteKey, StatusFlag};
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use crate::{
    entity::DecodeMode,
    envelope::{AnyEnvelope, StatusMessage, read_count, read_status, read_status_message},
    error::{AmapError, BatchError, BatchPhase, StatusError},
    normalize::normalize,
    registry::RouteRegistry,
    request::{Credentials, Request, WireParams},
};

/// Apply `op` to every item, collecting failures by position
///
/// # Errors
///
/// Returns a [`BatchError`] for `phase` when at least one item failed. Its
/// outcome list has one slot per item: `None` where `op` succeeded.
pub fn run_with_partial_failure<I, T, R, F>(
    items: I,
    phase: BatchPhase,
    mut op: F,
) -> Result<Vec<R>, BatchError>
where
    I: IntoIterator<Item = T>,
    F: FnMut(T) -> Result<R, AmapError>,
{
    let mut results = Vec::new();
    let mut outcomes = Vec::new();
    let mut failed = false;

    for (position, item) in items.into_iter().enumerate() {
        match op(item) {
            Ok(result) => {
                results.push(result);
                outcomes.push(None);
            },
            Err(e) => {
                warn!(%phase, position, error = %e, "Batch item failed");
                failed = true;
                outcomes.push(Some(e));
            },
        }
    }

    if failed {
        Err(BatchError::new(phase, outcomes))
    } else {
        Ok(results)
    }
}

/// One packaged sub-request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOp {
    /// Route of the sub-request
    pub route: RouteKey,
    /// URL path of the route
    pub path: String,
    /// Signed wire parameters
    pub params: WireParams,
}

impl BatchOp {
    /// Relative URL sent in the batch body
    #[must_use]
    pub fn url(&self) -> String {
        format!("{}?{}", self.path, self.params.to_query())
    }
}

/// Ordered sub-requests ready to be posted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WireBatch {
    /// Sub-requests in call order
    pub ops: Vec<BatchOp>,
}

impl WireBatch {
    /// JSON body of the batch call
    #[must_use]
    pub fn body(&self) -> Value {
        let ops: Vec<Value> = self.ops.iter().map(|op| json!({ "url": op.url() })).collect();
        json!({ "ops": ops })
    }

    /// Route of each sub-request, in order
    #[must_use]
    pub fn routes(&self) -> Vec<RouteKey> {
        self.ops.iter().map(|op| op.route).collect()
    }

    /// Number of sub-requests
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// True when there are no sub-requests
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Prepare every request and package it with its route path
///
/// # Errors
///
/// Returns a `Prepare` phase [`BatchError`] when any request fails to
/// prepare or targets an unregistered route.
pub fn prepare_batch(
    requests: &[Request],
    credentials: &Credentials,
    registry: &RouteRegistry,
) -> Result<WireBatch, AmapError> {
    let ops = run_with_partial_failure(requests, BatchPhase::Prepare, |request| {
        let prepared = request.prepare(credentials)?;
        let path = registry.path(prepared.route)?.to_string();
        Ok(BatchOp {
            route: prepared.route,
            path,
            params: prepared.params,
        })
    })?;
    debug!(ops = ops.len(), "Prepared batch");
    Ok(WireBatch { ops })
}

/// Parse, normalize and decode a batch response
///
/// # Errors
///
/// See [`decode_batch`].
pub fn decode_batch_text(
    raw_text: &str,
    routes: &[RouteKey],
    registry: &RouteRegistry,
) -> Result<BatchEnvelope, AmapError> {
    let tree = normalize(raw_text)?;
    decode_batch(&tree, routes, registry)
}

/// Decode a normalized batch response against the routes that produced it
///
/// A sequence root is decoded positionally: the `body` of item `i` becomes
/// an envelope of the kind registered for `routes[i]`, always in static
/// mode. A mapping root is a top-level vendor error and yields no items.
///
/// # Errors
///
/// Returns `MalformedPayload` for a scalar root or when the number of
/// sub-responses differs from the number of routes, and a `Decode` phase
/// [`BatchError`] when any body fails to decode.
pub fn decode_batch(
    tree: &Value,
    routes: &[RouteKey],
    registry: &RouteRegistry,
) -> Result<BatchEnvelope, AmapError> {
    match tree {
        Value::Array(responses) => {
            if responses.len() != routes.len() {
                return Err(AmapError::MalformedPayload(format!(
                    "batch returned {} responses for {} requests",
                    responses.len(),
                    routes.len()
                )));
            }

            let items = run_with_partial_failure(
                routes.iter().zip(responses),
                BatchPhase::Decode,
                |(route, response)| {
                    let body = response.get("body").unwrap_or(&Value::Null);
                    registry.get(*route)?.decode(body, DecodeMode::Static)
                },
            )?;
            debug!(items = items.len(), "Decoded batch");

            Ok(BatchEnvelope {
                top: Arc::new(Map::new()),
                sequence: true,
                items: Arc::new(items),
            })
        },
        Value::Object(map) => Ok(BatchEnvelope {
            top: Arc::new(map.clone()),
            sequence: false,
            items: Arc::new(Vec::new()),
        }),
        Value::Null => Ok(BatchEnvelope {
            top: Arc::new(Map::new()),
            sequence: false,
            items: Arc::new(Vec::new()),
        }),
        _ => Err(AmapError::MalformedPayload(
            "batch payload root must be a sequence or a mapping".to_string(),
        )),
    }
}

/// Check the batch status, then every sub-envelope's status
///
/// # Errors
///
/// Returns `Status` for a top-level vendor error, otherwise a `Status` phase
/// [`BatchError`] when any sub-envelope reports an error.
pub fn aggregate_status(envelope: &BatchEnvelope) -> Result<(), AmapError> {
    if envelope.status() != StatusFlag::Ok {
        let msg = envelope.status_message();
        warn!(code = msg.code, message = ?msg.message, "AMap rejected the batch");
        return Err(StatusError {
            code: msg.code,
            message: msg.message,
            detail: msg.detail,
            envelope: Some(AnyEnvelope::Batch(Box::new(envelope.clone()))),
        }
        .into());
    }

    run_with_partial_failure(envelope.items.iter(), BatchPhase::Status, AnyEnvelope::raise_for_status)?;
    Ok(())
}

/// Decoded batch response
#[derive(Debug, Clone)]
pub struct BatchEnvelope {
    top: Arc<Map<String, Value>>,
    sequence: bool,
    items: Arc<Vec<AnyEnvelope>>,
}

impl BatchEnvelope {
    /// Batch responses always use v3 status fields
    #[must_use]
    pub const fn version(&self) -> ApiVersion {
        ApiVersion::V3
    }

    /// Whether the service answered with per-request responses
    #[must_use]
    pub const fn is_sequence(&self) -> bool {
        self.sequence
    }

    /// Batch status, ok whenever the root was a sequence
    #[must_use]
    pub fn status(&self) -> StatusFlag {
        if self.sequence {
            StatusFlag::Ok
        } else {
            read_status(&self.top, ApiVersion::V3)
        }
    }

    /// Batch-level status message, `10000 OK` for a sequence root
    #[must_use]
    pub fn status_message(&self) -> StatusMessage {
        if self.sequence {
            StatusMessage::new(10000, "OK", Some(""))
        } else {
            read_status_message(&self.top, ApiVersion::V3)
        }
    }

    /// Number of sub-responses, or the top-level count for an error root
    #[must_use]
    pub fn count(&self) -> i64 {
        if self.sequence {
            i64::try_from(self.items.len()).unwrap_or(i64::MAX)
        } else {
            read_count(&self.top, ApiVersion::V3)
        }
    }

    /// Sub-envelopes in request order
    #[must_use]
    pub fn items(&self) -> &[AnyEnvelope] {
        &self.items
    }

    /// Status of each sub-envelope
    #[must_use]
    pub fn batch_status(&self) -> Vec<StatusFlag> {
        self.items.iter().map(AnyEnvelope::status).collect()
    }

    /// Status message of each sub-envelope
    #[must_use]
    pub fn batch_status_message(&self) -> Vec<StatusMessage> {
        self.items.iter().map(AnyEnvelope::status_message).collect()
    }

    /// Fail if the batch or any sub-envelope reported an error
    ///
    /// # Errors
    ///
    /// See [`aggregate_status`].
    pub fn raise_for_status(&self) -> Result<(), AmapError> {
        aggregate_status(self)
    }
}
