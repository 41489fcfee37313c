//! Response envelopes
//!
//! Every response is a top-level mapping carrying a status, a status
//! message, a count and the endpoint's data. The v3 and v4 API generations
//! spell these differently:
//!
//! | field   | v3                         | v4                        |
//! |---------|----------------------------|---------------------------|
//! | status  | `status == "1"`            | `errcode == 0`            |
//! | code    | `infocode` (default `-1`)  | `errcode`                 |
//! | message | `info`                     | `errmsg`                  |
//! | detail  | always `""`                | `errdetail`               |
//! | count   | `count` (default `0`)      | always `0`                |
//!
//! [`Envelope`] is generic over a [`ResponseKind`] that knows where an
//! endpoint keeps its data and how to decode it.

use std::{fmt, marker::PhantomData, sync::Arc};

use domain::{ApiVersion, StatusFlag};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{
    batch::BatchEnvelope,
    entity::{DecodeMode, Entity, Schema},
    error::{AmapError, StatusError},
    models::{
        DistanceResponse, DistrictResponse, DrivingResponse, GeoCodeResponse, ReGeoCodeResponse,
        RidingResponse, SearchResponse, SuggestResponse, WalkingResponse,
    },
    normalize::normalize,
};

/// Options controlling how a payload is decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Version assumed unless auto detection overrides it
    pub version: ApiVersion,
    /// Switch to v4 when the payload carries `errcode`
    pub auto_version: bool,
    /// Entity resolution mode
    pub mode: DecodeMode,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            version: ApiVersion::V3,
            auto_version: false,
            mode: DecodeMode::Static,
        }
    }
}

impl DecodeOptions {
    /// Options with an explicit version hint
    #[must_use]
    pub fn new(version: ApiVersion) -> Self {
        Self {
            version,
            ..Self::default()
        }
    }

    /// Enable or disable version auto detection
    #[must_use]
    pub const fn with_auto_version(mut self, auto_version: bool) -> Self {
        self.auto_version = auto_version;
        self
    }

    /// Set the entity resolution mode
    #[must_use]
    pub const fn with_mode(mut self, mode: DecodeMode) -> Self {
        self.mode = mode;
        self
    }
}

/// `(code, message, detail)` triple reported by the vendor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    /// Numeric status code
    pub code: i64,
    /// Human readable message
    pub message: Option<String>,
    /// Additional detail, `Some("")` for v3
    pub detail: Option<String>,
}

impl StatusMessage {
    /// Build a status message
    pub fn new(code: i64, message: impl Into<String>, detail: Option<&str>) -> Self {
        Self {
            code,
            message: Some(message.into()),
            detail: detail.map(ToString::to_string),
        }
    }
}

/// An endpoint's response shape
pub trait ResponseKind: Sized + 'static {
    /// Kind name used in diagnostics
    const NAME: &'static str;

    /// Decoded data exposed by the envelope
    type Data: fmt::Debug + Send + Sync;

    /// Decode the data from the root mapping
    fn extract(raw: &Map<String, Value>, mode: DecodeMode) -> Self::Data;

    /// Per-item status checks run after the envelope status is ok
    fn check_items(_envelope: &Envelope<Self>) -> Result<(), AmapError> {
        Ok(())
    }

    /// Erase the kind
    fn wrap(envelope: Envelope<Self>) -> AnyEnvelope;
}

/// Decoded response of one endpoint
pub struct Envelope<K: ResponseKind> {
    raw: Arc<Map<String, Value>>,
    version: ApiVersion,
    mode: DecodeMode,
    cached: Option<Arc<K::Data>>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ResponseKind> Envelope<K> {
    /// Parse and normalize raw JSON text, then decode it
    ///
    /// # Errors
    ///
    /// Returns `MalformedPayload` for invalid JSON or a root that is not a
    /// mapping.
    pub fn from_text(raw_text: &str, options: DecodeOptions) -> Result<Self, AmapError> {
        let tree = normalize(raw_text)?;
        Self::from_tree(&tree, options)
    }

    /// Decode an already-normalized tree
    ///
    /// A `null` root is treated as an empty mapping.
    ///
    /// # Errors
    ///
    /// Returns `MalformedPayload` when the root is neither a mapping nor
    /// `null`.
    pub fn from_tree(tree: &Value, options: DecodeOptions) -> Result<Self, AmapError> {
        let raw = match tree {
            Value::Object(map) => map.clone(),
            Value::Null => Map::new(),
            other => {
                return Err(AmapError::MalformedPayload(format!(
                    "{} payload root must be a mapping, got {}",
                    K::NAME,
                    json_kind(other)
                )));
            },
        };

        let version = detect_version(&raw, options.version, options.auto_version);
        let cached = match options.mode {
            DecodeMode::Static => Some(Arc::new(K::extract(&raw, options.mode))),
            DecodeMode::Dynamic => None,
        };
        debug!(kind = K::NAME, %version, mode = ?options.mode, "Decoded envelope");

        Ok(Self {
            raw: Arc::new(raw),
            version,
            mode: options.mode,
            cached,
            _kind: PhantomData,
        })
    }

    /// API version in effect after auto detection
    #[must_use]
    pub const fn version(&self) -> ApiVersion {
        self.version
    }

    /// Entity resolution mode
    #[must_use]
    pub const fn mode(&self) -> DecodeMode {
        self.mode
    }

    /// Normalized root mapping
    #[must_use]
    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }

    /// Vendor status
    #[must_use]
    pub fn status(&self) -> StatusFlag {
        read_status(&self.raw, self.version)
    }

    /// Vendor status message
    #[must_use]
    pub fn status_message(&self) -> StatusMessage {
        read_status_message(&self.raw, self.version)
    }

    /// Result count (always `0` for v4)
    #[must_use]
    pub fn count(&self) -> i64 {
        read_count(&self.raw, self.version)
    }

    /// Decoded data
    ///
    /// Static envelopes hand out the same allocation on every call; dynamic
    /// envelopes decode afresh.
    #[must_use]
    pub fn data(&self) -> Arc<K::Data> {
        self.cached
            .clone()
            .unwrap_or_else(|| Arc::new(K::extract(&self.raw, self.mode)))
    }

    /// Fail if the vendor reported an error
    ///
    /// # Errors
    ///
    /// Returns `Status` when the envelope status is not ok, or the kind's
    /// per-item error when one of its items failed.
    pub fn raise_for_status(&self) -> Result<(), AmapError> {
        if self.status() != StatusFlag::Ok {
            return Err(self.status_error().into());
        }
        K::check_items(self)
    }

    /// Status error for the current status message
    pub(crate) fn status_error(&self) -> StatusError {
        let msg = self.status_message();
        warn!(kind = K::NAME, code = msg.code, message = ?msg.message, "AMap reported an error");
        StatusError {
            code: msg.code,
            message: msg.message,
            detail: msg.detail,
            envelope: Some(self.clone().into_any()),
        }
    }

    /// Erase the kind
    #[must_use]
    pub fn into_any(self) -> AnyEnvelope {
        K::wrap(self)
    }
}

impl<K: ResponseKind> Clone for Envelope<K> {
    fn clone(&self) -> Self {
        Self {
            raw: Arc::clone(&self.raw),
            version: self.version,
            mode: self.mode,
            cached: self.cached.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K: ResponseKind> fmt::Debug for Envelope<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("kind", &K::NAME)
            .field("version", &self.version)
            .field("mode", &self.mode)
            .field("status", &self.status())
            .field("count", &self.count())
            .finish_non_exhaustive()
    }
}

/// Decode a normalized tree into a kind-erased envelope
///
/// Used as the decoder function stored in the route registry.
///
/// # Errors
///
/// Same as [`Envelope::from_tree`].
pub fn decode_as<K: ResponseKind>(
    tree: &Value,
    options: DecodeOptions,
) -> Result<AnyEnvelope, AmapError> {
    Envelope::<K>::from_tree(tree, options).map(K::wrap)
}

/// Envelope of any endpoint
#[derive(Debug, Clone)]
pub enum AnyEnvelope {
    GeoCode(Envelope<GeoCodeResponse>),
    ReGeoCode(Envelope<ReGeoCodeResponse>),
    Search(Envelope<SearchResponse>),
    Suggest(Envelope<SuggestResponse>),
    District(Envelope<DistrictResponse>),
    Distance(Envelope<DistanceResponse>),
    Riding(Envelope<RidingResponse>),
    Walking(Envelope<WalkingResponse>),
    Driving(Envelope<DrivingResponse>),
    Batch(Box<BatchEnvelope>),
}

macro_rules! each_envelope {
    ($value:expr, $env:ident => $body:expr) => {
        match $value {
            AnyEnvelope::GeoCode($env) => $body,
            AnyEnvelope::ReGeoCode($env) => $body,
            AnyEnvelope::Search($env) => $body,
            AnyEnvelope::Suggest($env) => $body,
            AnyEnvelope::District($env) => $body,
            AnyEnvelope::Distance($env) => $body,
            AnyEnvelope::Riding($env) => $body,
            AnyEnvelope::Walking($env) => $body,
            AnyEnvelope::Driving($env) => $body,
            AnyEnvelope::Batch($env) => $body,
        }
    };
}

impl AnyEnvelope {
    /// Kind name
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::GeoCode(_) => GeoCodeResponse::NAME,
            Self::ReGeoCode(_) => ReGeoCodeResponse::NAME,
            Self::Search(_) => SearchResponse::NAME,
            Self::Suggest(_) => SuggestResponse::NAME,
            Self::District(_) => DistrictResponse::NAME,
            Self::Distance(_) => DistanceResponse::NAME,
            Self::Riding(_) => RidingResponse::NAME,
            Self::Walking(_) => WalkingResponse::NAME,
            Self::Driving(_) => DrivingResponse::NAME,
            Self::Batch(_) => "Batch",
        }
    }

    /// API version in effect
    #[must_use]
    pub fn version(&self) -> ApiVersion {
        each_envelope!(self, env => env.version())
    }

    /// Vendor status
    #[must_use]
    pub fn status(&self) -> StatusFlag {
        each_envelope!(self, env => env.status())
    }

    /// Vendor status message
    #[must_use]
    pub fn status_message(&self) -> StatusMessage {
        each_envelope!(self, env => env.status_message())
    }

    /// Result count
    #[must_use]
    pub fn count(&self) -> i64 {
        each_envelope!(self, env => env.count())
    }

    /// Fail if the vendor reported an error
    ///
    /// # Errors
    ///
    /// See [`Envelope::raise_for_status`].
    pub fn raise_for_status(&self) -> Result<(), AmapError> {
        each_envelope!(self, env => env.raise_for_status())
    }
}

/// Version after optional auto detection
pub(crate) fn detect_version(
    raw: &Map<String, Value>,
    hint: ApiVersion,
    auto_version: bool,
) -> ApiVersion {
    if auto_version && raw.contains_key("errcode") {
        ApiVersion::V4
    } else {
        hint
    }
}

pub(crate) fn read_status(raw: &Map<String, Value>, version: ApiVersion) -> StatusFlag {
    let ok = match version {
        ApiVersion::V3 => raw.get("status").and_then(Value::as_str) == Some("1"),
        ApiVersion::V4 => raw.get("errcode").and_then(Value::as_i64) == Some(0),
    };
    if ok { StatusFlag::Ok } else { StatusFlag::Err }
}

pub(crate) fn read_status_message(raw: &Map<String, Value>, version: ApiVersion) -> StatusMessage {
    match version {
        ApiVersion::V3 => StatusMessage {
            code: raw.get("infocode").and_then(loose_code).unwrap_or(-1),
            message: raw.get("info").and_then(value_text),
            detail: Some(String::new()),
        },
        ApiVersion::V4 => StatusMessage {
            code: raw.get("errcode").and_then(loose_code).unwrap_or(-1),
            message: raw.get("errmsg").and_then(value_text),
            detail: raw.get("errdetail").and_then(value_text),
        },
    }
}

pub(crate) fn read_count(raw: &Map<String, Value>, version: ApiVersion) -> i64 {
    match version {
        ApiVersion::V3 => raw.get("count").and_then(loose_code).unwrap_or(0),
        ApiVersion::V4 => 0,
    }
}

/// Integer from a number or numeric text
pub(crate) fn loose_code(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Text of a scalar value, `None` for null and containers
pub(crate) fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Entities for each mapping in the list stored under `key`
pub(crate) fn entity_list(
    raw: &Map<String, Value>,
    key: &str,
    schema: &'static Schema,
    mode: DecodeMode,
) -> Vec<Entity> {
    raw.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| Entity::new(schema, item, mode))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn v3_ok() -> &'static str {
        r#"{"status": "1", "info": "OK", "infocode": "10000", "count": "2",
            "geocodes": [{"formatted_address": "a", "location": "116.1,39.1"},
                         {"formatted_address": "b", "location": "116.2,39.2"}]}"#
    }

    #[test]
    fn v3_status_and_message() {
        let env = Envelope::<GeoCodeResponse>::from_text(v3_ok(), DecodeOptions::default()).unwrap();
        assert_eq!(env.status(), StatusFlag::Ok);
        assert_eq!(env.status_message(), StatusMessage::new(10000, "OK", Some("")));
        assert_eq!(env.count(), 2);
        assert_eq!(env.data().len(), 2);
        assert!(env.raise_for_status().is_ok());
    }

    #[test]
    fn v4_status_and_message() {
        let text = r#"{"errcode": 0, "errmsg": "OK", "errdetail": null, "data": {"origin": "1,2"}}"#;
        let env =
            Envelope::<RidingResponse>::from_text(text, DecodeOptions::new(ApiVersion::V4)).unwrap();
        assert_eq!(env.status(), StatusFlag::Ok);
        assert_eq!(env.status_message(), StatusMessage::new(0, "OK", None));
        assert_eq!(env.count(), 0);
    }

    #[test]
    fn auto_detection_switches_to_v4() {
        let text = r#"{"errcode": 0, "errmsg": "OK"}"#;
        let opts = DecodeOptions::new(ApiVersion::V3).with_auto_version(true);
        let env = Envelope::<RidingResponse>::from_text(text, opts).unwrap();
        assert_eq!(env.version(), ApiVersion::V4);
        assert_eq!(env.status(), StatusFlag::Ok);
    }

    #[test]
    fn auto_detection_keeps_hint_without_errcode() {
        let opts = DecodeOptions::new(ApiVersion::V4).with_auto_version(true);
        let env = Envelope::<GeoCodeResponse>::from_text(v3_ok(), opts).unwrap();
        assert_eq!(env.version(), ApiVersion::V4);

        let opts = DecodeOptions::new(ApiVersion::V3).with_auto_version(true);
        let env = Envelope::<GeoCodeResponse>::from_text(v3_ok(), opts).unwrap();
        assert_eq!(env.version(), ApiVersion::V3);
    }

    #[test]
    fn errcode_ignored_without_auto_detection() {
        let text = r#"{"errcode": 0, "status": "0"}"#;
        let env = Envelope::<GeoCodeResponse>::from_text(text, DecodeOptions::default()).unwrap();
        assert_eq!(env.version(), ApiVersion::V3);
        assert_eq!(env.status(), StatusFlag::Err);
    }

    #[test]
    fn error_status_raises_with_back_reference() {
        let text = r#"{"status": "0", "info": "INVALID_USER_KEY", "infocode": "10001"}"#;
        let env = Envelope::<GeoCodeResponse>::from_text(text, DecodeOptions::default()).unwrap();
        let err = env.raise_for_status().unwrap_err();
        let AmapError::Status(status) = err else {
            unreachable!("Expected Status error");
        };
        assert_eq!(status.code, 10001);
        assert_eq!(status.to_string(), "AMAP-ERROR: 10001-INVALID_USER_KEY");
        let back = status.envelope.as_ref().unwrap();
        assert_eq!(back.kind(), GeoCodeResponse::NAME);
        assert_eq!(back.status_message().code, 10001);
    }

    #[test]
    fn missing_infocode_defaults_to_minus_one() {
        let env = Envelope::<GeoCodeResponse>::from_text(r#"{"status": "0"}"#, DecodeOptions::default())
            .unwrap();
        assert_eq!(env.status_message().code, -1);
        assert_eq!(env.count(), 0);
    }

    #[test]
    fn absent_data_is_empty() {
        let env =
            Envelope::<GeoCodeResponse>::from_text(r#"{"status": "1", "geocodes": []}"#, DecodeOptions::default())
                .unwrap();
        assert!(env.data().is_empty());
    }

    #[test]
    fn empty_root_mapping_is_accepted() {
        let env = Envelope::<GeoCodeResponse>::from_text("{}", DecodeOptions::default()).unwrap();
        assert_eq!(env.status(), StatusFlag::Err);
        assert!(env.data().is_empty());
    }

    #[test]
    fn sequence_root_is_malformed_for_single_envelopes() {
        let err = Envelope::<GeoCodeResponse>::from_tree(&json!([1, 2]), DecodeOptions::default())
            .unwrap_err();
        assert!(matches!(err, AmapError::MalformedPayload(_)));
    }

    #[test]
    fn static_data_is_shared() {
        let env = Envelope::<GeoCodeResponse>::from_text(v3_ok(), DecodeOptions::default()).unwrap();
        assert!(Arc::ptr_eq(&env.data(), &env.data()));
    }

    #[test]
    fn dynamic_data_is_rebuilt() {
        let opts = DecodeOptions::default().with_mode(DecodeMode::Dynamic);
        let env = Envelope::<GeoCodeResponse>::from_text(v3_ok(), opts).unwrap();
        let (a, b) = (env.data(), env.data());
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(a, b);
    }

    #[test]
    fn any_envelope_dispatch() {
        let any = decode_as::<GeoCodeResponse>(
            &normalize(v3_ok()).unwrap(),
            DecodeOptions::default(),
        )
        .unwrap();
        assert_eq!(any.kind(), "GeoCode");
        assert_eq!(any.count(), 2);
        assert_eq!(any.version(), ApiVersion::V3);
        assert_eq!(any.status(), StatusFlag::Ok);
    }
}
