//! Route registry
//!
//! Maps each [`RouteKey`] to its URL path, API version hint and response
//! decoder. Built once at start-up and shared read-only behind an `Arc`.

use std::{collections::HashMap, fmt};

use domain::{ApiVersion, RouteKey};
use serde_json::Value;

use crate::{
    entity::DecodeMode,
    envelope::{AnyEnvelope, DecodeOptions, decode_as},
    error::AmapError,
    models::{
        DistanceResponse, DistrictResponse, DrivingResponse, GeoCodeResponse, ReGeoCodeResponse,
        RidingResponse, SearchResponse, SuggestResponse, WalkingResponse,
    },
};

/// Decoder from a normalized tree to an envelope
pub type DecodeFn = fn(&Value, DecodeOptions) -> Result<AnyEnvelope, AmapError>;

/// Everything needed to call and decode one route
#[derive(Clone)]
pub struct RouteEntry {
    /// Route this entry serves
    pub key: RouteKey,
    /// URL path relative to the service base URL
    pub path: String,
    /// Version hint for decoding
    pub version: ApiVersion,
    /// Detect the version from the payload instead of trusting the hint
    pub auto_version: bool,
    /// Response decoder, `None` for routes without a single-envelope shape
    pub decoder: Option<DecodeFn>,
}

impl RouteEntry {
    /// Create an entry
    pub fn new(key: RouteKey, path: impl Into<String>, version: ApiVersion, decoder: DecodeFn) -> Self {
        Self {
            key,
            path: path.into(),
            version,
            auto_version: false,
            decoder: Some(decoder),
        }
    }

    /// Enable version auto detection
    #[must_use]
    pub const fn with_auto_version(mut self) -> Self {
        self.auto_version = true;
        self
    }

    /// Decode options for this route
    #[must_use]
    pub const fn options(&self, mode: DecodeMode) -> DecodeOptions {
        DecodeOptions {
            version: self.version,
            auto_version: self.auto_version,
            mode,
        }
    }

    /// Decode a normalized tree with this route's decoder
    ///
    /// # Errors
    ///
    /// Returns `UnknownRoute` when the route has no decoder, otherwise the
    /// decoder's error.
    pub fn decode(&self, tree: &Value, mode: DecodeMode) -> Result<AnyEnvelope, AmapError> {
        let decoder = self.decoder.ok_or(AmapError::UnknownRoute(self.key))?;
        decoder(tree, self.options(mode))
    }
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("key", &self.key)
            .field("path", &self.path)
            .field("version", &self.version)
            .field("auto_version", &self.auto_version)
            .field("has_decoder", &self.decoder.is_some())
            .finish()
    }
}

/// Route key to route entry table
#[derive(Debug, Clone, Default)]
pub struct RouteRegistry {
    routes: HashMap<RouteKey, RouteEntry>,
}

impl RouteRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every AMap web service route
    #[must_use]
    pub fn amap_default() -> Self {
        use ApiVersion::V3;

        let mut registry = Self::new();
        registry
            .register(RouteEntry::new(RouteKey::GeoCode, "/v3/geocode/geo", V3, decode_as::<GeoCodeResponse>))
            .register(RouteEntry::new(
                RouteKey::ReGeoCode,
                "/v3/geocode/regeo",
                V3,
                decode_as::<ReGeoCodeResponse>,
            ))
            .register(RouteEntry::new(RouteKey::SearchText, "/v3/place/text", V3, decode_as::<SearchResponse>))
            .register(RouteEntry::new(
                RouteKey::SearchAround,
                "/v3/place/around",
                V3,
                decode_as::<SearchResponse>,
            ))
            .register(RouteEntry::new(
                RouteKey::Suggest,
                "/v3/assistant/inputtips",
                V3,
                decode_as::<SuggestResponse>,
            ))
            .register(RouteEntry::new(
                RouteKey::District,
                "/v3/config/district",
                V3,
                decode_as::<DistrictResponse>,
            ))
            .register(RouteEntry::new(RouteKey::Distance, "/v3/distance", V3, decode_as::<DistanceResponse>))
            .register(
                RouteEntry::new(
                    RouteKey::NaviRiding,
                    "/v4/direction/bicycling",
                    V3,
                    decode_as::<RidingResponse>,
                )
                .with_auto_version(),
            )
            .register(RouteEntry::new(
                RouteKey::NaviWalking,
                "/v3/direction/walking",
                V3,
                decode_as::<WalkingResponse>,
            ))
            .register(RouteEntry::new(
                RouteKey::NaviDriving,
                "/v3/direction/driving",
                V3,
                decode_as::<DrivingResponse>,
            ))
            .register(RouteEntry {
                key: RouteKey::Batch,
                path: "/v3/batch".to_string(),
                version: V3,
                auto_version: false,
                decoder: None,
            });
        registry
    }

    /// Add or replace a route
    pub fn register(&mut self, entry: RouteEntry) -> &mut Self {
        self.routes.insert(entry.key, entry);
        self
    }

    /// Look up a route
    ///
    /// # Errors
    ///
    /// Returns `UnknownRoute` when the key is not registered.
    pub fn get(&self, key: RouteKey) -> Result<&RouteEntry, AmapError> {
        self.routes.get(&key).ok_or(AmapError::UnknownRoute(key))
    }

    /// URL path of a route
    ///
    /// # Errors
    ///
    /// Returns `UnknownRoute` when the key is not registered.
    pub fn path(&self, key: RouteKey) -> Result<&str, AmapError> {
        self.get(key).map(|entry| entry.path.as_str())
    }

    /// Whether a route is registered
    #[must_use]
    pub fn contains(&self, key: RouteKey) -> bool {
        self.routes.contains_key(&key)
    }

    /// Number of registered routes
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// True when no route is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
