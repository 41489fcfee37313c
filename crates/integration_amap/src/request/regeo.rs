//! Reverse geocoding request

use domain::{
    BatchFlag, ExtensionFlag, GeoLocation, HomeOrCorp, LooseInput, RoadLevel, RouteKey, WireFlag,
};

use super::{Credentials, PreparedRequest, WireParams, flatten_multi};
use crate::error::AmapError;

/// Coordinates to structured address
///
/// POI types, road level and home-or-corp are only sent when extensions are
/// [`ExtensionFlag::All`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReGeoCodeRequest {
    locations: Vec<GeoLocation>,
    radius: Option<u32>,
    batch: Option<BatchFlag>,
    extensions: Option<ExtensionFlag>,
    poi_types: Vec<String>,
    road_level: Option<RoadLevel>,
    home_or_corp: Option<HomeOrCorp>,
}

impl ReGeoCodeRequest {
    /// Reverse geocode one or more locations
    pub fn new(locations: impl IntoIterator<Item = GeoLocation>) -> Self {
        Self {
            locations: locations.into_iter().collect(),
            radius: None,
            batch: None,
            extensions: None,
            poi_types: Vec::new(),
            road_level: None,
            home_or_corp: None,
        }
    }

    /// Search radius in meters
    #[must_use]
    pub const fn radius(mut self, radius: u32) -> Self {
        self.radius = Some(radius);
        self
    }

    #[must_use]
    pub const fn batch(mut self, batch: BatchFlag) -> Self {
        self.batch = Some(batch);
        self
    }

    #[must_use]
    pub const fn extensions(mut self, extensions: ExtensionFlag) -> Self {
        self.extensions = Some(extensions);
        self
    }

    /// POI type filter, entries may contain `|`
    #[must_use]
    pub fn poi_types<I, S>(mut self, poi_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.poi_types = flatten_multi(poi_types);
        self
    }

    #[must_use]
    pub const fn road_level(mut self, road_level: RoadLevel) -> Self {
        self.road_level = Some(road_level);
        self
    }

    #[must_use]
    pub const fn home_or_corp(mut self, home_or_corp: HomeOrCorp) -> Self {
        self.home_or_corp = Some(home_or_corp);
        self
    }

    /// Extensions from loose input such as `true`, `1` or `"all"`
    ///
    /// # Errors
    ///
    /// Returns `InvalidParams` when the input names no extension level.
    pub fn try_extensions<'a>(self, input: impl Into<LooseInput<'a>>) -> Result<Self, AmapError> {
        Ok(self.extensions(ExtensionFlag::choose(input)?))
    }

    /// Road level from loose input such as `false`, `1` or `"direct"`
    ///
    /// # Errors
    ///
    /// Returns `InvalidParams` when the input names no road level.
    pub fn try_road_level<'a>(self, input: impl Into<LooseInput<'a>>) -> Result<Self, AmapError> {
        Ok(self.road_level(RoadLevel::choose(input)?))
    }

    /// Home-or-corp preference from loose input such as `2` or `"home"`
    ///
    /// # Errors
    ///
    /// Returns `InvalidParams` when the input names no preference.
    pub fn try_home_or_corp<'a>(self, input: impl Into<LooseInput<'a>>) -> Result<Self, AmapError> {
        Ok(self.home_or_corp(HomeOrCorp::choose(input)?))
    }

    /// Produce signed wire parameters
    ///
    /// # Errors
    ///
    /// Returns `InvalidParams` when no location is given.
    pub fn prepare(&self, credentials: &Credentials) -> Result<PreparedRequest, AmapError> {
        if self.locations.is_empty() {
            return Err(AmapError::InvalidParams(
                "reverse geocode requires a location".to_string(),
            ));
        }

        let mut params = WireParams::new();
        params.push("location", GeoLocation::join_many(&self.locations));
        params.push_opt("radius", self.radius);
        params.push_opt("batch", self.batch.map(WireFlag::wire_value));
        params.push_opt("extensions", self.extensions.map(WireFlag::wire_value));

        if self.extensions == Some(ExtensionFlag::All) {
            params.push_multi("poitype", &self.poi_types);
            params.push_opt("roadlevel", self.road_level.map(WireFlag::wire_value));
            params.push_opt("homeorcorp", self.home_or_corp.map(WireFlag::wire_value));
        }

        credentials.apply(RouteKey::ReGeoCode, params)
    }
}
