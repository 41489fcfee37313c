//! Distance measurement request

use domain::{DistanceType, GeoLocation, RouteKey, WireFlag};

use super::{Credentials, PreparedRequest, WireParams};
use crate::error::AmapError;

/// Distance from each origin to one destination
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceRequest {
    origins: Vec<GeoLocation>,
    destination: GeoLocation,
    distance_type: Option<DistanceType>,
}

impl DistanceRequest {
    pub fn new(origins: impl IntoIterator<Item = GeoLocation>, destination: GeoLocation) -> Self {
        Self {
            origins: origins.into_iter().collect(),
            destination,
            distance_type: None,
        }
    }

    /// Straight line, driving or walking distance
    #[must_use]
    pub const fn distance_type(mut self, distance_type: DistanceType) -> Self {
        self.distance_type = Some(distance_type);
        self
    }

    /// Produce signed wire parameters
    ///
    /// # Errors
    ///
    /// Returns `InvalidParams` when there is no origin.
    pub fn prepare(&self, credentials: &Credentials) -> Result<PreparedRequest, AmapError> {
        if self.origins.is_empty() {
            return Err(AmapError::InvalidParams(
                "distance requires at least one origin".to_string(),
            ));
        }

        let mut params = WireParams::new();
        params.push("origins", GeoLocation::join_many(&self.origins));
        params.push("destination", self.destination.to_wire());
        params.push_opt("type", self.distance_type.map(WireFlag::wire_value));
        credentials.apply(RouteKey::Distance, params)
    }
}
