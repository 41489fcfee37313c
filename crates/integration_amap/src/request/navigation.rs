//! Riding, walking and driving directions

use domain::{GeoLocation, RouteKey};

use super::{Credentials, PreparedRequest, WireParams};
use crate::error::AmapError;

/// Origin and destination of a route
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutePoints {
    pub origin: GeoLocation,
    pub destination: GeoLocation,
}

impl RoutePoints {
    fn prepare(self, route: RouteKey, credentials: &Credentials) -> Result<PreparedRequest, AmapError> {
        let mut params = WireParams::new();
        params.push("origin", self.origin.to_wire());
        params.push("destination", self.destination.to_wire());
        credentials.apply(route, params)
    }
}

macro_rules! route_request {
    ($(#[$doc:meta])* $name:ident => $route:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub struct $name {
            points: RoutePoints,
        }

        impl $name {
            #[must_use]
            pub const fn new(origin: GeoLocation, destination: GeoLocation) -> Self {
                Self {
                    points: RoutePoints { origin, destination },
                }
            }

            #[must_use]
            pub const fn points(&self) -> RoutePoints {
                self.points
            }

            /// Produce signed wire parameters
            ///
            /// # Errors
            ///
            /// Only fails when credentials are missing.
            pub fn prepare(&self, credentials: &Credentials) -> Result<PreparedRequest, AmapError> {
                self.points.prepare(RouteKey::$route, credentials)
            }
        }
    };
}

route_request! {
    /// Bicycle directions
    RidingRequest => NaviRiding
}

route_request! {
    /// Walking directions
    WalkingRequest => NaviWalking
}

route_request! {
    /// Driving directions
    DrivingRequest => NaviDriving
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_params() {
        let origin = GeoLocation::from_lng_lat(116.434307, 39.90909).unwrap();
        let destination = GeoLocation::from_lng_lat(116.434446, 39.90816).unwrap();

        let riding = RidingRequest::new(origin, destination)
            .prepare(&Credentials::new("k"))
            .unwrap();
        assert_eq!(riding.route, RouteKey::NaviRiding);
        assert_eq!(riding.params.get("origin"), Some("116.434307,39.909090"));
        assert_eq!(riding.params.get("destination"), Some("116.434446,39.908160"));

        let walking = WalkingRequest::new(origin, destination)
            .prepare(&Credentials::new("k"))
            .unwrap();
        assert_eq!(walking.route, RouteKey::NaviWalking);

        let driving = DrivingRequest::new(origin, destination);
        assert_eq!(driving.points().origin, origin);
        assert_eq!(
            driving.prepare(&Credentials::new("k")).unwrap().route,
            RouteKey::NaviDriving
        );
    }
}
