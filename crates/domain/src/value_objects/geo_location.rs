//! Geographic location value object
//!
//! AMap exchanges coordinates as `"lng,lat"` text with longitude first. The
//! accessors here are named, so callers never depend on that order.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::multi_value::{join_multi, split_multi};
use crate::errors::DomainError;

/// Decimal places kept on the wire and when parsing
const PRECISION: f64 = 1_000_000.0;

/// A geographic location with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Latitude in degrees (-90 to 90)
    latitude: f64,
    /// Longitude in degrees (-180 to 180)
    longitude: f64,
}

impl GeoLocation {
    /// Create a new location with validation
    ///
    /// # Errors
    ///
    /// Returns `InvalidCoordinates` if latitude is not in [-90, 90]
    /// or longitude is not in [-180, 180]
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::InvalidCoordinates(format!(
                "latitude {latitude} must be -90 to 90, longitude {longitude} must be -180 to 180"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Create a location in the vendor's longitude-first order
    ///
    /// # Errors
    ///
    /// Same as [`GeoLocation::new`].
    pub fn from_lng_lat(longitude: f64, latitude: f64) -> Result<Self, DomainError> {
        Self::new(latitude, longitude)
    }

    /// Create a location without validation (for trusted sources)
    #[must_use]
    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Get the latitude
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Get the longitude
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Render as `"lng,lat"` with six decimals
    #[must_use]
    pub fn to_wire(&self) -> String {
        format!("{:.6},{:.6}", self.longitude, self.latitude)
    }

    /// Parse a `"lng,lat"` pair, rounding both parts to six decimals
    ///
    /// # Errors
    ///
    /// Returns `InvalidLocation` when the text is not two comma-separated
    /// numbers and `InvalidCoordinates` when they are out of range.
    pub fn parse(text: &str) -> Result<Self, DomainError> {
        let mut parts = text.trim().split(',');
        let (Some(lng), Some(lat), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(DomainError::InvalidLocation(text.to_string()));
        };
        let lng = parse_coordinate(lng, text)?;
        let lat = parse_coordinate(lat, text)?;
        Self::from_lng_lat(round6(lng), round6(lat))
    }

    /// Parse a `|`-separated list of `"lng,lat"` pairs
    ///
    /// # Errors
    ///
    /// Fails on the first entry that [`GeoLocation::parse`] rejects.
    pub fn parse_many(text: &str) -> Result<Vec<Self>, DomainError> {
        split_multi(text).iter().map(|s| Self::parse(s)).collect()
    }

    /// Join locations into the `|`-separated wire form
    #[must_use]
    pub fn join_many(locations: &[Self]) -> String {
        join_multi(locations.iter().map(Self::to_wire))
    }
}

fn parse_coordinate(part: &str, whole: &str) -> Result<f64, DomainError> {
    part.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DomainError::InvalidLocation(whole.to_string()))
}

fn round6(value: f64) -> f64 {
    (value * PRECISION).round() / PRECISION
}

impl FromStr for GeoLocation {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for GeoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}
