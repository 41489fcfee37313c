//! Route identifiers for every endpoint family

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies an endpoint family
///
/// A route key selects the URL, the API version hint and the response decoder
/// used for a request. Batch sub-responses are decoded with the decoder
/// registered for the route of the sub-request at the same position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKey {
    GeoCode,
    ReGeoCode,
    SearchText,
    SearchAround,
    Suggest,
    District,
    Distance,
    NaviRiding,
    NaviWalking,
    NaviDriving,
    Batch,
}

impl RouteKey {
    /// Every route key
    pub const ALL: [Self; 11] = [
        Self::GeoCode,
        Self::ReGeoCode,
        Self::SearchText,
        Self::SearchAround,
        Self::Suggest,
        Self::District,
        Self::Distance,
        Self::NaviRiding,
        Self::NaviWalking,
        Self::NaviDriving,
        Self::Batch,
    ];

    /// Stable lowercase name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GeoCode => "geo_code",
            Self::ReGeoCode => "regeo_code",
            Self::SearchText => "search_text",
            Self::SearchAround => "search_around",
            Self::Suggest => "suggest",
            Self::District => "district",
            Self::Distance => "distance",
            Self::NaviRiding => "navi_riding",
            Self::NaviWalking => "navi_walking",
            Self::NaviDriving => "navi_driving",
            Self::Batch => "batch",
        }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = RouteKey::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(names.len(), RouteKey::ALL.len());
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(RouteKey::NaviRiding.to_string(), "navi_riding");
    }
}
