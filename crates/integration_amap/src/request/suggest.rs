//! Input tips request

use domain::{CityLimitFlag, DataType, GeoLocation, RouteKey, WireFlag};

use super::{Credentials, PreparedRequest, WireParams, flatten_multi};
use crate::error::AmapError;

/// Completion tips for a partial keyword
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestRequest {
    keyword: String,
    types: Vec<String>,
    location: Option<GeoLocation>,
    city: Option<String>,
    city_limit: Option<CityLimitFlag>,
    data_types: Vec<DataType>,
}

impl SuggestRequest {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            types: Vec::new(),
            location: None,
            city: None,
            city_limit: None,
            data_types: Vec::new(),
        }
    }

    /// POI type filter, entries may contain `|`
    #[must_use]
    pub fn types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.types = flatten_multi(types);
        self
    }

    /// Prefer tips near a location
    #[must_use]
    pub const fn location(mut self, location: GeoLocation) -> Self {
        self.location = Some(location);
        self
    }

    #[must_use]
    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    #[must_use]
    pub const fn city_limit(mut self, city_limit: CityLimitFlag) -> Self {
        self.city_limit = Some(city_limit);
        self
    }

    /// Kinds of tips to return; repeated kinds are sent once
    #[must_use]
    pub fn data_types(mut self, data_types: impl IntoIterator<Item = DataType>) -> Self {
        self.data_types.clear();
        for data_type in data_types {
            if !self.data_types.contains(&data_type) {
                self.data_types.push(data_type);
            }
        }
        self
    }

    /// Produce signed wire parameters
    ///
    /// # Errors
    ///
    /// Returns `InvalidParams` when the keyword is blank.
    pub fn prepare(&self, credentials: &Credentials) -> Result<PreparedRequest, AmapError> {
        if self.keyword.trim().is_empty() {
            return Err(AmapError::InvalidParams("input tips require a keyword".to_string()));
        }

        let data_types: Vec<String> = self
            .data_types
            .iter()
            .map(|t| t.wire_value().to_string())
            .collect();

        let mut params = WireParams::new();
        params.push("keywords", self.keyword.as_str());
        params.push_multi("type", &self.types);
        params.push_opt("location", self.location.as_ref().map(GeoLocation::to_wire));
        params.push_opt("city", self.city.as_deref());
        params.push_opt("citylimit", self.city_limit.map(WireFlag::wire_value));
        params.push_multi("datatype", &data_types);
        credentials.apply(RouteKey::Suggest, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_types_are_deduplicated_in_order() {
        let prepared = SuggestRequest::new("肯德基")
            .data_types([DataType::All, DataType::Poi, DataType::All])
            .city_limit(CityLimitFlag::On)
            .prepare(&Credentials::new("k"))
            .unwrap();
        assert_eq!(prepared.params.get("datatype"), Some("all|poi"));
        assert_eq!(prepared.params.get("citylimit"), Some("true"));
        assert_eq!(prepared.params.get("keywords"), Some("肯德基"));
    }

    #[test]
    fn optional_params() {
        let loc = GeoLocation::from_lng_lat(116.481488, 39.990464).unwrap();
        let prepared = SuggestRequest::new("x")
            .types(["050000|060000"])
            .location(loc)
            .city("北京")
            .prepare(&Credentials::new("k"))
            .unwrap();
        assert_eq!(prepared.params.get("type"), Some("050000|060000"));
        assert_eq!(prepared.params.get("location"), Some("116.481488,39.990464"));
        assert_eq!(prepared.params.get("datatype"), None);
    }

    #[test]
    fn blank_keyword_is_rejected() {
        assert!(matches!(
            SuggestRequest::new("  ").prepare(&Credentials::new("k")),
            Err(AmapError::InvalidParams(_))
        ));
    }
}
