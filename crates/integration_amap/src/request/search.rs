//! POI search requests

use domain::{ChildrenFlag, CityLimitFlag, ExtensionFlag, GeoLocation, RouteKey, SortRule, WireFlag};

use super::{Credentials, PreparedRequest, WireParams, flatten_multi};
use crate::error::AmapError;

/// Fields shared by keyword and around search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    keywords: Vec<String>,
    types: Vec<String>,
    page: Option<u32>,
    offset: Option<u32>,
    sort_rule: Option<SortRule>,
    extensions: Option<ExtensionFlag>,
}

impl SearchFilter {
    fn is_unfiltered(&self) -> bool {
        self.keywords.is_empty() && self.types.is_empty()
    }

    fn write_to(&self, params: &mut WireParams) {
        params.push_multi("keywords", &self.keywords);
        params.push_multi("types", &self.types);
        params.push_opt("offset", self.offset);
        params.push_opt("page", self.page);
        params.push_opt("sortrule", self.sort_rule.map(WireFlag::wire_value));
        params.push_opt("extensions", self.extensions.map(WireFlag::wire_value));
    }
}

/// Builder methods both search requests expose through their filter
macro_rules! search_filter_setters {
    () => {
        /// Keywords, entries may contain `|`
        #[must_use]
        pub fn keywords<I, S>(mut self, keywords: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: AsRef<str>,
        {
            self.filter.keywords = flatten_multi(keywords);
            self
        }

        /// POI type names or codes, entries may contain `|`
        #[must_use]
        pub fn types<I, S>(mut self, types: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: AsRef<str>,
        {
            self.filter.types = flatten_multi(types);
            self
        }

        #[must_use]
        pub const fn page(mut self, page: u32) -> Self {
            self.filter.page = Some(page);
            self
        }

        /// Results per page
        #[must_use]
        pub const fn offset(mut self, offset: u32) -> Self {
            self.filter.offset = Some(offset);
            self
        }

        #[must_use]
        pub const fn sort_rule(mut self, sort_rule: SortRule) -> Self {
            self.filter.sort_rule = Some(sort_rule);
            self
        }

        #[must_use]
        pub const fn extensions(mut self, extensions: ExtensionFlag) -> Self {
            self.filter.extensions = Some(extensions);
            self
        }

        /// Shared search fields
        #[must_use]
        pub const fn filter(&self) -> &SearchFilter {
            &self.filter
        }
    };
}

/// Keyword search (`place/text`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchTextRequest {
    filter: SearchFilter,
    city: Option<String>,
    city_limit: Option<CityLimitFlag>,
    children: Option<ChildrenFlag>,
    building: Option<String>,
    floor: Option<String>,
    location: Option<GeoLocation>,
}

impl SearchTextRequest {
    /// Empty keyword search; set keywords or types before preparing
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    search_filter_setters!();

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

    #[must_use]
    pub const fn children(mut self, children: ChildrenFlag) -> Self {
        self.children = Some(children);
        self
    }

    /// Building POI id for indoor search
    #[must_use]
    pub fn building(mut self, building: impl Into<String>) -> Self {
        self.building = Some(building.into());
        self
    }

    #[must_use]
    pub fn floor(mut self, floor: impl Into<String>) -> Self {
        self.floor = Some(floor.into());
        self
    }

    #[must_use]
    pub const fn location(mut self, location: GeoLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Produce signed wire parameters
    ///
    /// # Errors
    ///
    /// Returns `InvalidParams` when neither keywords nor types are set.
    pub fn prepare(&self, credentials: &Credentials) -> Result<PreparedRequest, AmapError> {
        if self.filter.is_unfiltered() {
            return Err(AmapError::InvalidParams(
                "keyword search requires keywords or types".to_string(),
            ));
        }

        let mut params = WireParams::new();
        self.filter.write_to(&mut params);
        params.push_opt("location", self.location.as_ref().map(GeoLocation::to_wire));
        params.push_opt("city", self.city.as_deref());
        params.push_opt("citylimit", self.city_limit.map(WireFlag::wire_value));
        params.push_opt("children", self.children.map(WireFlag::wire_value));
        params.push_opt("building", self.building.as_deref());
        params.push_opt("floor", self.floor.as_deref());
        credentials.apply(RouteKey::SearchText, params)
    }
}

/// Search around a point (`place/around`)
#[derive(Debug, Clone, PartialEq)]
pub struct SearchAroundRequest {
    location: GeoLocation,
    filter: SearchFilter,
    city: Option<String>,
    radius: Option<u32>,
}

impl SearchAroundRequest {
    /// Search around `location`
    #[must_use]
    pub fn new(location: GeoLocation) -> Self {
        Self {
            location,
            filter: SearchFilter::default(),
            city: None,
            radius: None,
        }
    }

    search_filter_setters!();

    #[must_use]
    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Search radius in meters
    #[must_use]
    pub const fn radius(mut self, radius: u32) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Produce signed wire parameters
    ///
    /// # Errors
    ///
    /// Only fails when credentials are missing.
    pub fn prepare(&self, credentials: &Credentials) -> Result<PreparedRequest, AmapError> {
        let mut params = WireParams::new();
        params.push("location", self.location.to_wire());
        self.filter.write_to(&mut params);
        params.push_opt("city", self.city.as_deref());
        params.push_opt("radius", self.radius);
        credentials.apply(RouteKey::SearchAround, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_search_params() {
        let prepared = SearchTextRequest::new()
            .keywords(["北京大学"])
            .types(["高等院校"])
            .city("beijing")
            .city_limit(CityLimitFlag::On)
            .children(ChildrenFlag::On)
            .page(2)
            .offset(20)
            .sort_rule(SortRule::Weight)
            .extensions(ExtensionFlag::All)
            .prepare(&Credentials::new("k"))
            .unwrap();
        let p = &prepared.params;
        assert_eq!(p.get("keywords"), Some("北京大学"));
        assert_eq!(p.get("types"), Some("高等院校"));
        assert_eq!(p.get("citylimit"), Some("true"));
        assert_eq!(p.get("children"), Some("1"));
        assert_eq!(p.get("page"), Some("2"));
        assert_eq!(p.get("offset"), Some("20"));
        assert_eq!(p.get("sortrule"), Some("1"));
        assert_eq!(p.get("extensions"), Some("all"));
        assert_eq!(prepared.route, RouteKey::SearchText);
    }

    #[test]
    fn text_search_needs_keywords_or_types() {
        assert!(matches!(
            SearchTextRequest::new().prepare(&Credentials::new("k")),
            Err(AmapError::InvalidParams(_))
        ));
        assert!(
            SearchTextRequest::new()
                .types(["050000"])
                .prepare(&Credentials::new("k"))
                .is_ok()
        );
    }

    #[test]
    fn around_search_always_sends_location() {
        let loc = GeoLocation::from_lng_lat(116.473168, 39.993015).unwrap();
        let request = SearchAroundRequest::new(loc).keywords(["肯德基"]).radius(3000);
        assert_eq!(request.filter().keywords, vec!["肯德基".to_string()]);
        let prepared = request.prepare(&Credentials::new("k")).unwrap();
        assert_eq!(prepared.params.get("location"), Some("116.473168,39.993015"));
        assert_eq!(prepared.params.get("radius"), Some("3000"));
        assert_eq!(prepared.route, RouteKey::SearchAround);
    }
}
