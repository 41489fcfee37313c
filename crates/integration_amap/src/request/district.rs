//! Administrative district request

use domain::{ExtensionFlag, RouteKey, WireFlag};

use super::{Credentials, PreparedRequest, WireParams};
use crate::error::AmapError;

/// Administrative district lookup
///
/// Without a keyword the service returns the country level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistrictRequest {
    keyword: Option<String>,
    sub_district: Option<u8>,
    page: Option<u32>,
    offset: Option<u32>,
    extensions: Option<ExtensionFlag>,
    filter: Option<String>,
}

impl DistrictRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// District name, citycode or adcode
    #[must_use]
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// Levels of sub districts to include
    #[must_use]
    pub const fn sub_district(mut self, levels: u8) -> Self {
        self.sub_district = Some(levels);
        self
    }

    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub const fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// `all` also returns the district polyline
    #[must_use]
    pub const fn extensions(mut self, extensions: ExtensionFlag) -> Self {
        self.extensions = Some(extensions);
        self
    }

    /// Restrict to an adcode
    #[must_use]
    pub fn filter(mut self, adcode: impl Into<String>) -> Self {
        self.filter = Some(adcode.into());
        self
    }

    /// Produce signed wire parameters
    ///
    /// # Errors
    ///
    /// Only fails when credentials are missing.
    pub fn prepare(&self, credentials: &Credentials) -> Result<PreparedRequest, AmapError> {
        let mut params = WireParams::new();
        params.push_opt("keywords", self.keyword.as_deref());
        params.push_opt("subdistrict", self.sub_district);
        params.push_opt("page", self.page);
        params.push_opt("offset", self.offset);
        params.push_opt("extensions", self.extensions.map(WireFlag::wire_value));
        params.push_opt("filter", self.filter.as_deref());
        credentials.apply(RouteKey::District, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_params() {
        let prepared = DistrictRequest::new()
            .keyword("keywords")
            .sub_district(1)
            .page(2)
            .offset(10)
            .extensions(ExtensionFlag::All)
            .filter("110000")
            .prepare(&Credentials::new("k"))
            .unwrap();
        let p = &prepared.params;
        assert_eq!(p.get("keywords"), Some("keywords"));
        assert_eq!(p.get("subdistrict"), Some("1"));
        assert_eq!(p.get("page"), Some("2"));
        assert_eq!(p.get("offset"), Some("10"));
        assert_eq!(p.get("extensions"), Some("all"));
        assert_eq!(p.get("filter"), Some("110000"));
    }

    #[test]
    fn empty_request_only_has_credentials() {
        let prepared = DistrictRequest::new().prepare(&Credentials::new("k")).unwrap();
        assert_eq!(prepared.params.len(), 2);
    }
}
