//! Geocoding request

use domain::{BatchFlag, RouteKey, WireFlag};

use super::{Credentials, PreparedRequest, WireParams, flatten_multi};
use crate::error::AmapError;

/// Structured address to coordinates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoCodeRequest {
    addresses: Vec<String>,
    city: Option<String>,
    batch: Option<BatchFlag>,
}

impl GeoCodeRequest {
    /// Geocode one or more addresses
    ///
    /// Addresses containing `|` are split into separate addresses.
    pub fn new<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            addresses: flatten_multi(addresses),
            ..Self::default()
        }
    }

    /// Restrict to a city (name, citycode or adcode)
    #[must_use]
    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Return one result per address
    #[must_use]
    pub const fn batch(mut self, batch: BatchFlag) -> Self {
        self.batch = Some(batch);
        self
    }

    /// Addresses to geocode
    #[must_use]
    pub fn addresses(&self) -> &[String] {
        &self.addresses
    }

    /// Produce signed wire parameters
    ///
    /// # Errors
    ///
    /// Returns `InvalidParams` when no address is given.
    pub fn prepare(&self, credentials: &Credentials) -> Result<PreparedRequest, AmapError> {
        if self.addresses.is_empty() {
            return Err(AmapError::InvalidParams("geocode requires an address".to_string()));
        }

        let mut params = WireParams::new();
        params.push_multi("address", &self.addresses);
        params.push_opt("city", self.city.as_deref());
        params.push_opt("batch", self.batch.map(WireFlag::wire_value));
        credentials.apply(RouteKey::GeoCode, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_are_joined() {
        let prepared = GeoCodeRequest::new(["北京市朝阳区", "上海市|广州市"])
            .city("010")
            .batch(BatchFlag::On)
            .prepare(&Credentials::new("k"))
            .unwrap();
        assert_eq!(
            prepared.params.get("address"),
            Some("北京市朝阳区|上海市|广州市")
        );
        assert_eq!(prepared.params.get("city"), Some("010"));
        assert_eq!(prepared.params.get("batch"), Some("true"));
        assert_eq!(prepared.route, RouteKey::GeoCode);
    }

    #[test]
    fn optional_params_are_omitted() {
        let prepared = GeoCodeRequest::new(["a"]).prepare(&Credentials::new("k")).unwrap();
        assert_eq!(prepared.params.get("city"), None);
        assert_eq!(prepared.params.get("batch"), None);
    }

    #[test]
    fn address_is_required() {
        let err = GeoCodeRequest::new(Vec::<String>::new())
            .prepare(&Credentials::new("k"))
            .unwrap_err();
        assert!(matches!(err, AmapError::InvalidParams(_)));
    }
}
