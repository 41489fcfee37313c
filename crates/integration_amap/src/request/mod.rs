//! Typed requests for every endpoint and their wire preparation
//!
//! Each request kind validates its own fields and writes ordered wire
//! parameters; [`Credentials`] then appends the account key, the output
//! format and, when a private key is configured, the signature.

mod credentials;
mod distance;
mod district;
mod geocode;
mod navigation;
mod regeo;
mod search;
mod suggest;

use domain::{RouteKey, join_multi, split_multi};
use url::form_urlencoded;

pub use credentials::Credentials;
pub use distance::DistanceRequest;
pub use district::DistrictRequest;
pub use geocode::GeoCodeRequest;
pub use navigation::{DrivingRequest, RidingRequest, RoutePoints, WalkingRequest};
pub use regeo::ReGeoCodeRequest;
pub use search::{SearchAroundRequest, SearchFilter, SearchTextRequest};
pub use suggest::SuggestRequest;

use crate::error::AmapError;

/// Ordered wire parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WireParams(Vec<(String, String)>);

impl WireParams {
    /// Create an empty parameter list
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter
    pub fn push(&mut self, name: &str, value: impl Into<String>) {
        self.0.push((name.to_string(), value.into()));
    }

    /// Append a parameter when a value is present
    pub fn push_opt<V: ToString>(&mut self, name: &str, value: Option<V>) {
        if let Some(value) = value {
            self.push(name, value.to_string());
        }
    }

    /// Append a `|`-joined parameter when the list is not empty
    pub fn push_multi(&mut self, name: &str, values: &[String]) {
        if !values.is_empty() {
            self.push(name, join_multi(values));
        }
    }

    /// First value of a parameter
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// All parameters in order
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    /// Number of parameters
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there are no parameters
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// URL-encoded query string
    #[must_use]
    pub fn to_query(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish()
    }
}

/// Request ready to be sent: its route plus signed wire parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    /// Route the request targets
    pub route: RouteKey,
    /// Wire parameters including credentials
    pub params: WireParams,
}

/// Flatten values that may themselves contain `|`-separated parts
pub(crate) fn flatten_multi<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .flat_map(|v| split_multi(v.as_ref()))
        .collect()
}

/// Any request kind, for heterogeneous batches
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    GeoCode(GeoCodeRequest),
    ReGeoCode(ReGeoCodeRequest),
    SearchText(SearchTextRequest),
    SearchAround(SearchAroundRequest),
    Suggest(SuggestRequest),
    District(DistrictRequest),
    Distance(DistanceRequest),
    Riding(RidingRequest),
    Walking(WalkingRequest),
    Driving(DrivingRequest),
}

impl Request {
    /// Route the request targets
    #[must_use]
    pub const fn route(&self) -> RouteKey {
        match self {
            Self::GeoCode(_) => RouteKey::GeoCode,
            Self::ReGeoCode(_) => RouteKey::ReGeoCode,
            Self::SearchText(_) => RouteKey::SearchText,
            Self::SearchAround(_) => RouteKey::SearchAround,
            Self::Suggest(_) => RouteKey::Suggest,
            Self::District(_) => RouteKey::District,
            Self::Distance(_) => RouteKey::Distance,
            Self::Riding(_) => RouteKey::NaviRiding,
            Self::Walking(_) => RouteKey::NaviWalking,
            Self::Driving(_) => RouteKey::NaviDriving,
        }
    }

    /// Validate and produce signed wire parameters
    ///
    /// # Errors
    ///
    /// Returns `InvalidParams` for missing or invalid fields and
    /// `ConfigurationError` when no key is configured.
    pub fn prepare(&self, credentials: &Credentials) -> Result<PreparedRequest, AmapError> {
        match self {
            Self::GeoCode(r) => r.prepare(credentials),
            Self::ReGeoCode(r) => r.prepare(credentials),
            Self::SearchText(r) => r.prepare(credentials),
            Self::SearchAround(r) => r.prepare(credentials),
            Self::Suggest(r) => r.prepare(credentials),
            Self::District(r) => r.prepare(credentials),
            Self::Distance(r) => r.prepare(credentials),
            Self::Riding(r) => r.prepare(credentials),
            Self::Walking(r) => r.prepare(credentials),
            Self::Driving(r) => r.prepare(credentials),
        }
    }
}

macro_rules! request_from {
    ($($kind:ident => $variant:ident),+ $(,)?) => {
        $(
            impl From<$kind> for Request {
                fn from(request: $kind) -> Self {
                    Self::$variant(request)
                }
            }
        )+
    };
}

request_from! {
    GeoCodeRequest => GeoCode,
    ReGeoCodeRequest => ReGeoCode,
    SearchTextRequest => SearchText,
    SearchAroundRequest => SearchAround,
    SuggestRequest => Suggest,
    DistrictRequest => District,
    DistanceRequest => Distance,
    RidingRequest => Riding,
    WalkingRequest => Walking,
    DrivingRequest => Driving,
}

#[cfg(test)]
mod tests {
    use domain::GeoLocation;

    use super::*;

    #[test]
    fn wire_params_keep_order_and_skip_none() {
        let mut params = WireParams::new();
        params.push("b", "2");
        params.push_opt::<u32>("skip", None);
        params.push_opt("a", Some(1));
        params.push_multi("m", &[]);
        assert_eq!(
            params.pairs(),
            &[("b".to_string(), "2".to_string()), ("a".to_string(), "1".to_string())]
        );
        assert_eq!(params.get("a"), Some("1"));
    }

    #[test]
    fn query_is_url_encoded() {
        let mut params = WireParams::new();
        params.push("address", "北京|上海");
        params.push("city", "a b");
        assert_eq!(
            params.to_query(),
            "address=%E5%8C%97%E4%BA%AC%7C%E4%B8%8A%E6%B5%B7&city=a+b"
        );
    }

    #[test]
    fn flatten_splits_embedded_separators() {
        assert_eq!(flatten_multi(["a|c", "b"]), vec!["a", "c", "b"]);
    }

    #[test]
    fn request_routes() {
        let loc = GeoLocation::new_unchecked(39.9, 116.4);
        let request: Request = RidingRequest::new(loc, loc).into();
        assert_eq!(request.route(), RouteKey::NaviRiding);
        let request: Request = GeoCodeRequest::new(["x"]).into();
        assert_eq!(request.route(), RouteKey::GeoCode);
    }

    #[test]
    fn prepare_dispatches_to_kind() {
        let creds = Credentials::new("k");
        let request: Request = DistrictRequest::new().keyword("北京").into();
        let prepared = request.prepare(&creds).unwrap();
        assert_eq!(prepared.route, RouteKey::District);
        assert_eq!(prepared.params.get("keywords"), Some("北京"));
    }
}
