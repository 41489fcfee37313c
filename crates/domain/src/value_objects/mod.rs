//! Value Objects - Immutable, identity-less domain primitives

mod flags;
mod geo_location;
mod multi_value;
mod route_key;

pub use flags::{
    ApiVersion, BatchFlag, ChildrenFlag, CityLimitFlag, DataType, DistanceType, ExtensionFlag,
    HomeOrCorp, LooseInput, RoadLevel, SortRule, StatusFlag, WireFlag,
};
pub use geo_location::GeoLocation;
pub use multi_value::{join_multi, split_multi};
pub use route_key::RouteKey;
