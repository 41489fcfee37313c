//! Response entity schemas and envelope kinds for each endpoint family

mod common;
mod distance;
mod district;
mod geocode;
mod navigation;
mod regeo;
mod search;
mod suggest;

pub use common::{BIZ_EXT, BUILDING, BUSINESS_AREA, INDOOR_DATA, NEIGHBORHOOD, PHOTOS, STREET_NUMBER};
pub use distance::{DISTANCE_RESULT, DistanceResponse};
pub use district::{DISTRICT, DistrictResponse};
pub use geocode::{GEOCODE, GeoCodeResponse};
pub use navigation::{
    DRIVING_DATA, DRIVING_PATH, DRIVING_STEP, DrivingResponse, RIDING_DATA, RIDING_PATH,
    RIDING_STEP, RidingResponse, WALKING_DATA, WALKING_PATH, WALKING_STEP, WalkingResponse,
};
pub use regeo::{
    REGEO_ADDRESS_COMPONENT, REGEO_AOI, REGEO_POI, REGEO_ROAD, REGEO_ROAD_INTER, REGEOCODE,
    ReGeoCodeResponse,
};
pub use search::{
    SEARCH_CHILD, SEARCH_POI, SEARCH_SUGGESTION, SEARCH_SUGGESTION_CITY, SearchResponse,
    SearchResults,
};
pub use suggest::{SUGGEST_TIP, SuggestResponse};
