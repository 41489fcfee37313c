//! Small entities shared by several endpoints

use crate::entity::Schema;

/// Building a geocoded address belongs to
pub static BUILDING: Schema = Schema {
    name: "Building",
    properties: &["name", "type"],
    decoders: &[],
    location_key: None,
};

/// Neighborhood a geocoded address belongs to
pub static NEIGHBORHOOD: Schema = Schema {
    name: "Neighborhood",
    properties: &["name", "type"],
    decoders: &[],
    location_key: None,
};

/// Street and door number nearest to a point
pub static STREET_NUMBER: Schema = Schema {
    name: "StreetNumber",
    properties: &["street", "number", "location", "direction", "distance"],
    decoders: &[],
    location_key: Some("location"),
};

/// Business area around a point
pub static BUSINESS_AREA: Schema = Schema {
    name: "BusinessArea",
    properties: &["id", "name", "location"],
    decoders: &[],
    location_key: Some("location"),
};

/// Indoor map details of a POI
pub static INDOOR_DATA: Schema = Schema {
    name: "IndoorData",
    properties: &["cpid", "floor", "truefloor"],
    decoders: &[],
    location_key: None,
};

/// Rating and average cost of a POI
pub static BIZ_EXT: Schema = Schema {
    name: "BizExt",
    properties: &["rating", "cost"],
    decoders: &[],
    location_key: None,
};

/// Photo attached to a POI
pub static PHOTOS: Schema = Schema {
    name: "Photos",
    properties: &["title", "url"],
    decoders: &[],
    location_key: None,
};
