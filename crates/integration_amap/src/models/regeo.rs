//! Reverse geocoding: coordinates to structured address

use serde_json::{Map, Value};

use super::common::{BUILDING, BUSINESS_AREA, NEIGHBORHOOD, STREET_NUMBER};
use crate::{
    entity::{Decode, DecodeMode, Entity, Schema},
    envelope::{AnyEnvelope, Envelope, ResponseKind, entity_list},
};

pub static REGEOCODE: Schema = Schema {
    name: "ReGeoCode",
    properties: &["formatted_address", "address_component", "pois", "roads", "roadinters", "aois"],
    decoders: &[
        ("address_component", Decode::Entity(&REGEO_ADDRESS_COMPONENT)),
        ("pois", Decode::EntityList(&REGEO_POI)),
        ("roads", Decode::EntityList(&REGEO_ROAD)),
        ("roadinters", Decode::EntityList(&REGEO_ROAD_INTER)),
        ("aois", Decode::EntityList(&REGEO_AOI)),
    ],
    location_key: None,
};

pub static REGEO_ADDRESS_COMPONENT: Schema = Schema {
    name: "ReGeoAddressComponent",
    properties: &[
        "province",
        "city",
        "citycode",
        "district",
        "adcode",
        "township",
        "towncode",
        "neighborhood",
        "building",
        "street_number",
        "sea_area",
        "business_areas",
    ],
    decoders: &[
        ("neighborhood", Decode::Entity(&NEIGHBORHOOD)),
        ("building", Decode::Entity(&BUILDING)),
        ("street_number", Decode::Entity(&STREET_NUMBER)),
        ("business_areas", Decode::EntityList(&BUSINESS_AREA)),
    ],
    location_key: None,
};

pub static REGEO_POI: Schema = Schema {
    name: "ReGeoPoi",
    properties: &[
        "id",
        "name",
        "type",
        "tel",
        "distance",
        "direction",
        "address",
        "location",
        "businessarea",
    ],
    decoders: &[],
    location_key: Some("location"),
};

pub static REGEO_ROAD: Schema = Schema {
    name: "ReGeoRoad",
    properties: &["id", "name", "distance", "direction", "location"],
    decoders: &[],
    location_key: Some("location"),
};

/// Road intersection near the queried point
pub static REGEO_ROAD_INTER: Schema = Schema {
    name: "ReGeoRoadInter",
    properties: &[
        "distance",
        "direction",
        "location",
        "first_id",
        "first_name",
        "second_id",
        "second_name",
    ],
    decoders: &[],
    location_key: Some("location"),
};

/// Area of interest containing or near the queried point
pub static REGEO_AOI: Schema = Schema {
    name: "ReGeoAOI",
    properties: &["id", "name", "adcode", "location", "area"],
    decoders: &[],
    location_key: Some("location"),
};

/// `/v3/geocode/regeo` response
///
/// Single queries carry one mapping under `regeocode`, batch queries a list
/// under `regeocodes`. Both decode to a list.
#[derive(Debug)]
pub struct ReGeoCodeResponse;

impl ResponseKind for ReGeoCodeResponse {
    const NAME: &'static str = "ReGeoCode";
    type Data = Vec<Entity>;

    fn extract(raw: &Map<String, Value>, mode: DecodeMode) -> Self::Data {
        if let Some(single) = raw.get("regeocode") {
            if single.is_object() {
                vec![Entity::new(&REGEOCODE, single, mode)]
            } else {
                Vec::new()
            }
        } else {
            entity_list(raw, "regeocodes", &REGEOCODE, mode)
        }
    }

    fn wrap(envelope: Envelope<Self>) -> AnyEnvelope {
        AnyEnvelope::ReGeoCode(envelope)
    }
}
