//! Geocoding: structured address to coordinates

use serde_json::{Map, Value};

use super::common::{BUILDING, NEIGHBORHOOD};
use crate::{
    entity::{Decode, DecodeMode, Entity, Schema},
    envelope::{AnyEnvelope, Envelope, ResponseKind, entity_list},
};

pub static GEOCODE: Schema = Schema {
    name: "GeoCode",
    properties: &[
        "formatted_address",
        "province",
        "city",
        "citycode",
        "district",
        "township",
        "neighborhood",
        "building",
        "adcode",
        "street",
        "number",
        "location",
        "level",
    ],
    decoders: &[
        ("neighborhood", Decode::Entity(&NEIGHBORHOOD)),
        ("building", Decode::Entity(&BUILDING)),
    ],
    location_key: Some("location"),
};

/// `/v3/geocode/geo` response, data under `geocodes`
#[derive(Debug)]
pub struct GeoCodeResponse;

impl ResponseKind for GeoCodeResponse {
    const NAME: &'static str = "GeoCode";
    type Data = Vec<Entity>;

    fn extract(raw: &Map<String, Value>, mode: DecodeMode) -> Self::Data {
        entity_list(raw, "geocodes", &GEOCODE, mode)
    }

    fn wrap(envelope: Envelope<Self>) -> AnyEnvelope {
        AnyEnvelope::GeoCode(envelope)
    }
}
