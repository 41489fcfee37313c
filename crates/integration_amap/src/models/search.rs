//! POI search by keyword (`place/text`) and around a point (`place/around`)

use std::sync::Arc;

use serde_json::{Map, Value};

use super::common::{BIZ_EXT, INDOOR_DATA, PHOTOS};
use crate::{
    entity::{Decode, DecodeMode, Entity, Schema},
    envelope::{AnyEnvelope, Envelope, ResponseKind, entity_list},
};

pub static SEARCH_POI: Schema = Schema {
    name: "SearchPoi",
    properties: &[
        "id",
        "tag",
        "name",
        "type",
        "typecode",
        "biz_type",
        "address",
        "location",
        "distance",
        "tel",
        "postcode",
        "website",
        "email",
        "pcode",
        "pname",
        "citycode",
        "cityname",
        "adcode",
        "adname",
        "entr_location",
        "exit_location",
        "navi_poiid",
        "gridcode",
        "alias",
        "business_area",
        "parking_type",
        "indoor_map",
        "indoor_data",
        "biz_ext",
        "photos",
        "children",
    ],
    decoders: &[
        ("indoor_data", Decode::Entity(&INDOOR_DATA)),
        ("biz_ext", Decode::Entity(&BIZ_EXT)),
        ("photos", Decode::EntityList(&PHOTOS)),
        ("children", Decode::EntityList(&SEARCH_CHILD)),
    ],
    location_key: Some("location"),
};

/// Sub-POI returned when children are requested
pub static SEARCH_CHILD: Schema = Schema {
    name: "SearchChild",
    properties: &["id", "name", "sname", "location", "address", "distance", "subtype", "typecode"],
    decoders: &[],
    location_key: Some("location"),
};

/// Keyword and city suggestions for a search with few results
pub static SEARCH_SUGGESTION: Schema = Schema {
    name: "SearchSuggestion",
    properties: &["keywords", "cities"],
    decoders: &[("cities", Decode::EntityList(&SEARCH_SUGGESTION_CITY))],
    location_key: None,
};

pub static SEARCH_SUGGESTION_CITY: Schema = Schema {
    name: "SearchSuggestionCity",
    properties: &["name", "num", "citycode", "adcode"],
    decoders: &[],
    location_key: None,
};

/// Decoded search payload
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults {
    /// Matching POIs, data under `pois`
    pub pois: Vec<Entity>,
    /// Suggestion block under `suggestion`
    pub suggestion: Arc<Entity>,
}

/// `/v3/place/text` and `/v3/place/around` response
#[derive(Debug)]
pub struct SearchResponse;

impl ResponseKind for SearchResponse {
    const NAME: &'static str = "Search";
    type Data = SearchResults;

    fn extract(raw: &Map<String, Value>, mode: DecodeMode) -> Self::Data {
        SearchResults {
            pois: entity_list(raw, "pois", &SEARCH_POI, mode),
            suggestion: Arc::new(Entity::new(
                &SEARCH_SUGGESTION,
                raw.get("suggestion").unwrap_or(&Value::Null),
                mode,
            )),
        }
    }

    fn wrap(envelope: Envelope<Self>) -> AnyEnvelope {
        AnyEnvelope::Search(envelope)
    }
}

impl Envelope<SearchResponse> {
    /// Matching POIs
    #[must_use]
    pub fn pois(&self) -> Vec<Entity> {
        self.data().pois.clone()
    }

    /// Search suggestion block
    #[must_use]
    pub fn suggestion(&self) -> Arc<Entity> {
        Arc::clone(&self.data().suggestion)
    }
}
