//! Input tips (`assistant/inputtips`)

use serde_json::{Map, Value};

use crate::{
    entity::{DecodeMode, Entity, Schema},
    envelope::{AnyEnvelope, Envelope, ResponseKind, entity_list},
};

pub static SUGGEST_TIP: Schema = Schema {
    name: "SuggestTip",
    properties: &["id", "name", "district", "adcode", "location", "address", "typecode"],
    decoders: &[],
    location_key: Some("location"),
};

/// `/v3/assistant/inputtips` response, data under `tips`
#[derive(Debug)]
pub struct SuggestResponse;

impl ResponseKind for SuggestResponse {
    const NAME: &'static str = "Suggest";
    type Data = Vec<Entity>;

    fn extract(raw: &Map<String, Value>, mode: DecodeMode) -> Self::Data {
        entity_list(raw, "tips", &SUGGEST_TIP, mode)
    }

    fn wrap(envelope: Envelope<Self>) -> AnyEnvelope {
        AnyEnvelope::Suggest(envelope)
    }
}
