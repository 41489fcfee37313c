//! Administrative districts (`config/district`)

use serde_json::{Map, Value};

use crate::{
    entity::{Decode, DecodeMode, Entity, Schema},
    envelope::{AnyEnvelope, Envelope, ResponseKind, entity_list},
};

/// District with its sub-districts nested recursively
pub static DISTRICT: Schema = Schema {
    name: "District",
    properties: &["citycode", "adcode", "name", "center", "level", "polyline", "districts"],
    decoders: &[("districts", Decode::EntityList(&DISTRICT))],
    location_key: Some("center"),
};

/// `/v3/config/district` response, data under `districts`
#[derive(Debug)]
pub struct DistrictResponse;

impl ResponseKind for DistrictResponse {
    const NAME: &'static str = "District";
    type Data = Vec<Entity>;

    fn extract(raw: &Map<String, Value>, mode: DecodeMode) -> Self::Data {
        entity_list(raw, "districts", &DISTRICT, mode)
    }

    fn wrap(envelope: Envelope<Self>) -> AnyEnvelope {
        AnyEnvelope::District(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::DecodeOptions;

    const BODY: &str = r#"{"status": "1", "count": "1", "districts": [{
        "citycode": [], "adcode": "100000", "name": "中华人民共和国",
        "center": "116.3683244,39.915085", "level": "country",
        "districts": [{"citycode": "010", "adcode": "110000", "name": "北京市",
                       "center": "116.405285,39.904989", "level": "province",
                       "districts": []}]
    }]}"#;

    #[test]
    fn sub_districts_nest_recursively() {
        for mode in [DecodeMode::Static, DecodeMode::Dynamic] {
            let env =
                Envelope::<DistrictResponse>::from_text(BODY, DecodeOptions::default().with_mode(mode))
                    .unwrap();
            let data = env.data();
            let children = data[0].entities("districts").unwrap();
            assert_eq!(children.len(), 1);
            assert_eq!(children[0].text("name").unwrap().as_deref(), Some("北京市"));
            assert!(children[0].entities("districts").unwrap().is_empty());
        }
    }

    #[test]
    fn center_is_the_location() {
        let env = Envelope::<DistrictResponse>::from_text(BODY, DecodeOptions::default()).unwrap();
        let loc = env.data()[0].location().unwrap().unwrap();
        assert!((loc.longitude() - 116.368324).abs() < 1e-9);
    }
}
