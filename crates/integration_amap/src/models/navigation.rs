//! Route planning: riding (v4), walking and driving (v3)
//!
//! All three decode to a single route entity holding `origin`,
//! `destination` and a list of `paths`, each path a list of `steps`.

use serde_json::{Map, Value};

use crate::{
    entity::{Decode, DecodeMode, Entity, Schema},
    envelope::{AnyEnvelope, Envelope, ResponseKind},
};

const NAVI_DATA_PROPERTIES: &[&str] = &["origin", "destination", "paths"];

pub static RIDING_DATA: Schema = Schema {
    name: "RidingData",
    properties: NAVI_DATA_PROPERTIES,
    decoders: &[("paths", Decode::EntityList(&RIDING_PATH))],
    location_key: None,
};

pub static RIDING_PATH: Schema = Schema {
    name: "RidingPath",
    properties: &["distance", "duration", "steps"],
    decoders: &[("steps", Decode::EntityList(&RIDING_STEP))],
    location_key: None,
};

pub static RIDING_STEP: Schema = Schema {
    name: "RidingStep",
    properties: &[
        "instruction",
        "road",
        "distance",
        "orientation",
        "duration",
        "polyline",
        "action",
        "assistant_action",
    ],
    decoders: &[("polyline", Decode::Points)],
    location_key: None,
};

pub static WALKING_DATA: Schema = Schema {
    name: "WalkingData",
    properties: NAVI_DATA_PROPERTIES,
    decoders: &[("paths", Decode::EntityList(&WALKING_PATH))],
    location_key: None,
};

pub static WALKING_PATH: Schema = Schema {
    name: "WalkingPath",
    properties: &["distance", "duration", "steps"],
    decoders: &[("steps", Decode::EntityList(&WALKING_STEP))],
    location_key: None,
};

pub static WALKING_STEP: Schema = Schema {
    name: "WalkingStep",
    properties: &[
        "instruction",
        "orientation",
        "road",
        "distance",
        "duration",
        "polyline",
        "action",
        "assistant_action",
        "walk_type",
    ],
    decoders: &[("polyline", Decode::Points)],
    location_key: None,
};

pub static DRIVING_DATA: Schema = Schema {
    name: "DrivingData",
    properties: NAVI_DATA_PROPERTIES,
    decoders: &[("paths", Decode::EntityList(&DRIVING_PATH))],
    location_key: None,
};

/// Driving path with toll and traffic details
pub static DRIVING_PATH: Schema = Schema {
    name: "DrivingPath",
    properties: &[
        "distance",
        "duration",
        "strategy",
        "tolls",
        "toll_distance",
        "restriction",
        "traffic_lights",
        "steps",
    ],
    decoders: &[("steps", Decode::EntityList(&DRIVING_STEP))],
    location_key: None,
};

pub static DRIVING_STEP: Schema = Schema {
    name: "DrivingStep",
    properties: &[
        "instruction",
        "orientation",
        "road",
        "distance",
        "tolls",
        "toll_distance",
        "toll_road",
        "duration",
        "polyline",
        "action",
        "assistant_action",
    ],
    decoders: &[("polyline", Decode::Points)],
    location_key: None,
};

fn singleton(raw: &Map<String, Value>, key: &str, schema: &'static Schema, mode: DecodeMode) -> Entity {
    Entity::new(schema, raw.get(key).unwrap_or(&Value::Null), mode)
}

/// `/v4/direction/bicycling` response, data under `data`
#[derive(Debug)]
pub struct RidingResponse;

impl ResponseKind for RidingResponse {
    const NAME: &'static str = "Riding";
    type Data = Entity;

    fn extract(raw: &Map<String, Value>, mode: DecodeMode) -> Self::Data {
        singleton(raw, "data", &RIDING_DATA, mode)
    }

    fn wrap(envelope: Envelope<Self>) -> AnyEnvelope {
        AnyEnvelope::Riding(envelope)
    }
}

/// `/v3/direction/walking` response, data under `route`
#[derive(Debug)]
pub struct WalkingResponse;

impl ResponseKind for WalkingResponse {
    const NAME: &'static str = "Walking";
    type Data = Entity;

    fn extract(raw: &Map<String, Value>, mode: DecodeMode) -> Self::Data {
        singleton(raw, "route", &WALKING_DATA, mode)
    }

    fn wrap(envelope: Envelope<Self>) -> AnyEnvelope {
        AnyEnvelope::Walking(envelope)
    }
}

/// `/v3/direction/driving` response, data under `route`
#[derive(Debug)]
pub struct DrivingResponse;

impl ResponseKind for DrivingResponse {
    const NAME: &'static str = "Driving";
    type Data = Entity;

    fn extract(raw: &Map<String, Value>, mode: DecodeMode) -> Self::Data {
        singleton(raw, "route", &DRIVING_DATA, mode)
    }

    fn wrap(envelope: Envelope<Self>) -> AnyEnvelope {
        AnyEnvelope::Driving(envelope)
    }
}

#[cfg(test)]
mod tests {
    use domain::ApiVersion;

    use super::*;
    use crate::{entity::Field, envelope::DecodeOptions};

    #[test]
    fn riding_decodes_paths_and_polyline() {
        let text = r#"{"errcode": 0, "errmsg": "OK", "errdetail": null, "data": {
            "origin": "116.434307,39.90909", "destination": "116.434446,39.90816",
            "paths": [{"distance": 155, "duration": 37, "steps": [
                {"instruction": "骑行155米到达目的地", "road": "", "distance": 155,
                 "orientation": "南", "duration": 37,
                 "polyline": "116.434307,39.909075;116.434311,39.908164",
                 "action": "", "assistant_action": "到达目的地"}]}]}}"#;
        let opts = DecodeOptions::new(ApiVersion::V3).with_auto_version(true);
        let env = Envelope::<RidingResponse>::from_text(text, opts).unwrap();
        assert_eq!(env.version(), ApiVersion::V4);
        assert!(env.raise_for_status().is_ok());

        let data = env.data();
        let paths = data.entities("paths").unwrap();
        let steps = paths[0].entities("steps").unwrap();
        let polyline = steps[0].get("polyline").unwrap();
        assert_eq!(
            polyline.as_points().unwrap(),
            &[(116.434307, 39.909075), (116.434311, 39.908164)]
        );
        assert_eq!(paths[0].get("distance").unwrap().as_i64(), Some(155));
    }

    #[test]
    fn walking_step_has_walk_type() {
        let text = r#"{"status": "1", "route": {"origin": "1,2", "destination": "3,4",
            "paths": [{"distance": "10", "steps": [{"walk_type": "0", "polyline": []}]}]}}"#;
        let env = Envelope::<WalkingResponse>::from_text(text, DecodeOptions::default()).unwrap();
        let step = &env.data().entities("paths").unwrap()[0].entities("steps").unwrap()[0];
        assert_eq!(step.text("walk_type").unwrap().as_deref(), Some("0"));
        assert_eq!(step.get("polyline").unwrap(), Field::Absent);
    }

    #[test]
    fn driving_path_has_toll_fields() {
        let text = r#"{"status": "1", "route": {"paths": [{"strategy": "速度最快",
            "tolls": "5", "toll_distance": "1200", "traffic_lights": "3", "steps": []}]}}"#;
        let env = Envelope::<DrivingResponse>::from_text(text, DecodeOptions::default()).unwrap();
        let path = &env.data().entities("paths").unwrap()[0];
        assert_eq!(path.text("tolls").unwrap().as_deref(), Some("5"));
        assert!(path.entities("steps").unwrap().is_empty());
        assert!(path.get("walk_type").is_err());
    }

    #[test]
    fn missing_route_is_empty_entity() {
        let env =
            Envelope::<DrivingResponse>::from_text(r#"{"status": "1"}"#, DecodeOptions::default()).unwrap();
        assert!(env.data().entities("paths").unwrap().is_empty());
    }
}
