//! Distance measurement (`/v3/distance`)

use serde_json::{Map, Value};
use tracing::warn;

use crate::{
    batch::run_with_partial_failure,
    entity::{Decode, DecodeMode, Entity, Schema},
    envelope::{AnyEnvelope, Envelope, ResponseKind, entity_list},
    error::{AmapError, BatchPhase, StatusError},
};

pub static DISTANCE_RESULT: Schema = Schema {
    name: "DistanceResult",
    properties: &["origin_id", "dest_id", "distance", "duration", "info", "code"],
    decoders: &[
        ("origin_id", Decode::Int),
        ("dest_id", Decode::Int),
        ("distance", Decode::Float),
        ("duration", Decode::Float),
    ],
    location_key: None,
};

/// `/v3/distance` response, data under `results`
///
/// Each result may carry its own `info`/`code` error even when the envelope
/// status is ok; those surface as a batch error from `raise_for_status`.
#[derive(Debug)]
pub struct DistanceResponse;

impl ResponseKind for DistanceResponse {
    const NAME: &'static str = "Distance";
    type Data = Vec<Entity>;

    fn extract(raw: &Map<String, Value>, mode: DecodeMode) -> Self::Data {
        entity_list(raw, "results", &DISTANCE_RESULT, mode)
    }

    fn check_items(envelope: &Envelope<Self>) -> Result<(), AmapError> {
        let data = envelope.data();
        run_with_partial_failure(data.iter(), BatchPhase::Status, |result| {
            let Some(info) = result.text("info")? else {
                return Ok(());
            };
            let code = result.get("code")?.as_i64().unwrap_or(-1);
            warn!(code, info = %info, "Distance result reported an error");
            Err(StatusError {
                code,
                message: Some(info),
                detail: None,
                envelope: Some(envelope.clone().into_any()),
            }
            .into())
        })
        .map(|_| ())
        .map_err(AmapError::from)
    }

    fn wrap(envelope: Envelope<Self>) -> AnyEnvelope {
        AnyEnvelope::Distance(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{entity::Field, envelope::DecodeOptions};

    #[test]
    fn numeric_fields_decode() {
        let text = r#"{"status": "1", "results": [
            {"origin_id": "1", "dest_id": "1", "distance": "261278", "duration": "14280"}]}"#;
        let env = Envelope::<DistanceResponse>::from_text(text, DecodeOptions::default()).unwrap();
        let result = &env.data()[0];
        assert_eq!(result.get("origin_id").unwrap(), Field::Int(1));
        assert_eq!(result.get("distance").unwrap(), Field::Float(261_278.0));
        assert!(env.raise_for_status().is_ok());
    }

    #[test]
    fn per_result_errors_become_batch_error() {
        let text = r#"{"status": "1", "results": [
            {"origin_id": "1", "dest_id": "1", "distance": "10", "duration": "1"},
            {"origin_id": "2", "dest_id": "1", "info": "OVER_DIRECTION_RANGE", "code": "20803"}]}"#;
        let env = Envelope::<DistanceResponse>::from_text(text, DecodeOptions::default()).unwrap();
        let Err(AmapError::Batch(err)) = env.raise_for_status() else {
            unreachable!("Expected Batch error");
        };
        assert_eq!(err.failed_positions(), vec![1]);
        assert_eq!(err.code, 30001);
        let Some(AmapError::Status(item)) = &err.outcomes[1] else {
            unreachable!("Expected Status item error");
        };
        assert_eq!(item.code, 20803);
        assert_eq!(item.message.as_deref(), Some("OVER_DIRECTION_RANGE"));
    }

    #[test]
    fn envelope_error_takes_precedence() {
        let text = r#"{"status": "0", "info": "INVALID_PARAMS", "infocode": "20000",
            "results": [{"info": "x", "code": "1"}]}"#;
        let env = Envelope::<DistanceResponse>::from_text(text, DecodeOptions::default()).unwrap();
        assert!(matches!(env.raise_for_status(), Err(AmapError::Status(_))));
    }
}
