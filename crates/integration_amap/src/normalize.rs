//! Vendor payload normalization
//!
//! The web service uses `[]` and `{}` where it means "no value" and mixes
//! camelCase keys into otherwise snake_case payloads. Every payload passes
//! through [`normalize`] before entities read it, so entity code only ever
//! sees `null` for missing values and snake_case keys.

use serde_json::{Map, Value};

use crate::error::AmapError;

/// Parse raw JSON text and normalize the resulting tree
///
/// # Errors
///
/// Returns `MalformedPayload` when the text is not valid JSON.
pub fn normalize(raw_text: &str) -> Result<Value, AmapError> {
    let value: Value = serde_json::from_str(raw_text)?;
    Ok(normalize_owned(value))
}

/// Normalize a tree without touching the caller's copy
#[must_use]
pub fn normalize_tree(tree: &Value) -> Value {
    normalize_owned(tree.clone())
}

fn normalize_owned(value: Value) -> Value {
    match value {
        Value::Object(map) => normalize_object(map),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_owned).collect()),
        other => other,
    }
}

fn normalize_object(map: Map<String, Value>) -> Value {
    if map.is_empty() {
        return Value::Null;
    }

    let mut out = Map::with_capacity(map.len());
    let mut renamed = Vec::new();

    for (key, value) in map {
        let value = normalize_owned(value);
        let value = if is_list_empty(&value) { Value::Null } else { value };

        let canonical = to_snake_case(&key);
        if canonical == key {
            out.insert(key, value);
        } else {
            renamed.push((canonical, value));
        }
    }

    // renamed keys win over keys that were already canonical
    for (key, value) in renamed {
        out.insert(key, value);
    }

    Value::Object(out)
}

/// True for a list whose elements are all, recursively, empty lists
pub(crate) fn is_list_empty(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.iter().all(is_list_empty),
        _ => false,
    }
}

/// Convert a camelCase or PascalCase key to snake_case
///
/// `businessAreas` becomes `business_areas`, `getHTTPResponse` becomes
/// `get_http_response`. Keys that are already snake_case are unchanged.
#[must_use]
pub fn to_snake_case(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();

    // An uppercase letter starting a lowercase run gets a separator before it.
    let mut first = Vec::with_capacity(chars.len() + 4);
    let mut i = 0;
    while i < chars.len() {
        let starts_word = i + 2 < chars.len()
            && chars[i] != '\n'
            && chars[i + 1].is_ascii_uppercase()
            && chars[i + 2].is_ascii_lowercase();
        if starts_word {
            first.push(chars[i]);
            first.push('_');
            first.push(chars[i + 1]);
            let mut j = i + 2;
            while j < chars.len() && chars[j].is_ascii_lowercase() {
                first.push(chars[j]);
                j += 1;
            }
            i = j;
        } else {
            first.push(chars[i]);
            i += 1;
        }
    }

    // A lowercase letter or digit followed by an uppercase letter.
    let mut second = String::with_capacity(first.len() + 4);
    let mut i = 0;
    while i < first.len() {
        let boundary = i + 1 < first.len()
            && (first[i].is_ascii_lowercase() || first[i].is_ascii_digit())
            && first[i + 1].is_ascii_uppercase();
        if boundary {
            second.push(first[i]);
            second.push('_');
            second.push(first[i + 1]);
            i += 2;
        } else {
            second.push(first[i]);
            i += 1;
        }
    }

    second.to_lowercase().replace("__", "_")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_list_value_becomes_null() {
        let tree = normalize(r#"{"a": "b", "c": []}"#).unwrap();
        assert_eq!(tree, json!({"a": "b", "c": null}));
    }

    #[test]
    fn nested_empties_collapse() {
        let tree = normalize(r#"{"a": {"b": [], "c": {"d": [1], "e": [], "f": {}}}}"#).unwrap();
        assert_eq!(
            tree,
            json!({"a": {"b": null, "c": {"d": [1], "e": null, "f": null}}})
        );
    }

    #[test]
    fn nested_empty_lists_collapse() {
        let tree = normalize(r#"{"a": [[], [[]]]}"#).unwrap();
        assert_eq!(tree, json!({"a": null}));
    }

    #[test]
    fn empties_inside_lists_of_mappings_collapse() {
        let tree = normalize(r#"{"pois": [{"name": "x", "tel": []}, {"name": "y", "photos": {}}]}"#)
            .unwrap();
        assert_eq!(
            tree,
            json!({"pois": [{"name": "x", "tel": null}, {"name": "y", "photos": null}]})
        );
    }

    #[test]
    fn empty_mapping_inside_list_becomes_null_element() {
        let tree = normalize(r#"{"a": [{}]}"#).unwrap();
        assert_eq!(tree, json!({"a": [null]}));
    }

    #[test]
    fn empty_root_mapping_becomes_null() {
        assert_eq!(normalize("{}").unwrap(), Value::Null);
    }

    #[test]
    fn sequence_root_is_accepted() {
        let tree = normalize(r#"[{"status": 200, "body": {"infoCode": "10000"}}]"#).unwrap();
        assert_eq!(tree, json!([{"status": 200, "body": {"info_code": "10000"}}]));
    }

    #[test]
    fn camel_case_keys_are_renamed() {
        let tree = normalize(r#"{"a": "b", "CdE": []}"#).unwrap();
        assert_eq!(tree, json!({"a": "b", "cd_e": null}));
    }

    #[test]
    fn renamed_key_overwrites_existing() {
        let tree = normalize(r#"{"business_areas": 1, "businessAreas": 2}"#).unwrap();
        assert_eq!(tree, json!({"business_areas": 2}));
    }

    #[test]
    fn invalid_json_is_malformed() {
        assert!(matches!(
            normalize("{not json"),
            Err(AmapError::MalformedPayload(_))
        ));
    }

    #[test]
    fn normalize_tree_leaves_input_untouched() {
        let input = json!({"fooBar": []});
        let out = normalize_tree(&input);
        assert_eq!(input, json!({"fooBar": []}));
        assert_eq!(out, json!({"foo_bar": null}));
    }

    #[test]
    fn snake_case_conversions() {
        assert_eq!(to_snake_case("businessAreas"), "business_areas");
        assert_eq!(to_snake_case("CdE"), "cd_e");
        assert_eq!(to_snake_case("getHTTPResponse"), "get_http_response");
        assert_eq!(to_snake_case("streetNumber"), "street_number");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
        assert_eq!(to_snake_case("Camel_Case"), "camel_case");
        assert_eq!(to_snake_case("version2Api"), "version2_api");
    }

    #[test]
    fn is_list_empty_cases() {
        assert!(is_list_empty(&json!([])));
        assert!(is_list_empty(&json!([[], [[]]])));
        assert!(!is_list_empty(&json!([null])));
        assert!(!is_list_empty(&json!("")));
    }
}
