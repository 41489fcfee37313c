//! Property-based tests for domain value objects
//!
//! These tests use proptest to verify invariants across many random inputs.

use domain::value_objects::{
    DataType, ExtensionFlag, GeoLocation, LooseInput, SortRule, WireFlag, join_multi, split_multi,
};
use proptest::prelude::*;

// ============================================================================
// GeoLocation Property Tests
// ============================================================================

mod geo_location_tests {
    use super::*;

    proptest! {
        #[test]
        fn valid_coordinates_create_location(
            lat in -90.0f64..=90.0f64,
            lon in -180.0f64..=180.0f64
        ) {
            let result = GeoLocation::new(lat, lon);
            prop_assert!(result.is_ok());
        }

        #[test]
        fn invalid_latitude_rejected(
            lat in prop_oneof![
                (-1000.0f64..-90.1f64),
                (90.1f64..1000.0f64)
            ],
            lon in -180.0f64..=180.0f64
        ) {
            prop_assert!(GeoLocation::new(lat, lon).is_err());
        }

        #[test]
        fn wire_roundtrip_within_precision(
            lat in -90.0f64..=90.0f64,
            lon in -180.0f64..=180.0f64
        ) {
            let loc = GeoLocation::new(lat, lon).unwrap();
            let parsed = GeoLocation::parse(&loc.to_wire()).unwrap();
            prop_assert!((parsed.latitude() - lat).abs() < 1e-6);
            prop_assert!((parsed.longitude() - lon).abs() < 1e-6);
        }

        #[test]
        fn wire_form_is_stable_after_one_roundtrip(
            lat in -90.0f64..=90.0f64,
            lon in -180.0f64..=180.0f64
        ) {
            let wire = GeoLocation::new(lat, lon).unwrap().to_wire();
            let again = GeoLocation::parse(&wire).unwrap().to_wire();
            prop_assert_eq!(wire, again);
        }
    }
}

// ============================================================================
// Multi-value Property Tests
// ============================================================================

mod multi_value_tests {
    use super::*;

    proptest! {
        #[test]
        fn split_inverts_join(values in prop::collection::vec("[a-z0-9]{1,8}", 0..6)) {
            let joined = join_multi(&values);
            prop_assert_eq!(split_multi(&joined), values);
        }
    }
}

// ============================================================================
// Flag Property Tests
// ============================================================================

mod flag_tests {
    use super::*;

    proptest! {
        #[test]
        fn wire_value_resolves_back(idx in 0usize..4) {
            let all = [DataType::All, DataType::Poi, DataType::Bus, DataType::BusLine];
            let flag = all[idx];
            prop_assert_eq!(DataType::from_loose(LooseInput::Text(flag.wire_value())), Some(flag));
        }

        #[test]
        fn extension_bool_is_total(flag in any::<bool>()) {
            prop_assert!(ExtensionFlag::from_loose(LooseInput::Bool(flag)).is_some());
        }

        #[test]
        fn unknown_sort_codes_rejected(code in 2i64..1000) {
            prop_assert!(SortRule::choose(code).is_err());
        }
    }
}
