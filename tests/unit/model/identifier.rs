use std::str::FromStr;

use serde_json::json;

use storefront::error::AppErrorCode;
use storefront::model::CartIdentifier;

#[test]
fn parse_decimal_form() {
    let result = CartIdentifier::from_str("128");
    assert_eq!(result.unwrap(), CartIdentifier::Numeric(128));
}

#[test]
fn parse_opaque_form() {
    let raw = "550e8400-e29b-41d4-a716-446655440000";
    let result = CartIdentifier::from_str(raw);
    assert_eq!(result.unwrap(), CartIdentifier::Opaque(raw.to_string()));
    // plain alphanumeric tokens are acceptable too
    let result = CartIdentifier::from_str("a1b2c3");
    assert_eq!(result.unwrap(), CartIdentifier::Opaque("a1b2c3".to_string()));
}

#[test]
fn parse_rejects_junk() {
    for raw in ["", "12 34", "abc$", "../etc", "uuid_with_underscore"] {
        let result = CartIdentifier::from_str(raw);
        let error = result.unwrap_err();
        assert_eq!(error.code, AppErrorCode::InvalidInput);
    }
}

#[test]
fn display_round_trip() {
    let a = CartIdentifier::Numeric(77);
    assert_eq!(a.to_string().as_str(), "77");
    let b = CartIdentifier::Opaque("9f8e-77".to_string());
    assert_eq!(b.to_string().as_str(), "9f8e-77");
}

// the tool surface sends either a JSON number or a JSON string for the
// same parameter, both deserialize into the same tagged union
#[test]
fn deserialize_both_json_forms() {
    let result = serde_json::from_value::<CartIdentifier>(json!(42));
    assert_eq!(result.unwrap(), CartIdentifier::Numeric(42));
    let result = serde_json::from_value::<CartIdentifier>(json!("42"));
    assert_eq!(result.unwrap(), CartIdentifier::Numeric(42));
    let result = serde_json::from_value::<CartIdentifier>(json!("c4r7-1d"));
    assert_eq!(result.unwrap(), CartIdentifier::Opaque("c4r7-1d".to_string()));
    let result = serde_json::from_value::<CartIdentifier>(json!("!!"));
    assert!(result.is_err());
}

#[test]
fn serialize_keeps_original_form() {
    let out = serde_json::to_value(CartIdentifier::Numeric(7)).unwrap();
    assert_eq!(out, json!(7));
    let out = serde_json::to_value(CartIdentifier::Opaque("ab-12".to_string())).unwrap();
    assert_eq!(out, json!("ab-12"));
}
