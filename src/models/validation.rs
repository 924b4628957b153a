//! Field extraction helpers for Easel payloads
//!
//! Draw commands are schemaless, so the only structural rule is "must be a
//! JSON object". Filter requests carry a fixed envelope; these helpers pull
//! the individual fields out of a `serde_json` object and report per-field
//! validation errors.

use serde_json::{Map, Value};

use super::error::{ValidationError, ValidationErrorKind, ValidationResult};

/// Require a field to be present in a JSON object
pub fn require_field<'a>(
    obj: &'a Map<String, Value>,
    field_name: &str,
) -> ValidationResult<&'a Value> {
    obj.get(field_name)
        .filter(|v| !v.is_null())
        .ok_or_else(|| ValidationError::new(ValidationErrorKind::RequiredField, field_name))
}

/// Extract an image payload as raw bytes
///
/// Accepts a JSON array of integers in `0..=255`. The byte count is not
/// checked against any declared dimensions; that is the concern of whichever
/// transform implementation ends up running.
pub fn extract_byte_array(value: &Value, field_name: &str) -> ValidationResult<Vec<u8>> {
    let items = value.as_array().ok_or_else(|| {
        ValidationError::with_context(
            ValidationErrorKind::InvalidByteArray,
            field_name,
            "Expected a JSON array",
        )
    })?;

    let mut bytes = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let byte = item.as_u64().filter(|b| *b <= u8::MAX as u64).ok_or_else(|| {
            ValidationError::with_context(
                ValidationErrorKind::InvalidByteArray,
                field_name,
                format!("Element {} is not an integer in 0..=255", i),
            )
        })?;
        bytes.push(byte as u8);
    }

    Ok(bytes)
}

/// Extract an image dimension
///
/// Zero is a valid dimension; an empty image round-trips through identity.
pub fn extract_dimension(value: &Value, field_name: &str) -> ValidationResult<u32> {
    value
        .as_u64()
        .and_then(|d| u32::try_from(d).ok())
        .ok_or_else(|| ValidationError::new(ValidationErrorKind::InvalidDimension, field_name))
}

/// Extract a transform name
pub fn extract_name(value: &Value, field_name: &str) -> ValidationResult<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .ok_or_else(|| ValidationError::new(ValidationErrorKind::InvalidName, field_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_require_field() {
        let map = obj(json!({"width": 3, "empty": null}));

        assert!(require_field(&map, "width").is_ok());
        assert!(require_field(&map, "missing").is_err());
        // Explicit null counts as missing
        assert!(require_field(&map, "empty").is_err());
    }

    #[test]
    fn test_extract_byte_array_valid() {
        assert_eq!(
            extract_byte_array(&json!([1, 2, 3]), "image_data").unwrap(),
            vec![1, 2, 3]
        );
        assert_eq!(
            extract_byte_array(&json!([0, 255]), "image_data").unwrap(),
            vec![0, 255]
        );
        assert!(extract_byte_array(&json!([]), "image_data").unwrap().is_empty());
    }

    #[test]
    fn test_extract_byte_array_invalid() {
        let invalid = vec![
            json!("not-an-array"),
            json!([256]),
            json!([-1]),
            json!([1.5]),
            json!([1, "two"]),
            json!({"0": 1}),
        ];

        for value in invalid {
            assert!(extract_byte_array(&value, "image_data").is_err());
        }
    }

    #[test]
    fn test_extract_dimension() {
        assert_eq!(extract_dimension(&json!(0), "width").unwrap(), 0);
        assert_eq!(extract_dimension(&json!(1920), "width").unwrap(), 1920);

        assert!(extract_dimension(&json!(-1), "width").is_err());
        assert!(extract_dimension(&json!(1.5), "width").is_err());
        assert!(extract_dimension(&json!("3"), "width").is_err());
        assert!(extract_dimension(&json!(u64::MAX), "width").is_err());
    }

    #[test]
    fn test_extract_name() {
        assert_eq!(
            extract_name(&json!("blur"), "filter_name").unwrap(),
            "blur"
        );
        assert_eq!(
            extract_name(&json!("  invert "), "filter_name").unwrap(),
            "invert"
        );

        assert!(extract_name(&json!(""), "filter_name").is_err());
        assert!(extract_name(&json!("   "), "filter_name").is_err());
        assert!(extract_name(&json!(42), "filter_name").is_err());
    }
}
