use axum::body::Bytes;
use registration_schema::{InsertRegistration, payloads::RawRegistration};
use serde_json::Value;
use tracing::warn;

use crate::error::AppError;

/// An empty body counts as an empty object, so every required field is reported.
pub fn get_raw_from_body(body: &Bytes) -> Result<RawRegistration, AppError> {
    if body.trim_ascii().is_empty() {
        return Ok(RawRegistration::default());
    }

    let value: Value = serde_json::from_slice(body).map_err(|e| {
        warn!("Malformed registration payload: {e}");

        AppError::MalformedPayload
    })?;

    RawRegistration::try_from(value).map_err(|e| AppError::Validation(vec![e]))
}

pub fn get_registration_from_body(body: &Bytes) -> Result<InsertRegistration, AppError> {
    get_raw_from_body(body)?
        .validate()
        .map_err(AppError::Validation)
}

#[cfg(test)]
mod tests {
    use registration_schema::payloads::FieldError;
    use serde_json::Number;

    use super::*;

    fn errors(body: &'static [u8]) -> Vec<FieldError> {
        match get_registration_from_body(&Bytes::from_static(body)) {
            Err(AppError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_invalid_json() {
        let result = get_raw_from_body(&Bytes::from_static(b"{not json"));

        assert!(matches!(result, Err(AppError::MalformedPayload)));
    }

    #[test]
    fn mistyped_share_count_is_a_field_error() {
        let errors = errors(br#"{"name":"A","shareCount":"five"}"#);

        assert_eq!(errors.first(), Some(&FieldError::new("name", "Name must be at least 2 characters")));
        assert_eq!(
            errors.last(),
            Some(&FieldError::new("shareCount", "Expected number, received string"))
        );
    }

    #[test]
    fn empty_body_is_an_empty_object() {
        assert_eq!(get_raw_from_body(&Bytes::new()).unwrap(), RawRegistration::default());
        assert_eq!(get_raw_from_body(&Bytes::from_static(b" \n")).unwrap(), RawRegistration::default());
        assert_eq!(errors(b"").len(), 5);
    }

    #[test]
    fn non_object_body_is_a_validation_error() {
        assert_eq!(errors(b"[]"), vec![FieldError::new("", "Expected object, received array")]);
        assert_eq!(errors(b"null"), vec![FieldError::new("", "Expected object, received null")]);
    }

    #[test]
    fn fractional_share_count_is_kept() {
        let body = Bytes::from_static(
            br#"{"name":"Ada","phone":"1234567890","email":"ada@example.com","college":"Other","shareCount":5.0}"#,
        );

        let insert = get_registration_from_body(&body).unwrap();

        assert_eq!(insert.share_count, Number::from_f64(5.0).unwrap());
        assert_eq!(insert.share_count.to_string(), "5.0");
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let body = Bytes::from_static(
            br#"{"name":"Ada","phone":"1234567890","email":"ada@example.com","college":"Other","shareCount":5,"id":99}"#,
        );

        let insert = get_registration_from_body(&body).unwrap();

        assert_eq!(insert.name, "Ada");
    }

    #[test]
    fn validation_errors_are_collected() {
        let fields: Vec<_> = errors(br#"{"name":"A","shareCount":5}"#)
            .iter()
            .map(|e| e.field.clone())
            .collect();

        assert_eq!(fields, vec!["name", "phone", "email", "college"]);
    }
}
