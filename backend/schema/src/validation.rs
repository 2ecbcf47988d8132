//! # Field Validation
//!
//! Rules applied to every registration before it reaches the store. The same
//! rules run in the form client so users see errors before submitting.
//!
//! All fields are checked and every failure is reported, in form order. A field
//! of the wrong JSON type is reported as `Expected <type>, received <type>`.
//!
//! Lengths count UTF-16 code units, the way the browser form counts them.
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Number, Value};

use crate::{
    form::REQUIRED_SHARES,
    payloads::{FieldError, RawRegistration, RegistrationRequest},
    records::InsertRegistration,
};

pub const NAME_MIN_LEN: usize = 2;

pub const REQUIRED: &str = "Required";
pub const NAME_MESSAGE: &str = "Name must be at least 2 characters";
pub const PHONE_MESSAGE: &str = "Please enter a valid phone number";
pub const EMAIL_MESSAGE: &str = "Please enter a valid email address";
pub const COLLEGE_MESSAGE: &str = "Please select your college/department";
pub const SHARE_MESSAGE: &str = "You must share with 5 friends to complete registration";

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{10,15}$").expect("phone pattern"));

// ASCII classes only, `(?i)` would fold in letters like U+017F and U+212A.
// Leading dots and consecutive dots are rejected separately, the regex crate has no lookahead.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$",
    )
    .expect("email pattern")
});

pub fn is_valid_name(name: &str) -> bool {
    name.encode_utf16().count() >= NAME_MIN_LEN
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

pub fn is_valid_email(email: &str) -> bool {
    !email.starts_with('.') && !email.contains("..") && EMAIL_RE.is_match(email)
}

pub fn is_valid_college(college: &str) -> bool {
    !college.is_empty()
}

pub fn is_valid_share_count(share_count: f64) -> bool {
    share_count >= f64::from(REQUIRED_SHARES)
}

impl RawRegistration {
    pub fn validate(&self) -> Result<InsertRegistration, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = self.string(&mut errors, "name", is_valid_name, NAME_MESSAGE);
        let phone = self.string(&mut errors, "phone", is_valid_phone, PHONE_MESSAGE);
        let email = self.string(&mut errors, "email", is_valid_email, EMAIL_MESSAGE);
        let college = self.string(&mut errors, "college", is_valid_college, COLLEGE_MESSAGE);
        let screenshot_file_name = self.optional_string(&mut errors, "screenshotFileName");
        let share_count = self.share_count(&mut errors);

        match (name, phone, email, college, share_count) {
            (Some(name), Some(phone), Some(email), Some(college), Some(share_count))
                if errors.is_empty() =>
            {
                Ok(InsertRegistration {
                    name,
                    phone,
                    email,
                    college,
                    screenshot_file_name,
                    share_count,
                })
            }
            _ => Err(errors),
        }
    }

    fn string(
        &self,
        errors: &mut Vec<FieldError>,
        field: &str,
        rule: fn(&str) -> bool,
        message: &str,
    ) -> Option<String> {
        match self.0.get(field) {
            None => errors.push(FieldError::new(field, REQUIRED)),
            Some(Value::String(value)) if rule(value) => return Some(value.clone()),
            Some(Value::String(_)) => errors.push(FieldError::new(field, message)),
            Some(other) => errors.push(FieldError::expected(field, "string", other)),
        }

        None
    }

    fn optional_string(&self, errors: &mut Vec<FieldError>, field: &str) -> Option<String> {
        match self.0.get(field) {
            None | Some(Value::Null) => None,
            Some(Value::String(value)) => Some(value.clone()),
            Some(other) => {
                errors.push(FieldError::expected(field, "string", other));
                None
            }
        }
    }

    fn share_count(&self, errors: &mut Vec<FieldError>) -> Option<Number> {
        let field = "shareCount";

        match self.0.get(field) {
            None => errors.push(FieldError::new(field, REQUIRED)),
            Some(Value::Number(count)) if count.as_f64().is_some_and(is_valid_share_count) => {
                return Some(count.clone());
            }
            Some(Value::Number(_)) => errors.push(FieldError::new(field, SHARE_MESSAGE)),
            Some(other) => errors.push(FieldError::expected(field, "number", other)),
        }

        None
    }
}

impl RegistrationRequest {
    pub fn validate(self) -> Result<InsertRegistration, Vec<FieldError>> {
        RawRegistration::from(self).validate()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn raw(value: Value) -> RawRegistration {
        RawRegistration::try_from(value).unwrap()
    }

    fn valid_body() -> Value {
        json!({
            "name": "Grace Hopper",
            "phone": "+1234567890",
            "email": "grace@example.com",
            "college": "Computer Science",
            "screenshotFileName": "shot.jpg",
            "shareCount": 5
        })
    }

    fn fields(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn accepts_valid_body() {
        let insert = raw(valid_body()).validate().unwrap();

        assert_eq!(insert.name, "Grace Hopper");
        assert_eq!(insert.share_count, Number::from(5u32));
        assert_eq!(insert.screenshot_file_name.as_deref(), Some("shot.jpg"));
    }

    #[test]
    fn screenshot_is_optional_and_nullable() {
        let mut body = valid_body();
        body["screenshotFileName"] = Value::Null;
        assert_eq!(raw(body.clone()).validate().unwrap().screenshot_file_name, None);

        body.as_object_mut().unwrap().remove("screenshotFileName");
        assert!(raw(body).validate().is_ok());
    }

    #[test]
    fn empty_body_reports_every_required_field() {
        let errors = RawRegistration::default().validate().unwrap_err();

        assert_eq!(
            fields(&errors),
            vec!["name", "phone", "email", "college", "shareCount"]
        );
        assert!(errors.iter().all(|e| e.message == REQUIRED));
    }

    #[test]
    fn reports_all_failures_in_form_order() {
        let body = json!({
            "name": "A",
            "phone": "12345",
            "email": "not-an-email",
            "college": "",
            "shareCount": 4
        });

        let errors = raw(body).validate().unwrap_err();

        assert_eq!(
            errors,
            vec![
                FieldError::new("name", NAME_MESSAGE),
                FieldError::new("phone", PHONE_MESSAGE),
                FieldError::new("email", EMAIL_MESSAGE),
                FieldError::new("college", COLLEGE_MESSAGE),
                FieldError::new("shareCount", SHARE_MESSAGE),
            ]
        );
    }

    #[test]
    fn wrong_types_are_field_errors() {
        let mut body = valid_body();
        body["name"] = json!("A");
        body["phone"] = json!(1234567890);
        body["college"] = Value::Null;
        body["screenshotFileName"] = json!(["shot.jpg"]);
        body["shareCount"] = json!("5");

        let errors = raw(body).validate().unwrap_err();

        assert_eq!(
            errors,
            vec![
                FieldError::new("name", NAME_MESSAGE),
                FieldError::new("phone", "Expected string, received number"),
                FieldError::new("college", "Expected string, received null"),
                FieldError::new("screenshotFileName", "Expected string, received array"),
                FieldError::new("shareCount", "Expected number, received string"),
            ]
        );
    }

    #[test]
    fn share_count_accepts_any_number() {
        for count in [json!(5.0), json!(5.5), json!(12), json!(1e3)] {
            let mut body = valid_body();
            body["shareCount"] = count.clone();

            let insert = raw(body).validate().unwrap();
            assert_eq!(Value::Number(insert.share_count), count);
        }

        let mut body = valid_body();
        body["shareCount"] = json!(4.99);
        assert_eq!(
            raw(body).validate().unwrap_err(),
            vec![FieldError::new("shareCount", SHARE_MESSAGE)]
        );
    }

    #[test]
    fn typed_request_validates_the_same_way() {
        let request = RegistrationRequest {
            name: Some("Grace Hopper".to_string()),
            phone: Some("+1234567890".to_string()),
            email: Some("grace@example.com".to_string()),
            college: Some("Computer Science".to_string()),
            screenshot_file_name: None,
            share_count: Some(3),
        };

        assert_eq!(
            request.validate().unwrap_err(),
            vec![FieldError::new("shareCount", SHARE_MESSAGE)]
        );
    }

    #[test]
    fn name_length_counts_utf16_units() {
        assert!(is_valid_name("Jo"));
        assert!(is_valid_name("李娜"));
        assert!(is_valid_name("😀"));
        assert!(!is_valid_name("é"));
        assert!(!is_valid_name(""));
    }

    #[test]
    fn phone_numbers() {
        assert!(is_valid_phone("1234567890"));
        assert!(is_valid_phone("+123456789012345"));
        assert!(!is_valid_phone("123456789"));
        assert!(!is_valid_phone("1234567890123456"));
        assert!(!is_valid_phone("++1234567890"));
        assert!(!is_valid_phone("123-456-7890"));
        assert!(!is_valid_phone(" 1234567890"));
    }

    #[test]
    fn email_addresses() {
        assert!(is_valid_email("test@example.com"));
        assert!(is_valid_email("first.last+tag@sub.example.co"));
        assert!(is_valid_email("O'Neil@Example.ORG"));
        assert!(!is_valid_email("plainaddress"));
        assert!(!is_valid_email(".leading@example.com"));
        assert!(!is_valid_email("double..dot@example.com"));
        assert!(!is_valid_email("trailing.@example.com"));
        assert!(!is_valid_email("user@localhost"));
        assert!(!is_valid_email("user@-bad.com"));
        assert!(!is_valid_email("user@example.c"));
        assert!(!is_valid_email("\u{17f}@example.com"));
        assert!(!is_valid_email("a@example.co\u{212a}"));
    }

    #[test]
    fn share_count_threshold() {
        assert!(!is_valid_share_count(0.0));
        assert!(!is_valid_share_count(4.0));
        assert!(is_valid_share_count(5.0));
        assert!(is_valid_share_count(12.0));
    }
}
