use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::records::Registration;

/// `POST /api/register` body as the form client builds it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub college: Option<String>,
    pub screenshot_file_name: Option<String>,
    pub share_count: Option<i64>,
}

/// `POST /api/register` body as the server receives it.
///
/// Fields stay untyped JSON until validation, so a missing field becomes `Required`
/// and a wrongly typed one becomes `Expected number, received string`, each reported
/// next to the other field errors instead of failing the whole parse.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RawRegistration(pub Map<String, Value>);

impl TryFrom<Value> for RawRegistration {
    type Error = FieldError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(FieldError::expected("", "object", &other)),
        }
    }
}

impl From<RegistrationRequest> for RawRegistration {
    fn from(request: RegistrationRequest) -> Self {
        let fields = [
            ("name", request.name.map(Value::from)),
            ("phone", request.phone.map(Value::from)),
            ("email", request.email.map(Value::from)),
            ("college", request.college.map(Value::from)),
            ("screenshotFileName", request.screenshot_file_name.map(Value::from)),
            ("shareCount", request.share_count.map(Value::from)),
        ];

        Self(
            fields
                .into_iter()
                .filter_map(|(key, value)| Some((key.to_string(), value?)))
                .collect(),
        )
    }
}

/// Type name as the form's validator words it.
pub fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    pub fn expected(field: &str, expected: &str, received: &Value) -> Self {
        Self {
            field: field.to_string(),
            message: format!("Expected {expected}, received {}", json_type(received)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationSummary {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub registration: RegistrationSummary,
}

impl RegisterResponse {
    pub fn new(registration: &Registration) -> Self {
        Self {
            message: "Registration successful!".to_string(),
            registration: RegistrationSummary {
                id: registration.id,
                name: registration.name.clone(),
                email: registration.email.clone(),
                submitted_at: registration.submitted_at,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    pub id: u32,
    pub name: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub is_registered: bool,
    pub registration: Option<StatusSummary>,
}

impl StatusResponse {
    pub fn new(registration: Option<&Registration>) -> Self {
        Self {
            is_registered: registration.is_some(),
            registration: registration.map(|r| StatusSummary {
                id: r.id,
                name: r.name.clone(),
                submitted_at: r.submitted_at,
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_registrations: usize,
    pub last_registration: Option<DateTime<Utc>>,
    pub college_breakdown: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}
