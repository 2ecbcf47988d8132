use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// A registration that passed validation but has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertRegistration {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub college: String,
    pub screenshot_file_name: Option<String>,
    /// Any JSON number, kept as sent (`5` stays `5`, `5.0` stays `5.0`).
    pub share_count: Number,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: u32,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub college: String,
    pub screenshot_file_name: Option<String>,
    pub share_count: Number,
    pub submitted_at: DateTime<Utc>,
}

impl Registration {
    pub fn from_insert(id: u32, insert: InsertRegistration, submitted_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: insert.name,
            phone: insert.phone,
            email: insert.email,
            college: insert.college,
            screenshot_file_name: insert.screenshot_file_name,
            share_count: insert.share_count,
            submitted_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InsertUser {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: u32,
    pub username: String,
    pub password: String,
}
