//! # Spreadsheet Logging
//!
//! Optional copy of every registration into a Google Sheet.
//!
//! ## Webhook
//! - A Google Apps Script deployed as a web app, execute as "Anyone"
//! - Receives the submission as JSON, appends one row, answers `{ success, message }`
//! - Writes the header row itself when the sheet is empty
//!
//! ## Row Layout
//! `Timestamp | Name | Phone | Email | College/Department | Screenshot File | Share Count | Status`
//!
//! - Timestamp is the server's submission time
//! - Screenshot File is "No file" when the form sent none
//! - Status is always "Registered"
//!
//! ## Delivery
//! Spawned from the register handler onto the state's task tracker. The user gets their
//! 201 whether or not the sheet accepted the row, failures only show up in the logs. The
//! in-memory store remains the source of truth. Shutdown waits on the tracker so rows
//! accepted just before a restart still reach the sheet.
use std::{fmt, sync::Arc, time::Duration};

use registration_schema::{Registration, form::NO_FILE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Number;
use thiserror::Error;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

pub const SHEET_HEADERS: [&str; 8] = [
    "Timestamp",
    "Name",
    "Phone",
    "Email",
    "College/Department",
    "Screenshot File",
    "Share Count",
    "Status",
];

pub const STATUS_REGISTERED: &str = "Registered";

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Webhook returned status {0}")]
    Status(u16),

    #[error("Webhook rejected row: {0}")]
    Rejected(String),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetSubmission<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub email: &'a str,
    pub college: &'a str,
    pub screenshot_file_name: Option<&'a str>,
    pub share_count: &'a Number,
}

impl<'a> From<&'a Registration> for SheetSubmission<'a> {
    fn from(registration: &'a Registration) -> Self {
        Self {
            name: &registration.name,
            phone: &registration.phone,
            email: &registration.email,
            college: &registration.college,
            screenshot_file_name: registration.screenshot_file_name.as_deref(),
            share_count: &registration.share_count,
        }
    }
}

#[derive(Deserialize)]
struct WebhookReply {
    success: bool,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow(pub [String; 8]);

impl From<&Registration> for SheetRow {
    fn from(registration: &Registration) -> Self {
        Self([
            registration
                .submitted_at
                .format("%-m/%-d/%Y, %-I:%M:%S %p")
                .to_string(),
            registration.name.clone(),
            registration.phone.clone(),
            registration.email.clone(),
            registration.college.clone(),
            registration
                .screenshot_file_name
                .clone()
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| NO_FILE.to_string()),
            registration.share_count.to_string(),
            STATUS_REGISTERED.to_string(),
        ])
    }
}

/// `Timestamp=...; Name=...; ...`, one pair per column.
impl fmt::Display for SheetRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (header, cell)) in SHEET_HEADERS.iter().zip(&self.0).enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{header}={cell}")?;
        }

        Ok(())
    }
}

pub struct SheetLogger {
    client: Client,
    url: String,
}

impl SheetLogger {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, SheetError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    pub async fn log(&self, registration: &Registration) -> Result<(), SheetError> {
        let response = self
            .client
            .post(&self.url)
            .json(&SheetSubmission::from(registration))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SheetError::Status(response.status().as_u16()));
        }

        let reply: WebhookReply = response.json().await?;
        if !reply.success {
            return Err(SheetError::Rejected(reply.message));
        }

        Ok(())
    }

    pub fn spawn_log(self: Arc<Self>, tracker: &TaskTracker, registration: Registration) {
        tracker.spawn(async move {
            match self.log(&registration).await {
                Ok(()) => {
                    info!("Logged registration {} to sheet", registration.id);
                    debug!("Sheet row: {}", SheetRow::from(&registration));
                }
                Err(e) => warn!("Failed to log registration {} to sheet: {e}", registration.id),
            }
        });
    }
}
