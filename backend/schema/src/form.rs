//! # Form Client Rules
//!
//! Local state of the registration form. Nothing here talks to the server.
//!
//! ## Flow
//!
//! 1. Fill in name, phone, email and pick a college/department
//! 2. Pick a screenshot (only the file name is sent)
//! 3. Share the invite with 5 friends over WhatsApp
//! 4. Submit once; the submitted flag is persisted client-side under [`SUBMITTED_KEY`]
//!
//! Progress bar: 33 / 66 / 85 / 100.
use thiserror::Error;

use crate::payloads::RegistrationRequest;

pub const REQUIRED_SHARES: u32 = 5;

pub const SUBMITTED_KEY: &str = "techForGirlsSubmitted";

pub const NO_FILE: &str = "No file";

pub const INVITE_TEXT: &str = "Hey Buddy, Join Tech For Girls Community";

pub const INVITE_BASE_URL: &str = "https://wa.me/";

pub const COLLEGE_OPTIONS: [&str; 8] = [
    "Computer Science",
    "Information Technology",
    "Software Engineering",
    "Data Science",
    "Cybersecurity",
    "Web Development",
    "Mobile Development",
    "Other",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    /// Already at the required count, nothing was shared.
    AlreadyComplete,
    Shared { count: u32 },
    /// This share reached the required count.
    Completed,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Please share with 5 friends before submitting.")]
    SharingRequired,

    #[error("You have already submitted your registration.")]
    AlreadySubmitted,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub college: String,
    pub screenshot: Option<String>,
    pub share_count: u32,
    pub submitted: bool,
}

impl FormState {
    pub fn has_basic_info(&self) -> bool {
        !self.name.is_empty()
            && !self.phone.is_empty()
            && !self.email.is_empty()
            && !self.college.is_empty()
    }

    pub fn has_shared_enough(&self) -> bool {
        self.share_count >= REQUIRED_SHARES
    }

    pub fn progress(&self) -> u8 {
        if !self.has_basic_info() {
            33
        } else if self.screenshot.is_none() {
            66
        } else if !self.has_shared_enough() {
            85
        } else {
            100
        }
    }

    pub fn progress_text(&self) -> &'static str {
        match self.progress() {
            0..=33 => "Step 1 of 3",
            34..=66 => "Step 2 of 3",
            67..=99 => "Step 3 of 3",
            _ => "Ready to Submit!",
        }
    }

    pub fn share(&mut self) -> ShareOutcome {
        if self.has_shared_enough() {
            return ShareOutcome::AlreadyComplete;
        }

        self.share_count += 1;

        if self.has_shared_enough() {
            ShareOutcome::Completed
        } else {
            ShareOutcome::Shared {
                count: self.share_count,
            }
        }
    }

    /// Builds the request body, refusing until the share gate is met and after a
    /// successful submission.
    pub fn submission(&self) -> Result<RegistrationRequest, SubmitError> {
        if !self.has_shared_enough() {
            return Err(SubmitError::SharingRequired);
        }

        if self.submitted {
            return Err(SubmitError::AlreadySubmitted);
        }

        Ok(RegistrationRequest {
            name: Some(self.name.clone()),
            phone: Some(self.phone.clone()),
            email: Some(self.email.clone()),
            college: Some(self.college.clone()),
            screenshot_file_name: Some(
                self.screenshot.clone().unwrap_or_else(|| NO_FILE.to_string()),
            ),
            share_count: Some(i64::from(self.share_count)),
        })
    }

    pub fn mark_submitted(&mut self) {
        self.submitted = true;
    }
}
