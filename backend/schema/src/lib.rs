//! # Registration Schema
//!
//! Types shared between the registration server and the form client.
//!
//! ## Records
//!
//! - Registration: name, phone, email, college, optional screenshot file name, share count.
//!   The server assigns the **id** and the **submitted_at** timestamp.
//! - User: username + password account record. Kept by the store, not exposed over HTTP.
//!
//! ## Payloads
//!
//! JSON over HTTP, camelCase keys.
//!
//! - `POST /api/register`: [`payloads::RegistrationRequest`] in, [`payloads::RegisterResponse`] out
//! - `GET /api/registration-status/{email}`: [`payloads::StatusResponse`]
//! - `GET /api/stats`: [`payloads::StatsResponse`]
//! - Any failure: [`payloads::ErrorResponse`]
//!
//! ## Screenshots
//!
//! Only the file name travels. The file itself never leaves the browser.

pub mod form;
pub mod payloads;
pub mod records;
pub mod validation;

pub use records::{InsertRegistration, InsertUser, Registration, User};
