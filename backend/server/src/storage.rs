//! # In-Memory Store
//!
//! Holds registrations and user accounts for the lifetime of the process.
//!
//! ## Requirements
//!
//! - One registration per email
//! - Ids handed out in order, starting at 1, never reused
//! - Small dataset, a single event's worth of sign-ups
//!
//! ## Implementation
//!
//! - `BTreeMap` keyed by id, so listing comes out in submission order
//! - Email lookup is a linear scan, fine at this size
//! - One `RwLock` around everything. [`MemStorage::register`] checks for the email and
//!   inserts under the same write guard, so two concurrent submissions with the same
//!   email cannot both land
//! - Nothing survives a restart
use std::collections::BTreeMap;

use chrono::Utc;
use registration_schema::{
    InsertRegistration, InsertUser, Registration, User, payloads::StatsResponse,
};
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StorageError {
    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Id space exhausted")]
    IdsExhausted,
}

struct Inner {
    users: BTreeMap<u32, User>,
    registrations: BTreeMap<u32, Registration>,
    current_user_id: u32,
    current_registration_id: u32,
}

pub struct MemStorage {
    inner: RwLock<Inner>,
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

/// Emails compare case-insensitively, ignoring surrounding whitespace.
fn same_email(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

fn next_id(counter: &mut u32) -> Result<u32, StorageError> {
    let id = *counter;
    *counter = counter.checked_add(1).ok_or(StorageError::IdsExhausted)?;

    Ok(id)
}

impl Inner {
    fn find_registration(&self, email: &str) -> Option<&Registration> {
        self.registrations
            .values()
            .find(|registration| same_email(&registration.email, email))
    }

    fn insert_registration(
        &mut self,
        insert: InsertRegistration,
    ) -> Result<Registration, StorageError> {
        let id = next_id(&mut self.current_registration_id)?;
        let registration = Registration::from_insert(id, insert, Utc::now());
        self.registrations.insert(id, registration.clone());

        Ok(registration)
    }
}

impl MemStorage {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                users: BTreeMap::new(),
                registrations: BTreeMap::new(),
                current_user_id: 1,
                current_registration_id: 1,
            }),
        }
    }

    pub async fn get_user(&self, id: u32) -> Option<User> {
        self.inner.read().await.users.get(&id).cloned()
    }

    pub async fn get_user_by_username(&self, username: &str) -> Option<User> {
        self.inner
            .read()
            .await
            .users
            .values()
            .find(|user| user.username == username)
            .cloned()
    }

    pub async fn create_user(&self, insert: InsertUser) -> Result<User, StorageError> {
        let mut inner = self.inner.write().await;
        let id = next_id(&mut inner.current_user_id)?;

        let user = User {
            id,
            username: insert.username,
            password: insert.password,
        };
        inner.users.insert(id, user.clone());

        Ok(user)
    }

    pub async fn get_registration_by_email(&self, email: &str) -> Option<Registration> {
        self.inner.read().await.find_registration(email).cloned()
    }

    /// Stores without checking for an existing email. Use [`MemStorage::register`] for
    /// submissions.
    pub async fn create_registration(
        &self,
        insert: InsertRegistration,
    ) -> Result<Registration, StorageError> {
        self.inner.write().await.insert_registration(insert)
    }

    pub async fn register(&self, insert: InsertRegistration) -> Result<Registration, StorageError> {
        let mut inner = self.inner.write().await;

        if inner.find_registration(&insert.email).is_some() {
            return Err(StorageError::DuplicateEmail);
        }

        inner.insert_registration(insert)
    }

    pub async fn get_all_registrations(&self) -> Vec<Registration> {
        self.inner
            .read()
            .await
            .registrations
            .values()
            .cloned()
            .collect()
    }

    pub async fn stats(&self) -> StatsResponse {
        let inner = self.inner.read().await;
        let mut stats = StatsResponse {
            total_registrations: inner.registrations.len(),
            last_registration: inner
                .registrations
                .values()
                .next_back()
                .map(|registration| registration.submitted_at),
            ..Default::default()
        };

        for registration in inner.registrations.values() {
            *stats
                .college_breakdown
                .entry(registration.college.clone())
                .or_insert(0) += 1;
        }

        stats
    }
}
