// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Library error type. Missing rows are not errors here: lookups return
//! `Option` and deletes return `bool`.

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A uniqueness rule (email, phone) would be broken. Nothing was written.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The request itself is malformed (bad sign, empty email, bad params).
    #[error("Invalid input: {0}")]
    Invalid(String),

    /// The backing store refused the write; in-memory state was left as it was.
    #[error("Failed to persist '{0}'")]
    Persist(String),

    /// The notification collaborator did not deliver the code.
    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Password hashing error: {0}")]
    Hash(String),

    #[error("Store backend error: {0}")]
    Backend(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict(_))
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Error::Invalid(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
