// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Could not decode stored value: {0}")]
    Decode(String),

    #[error("Update of movement {id} rejected: {reason}")]
    Rejected { id: i64, reason: String },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
