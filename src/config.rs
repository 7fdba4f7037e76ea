// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow, bail};
use rusqlite::{Connection, OptionalExtension, params};

pub const BATCH_LIMIT: &str = "batch_limit";
pub const API_URL: &str = "api_url";
pub const KNOWN_KEYS: &[&str] = &[BATCH_LIMIT, API_URL];

pub const DEFAULT_BATCH_LIMIT: usize = 200;
pub const API_TOKEN_ENV: &str = "LEDGERSWEEP_API_TOKEN";

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    let value = value.trim();
    validate(key, value)?;
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn list_settings(conn: &Connection) -> Result<Vec<(String, String)>> {
    let mut stmt = conn.prepare("SELECT key, value FROM settings ORDER BY key")?;
    let rows = stmt
        .query_map([], |r| Ok((r.get(0)?, r.get(1)?)))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn validate(key: &str, value: &str) -> Result<()> {
    match key {
        BATCH_LIMIT => {
            let n = value
                .parse::<usize>()
                .with_context(|| format!("Invalid {} '{}'", BATCH_LIMIT, value))?;
            if n == 0 {
                bail!("{} must be positive", BATCH_LIMIT);
            }
        }
        API_URL => {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                bail!("{} must start with http:// or https://", API_URL);
            }
        }
        other => {
            return Err(anyhow!(
                "Unknown setting '{}'; known: {}",
                other,
                KNOWN_KEYS.join(", ")
            ));
        }
    }
    Ok(())
}

pub fn batch_limit(conn: &Connection) -> Result<usize> {
    match get_setting(conn, BATCH_LIMIT)? {
        Some(v) => v
            .parse::<usize>()
            .with_context(|| format!("Stored {} '{}' is not a number", BATCH_LIMIT, v)),
        None => Ok(DEFAULT_BATCH_LIMIT),
    }
}

pub fn api_url(conn: &Connection) -> Result<String> {
    get_setting(conn, API_URL)?.ok_or_else(|| {
        anyhow!(
            "No API URL configured; run `ledgersweep config set {} <url>`",
            API_URL
        )
    })
}

pub fn api_token() -> Option<String> {
    std::env::var(API_TOKEN_ENV)
        .ok()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}
