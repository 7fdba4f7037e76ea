// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Concept cleanup for imported bank movements.
//!
//! Some bank export feeds append "Pulsa para ver detalle del movimiento" to
//! every transaction description, sometimes on its own line. The functions
//! here remove that phrase and the whitespace it leaves behind.

use once_cell::sync::Lazy;
use regex::Regex;

/// Boilerplate phrase appended by the bank feed.
pub const MARKER_PHRASE: &str = "Pulsa para ver detalle del movimiento";

/// Leading word of the phrase, usable in a SQL `LIKE` prefilter.
pub const MARKER_PREFIX: &str = "Pulsa";

const MARKER_PATTERN: &str = r"pulsa\s+para\s+ver\s+detalle\s+del\s+movimiento";

static MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(&format!("(?i){MARKER_PATTERN}")).unwrap());

// Marker followed by nothing but whitespace: drop it and the rest.
static MARKER_TO_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i){MARKER_PATTERN}[^\n]*\s*\z")).unwrap());

// Marker on its own line, together with the newline before it.
static MARKER_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)\n.*{MARKER_PATTERN}.*")).unwrap());

static MARKER_FRAGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i).*{MARKER_PATTERN}.*")).unwrap());

static NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\r\n]+").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// True when `concept` still carries the bank boilerplate phrase.
pub fn contains_marker(concept: &str) -> bool {
    MARKER.is_match(concept)
}

/// Strip the boilerplate phrase and collapse whitespace.
///
/// Returns `raw` unchanged when cleaning would leave nothing behind, so a
/// non-empty concept is never replaced by an empty one. The result is stable:
/// `normalize_concept(&normalize_concept(c)) == normalize_concept(c)`.
pub fn normalize_concept(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let mut text = clean_once(raw);
    // Collapsing newlines can rejoin a phrase that was split across lines.
    while contains_marker(&text) {
        let next = clean_once(&text);
        if next == text {
            break;
        }
        text = next;
    }
    if text.is_empty() {
        raw.to_string()
    } else {
        text
    }
}

fn clean_once(text: &str) -> String {
    let text = MARKER_TO_END.replace(text, "");
    let text = MARKER_LINE.replace_all(&text, "");
    let text = MARKER_FRAGMENT.replace_all(&text, "");
    let text = NEWLINES.replace_all(&text, " ");
    let text = WHITESPACE.replace_all(&text, " ");
    text.trim().to_string()
}
