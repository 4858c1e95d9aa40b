//! Reservation feed reader.
//!
//! One reservation per line:
//! `first,last,party_size,smoker_marker,purpose,children`, e.g.
//! `Alice,Dupont,2,fumeur,tourisme,1`. Blank lines are skipped.

use anyhow::{Context, Result};
use hotelsim_core::{Reservation, StayPurpose};
use std::fs;
use std::path::Path;
use thiserror::Error;

const SMOKER_MARKER: &str = "fumeur";
pub const MAX_PARTY: u8 = 4;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FeedError {
    #[error("expected 6 fields, found {0}")]
    FieldCount(usize),
    #[error("{0} is empty")]
    EmptyName(&'static str),
    #[error("{field} {value:?} is not a count")]
    NotACount { field: &'static str, value: String },
    #[error("party size {0} is outside 1..=4")]
    PartySize(u8),
    #[error("{children} children do not fit a party of {party}")]
    TooManyChildren { children: u8, party: u8 },
}

/// A feed line that did not become a reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    pub line_number: usize,
    pub line: String,
    pub error: FeedError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFeed {
    pub reservations: Vec<Reservation>,
    pub rejected: Vec<RejectedLine>,
}

/// Parse and validate one feed line.
///
/// # Errors
///
/// Returns the first [`FeedError`] the line trips over.
pub fn parse_reservation_line(line: &str) -> Result<Reservation, FeedError> {
    let fields: Vec<&str> = line.trim().split(',').map(str::trim).collect();
    let [first, last, party, smoker, purpose, children] = fields[..] else {
        return Err(FeedError::FieldCount(fields.len()));
    };
    let party = parse_count("party size", party)?;
    let children = parse_count("children", children)?;

    if !(1..=MAX_PARTY).contains(&party) {
        return Err(FeedError::PartySize(party));
    }
    if children >= party {
        return Err(FeedError::TooManyChildren { children, party });
    }
    if first.is_empty() {
        return Err(FeedError::EmptyName("first name"));
    }
    if last.is_empty() {
        return Err(FeedError::EmptyName("last name"));
    }

    Ok(Reservation::new(
        first,
        last,
        party,
        smoker.eq_ignore_ascii_case(SMOKER_MARKER),
        StayPurpose::from_keyword(purpose),
        children,
    ))
}

fn parse_count(field: &'static str, value: &str) -> Result<u8, FeedError> {
    value.parse().map_err(|_| FeedError::NotACount {
        field,
        value: value.to_string(),
    })
}

/// Split a whole feed into accepted reservations and rejected lines.
#[must_use]
pub fn parse_feed(text: &str) -> ParsedFeed {
    let mut parsed = ParsedFeed::default();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        match parse_reservation_line(line) {
            Ok(reservation) => parsed.reservations.push(reservation),
            Err(error) => {
                log::warn!("feed line {}: {error}: {line}", index + 1);
                parsed.rejected.push(RejectedLine {
                    line_number: index + 1,
                    line: line.to_string(),
                    error,
                });
            }
        }
    }
    parsed
}

/// Read a feed file. With `consume` the file is rewritten to hold only the
/// rejected lines, so accepted reservations are not read twice.
///
/// # Errors
///
/// Fails when the file cannot be read or rewritten.
pub fn read_feed(path: &Path, consume: bool) -> Result<ParsedFeed> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read reservations from {}", path.display()))?;
    let parsed = parse_feed(&text);
    if consume {
        let leftover: String = parsed
            .rejected
            .iter()
            .map(|rejected| format!("{}\n", rejected.line))
            .collect();
        fs::write(path, leftover)
            .with_context(|| format!("failed to rewrite {}", path.display()))?;
    }
    Ok(parsed)
}
