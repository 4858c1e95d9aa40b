//! `.hconfig` hotel layout reader.
//!
//! ```text
//! 3
//! E,E,B
//! L,Z,E
//! ```
//!
//! The first non-empty line is the floor count, every following non-empty
//! line is one row of comma-separated cell codes shared by all floors.

use anyhow::{Context, Result};
use hotelsim_core::{FloorLayout, Hotel, LayoutCell};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

fn cell_code() -> &'static Regex {
    static CELL_CODE: OnceLock<Regex> = OnceLock::new();
    CELL_CODE.get_or_init(|| Regex::new(r"^[EBLZ]$").expect("cell code pattern is valid"))
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("layout file is empty")]
    Empty,
    #[error("floor count {0:?} must be a positive integer")]
    FloorCount(String),
    #[error("layout has no rows")]
    NoRows,
    #[error("line {line}: invalid cell code {code:?}")]
    BadCode { line: usize, code: String },
    #[error("line {line}: row has {actual} cells, expected {expected}")]
    RaggedRow {
        line: usize,
        expected: usize,
        actual: usize,
    },
}

/// Floor count plus the layout every floor is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotelPlan {
    pub floors: u32,
    pub layout: FloorLayout,
}

impl HotelPlan {
    #[must_use]
    pub fn build(self) -> Hotel {
        Hotel::new(self.floors, self.layout)
    }

    /// Bookable rooms across all floors.
    #[must_use]
    pub fn room_count(&self) -> usize {
        let per_floor = self
            .layout
            .rows()
            .iter()
            .flatten()
            .filter(|cell| matches!(cell, LayoutCell::Room(_)))
            .count();
        per_floor * usize::try_from(self.floors).unwrap_or(usize::MAX)
    }
}

/// Parse layout text.
///
/// # Errors
///
/// Returns a [`LayoutError`] naming the offending line.
pub fn parse_layout(text: &str) -> Result<HotelPlan, LayoutError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (_, header) = lines.next().ok_or(LayoutError::Empty)?;
    let floors = header
        .parse::<u32>()
        .ok()
        .filter(|floors| *floors > 0)
        .ok_or_else(|| LayoutError::FloorCount(header.to_string()))?;

    let mut rows: Vec<Vec<LayoutCell>> = Vec::new();
    for (line, raw) in lines {
        let row = raw
            .split(',')
            .map(str::trim)
            .map(|code| {
                code.chars()
                    .next()
                    .filter(|_| cell_code().is_match(code))
                    .and_then(LayoutCell::from_code)
                    .ok_or_else(|| LayoutError::BadCode {
                        line,
                        code: code.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(first) = rows.first()
            && first.len() != row.len()
        {
            return Err(LayoutError::RaggedRow {
                line,
                expected: first.len(),
                actual: row.len(),
            });
        }
        rows.push(row);
    }
    if rows.is_empty() {
        return Err(LayoutError::NoRows);
    }

    Ok(HotelPlan {
        floors,
        layout: FloorLayout::new(rows),
    })
}

/// Read and parse a layout file.
///
/// # Errors
///
/// Fails when the file cannot be read or does not parse.
pub fn load_layout(path: &Path) -> Result<HotelPlan> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read layout {}", path.display()))?;
    parse_layout(&text).with_context(|| format!("invalid layout {}", path.display()))
}
