//! Reversible discount codes.
//! Code format: nine random characters from `A-Z0-9` followed by one marker
//! character carrying the discount, e.g. `K3PZ0QA7MW` (50%).

use rand::Rng;

use crate::error::{HotelError, Result};

pub const CODE_LENGTH: usize = 10;
const PREFIX_LENGTH: usize = CODE_LENGTH - 1;
const ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Discount percent ↔ marker character.
const MARKERS: [(u32, char); 3] = [(25, 'Q'), (50, 'W'), (100, 'Z')];

/// Marker character for a discount percent.
///
/// # Errors
///
/// Returns [`HotelError::InvalidDiscount`] for anything other than 25, 50 or 100.
pub fn encode_marker(percent: u32) -> Result<char> {
    MARKERS
        .iter()
        .find(|(p, _)| *p == percent)
        .map(|(_, marker)| *marker)
        .ok_or(HotelError::InvalidDiscount(percent))
}

/// Discount percent for a marker character.
///
/// # Errors
///
/// Returns [`HotelError::UnknownMarker`] when `marker` is not in the table.
pub fn decode_marker(marker: char) -> Result<u32> {
    MARKERS
        .iter()
        .find(|(_, m)| *m == marker)
        .map(|(percent, _)| *percent)
        .ok_or(HotelError::UnknownMarker(marker))
}

/// Generate a fresh code for `percent`.
///
/// # Errors
///
/// Returns [`HotelError::InvalidDiscount`] when `percent` has no marker.
pub fn generate_code<R: Rng + ?Sized>(percent: u32, rng: &mut R) -> Result<String> {
    let marker = encode_marker(percent)?;
    let mut code: String = (0..PREFIX_LENGTH)
        .map(|_| char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())]))
        .collect();
    code.push(marker);
    Ok(code)
}

/// Recover the discount percent carried by `code`.
///
/// The random prefix is not checked; only the length and the marker matter.
///
/// # Errors
///
/// Returns [`HotelError::CodeLength`] unless `code` is exactly ten characters,
/// and [`HotelError::UnknownMarker`] for an unrecognised last character.
pub fn decode_code(code: &str) -> Result<u32> {
    let actual = code.chars().count();
    if actual != CODE_LENGTH {
        return Err(HotelError::CodeLength {
            expected: CODE_LENGTH,
            actual,
        });
    }
    let marker = code.chars().last().ok_or(HotelError::CodeLength {
        expected: CODE_LENGTH,
        actual,
    })?;
    decode_marker(marker)
}
