//! Rooms, layout codes and occupancy
use serde::{Deserialize, Serialize};

use crate::reservation::Reservation;

/// Kind of bookable room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomType {
    Economic,
    Business,
    Luxury,
}

impl RoomType {
    /// Single-letter code used in layouts and room names.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Economic => 'E',
            Self::Business => 'B',
            Self::Luxury => 'L',
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Economic => "Economic",
            Self::Business => "Business",
            Self::Luxury => "Luxury",
        }
    }
}

/// One cell of a floor layout. `Void` cells never become rooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayoutCell {
    Room(RoomType),
    Void,
}

impl LayoutCell {
    #[must_use]
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'E' => Some(Self::Room(RoomType::Economic)),
            'B' => Some(Self::Room(RoomType::Business)),
            'L' => Some(Self::Room(RoomType::Luxury)),
            'Z' => Some(Self::Void),
            _ => None,
        }
    }

    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Room(room_type) => room_type.code(),
            Self::Void => 'Z',
        }
    }
}

/// Whether a room is taken, and by whom.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "reservation")]
pub enum Occupancy {
    #[default]
    Free,
    Occupied(Reservation),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    name: String,
    floor: u32,
    row: usize,
    col: usize,
    room_type: RoomType,
    #[serde(default)]
    occupancy: Occupancy,
}

impl Room {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        floor: u32,
        row: usize,
        col: usize,
        room_type: RoomType,
    ) -> Self {
        Self {
            name: name.into(),
            floor,
            row,
            col,
            room_type,
            occupancy: Occupancy::Free,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 1-based floor number.
    #[must_use]
    pub const fn floor(&self) -> u32 {
        self.floor
    }

    #[must_use]
    pub const fn row(&self) -> usize {
        self.row
    }

    #[must_use]
    pub const fn col(&self) -> usize {
        self.col
    }

    #[must_use]
    pub const fn room_type(&self) -> RoomType {
        self.room_type
    }

    #[must_use]
    pub const fn occupancy(&self) -> &Occupancy {
        &self.occupancy
    }

    #[must_use]
    pub const fn is_free(&self) -> bool {
        matches!(self.occupancy, Occupancy::Free)
    }

    #[must_use]
    pub const fn reservation(&self) -> Option<&Reservation> {
        match &self.occupancy {
            Occupancy::Occupied(reservation) => Some(reservation),
            Occupancy::Free => None,
        }
    }

    /// `Some(has_children)` for an occupied room, `None` when free.
    #[must_use]
    pub fn occupant_has_children(&self) -> Option<bool> {
        self.reservation().map(Reservation::has_children)
    }

    pub(crate) fn occupy(&mut self, reservation: Reservation) -> Option<Reservation> {
        match std::mem::replace(&mut self.occupancy, Occupancy::Occupied(reservation)) {
            Occupancy::Occupied(previous) => Some(previous),
            Occupancy::Free => None,
        }
    }

    pub(crate) fn release(&mut self) -> Option<Reservation> {
        match std::mem::take(&mut self.occupancy) {
            Occupancy::Occupied(previous) => Some(previous),
            Occupancy::Free => None,
        }
    }
}

const FLOOR_LETTERS: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Prefix used for a 1-based floor number in room names.
///
/// Floors count like spreadsheet columns: `1` → `A`, `26` → `Z`, `27` → `AA`,
/// `28` → `AB`. Floor `0` has no prefix.
#[must_use]
pub fn floor_prefix(floor: u32) -> String {
    let mut letters = Vec::new();
    let mut rest = floor;
    while rest > 0 {
        rest -= 1;
        letters.push(char::from(FLOOR_LETTERS[(rest % 26) as usize]));
        rest /= 26;
    }
    letters.iter().rev().collect()
}

/// Inverse of [`floor_prefix`]. `None` for anything but uppercase ASCII
/// letters or a floor past `u32::MAX`.
#[must_use]
pub fn floor_from_prefix(prefix: &str) -> Option<u32> {
    if prefix.is_empty() {
        return None;
    }
    prefix.chars().try_fold(0_u32, |floor, letter| {
        if !letter.is_ascii_uppercase() {
            return None;
        }
        let digit = u32::from(letter) - u32::from('A') + 1;
        floor.checked_mul(26)?.checked_add(digit)
    })
}

fn split_prefix(name: &str) -> (&str, &str) {
    let split = name
        .find(|c: char| !c.is_ascii_uppercase())
        .unwrap_or(name.len());
    name.split_at(split)
}

/// Floor number encoded in a room name such as `C12L` or `AB3E`.
#[must_use]
pub fn floor_of_room_name(name: &str) -> Option<u32> {
    floor_from_prefix(split_prefix(name).0)
}

/// Per-floor counter encoded in a room name (`C12L` → `12`).
#[must_use]
pub fn room_number(name: &str) -> Option<u32> {
    let rest = split_prefix(name).1;
    let digits = rest.get(..rest.len().checked_sub(1)?)?;
    digits.parse().ok()
}

#[must_use]
pub fn room_name(floor: u32, counter: u32, room_type: RoomType) -> String {
    format!("{}{counter}{}", floor_prefix(floor), room_type.code())
}
