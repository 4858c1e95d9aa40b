//! Engine error taxonomy
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::room::RoomType;

/// Coarse classification shared by every [`HotelError`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The caller handed the engine a value of the wrong shape or range.
    InvalidInput,
    /// A room or door is absent from the pool it was looked up in.
    NotFound,
    /// The operation is not legal in the current state.
    IllegalState,
}

/// Which ticket game an input was addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketTier {
    Bronze,
    Silver,
    Gold,
}

impl TicketTier {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
        }
    }
}

impl std::fmt::Display for TicketTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors raised by the engine when a precondition is violated.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HotelError {
    #[error("candidate room list is empty")]
    NoCandidates,
    #[error("{tier} ticket expects {expected} input")]
    WrongGameInput {
        tier: TicketTier,
        expected: &'static str,
    },
    #[error("door {door} is outside the {doors}-door range")]
    DoorOutOfRange { door: usize, doors: usize },
    #[error("discount percent {0} has no code marker")]
    InvalidDiscount(u32),
    #[error("discount code must be {expected} characters (got {actual})")]
    CodeLength { expected: usize, actual: usize },
    #[error("unrecognized discount marker '{0}'")]
    UnknownMarker(char),
    #[error("rating {0} is outside 1..=5")]
    RatingOutOfRange(u8),
    #[error("score overflows for weight {weight} at rating {rating}")]
    ScoreOverflow { weight: u32, rating: u8 },
    #[error("room {0} not found")]
    RoomNotFound(String),
    #[error("door {0} is not in the live pool")]
    DoorNotLive(usize),
    #[error("room {0} has no recorded assignment")]
    AssignmentNotFound(String),
    #[error("no door can be eliminated")]
    NoEligibleDoor,
    #[error("live pool already at {live} doors")]
    PoolAtMinimum { live: usize },
    #[error("gold ticket resolves with exactly two doors left (got {live})")]
    NotReadyToResolve { live: usize },
    #[error("ticket already played")]
    AlreadyPlayed,
    #[error("room {0} is already occupied")]
    RoomOccupied(String),
    #[error("room {name} ({room_type:?}) is already free")]
    RoomAlreadyFree { name: String, room_type: RoomType },
}

impl HotelError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NoCandidates
            | Self::WrongGameInput { .. }
            | Self::DoorOutOfRange { .. }
            | Self::InvalidDiscount(_)
            | Self::CodeLength { .. }
            | Self::UnknownMarker(_)
            | Self::RatingOutOfRange(_)
            | Self::ScoreOverflow { .. } => ErrorKind::InvalidInput,
            Self::RoomNotFound(_) | Self::DoorNotLive(_) | Self::AssignmentNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::NoEligibleDoor
            | Self::PoolAtMinimum { .. }
            | Self::NotReadyToResolve { .. }
            | Self::AlreadyPlayed
            | Self::RoomOccupied(_)
            | Self::RoomAlreadyFree { .. } => ErrorKind::IllegalState,
        }
    }
}

pub type Result<T> = std::result::Result<T, HotelError>;
