//! Reservations and room assignment requests
use serde::{Deserialize, Serialize};

use crate::room::RoomType;

/// Why a guest is staying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StayPurpose {
    Business,
    Tourism,
    Other,
}

impl StayPurpose {
    /// Map a feed keyword onto a purpose. Unknown keywords count as `Other`.
    #[must_use]
    pub fn from_keyword(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "affaire" => Self::Business,
            "tourisme" => Self::Tourism,
            _ => Self::Other,
        }
    }

    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Business => "affaire",
            Self::Tourism => "tourisme",
            Self::Other => "autre",
        }
    }
}

/// Immutable booking record handed to the engine by the reservation feed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reservation {
    pub first_name: String,
    pub last_name: String,
    pub party_size: u8,
    pub smoker: bool,
    pub purpose: StayPurpose,
    pub children: u8,
}

impl Reservation {
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        party_size: u8,
        smoker: bool,
        purpose: StayPurpose,
        children: u8,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            party_size,
            smoker,
            purpose,
            children,
        }
    }

    #[must_use]
    pub const fn has_children(&self) -> bool {
        self.children > 0
    }

    /// Room type this guest should preferably get.
    ///
    /// Business stays map to Business rooms; otherwise quiet guests (no smoking,
    /// no children) get Luxury and everyone else Economic.
    #[must_use]
    pub const fn target_type(&self) -> RoomType {
        match self.purpose {
            StayPurpose::Business => RoomType::Business,
            StayPurpose::Tourism | StayPurpose::Other => {
                if !self.smoker && self.children == 0 {
                    RoomType::Luxury
                } else {
                    RoomType::Economic
                }
            }
        }
    }

    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A reservation paired with the room chosen for it.
///
/// Two requests are equal when the reservations are equal and the room names
/// match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssignmentRequest {
    pub reservation: Reservation,
    pub room: String,
}

impl AssignmentRequest {
    #[must_use]
    pub fn new(reservation: Reservation, room: impl Into<String>) -> Self {
        Self {
            reservation,
            room: room.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guest(purpose: StayPurpose, smoker: bool, children: u8) -> Reservation {
        Reservation::new("Ada", "Byron", children + 1, smoker, purpose, children)
    }

    #[test]
    fn target_type_follows_purpose_and_household() {
        assert_eq!(
            guest(StayPurpose::Business, true, 2).target_type(),
            RoomType::Business
        );
        assert_eq!(
            guest(StayPurpose::Tourism, false, 0).target_type(),
            RoomType::Luxury
        );
        assert_eq!(
            guest(StayPurpose::Other, true, 0).target_type(),
            RoomType::Economic
        );
        assert_eq!(
            guest(StayPurpose::Tourism, false, 1).target_type(),
            RoomType::Economic
        );
    }

    #[test]
    fn purpose_keywords_fall_back_to_other() {
        assert_eq!(StayPurpose::from_keyword(" Affaire "), StayPurpose::Business);
        assert_eq!(StayPurpose::from_keyword("TOURISME"), StayPurpose::Tourism);
        assert_eq!(StayPurpose::from_keyword("autre"), StayPurpose::Other);
        assert_eq!(StayPurpose::from_keyword("croisiere"), StayPurpose::Other);
    }

    #[test]
    fn requests_compare_by_reservation_and_room_name() {
        let res = guest(StayPurpose::Tourism, false, 0);
        let a = AssignmentRequest::new(res.clone(), "A1E");
        let b = AssignmentRequest::new(res.clone(), String::from("A1E"));
        let c = AssignmentRequest::new(res, "A2E");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
