//! Room assignment strategies.
//!
//! Each strategy turns a non-empty list of candidate rooms and a reservation
//! into an [`AssignmentRequest`]. When no room satisfies a strategy's rule a
//! deterministic fallback keeps the guest housed.
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{HotelError, Result};
use crate::hotel::Hotel;
use crate::reservation::{AssignmentRequest, Reservation};
use crate::room::{Room, RoomType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStrategy {
    #[default]
    Random,
    QuietZone,
    StayPurpose,
    Sequential,
}

impl AssignmentStrategy {
    /// Every strategy in menu order.
    pub const ALL: [Self; 4] = [
        Self::Random,
        Self::QuietZone,
        Self::StayPurpose,
        Self::Sequential,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::QuietZone => "quiet_zone",
            Self::StayPurpose => "stay_purpose",
            Self::Sequential => "sequential",
        }
    }

    /// Human-facing name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Random => "Random Assignment",
            Self::QuietZone => "Quiet Zone",
            Self::StayPurpose => "Stay Purpose",
            Self::Sequential => "Sequential Assignment",
        }
    }

    /// Pick a room for `reservation` among `candidates`.
    ///
    /// `Random`, `QuietZone` and `StayPurpose` always return one of the
    /// candidates. `Sequential` searches the whole hotel first and only falls
    /// back to the candidates when that search finds nothing.
    ///
    /// # Errors
    ///
    /// Returns [`HotelError::NoCandidates`] when `candidates` is empty.
    pub fn create_assignment_request<R: Rng + ?Sized>(
        self,
        hotel: &Hotel,
        candidates: &[&Room],
        reservation: &Reservation,
        rng: &mut R,
    ) -> Result<AssignmentRequest> {
        if candidates.is_empty() {
            return Err(HotelError::NoCandidates);
        }
        let room = match self {
            Self::Random => candidates[rng.gen_range(0..candidates.len())],
            Self::StayPurpose => fallback_by_type(candidates, reservation.target_type()),
            Self::QuietZone => candidates
                .iter()
                .copied()
                .find(|room| is_quiet_fit(hotel, room, reservation))
                .unwrap_or(candidates[0]),
            Self::Sequential => {
                let target = reservation.target_type();
                hotel
                    .rooms()
                    .find(|room| {
                        room.is_free()
                            && room.room_type() == target
                            && !hotel.occupied_neighbors(room).is_empty()
                    })
                    .unwrap_or_else(|| fallback_by_type(candidates, target))
            }
        };
        log::debug!(
            "{}: {} -> {}",
            self.label(),
            reservation.full_name(),
            room.name()
        );
        Ok(AssignmentRequest::new(reservation.clone(), room.name()))
    }
}

impl fmt::Display for AssignmentStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Name that matches no [`AssignmentStrategy`] id or label.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown assignment strategy {0:?}")]
pub struct UnknownStrategy(pub String);

impl FromStr for AssignmentStrategy {
    type Err = UnknownStrategy;

    /// Accepts the snake-case id or the label, ignoring case.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|strategy| {
                strategy.as_str().eq_ignore_ascii_case(wanted)
                    || strategy.label().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| UnknownStrategy(wanted.to_string()))
    }
}

/// First candidate of `target` type, else the first candidate.
///
/// `candidates` must be non-empty.
fn fallback_by_type<'a>(candidates: &[&'a Room], target: RoomType) -> &'a Room {
    candidates
        .iter()
        .copied()
        .find(|room| room.room_type() == target)
        .unwrap_or(candidates[0])
}

/// Smokers need a room on the floor's outer ring, and no occupied neighbour
/// may differ from the guest in having children.
fn is_quiet_fit(hotel: &Hotel, room: &Room, reservation: &Reservation) -> bool {
    if reservation.smoker && !hotel.is_boundary(room) {
        return false;
    }
    let has_children = reservation.has_children();
    hotel
        .occupied_neighbors(room)
        .iter()
        .all(|neighbor| neighbor.occupant_has_children() == Some(has_children))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::hotel::FloorLayout;
    use crate::reservation::StayPurpose;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn hotel(floors: u32, rows: &[&str]) -> Hotel {
        Hotel::new(floors, FloorLayout::from_codes(rows).unwrap())
    }

    fn guest(smoker: bool, purpose: StayPurpose, children: u8) -> Reservation {
        Reservation::new("Noa", "Petit", children + 1, smoker, purpose, children)
    }

    fn pick(
        strategy: AssignmentStrategy,
        hotel: &Hotel,
        names: &[&str],
        reservation: &Reservation,
    ) -> String {
        let candidates: Vec<&Room> = names.iter().map(|name| hotel.room(name).unwrap()).collect();
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        strategy
            .create_assignment_request(hotel, &candidates, reservation, &mut rng)
            .unwrap()
            .room
    }

    #[test]
    fn empty_candidates_are_rejected_by_every_strategy() {
        let hotel = hotel(1, &["E"]);
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        for strategy in AssignmentStrategy::ALL {
            let err = strategy
                .create_assignment_request(
                    &hotel,
                    &[],
                    &guest(false, StayPurpose::Other, 0),
                    &mut rng,
                )
                .unwrap_err();
            assert_eq!(err, HotelError::NoCandidates);
            assert_eq!(err.kind(), ErrorKind::InvalidInput);
        }
    }

    #[test]
    fn random_stays_within_candidates() {
        let hotel = hotel(2, &["EBL", "LZE"]);
        let candidates: Vec<&Room> = hotel.available_rooms().into_iter().step_by(2).collect();
        let reservation = guest(true, StayPurpose::Tourism, 1);
        for seed in 0..40 {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let request = AssignmentStrategy::Random
                .create_assignment_request(&hotel, &candidates, &reservation, &mut rng)
                .unwrap();
            assert!(candidates.iter().any(|room| room.name() == request.room));
            assert_eq!(request.reservation, reservation);
        }
    }

    #[test]
    fn quiet_zone_sends_smokers_to_the_edge() {
        let hotel = hotel(1, &["EEE", "EEE", "EEE"]);
        let smoker = guest(true, StayPurpose::Other, 0);
        assert_eq!(
            pick(AssignmentStrategy::QuietZone, &hotel, &["A5E", "A1E"], &smoker),
            "A1E"
        );
    }

    #[test]
    fn quiet_zone_keeps_families_away_from_solo_adults() {
        let mut hotel = hotel(1, &["EEE", "EEE", "EEE"]);
        let solo = guest(false, StayPurpose::Tourism, 0);
        hotel
            .reserve_room(&AssignmentRequest::new(solo, "A2E"))
            .unwrap();
        let family = guest(false, StayPurpose::Tourism, 2);
        assert_eq!(
            pick(AssignmentStrategy::QuietZone, &hotel, &["A1E", "A9E"], &family),
            "A9E"
        );
    }

    #[test]
    fn quiet_zone_keeps_solo_adults_away_from_families() {
        let mut hotel = hotel(1, &["EEE", "EEE", "EEE"]);
        let family = guest(false, StayPurpose::Tourism, 1);
        hotel
            .reserve_room(&AssignmentRequest::new(family, "A2E"))
            .unwrap();
        let solo = guest(false, StayPurpose::Tourism, 0);
        assert_eq!(
            pick(AssignmentStrategy::QuietZone, &hotel, &["A3E", "A9E"], &solo),
            "A9E"
        );
        // another family is welcome next door
        let family = guest(false, StayPurpose::Tourism, 2);
        assert_eq!(
            pick(AssignmentStrategy::QuietZone, &hotel, &["A3E", "A9E"], &family),
            "A3E"
        );
    }

    #[test]
    fn quiet_zone_falls_back_to_first_candidate() {
        let hotel = hotel(1, &["EEE", "EEE", "EEE"]);
        let smoker = guest(true, StayPurpose::Other, 0);
        assert_eq!(
            pick(AssignmentStrategy::QuietZone, &hotel, &["A5E"], &smoker),
            "A5E"
        );
    }

    #[test]
    fn stay_purpose_matches_target_type() {
        let hotel = hotel(1, &["LBE"]);
        assert_eq!(
            pick(
                AssignmentStrategy::StayPurpose,
                &hotel,
                &["A1L", "A2B"],
                &guest(false, StayPurpose::Business, 0)
            ),
            "A2B"
        );
        assert_eq!(
            pick(
                AssignmentStrategy::StayPurpose,
                &hotel,
                &["A3E", "A1L"],
                &guest(false, StayPurpose::Tourism, 0)
            ),
            "A1L"
        );
        assert_eq!(
            pick(
                AssignmentStrategy::StayPurpose,
                &hotel,
                &["A1L", "A3E"],
                &guest(true, StayPurpose::Other, 1)
            ),
            "A3E"
        );
        assert_eq!(
            pick(
                AssignmentStrategy::StayPurpose,
                &hotel,
                &["A2B", "A3E"],
                &guest(false, StayPurpose::Tourism, 0)
            ),
            "A2B"
        );
    }

    #[test]
    fn sequential_prefers_rooms_next_to_guests_anywhere_in_the_hotel() {
        let mut hotel = hotel(2, &["EEE"]);
        let first = guest(true, StayPurpose::Other, 0);
        hotel
            .reserve_room(&AssignmentRequest::new(first, "A1E"))
            .unwrap();
        let next = guest(true, StayPurpose::Other, 0);
        // candidates only cover floor 2, the neighbour on floor 1 still wins
        assert_eq!(
            pick(AssignmentStrategy::Sequential, &hotel, &["B1E", "B2E"], &next),
            "A2E"
        );
    }

    #[test]
    fn sequential_without_neighbours_uses_type_fallback() {
        let hotel = hotel(1, &["LEB"]);
        assert_eq!(
            pick(
                AssignmentStrategy::Sequential,
                &hotel,
                &["A1L", "A3B"],
                &guest(false, StayPurpose::Business, 0)
            ),
            "A3B"
        );
    }

    #[test]
    fn sequential_without_target_type_takes_first_candidate() {
        let hotel = hotel(1, &["LEB"]);
        // A3B is the only business room and has no occupied neighbour
        assert_eq!(
            pick(
                AssignmentStrategy::Sequential,
                &hotel,
                &["A2E", "A1L"],
                &guest(false, StayPurpose::Business, 0)
            ),
            "A2E"
        );
    }

    #[test]
    fn strategies_parse_from_id_or_label() {
        assert_eq!(
            "quiet_zone".parse::<AssignmentStrategy>(),
            Ok(AssignmentStrategy::QuietZone)
        );
        assert_eq!(
            "Sequential Assignment".parse::<AssignmentStrategy>(),
            Ok(AssignmentStrategy::Sequential)
        );
        assert_eq!(
            " alphabetical ".parse::<AssignmentStrategy>(),
            Err(UnknownStrategy(String::from("alphabetical")))
        );
        assert_eq!(AssignmentStrategy::StayPurpose.to_string(), "Stay Purpose");
    }
}
