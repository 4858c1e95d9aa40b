//! Front desk session: assignment ledger, checkout and reward issuing
use std::cell::RefMut;

use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::assignment::AssignmentStrategy;
use crate::codec::decode_code;
use crate::error::{HotelError, Result};
use crate::hotel::{Hotel, HotelObserver};
use crate::reservation::{AssignmentRequest, Reservation};
use crate::rewards::RewardConfig;
use crate::rng::{CountingRng, RngBundle, StreamDraws};
use crate::room::{Room, floor_of_room_name, room_number};
use crate::ticket::Ticket;

/// Ordering applied by [`FrontDesk::sort_assignments`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Guest last name, case-insensitive.
    LastName,
    /// Floor letter, then room number.
    Room,
}

/// Result of [`FrontDesk::assign_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub assigned: Vec<AssignmentRequest>,
    /// Reservations left over once the hotel filled up, in feed order.
    pub waiting: Vec<Reservation>,
}

/// A guest leaving, with the ticket they earned.
#[derive(Debug)]
pub struct Checkout {
    pub room: String,
    pub guest: Reservation,
    pub rating: u8,
    pub ticket: Ticket,
}

#[derive(Debug)]
pub struct FrontDesk {
    hotel: Hotel,
    strategy: AssignmentStrategy,
    rewards: RewardConfig,
    rng: RngBundle,
    assignments: Vec<AssignmentRequest>,
}

impl FrontDesk {
    #[must_use]
    pub fn new(hotel: Hotel, seed: u64) -> Self {
        Self {
            hotel,
            strategy: AssignmentStrategy::default(),
            rewards: RewardConfig::default(),
            rng: RngBundle::from_user_seed(seed),
            assignments: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: AssignmentStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub fn with_rewards(mut self, rewards: RewardConfig) -> Self {
        self.rewards = rewards;
        self
    }

    #[must_use]
    pub const fn hotel(&self) -> &Hotel {
        &self.hotel
    }

    pub fn set_observer(&mut self, observer: Box<dyn HotelObserver>) {
        self.hotel.set_observer(observer);
    }

    #[must_use]
    pub const fn strategy(&self) -> AssignmentStrategy {
        self.strategy
    }

    pub fn set_strategy(&mut self, strategy: AssignmentStrategy) {
        log::info!("assignment strategy set to {}", strategy.label());
        self.strategy = strategy;
    }

    #[must_use]
    pub const fn rewards(&self) -> &RewardConfig {
        &self.rewards
    }

    /// Current assignments in ledger order.
    #[must_use]
    pub fn assignments(&self) -> &[AssignmentRequest] {
        &self.assignments
    }

    /// Stream for playing out ticket games, e.g. gold door eliminations.
    #[must_use]
    pub fn ticket_rng(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.rng.ticket()
    }

    /// Values drawn so far from each random stream.
    #[must_use]
    pub fn rng_draws(&self) -> StreamDraws {
        self.rng.draws()
    }

    /// Place one guest with the active strategy.
    ///
    /// Returns `Ok(None)` when no room is free.
    ///
    /// # Errors
    ///
    /// Propagates reservation failures from the hotel.
    pub fn assign(&mut self, reservation: Reservation) -> Result<Option<AssignmentRequest>> {
        let Some(request) = self.pick_room(&reservation)? else {
            log::info!("hotel full, {} waits", reservation.full_name());
            return Ok(None);
        };
        self.hotel.reserve_room(&request)?;
        self.assignments.push(request.clone());
        Ok(Some(request))
    }

    /// Assign reservations in order until the hotel is full.
    ///
    /// # Errors
    ///
    /// Stops at the first reservation failure.
    pub fn assign_all<I>(&mut self, reservations: I) -> Result<BatchOutcome>
    where
        I: IntoIterator<Item = Reservation>,
    {
        let mut outcome = BatchOutcome::default();
        let mut queue = reservations.into_iter();
        for reservation in queue.by_ref() {
            match self.assign(reservation.clone())? {
                Some(request) => outcome.assigned.push(request),
                None => {
                    outcome.waiting.push(reservation);
                    break;
                }
            }
        }
        outcome.waiting.extend(queue);
        Ok(outcome)
    }

    /// Move the guest in `room_name` to a room picked afresh by the active
    /// strategy. The ledger entry keeps its position.
    ///
    /// # Errors
    ///
    /// [`HotelError::AssignmentNotFound`] when the room has no ledger entry.
    pub fn reassign(&mut self, room_name: &str) -> Result<AssignmentRequest> {
        let index = self
            .assignments
            .iter()
            .position(|request| request.room == room_name)
            .ok_or_else(|| HotelError::AssignmentNotFound(room_name.to_string()))?;
        let guest = self.hotel.free_room(room_name)?;
        let request = self
            .pick_room(&guest)?
            .ok_or_else(|| HotelError::AssignmentNotFound(room_name.to_string()))?;
        self.hotel.reserve_room(&request)?;
        log::info!(
            "{} moved from {room_name} to {}",
            guest.full_name(),
            request.room
        );
        self.assignments[index] = request.clone();
        Ok(request)
    }

    /// Drop every ledger entry equal to `request`, returning how many went.
    /// The room itself is left as is.
    pub fn remove(&mut self, request: &AssignmentRequest) -> usize {
        let before = self.assignments.len();
        self.assignments.retain(|entry| entry != request);
        before - self.assignments.len()
    }

    /// Issue the departing guest a ticket, then free `room_name`.
    ///
    /// Nothing changes when the ticket cannot be issued.
    ///
    /// # Errors
    ///
    /// [`HotelError::RatingOutOfRange`] for a bad rating,
    /// [`HotelError::RoomNotFound`] or [`HotelError::RoomAlreadyFree`] from the
    /// hotel, and any code error from the reward table.
    pub fn checkout(&mut self, room_name: &str, rating: u8) -> Result<Checkout> {
        let room = self.hotel.room(room_name)?;
        let (room_type, floor) = (room.room_type(), room.floor());
        if room.is_free() {
            return Err(HotelError::RoomAlreadyFree {
                name: room_name.to_string(),
                room_type,
            });
        }
        let ticket = self
            .rewards
            .create_ticket(room_type, rating, floor, &mut *self.rng.reward())?;

        let guest = self.hotel.free_room(room_name)?;
        self.assignments.retain(|request| request.room != room_name);
        log::info!(
            "{} checked out of {room_name}: {} ticket, {}% code {}",
            guest.full_name(),
            ticket.tier(),
            ticket.discount(),
            ticket.code()
        );
        Ok(Checkout {
            room: room_name.to_string(),
            guest,
            rating,
            ticket,
        })
    }

    pub fn sort_assignments(&mut self, key: SortKey) {
        match key {
            SortKey::LastName => self
                .assignments
                .sort_by_cached_key(|request| request.reservation.last_name.to_lowercase()),
            SortKey::Room => self.assignments.sort_by_key(|request| {
                (
                    floor_of_room_name(&request.room),
                    room_number(&request.room),
                )
            }),
        }
    }

    /// Discount percent carried by a guest's code.
    ///
    /// # Errors
    ///
    /// Same as [`decode_code`].
    pub fn verify_code(&self, code: &str) -> Result<u32> {
        decode_code(code.trim())
    }

    fn pick_room(&self, reservation: &Reservation) -> Result<Option<AssignmentRequest>> {
        let candidates: Vec<&Room> = self.hotel.available_rooms();
        if candidates.is_empty() {
            return Ok(None);
        }
        self.strategy
            .create_assignment_request(
                &self.hotel,
                &candidates,
                reservation,
                &mut *self.rng.assignment(),
            )
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::hotel::FloorLayout;
    use crate::reservation::StayPurpose;

    fn desk(rows: &[&str], floors: u32) -> FrontDesk {
        let layout = FloorLayout::from_codes(rows).unwrap();
        FrontDesk::new(Hotel::new(floors, layout), 42)
            .with_strategy(AssignmentStrategy::StayPurpose)
    }

    fn guest(first: &str, last: &str, purpose: StayPurpose) -> Reservation {
        Reservation::new(first, last, 1, false, purpose, 0)
    }

    #[test]
    fn assign_returns_none_once_full() {
        let mut desk = desk(&["EL"], 1);
        assert!(desk.assign(guest("A", "One", StayPurpose::Tourism)).unwrap().is_some());
        assert!(desk.assign(guest("B", "Two", StayPurpose::Tourism)).unwrap().is_some());
        assert!(desk.assign(guest("C", "Three", StayPurpose::Tourism)).unwrap().is_none());
        assert_eq!(desk.assignments().len(), 2);
        assert!(desk.hotel().available_rooms().is_empty());
    }

    #[test]
    fn assign_all_reports_waiting_guests_in_order() {
        let mut desk = desk(&["E"], 1);
        let outcome = desk
            .assign_all(vec![
                guest("A", "One", StayPurpose::Other),
                guest("B", "Two", StayPurpose::Other),
                guest("C", "Three", StayPurpose::Other),
            ])
            .unwrap();
        assert_eq!(outcome.assigned.len(), 1);
        let waiting: Vec<&str> = outcome
            .waiting
            .iter()
            .map(|res| res.first_name.as_str())
            .collect();
        assert_eq!(waiting, ["B", "C"]);
    }

    #[test]
    fn reassign_keeps_ledger_position() {
        let mut desk = desk(&["LEB"], 1);
        desk.assign(guest("A", "One", StayPurpose::Tourism)).unwrap();
        desk.assign(guest("B", "Two", StayPurpose::Business)).unwrap();
        assert_eq!(desk.assignments()[0].room, "A1L");

        desk.set_strategy(AssignmentStrategy::Sequential);
        // no luxury room has an occupied neighbour, so the fallback picks A1L again
        let moved = desk.reassign("A1L").unwrap();
        assert_eq!(moved.reservation.first_name, "A");
        assert_eq!(moved.room, "A1L");
        assert_eq!(desk.assignments()[0], moved);
        assert_eq!(desk.assignments()[1].room, "A3B");

        let err = desk.reassign("A2E").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn remove_only_touches_the_ledger() {
        let mut desk = desk(&["E"], 1);
        let request = desk
            .assign(guest("A", "One", StayPurpose::Other))
            .unwrap()
            .unwrap();
        assert_eq!(desk.remove(&request), 1);
        assert_eq!(desk.remove(&request), 0);
        assert!(desk.assignments().is_empty());
        assert!(!desk.hotel().room("A1E").unwrap().is_free());
    }

    #[test]
    fn checkout_frees_room_and_issues_band_ticket() {
        let mut desk = desk(&["L"], 2);
        desk.assign(guest("A", "One", StayPurpose::Tourism)).unwrap();
        let checkout = desk.checkout("A1L", 5).unwrap();
        assert_eq!(checkout.guest.first_name, "A");
        assert_eq!(checkout.ticket.discount(), 100);
        assert_eq!(desk.verify_code(checkout.ticket.code()).unwrap(), 100);
        assert!(desk.hotel().room("A1L").unwrap().is_free());
        assert!(desk.assignments().is_empty());

        let err = desk.checkout("A1L", 5).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IllegalState);
    }

    #[test]
    fn draws_are_tracked_per_stream() {
        let mut desk = desk(&["EL"], 1).with_strategy(AssignmentStrategy::Random);
        assert_eq!(desk.rng_draws(), StreamDraws::default());
        desk.assign(guest("A", "One", StayPurpose::Other)).unwrap();
        let after_assign = desk.rng_draws();
        assert!(after_assign.assignment > 0);
        assert_eq!(after_assign.reward, 0);

        let room = desk.assignments()[0].room.clone();
        desk.checkout(&room, 3).unwrap();
        let after_checkout = desk.rng_draws();
        assert_eq!(after_checkout.assignment, after_assign.assignment);
        assert!(after_checkout.reward > 0);
        assert_eq!(after_checkout.ticket, 0);
    }

    #[test]
    fn checkout_with_bad_rating_keeps_guest() {
        let mut desk = desk(&["E"], 1);
        desk.assign(guest("A", "One", StayPurpose::Other)).unwrap();
        assert_eq!(
            desk.checkout("A1E", 9).unwrap_err(),
            HotelError::RatingOutOfRange(9)
        );
        assert!(!desk.hotel().room("A1E").unwrap().is_free());
        assert_eq!(desk.assignments().len(), 1);
    }

    #[test]
    fn checkout_leaves_guest_in_place_when_no_ticket_can_be_issued() {
        let mut rewards = RewardConfig::default();
        rewards.low.discount = 30;
        let mut desk = desk(&["E"], 1).with_rewards(rewards);
        desk.assign(guest("A", "One", StayPurpose::Other)).unwrap();

        assert_eq!(
            desk.checkout("A1E", 1).unwrap_err(),
            HotelError::InvalidDiscount(30)
        );
        assert!(!desk.hotel().room("A1E").unwrap().is_free());
        assert_eq!(desk.assignments().len(), 1);
    }

    #[test]
    fn assign_all_fills_hotels_taller_than_the_alphabet() {
        let mut desk = desk(&["E"], 28);
        let guests: Vec<Reservation> = (0..28)
            .map(|n| guest("Guest", &format!("N{n}"), StayPurpose::Other))
            .collect();
        let outcome = desk.assign_all(guests).unwrap();
        assert_eq!(outcome.assigned.len(), 28);
        assert!(outcome.waiting.is_empty());
        assert!(desk.hotel().available_rooms().is_empty());

        desk.sort_assignments(SortKey::Room);
        let last: Vec<&str> = desk.assignments()[26..]
            .iter()
            .map(|request| request.room.as_str())
            .collect();
        assert_eq!(last, ["AA1E", "AB1E"]);
    }

    #[test]
    fn sorting_by_name_and_room() {
        let mut desk = desk(&["EEEEEEEEEEEE"], 2);
        for (first, last) in [("A", "zola"), ("B", "Adam"), ("C", "martin")] {
            desk.assign(guest(first, last, StayPurpose::Other)).unwrap();
        }
        desk.sort_assignments(SortKey::LastName);
        let names: Vec<&str> = desk
            .assignments()
            .iter()
            .map(|request| request.reservation.last_name.as_str())
            .collect();
        assert_eq!(names, ["Adam", "martin", "zola"]);

        let b12 = AssignmentRequest::new(guest("D", "Late", StayPurpose::Other), "B12E");
        let a10 = AssignmentRequest::new(guest("E", "Mid", StayPurpose::Other), "A10E");
        desk.assignments.push(b12);
        desk.assignments.push(a10);
        desk.sort_assignments(SortKey::Room);
        let rooms: Vec<&str> = desk
            .assignments()
            .iter()
            .map(|request| request.room.as_str())
            .collect();
        assert_eq!(rooms, ["A1E", "A2E", "A3E", "A10E", "B12E"]);
    }
}
