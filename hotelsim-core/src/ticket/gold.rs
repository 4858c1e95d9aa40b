//! Gold ticket: a many-door elimination game in the Monty Hall style.
//!
//! The guest picks a door, the host opens a losing door that is neither the
//! winner nor the pick, and this repeats until exactly two doors are left.
//! The guest then keeps or switches and the ticket resolves.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};

use crate::error::{HotelError, Result};

/// Fixed-capacity bitset of door indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoorSet {
    words: SmallVec<[u64; 1]>,
    capacity: usize,
    len: usize,
}

impl DoorSet {
    /// Set holding every door in `0..capacity`.
    #[must_use]
    pub fn full(capacity: usize) -> Self {
        let mut words: SmallVec<[u64; 1]> = smallvec![0; capacity.div_ceil(64)];
        for door in 0..capacity {
            words[door / 64] |= 1_u64 << (door % 64);
        }
        Self {
            words,
            capacity,
            len: capacity,
        }
    }

    #[must_use]
    pub fn contains(&self, door: usize) -> bool {
        door < self.capacity && self.words[door / 64] & (1_u64 << (door % 64)) != 0
    }

    /// Drop `door`, returning whether it was present.
    pub fn remove(&mut self, door: usize) -> bool {
        if !self.contains(door) {
            return false;
        }
        self.words[door / 64] &= !(1_u64 << (door % 64));
        self.len -= 1;
        true
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.capacity).filter(|door| self.contains(*door))
    }
}

/// Where a gold round currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoldPhase {
    /// No door picked yet and more than two doors live.
    Selecting,
    /// A door is picked and more than two doors live.
    Eliminating,
    /// Exactly two doors live; keep or switch, then play.
    Deciding,
    Resolved,
}

pub struct GoldTicket {
    discount: u32,
    code: String,
    winning_door: usize,
    live: DoorSet,
    choice: Option<usize>,
    outcome: Option<bool>,
}

impl GoldTicket {
    /// Doors added on top of the floor number.
    pub const EXTRA_DOORS: usize = 2;

    /// Create a round with `floor + 2` doors and a hidden winner.
    pub fn new<R: Rng + ?Sized>(
        discount: u32,
        code: impl Into<String>,
        floor: u32,
        rng: &mut R,
    ) -> Self {
        let floor = usize::try_from(floor.max(1)).unwrap_or(1);
        let total = floor + Self::EXTRA_DOORS;
        Self {
            discount,
            code: code.into(),
            winning_door: rng.gen_range(0..total),
            live: DoorSet::full(total),
            choice: None,
            outcome: None,
        }
    }

    #[must_use]
    pub const fn discount(&self) -> u32 {
        self.discount
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub const fn total_doors(&self) -> usize {
        self.live.capacity
    }

    #[must_use]
    pub const fn live_doors(&self) -> &DoorSet {
        &self.live
    }

    #[must_use]
    pub const fn player_choice(&self) -> Option<usize> {
        self.choice
    }

    #[must_use]
    pub const fn outcome(&self) -> Option<bool> {
        self.outcome
    }

    #[must_use]
    pub const fn phase(&self) -> GoldPhase {
        if self.outcome.is_some() {
            GoldPhase::Resolved
        } else if self.live.len() <= 2 {
            GoldPhase::Deciding
        } else if self.choice.is_some() {
            GoldPhase::Eliminating
        } else {
            GoldPhase::Selecting
        }
    }

    /// Pick (or re-pick) a live door.
    ///
    /// # Errors
    ///
    /// [`HotelError::DoorNotLive`] for an eliminated or unknown door,
    /// [`HotelError::AlreadyPlayed`] once resolved.
    pub fn set_player_choice(&mut self, door: usize) -> Result<()> {
        self.ensure_unresolved()?;
        if !self.live.contains(door) {
            return Err(HotelError::DoorNotLive(door));
        }
        self.choice = Some(door);
        Ok(())
    }

    /// Open one losing door that is not the current pick and return its index.
    ///
    /// # Errors
    ///
    /// [`HotelError::PoolAtMinimum`] when two or fewer doors are live,
    /// [`HotelError::NoEligibleDoor`] when every live door is protected,
    /// [`HotelError::AlreadyPlayed`] once resolved.
    pub fn eliminate_one_wrong_door<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<usize> {
        self.ensure_unresolved()?;
        let live = self.live.len();
        if live <= 2 {
            return Err(HotelError::PoolAtMinimum { live });
        }
        let candidates: SmallVec<[usize; 8]> = self
            .live
            .iter()
            .filter(|door| *door != self.winning_door && Some(*door) != self.choice)
            .collect();
        if candidates.is_empty() {
            return Err(HotelError::NoEligibleDoor);
        }
        let eliminated = candidates[rng.gen_range(0..candidates.len())];
        self.live.remove(eliminated);
        log::debug!(
            "gold ticket {}: door {eliminated} opened, {} live",
            self.code,
            self.live.len()
        );
        Ok(eliminated)
    }

    /// Resolve the round with the guest's final pick.
    ///
    /// # Errors
    ///
    /// [`HotelError::NotReadyToResolve`] unless exactly two doors are live,
    /// [`HotelError::DoorNotLive`] for a door outside the live pool,
    /// [`HotelError::AlreadyPlayed`] on a second call.
    pub fn play(&mut self, final_choice: usize) -> Result<bool> {
        self.ensure_unresolved()?;
        let live = self.live.len();
        if live != 2 {
            return Err(HotelError::NotReadyToResolve { live });
        }
        if !self.live.contains(final_choice) {
            return Err(HotelError::DoorNotLive(final_choice));
        }
        self.choice = Some(final_choice);
        let won = final_choice == self.winning_door;
        self.outcome = Some(won);
        Ok(won)
    }

    fn ensure_unresolved(&self) -> Result<()> {
        if self.outcome.is_some() {
            Err(HotelError::AlreadyPlayed)
        } else {
            Ok(())
        }
    }
}

impl fmt::Debug for GoldTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoldTicket")
            .field("discount", &self.discount)
            .field("code", &self.code)
            .field("live", &self.live.iter().collect::<Vec<_>>())
            .field("choice", &self.choice)
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn door_set_tracks_membership_past_one_word() {
        let mut set = DoorSet::full(70);
        assert_eq!(set.len(), 70);
        assert!(set.contains(69));
        assert!(!set.contains(70));
        assert!(set.remove(65));
        assert!(!set.remove(65));
        assert!(!set.contains(65));
        assert_eq!(set.len(), 69);
        assert_eq!(set.iter().count(), 69);
    }

    #[test]
    fn door_count_follows_floor() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let ticket = GoldTicket::new(100, "AAAAAAAAAZ", 4, &mut rng);
        assert_eq!(ticket.total_doors(), 6);
        assert_eq!(ticket.live_doors().len(), 6);
        assert!(ticket.winning_door < 6);
        assert_eq!(ticket.phase(), GoldPhase::Selecting);
    }

    #[test]
    fn eliminations_never_touch_winner_or_choice() {
        for seed in 0..50 {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let mut ticket = GoldTicket::new(100, "AAAAAAAAAZ", 5, &mut rng);
            let total = ticket.total_doors();
            let pick = rng.gen_range(0..total);
            ticket.set_player_choice(pick).unwrap();
            assert_eq!(ticket.phase(), GoldPhase::Eliminating);

            let mut eliminations = 0;
            while ticket.live_doors().len() > 2 {
                let before = ticket.live_doors().len();
                let opened = ticket.eliminate_one_wrong_door(&mut rng).unwrap();
                assert_ne!(opened, ticket.winning_door);
                assert_ne!(opened, pick);
                assert_eq!(ticket.live_doors().len(), before - 1);
                eliminations += 1;
            }
            assert_eq!(eliminations, total - 2);
            assert!(ticket.live_doors().contains(ticket.winning_door));
            assert!(ticket.live_doors().contains(pick));
            assert_eq!(ticket.phase(), GoldPhase::Deciding);

            let err = ticket.eliminate_one_wrong_door(&mut rng).unwrap_err();
            assert_eq!(err, HotelError::PoolAtMinimum { live: 2 });
        }
    }

    #[test]
    fn eliminating_without_a_choice_still_spares_the_winner() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let mut ticket = GoldTicket::new(100, "AAAAAAAAAZ", 1, &mut rng);
        let opened = ticket.eliminate_one_wrong_door(&mut rng).unwrap();
        assert_ne!(opened, ticket.winning_door);
        assert_eq!(ticket.phase(), GoldPhase::Deciding);
        assert!(ticket.eliminate_one_wrong_door(&mut rng).is_err());
    }

    #[test]
    fn debug_output_hides_the_winner() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let mut ticket = GoldTicket::new(100, "AAAAAAAAAZ", 1, &mut rng);
        let text = format!("{ticket:?}");
        assert!(!text.contains("winning"));
        assert!(text.contains("live: [0, 1, 2]"));

        ticket.set_player_choice(1).unwrap();
        let text = format!("{ticket:?}");
        assert!(text.contains("choice: Some(1)"));
        assert!(!text.contains("winning"));
    }

    #[test]
    fn choice_must_be_live() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let mut ticket = GoldTicket::new(100, "AAAAAAAAAZ", 2, &mut rng);
        let err = ticket.set_player_choice(9).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let opened = ticket.eliminate_one_wrong_door(&mut rng).unwrap();
        assert_eq!(
            ticket.set_player_choice(opened).unwrap_err(),
            HotelError::DoorNotLive(opened)
        );
    }

    #[test]
    fn resolution_requires_two_doors_and_happens_once() {
        let mut rng = ChaCha20Rng::seed_from_u64(8);
        let mut ticket = GoldTicket::new(100, "AAAAAAAAAZ", 2, &mut rng);
        let err = ticket.play(0).unwrap_err();
        assert_eq!(err, HotelError::NotReadyToResolve { live: 4 });
        assert_eq!(err.kind(), ErrorKind::IllegalState);

        let winner = ticket.winning_door;
        let other = (winner + 1) % ticket.total_doors();
        ticket.set_player_choice(other).unwrap();
        while ticket.live_doors().len() > 2 {
            ticket.eliminate_one_wrong_door(&mut rng).unwrap();
        }
        // switching from the losing pick lands on the winner
        assert!(ticket.play(winner).unwrap());
        assert_eq!(ticket.phase(), GoldPhase::Resolved);
        assert_eq!(ticket.outcome(), Some(true));
        assert_eq!(ticket.play(winner).unwrap_err(), HotelError::AlreadyPlayed);
    }
}
