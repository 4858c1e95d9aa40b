//! Seedable randomness streams, one per engine concern.
//!
//! A run is reproduced from its user seed alone: each [`Stream`] gets its own
//! `SmallRng` keyed from the seed and the stream tag, so adding draws to one
//! concern never shifts the others. Every stream counts its draws for the run
//! report.
use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::cell::{RefCell, RefMut};

/// Concern a random draw belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stream {
    /// Random room picks.
    Assignment,
    /// Tier roll, code prefix and ticket setup at checkout.
    Reward,
    /// Door eliminations while a ticket is played.
    Ticket,
}

impl Stream {
    pub const ALL: [Self; 3] = [Self::Assignment, Self::Reward, Self::Ticket];

    #[must_use]
    pub const fn tag(self) -> &'static [u8] {
        match self {
            Self::Assignment => b"assignment",
            Self::Reward => b"reward",
            Self::Ticket => b"ticket",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Assignment => 0,
            Self::Reward => 1,
            Self::Ticket => 2,
        }
    }
}

/// Draw counts per stream, as reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDraws {
    pub assignment: u64,
    pub reward: u64,
    pub ticket: u64,
}

impl StreamDraws {
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.assignment
            .saturating_add(self.reward)
            .saturating_add(self.ticket)
    }
}

#[derive(Debug, Clone)]
pub struct RngBundle {
    streams: [RefCell<CountingRng<SmallRng>>; 3],
}

impl RngBundle {
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            streams: Stream::ALL
                .map(|stream| RefCell::new(CountingRng::seeded(stream_seed(seed, stream)))),
        }
    }

    /// Borrow one stream. Panics if that stream is already borrowed.
    #[must_use]
    pub fn stream(&self, stream: Stream) -> RefMut<'_, CountingRng<SmallRng>> {
        self.streams[stream.index()].borrow_mut()
    }

    #[must_use]
    pub fn assignment(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.stream(Stream::Assignment)
    }

    #[must_use]
    pub fn reward(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.stream(Stream::Reward)
    }

    #[must_use]
    pub fn ticket(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.stream(Stream::Ticket)
    }

    #[must_use]
    pub fn draws(&self) -> StreamDraws {
        let count = |stream: Stream| self.streams[stream.index()].borrow().draws();
        StreamDraws {
            assignment: count(Stream::Assignment),
            reward: count(Stream::Reward),
            ticket: count(Stream::Ticket),
        }
    }
}

/// RNG that counts how many values were pulled from it.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<SmallRng> {
    fn seeded(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }
}

impl<R: rand::RngCore> CountingRng<R> {
    #[must_use]
    pub const fn new(rng: R) -> Self {
        Self { rng, draws: 0 }
    }

    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }

    fn tick(&mut self) -> &mut R {
        self.draws = self.draws.saturating_add(1);
        &mut self.rng
    }
}

impl<R: rand::RngCore> rand::RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.tick().next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.tick().next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.tick().fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.tick().try_fill_bytes(dest)
    }
}

const SEED_KEY: &[u8] = b"hotelsim.rng.v1";

/// HMAC-SHA256 over `seed || tag`, truncated to 64 bits.
fn stream_seed(seed: u64, stream: Stream) -> u64 {
    let mut mac = Hmac::<Sha256>::new_from_slice(SEED_KEY).expect("HMAC takes keys of any size");
    mac.update(&seed.to_le_bytes());
    mac.update(stream.tag());
    let digest = mac.finalize().into_bytes();
    let mut head = [0_u8; 8];
    head.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(head)
}
