//! Reward tickets and the mini-games that redeem them.
//!
//! Every ticket carries a discount percent and its code, and resolves exactly
//! once through [`Ticket::play_game`] or one of the typed entry points.
//! Bronze is a two-door pick, Silver an anagram and Gold the multi-round
//! elimination game in [`gold`].

pub mod gold;

use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::{HotelError, Result, TicketTier};

pub use gold::{DoorSet, GoldPhase, GoldTicket};

/// Vocabulary used when a caller supplies an empty word list.
pub const DEFAULT_VOCABULARY: [&str; 21] = [
    "helb",
    "hotel",
    "vacation",
    "client",
    "java",
    "ticket",
    "luxury",
    "plaine",
    "view",
    "room",
    "bronze",
    "silver",
    "journey",
    "game",
    "open",
    "closed",
    "operator",
    "floor",
    "reservation",
    "logic",
    "constraint",
];

/// Input handed to [`Ticket::play_game`]. Each tier accepts exactly one shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum GameInput {
    /// Door index for Bronze and Gold.
    Door(usize),
    /// Guessed word for Silver.
    Word(String),
}

pub struct BronzeTicket {
    discount: u32,
    code: String,
    winning_door: usize,
    outcome: Option<bool>,
}

impl BronzeTicket {
    pub const DOORS: usize = 2;

    pub fn new<R: Rng + ?Sized>(discount: u32, code: impl Into<String>, rng: &mut R) -> Self {
        Self {
            discount,
            code: code.into(),
            winning_door: rng.gen_range(0..Self::DOORS),
            outcome: None,
        }
    }

    /// Open `door` and report whether it hides the prize.
    ///
    /// # Errors
    ///
    /// [`HotelError::DoorOutOfRange`] for a door index of 2 or more,
    /// [`HotelError::AlreadyPlayed`] on a second call.
    pub fn play(&mut self, door: usize) -> Result<bool> {
        if self.outcome.is_some() {
            return Err(HotelError::AlreadyPlayed);
        }
        if door >= Self::DOORS {
            return Err(HotelError::DoorOutOfRange {
                door,
                doors: Self::DOORS,
            });
        }
        let won = door == self.winning_door;
        self.outcome = Some(won);
        Ok(won)
    }
}

impl fmt::Debug for BronzeTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BronzeTicket")
            .field("discount", &self.discount)
            .field("code", &self.code)
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}

pub struct SilverTicket {
    discount: u32,
    code: String,
    word: String,
    scrambled: String,
    outcome: Option<bool>,
}

impl SilverTicket {
    /// Draw a word from `vocabulary` and shuffle its letters.
    pub fn new<R, S>(discount: u32, code: impl Into<String>, vocabulary: &[S], rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
        S: AsRef<str>,
    {
        let word = vocabulary
            .choose(rng)
            .map(|word| word.as_ref().to_owned())
            .or_else(|| DEFAULT_VOCABULARY.choose(rng).map(|word| (*word).to_owned()))
            .unwrap_or_default();
        let mut letters: Vec<char> = word.chars().collect();
        letters.shuffle(rng);
        Self {
            discount,
            code: code.into(),
            word,
            scrambled: letters.into_iter().collect(),
            outcome: None,
        }
    }

    /// Letters of the hidden word in shuffled order.
    #[must_use]
    pub fn scrambled(&self) -> &str {
        &self.scrambled
    }

    /// Compare `guess` with the hidden word, ignoring case and surrounding
    /// whitespace.
    ///
    /// # Errors
    ///
    /// [`HotelError::AlreadyPlayed`] on a second call.
    pub fn play(&mut self, guess: &str) -> Result<bool> {
        if self.outcome.is_some() {
            return Err(HotelError::AlreadyPlayed);
        }
        let won = guess.trim().to_lowercase() == self.word.to_lowercase();
        self.outcome = Some(won);
        Ok(won)
    }
}

impl fmt::Debug for SilverTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SilverTicket")
            .field("discount", &self.discount)
            .field("code", &self.code)
            .field("scrambled", &self.scrambled)
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}

/// Reward issued at checkout.
#[derive(Debug)]
pub enum Ticket {
    Bronze(BronzeTicket),
    Silver(SilverTicket),
    Gold(GoldTicket),
}

impl Ticket {
    #[must_use]
    pub const fn tier(&self) -> TicketTier {
        match self {
            Self::Bronze(_) => TicketTier::Bronze,
            Self::Silver(_) => TicketTier::Silver,
            Self::Gold(_) => TicketTier::Gold,
        }
    }

    #[must_use]
    pub const fn discount(&self) -> u32 {
        match self {
            Self::Bronze(ticket) => ticket.discount,
            Self::Silver(ticket) => ticket.discount,
            Self::Gold(ticket) => ticket.discount(),
        }
    }

    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Bronze(ticket) => &ticket.code,
            Self::Silver(ticket) => &ticket.code,
            Self::Gold(ticket) => ticket.code(),
        }
    }

    /// `Some(won)` once the game has been played.
    #[must_use]
    pub const fn outcome(&self) -> Option<bool> {
        match self {
            Self::Bronze(ticket) => ticket.outcome,
            Self::Silver(ticket) => ticket.outcome,
            Self::Gold(ticket) => ticket.outcome(),
        }
    }

    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.outcome().is_some()
    }

    /// Resolve the ticket with a tier-appropriate input.
    ///
    /// Bronze and Gold take [`GameInput::Door`], Silver takes
    /// [`GameInput::Word`]. A Gold ticket must already be down to two live
    /// doors.
    ///
    /// # Errors
    ///
    /// [`HotelError::WrongGameInput`] when the input shape does not match the
    /// tier, plus whatever the tier's own game reports.
    pub fn play_game(&mut self, input: GameInput) -> Result<bool> {
        match (self, input) {
            (Self::Bronze(ticket), GameInput::Door(door)) => ticket.play(door),
            (Self::Silver(ticket), GameInput::Word(guess)) => ticket.play(&guess),
            (Self::Gold(ticket), GameInput::Door(door)) => ticket.play(door),
            (ticket, _) => Err(wrong_input(ticket.tier())),
        }
    }

    /// # Errors
    ///
    /// [`HotelError::WrongGameInput`] unless this is a Bronze ticket.
    pub fn play_bronze(&mut self, door: usize) -> Result<bool> {
        match self {
            Self::Bronze(ticket) => ticket.play(door),
            other => Err(wrong_input(other.tier())),
        }
    }

    /// # Errors
    ///
    /// [`HotelError::WrongGameInput`] unless this is a Silver ticket.
    pub fn play_silver(&mut self, guess: &str) -> Result<bool> {
        match self {
            Self::Silver(ticket) => ticket.play(guess),
            other => Err(wrong_input(other.tier())),
        }
    }

    /// # Errors
    ///
    /// [`HotelError::WrongGameInput`] unless this is a Gold ticket.
    pub fn play_gold(&mut self, final_choice: usize) -> Result<bool> {
        match self {
            Self::Gold(ticket) => ticket.play(final_choice),
            other => Err(wrong_input(other.tier())),
        }
    }

    #[must_use]
    pub const fn as_silver(&self) -> Option<&SilverTicket> {
        match self {
            Self::Silver(ticket) => Some(ticket),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_gold_mut(&mut self) -> Option<&mut GoldTicket> {
        match self {
            Self::Gold(ticket) => Some(ticket),
            _ => None,
        }
    }
}

const fn wrong_input(tier: TicketTier) -> HotelError {
    HotelError::WrongGameInput {
        tier,
        expected: match tier {
            TicketTier::Bronze | TicketTier::Gold => "a door",
            TicketTier::Silver => "a word",
        },
    }
}
