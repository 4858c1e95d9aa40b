//! Checkout reward tier selection
use anyhow::Context;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec::{encode_marker, generate_code};
use crate::error::{HotelError, Result, TicketTier};
use crate::room::RoomType;
use crate::ticket::{BronzeTicket, DEFAULT_VOCABULARY, GoldTicket, SilverTicket, Ticket};

const DEFAULT_REWARD_DATA: &str = include_str!("../data/rewards.json");

/// Lowest and highest accepted guest rating.
pub const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// Score band a checkout falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Low,
    Mid,
    High,
}

impl Band {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Mid => "mid",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomWeights {
    #[serde(default = "RoomWeights::default_economic")]
    pub economic: u32,
    #[serde(default = "RoomWeights::default_business")]
    pub business: u32,
    #[serde(default = "RoomWeights::default_luxury")]
    pub luxury: u32,
}

impl RoomWeights {
    const fn default_economic() -> u32 {
        1
    }

    const fn default_business() -> u32 {
        2
    }

    const fn default_luxury() -> u32 {
        3
    }

    #[must_use]
    pub const fn weight(&self, room_type: RoomType) -> u32 {
        match room_type {
            RoomType::Economic => self.economic,
            RoomType::Business => self.business,
            RoomType::Luxury => self.luxury,
        }
    }
}

impl Default for RoomWeights {
    fn default() -> Self {
        Self {
            economic: Self::default_economic(),
            business: Self::default_business(),
            luxury: Self::default_luxury(),
        }
    }
}

/// Discount and tier roll thresholds for one band.
///
/// A roll `r` in `0..100` gives Gold when `r < gold_below`, Silver when
/// `r < silver_below`, Bronze otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandRewards {
    pub discount: u32,
    pub gold_below: u32,
    pub silver_below: u32,
}

impl BandRewards {
    #[must_use]
    pub const fn pick_tier(&self, roll: u32) -> TicketTier {
        if roll < self.gold_below {
            TicketTier::Gold
        } else if roll < self.silver_below {
            TicketTier::Silver
        } else {
            TicketTier::Bronze
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardConfig {
    #[serde(default)]
    pub weights: RoomWeights,
    #[serde(default = "RewardConfig::default_low_score_max")]
    pub low_score_max: u32,
    #[serde(default = "RewardConfig::default_mid_score_max")]
    pub mid_score_max: u32,
    #[serde(default = "RewardConfig::default_low")]
    pub low: BandRewards,
    #[serde(default = "RewardConfig::default_mid")]
    pub mid: BandRewards,
    #[serde(default = "RewardConfig::default_high")]
    pub high: BandRewards,
    #[serde(default = "RewardConfig::default_silver_words")]
    pub silver_words: Vec<String>,
}

impl Default for RewardConfig {
    fn default() -> Self {
        serde_json::from_str(DEFAULT_REWARD_DATA).unwrap_or_else(|_| Self::builtin())
    }
}

impl RewardConfig {
    const fn default_low_score_max() -> u32 {
        6
    }

    const fn default_mid_score_max() -> u32 {
        10
    }

    const fn default_low() -> BandRewards {
        BandRewards {
            discount: 25,
            gold_below: 0,
            silver_below: 70,
        }
    }

    const fn default_mid() -> BandRewards {
        BandRewards {
            discount: 50,
            gold_below: 25,
            silver_below: 75,
        }
    }

    const fn default_high() -> BandRewards {
        BandRewards {
            discount: 100,
            gold_below: 60,
            silver_below: 90,
        }
    }

    fn default_silver_words() -> Vec<String> {
        DEFAULT_VOCABULARY.iter().map(|word| (*word).to_owned()).collect()
    }

    fn builtin() -> Self {
        Self {
            weights: RoomWeights::default(),
            low_score_max: Self::default_low_score_max(),
            mid_score_max: Self::default_mid_score_max(),
            low: Self::default_low(),
            mid: Self::default_mid(),
            high: Self::default_high(),
            silver_words: Self::default_silver_words(),
        }
    }

    /// Parse and validate a JSON reward table.
    ///
    /// # Errors
    ///
    /// Fails when the JSON is malformed or the table breaks a rule checked by
    /// [`RewardConfig::validate`].
    pub fn load(json: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(json).context("parsing reward config")?;
        config.validate().context("validating reward config")?;
        Ok(config)
    }

    /// Check the table is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns `RewardConfigError` for the first rule the table breaks.
    pub fn validate(&self) -> std::result::Result<(), RewardConfigError> {
        for (field, weight) in [
            ("weights.economic", self.weights.economic),
            ("weights.business", self.weights.business),
            ("weights.luxury", self.weights.luxury),
        ] {
            if weight == 0 {
                return Err(RewardConfigError::ZeroWeight { field });
            }
            if weight.checked_mul(u32::from(*RATING_RANGE.end())).is_none() {
                return Err(RewardConfigError::WeightTooLarge { field, weight });
            }
        }
        if self.low_score_max >= self.mid_score_max {
            return Err(RewardConfigError::ScoreBands {
                low: self.low_score_max,
                mid: self.mid_score_max,
            });
        }
        for band in [Band::Low, Band::Mid, Band::High] {
            let rewards = self.band(band);
            if rewards.gold_below > rewards.silver_below || rewards.silver_below > 100 {
                return Err(RewardConfigError::RollThresholds {
                    band,
                    gold: rewards.gold_below,
                    silver: rewards.silver_below,
                });
            }
            if encode_marker(rewards.discount).is_err() {
                return Err(RewardConfigError::Discount {
                    band,
                    percent: rewards.discount,
                });
            }
        }
        if self.silver_words.is_empty() {
            return Err(RewardConfigError::EmptyVocabulary);
        }
        if let Some(word) = self
            .silver_words
            .iter()
            .find(|word| word.is_empty() || word.chars().any(char::is_whitespace))
        {
            return Err(RewardConfigError::BadWord(word.clone()));
        }
        Ok(())
    }

    #[must_use]
    pub const fn band(&self, band: Band) -> &BandRewards {
        match band {
            Band::Low => &self.low,
            Band::Mid => &self.mid,
            Band::High => &self.high,
        }
    }

    /// `weight(room_type) × rating`.
    ///
    /// # Errors
    ///
    /// [`HotelError::RatingOutOfRange`] for a rating outside `1..=5`, and
    /// [`HotelError::ScoreOverflow`] for a weight too large to multiply.
    pub fn score(&self, room_type: RoomType, rating: u8) -> Result<u32> {
        if !RATING_RANGE.contains(&rating) {
            return Err(HotelError::RatingOutOfRange(rating));
        }
        let weight = self.weights.weight(room_type);
        weight
            .checked_mul(u32::from(rating))
            .ok_or(HotelError::ScoreOverflow { weight, rating })
    }

    #[must_use]
    pub const fn band_for_score(&self, score: u32) -> Band {
        if score <= self.low_score_max {
            Band::Low
        } else if score <= self.mid_score_max {
            Band::Mid
        } else {
            Band::High
        }
    }

    /// Roll a tier for a checkout and build the matching ticket.
    ///
    /// The ticket's discount is the band percent and its code carries the
    /// same percent. Gold tickets get `floor + 2` doors.
    ///
    /// # Errors
    ///
    /// [`HotelError::RatingOutOfRange`] for a bad rating and
    /// [`HotelError::InvalidDiscount`] when a band discount has no marker.
    pub fn create_ticket<R: Rng + ?Sized>(
        &self,
        room_type: RoomType,
        rating: u8,
        floor: u32,
        rng: &mut R,
    ) -> Result<Ticket> {
        let score = self.score(room_type, rating)?;
        let band = self.band_for_score(score);
        let rewards = self.band(band);
        let roll = rng.gen_range(0..100);
        let code = generate_code(rewards.discount, rng)?;
        let tier = rewards.pick_tier(roll);
        log::debug!(
            "{} room rated {rating}: score {score}, {} band, roll {roll} -> {tier}",
            room_type.label(),
            band.label()
        );
        Ok(match tier {
            TicketTier::Bronze => Ticket::Bronze(BronzeTicket::new(rewards.discount, code, rng)),
            TicketTier::Silver => Ticket::Silver(SilverTicket::new(
                rewards.discount,
                code,
                &self.silver_words,
                rng,
            )),
            TicketTier::Gold => Ticket::Gold(GoldTicket::new(rewards.discount, code, floor, rng)),
        })
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RewardConfigError {
    #[error("{field} must be positive")]
    ZeroWeight { field: &'static str },
    #[error("{field} of {weight} overflows the score at the top rating")]
    WeightTooLarge { field: &'static str, weight: u32 },
    #[error("low score ceiling {low} must sit below mid score ceiling {mid}")]
    ScoreBands { low: u32, mid: u32 },
    #[error("{band:?} band thresholds invalid: gold below {gold}, silver below {silver}")]
    RollThresholds { band: Band, gold: u32, silver: u32 },
    #[error("{band:?} band discount {percent} has no code marker")]
    Discount { band: Band, percent: u32 },
    #[error("silver vocabulary is empty")]
    EmptyVocabulary,
    #[error("silver word {0:?} must be non-empty without whitespace")]
    BadWord(String),
}
