//! Unattended ticket play used by the simulator run.
//!
//! Bronze always opens door 0. Silver unscrambles the word by matching its
//! letters against the vocabulary. Gold picks door 0, lets the host open doors
//! until two remain, then switches.

use hotelsim_core::{GameInput, Result, Ticket};
use rand::Rng;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketPlay {
    /// What was submitted, e.g. `door 0` or `word "hotel"`.
    pub input: String,
    /// Doors the host opened before the final pick (Gold only).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub opened: Vec<usize>,
    pub won: bool,
}

/// Play `ticket` to resolution.
///
/// # Errors
///
/// Propagates game errors; none occur for a fresh ticket.
pub fn auto_play<R: Rng + ?Sized>(
    ticket: &mut Ticket,
    vocabulary: &[String],
    rng: &mut R,
) -> Result<TicketPlay> {
    match ticket {
        Ticket::Bronze(_) => {
            let won = ticket.play_game(GameInput::Door(0))?;
            Ok(TicketPlay {
                input: String::from("door 0"),
                opened: Vec::new(),
                won,
            })
        }
        Ticket::Silver(silver) => {
            let guess = unscramble(silver.scrambled(), vocabulary);
            let input = format!("word {guess:?}");
            let won = ticket.play_game(GameInput::Word(guess))?;
            Ok(TicketPlay {
                input,
                opened: Vec::new(),
                won,
            })
        }
        Ticket::Gold(gold) => {
            gold.set_player_choice(0)?;
            let mut opened = Vec::new();
            while gold.live_doors().len() > 2 {
                opened.push(gold.eliminate_one_wrong_door(rng)?);
            }
            let switch_to = gold
                .live_doors()
                .iter()
                .find(|door| Some(*door) != gold.player_choice())
                .unwrap_or(0);
            let won = gold.play(switch_to)?;
            Ok(TicketPlay {
                input: format!("door {switch_to}"),
                opened,
                won,
            })
        }
    }
}

/// First vocabulary word that is an anagram of `scrambled`, falling back to
/// the scramble itself.
#[must_use]
pub fn unscramble(scrambled: &str, vocabulary: &[String]) -> String {
    let key = letter_key(scrambled);
    vocabulary
        .iter()
        .find(|word| letter_key(word) == key)
        .cloned()
        .unwrap_or_else(|| scrambled.to_string())
}

fn letter_key(word: &str) -> Vec<char> {
    let mut letters: Vec<char> = word.to_lowercase().chars().collect();
    letters.sort_unstable();
    letters
}
