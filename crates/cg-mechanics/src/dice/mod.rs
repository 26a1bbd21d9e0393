//! Dice rolling: modifier parsing, roll plans, and roll execution.
//!
//! A roll request is a die size, a dice count, and a list of modifier
//! phrases. The phrases are parsed into [`RollModifier`]s, folded into a
//! [`RollPlan`], and executed by a [`Roller`] that owns its
//! [`RandomSource`] and reports every result to a [`RollAudit`] sink.

pub mod audit;
pub mod modifier;
pub mod plan;
pub mod roll;
pub mod source;

pub use audit::{RollAudit, SilentAudit, TracingAudit};
pub use modifier::{Extreme, RollModifier, parse_modifiers};
pub use plan::{MAX_DICE, RollPlan, SortDirection, Vantage};
pub use roll::{Roll, Roller, perform_roll};
pub use source::{EngineRng, FixedSequence, RandomSource, SecureRandom, SeededRandom};

use serde::{Deserialize, Serialize};

/// A dice count and die size written as `NdS` (for example `4d6` or `d20`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceNotation {
    /// How many dice to roll.
    pub count: u32,
    /// Faces per die.
    pub sides: u32,
}

impl DiceNotation {
    /// Parse a string like `"4d6"`, `"d20"`, or `"1D8"`.
    ///
    /// A missing count means one die. Zero counts and zero-sided dice are
    /// rejected.
    pub fn from_str_tag(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        let (count, sides) = s.split_once('d')?;
        let count = if count.is_empty() {
            1
        } else {
            count.parse::<u32>().ok()?
        };
        let sides = sides.parse::<u32>().ok()?;
        if count == 0 || sides == 0 {
            return None;
        }
        Some(Self { count, sides })
    }
}

impl std::fmt::Display for DiceNotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)
    }
}
