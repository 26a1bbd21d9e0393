//! Folding roll modifiers into a normalized roll plan.
//!
//! A plan says how many dice to generate, how to order them, how many of
//! the ordered dice count toward the result, and what flat amount to add.
//! Modifiers are applied left to right, so later keeps and drops see the
//! keep count left behind by earlier ones.

use serde::{Deserialize, Serialize};

use crate::dice::modifier::{Extreme, RollModifier, parse_modifiers};
use crate::error::{MechError, MechResult};

/// Advantage state for a single-die roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vantage {
    /// One die is rolled.
    #[default]
    Normal,
    /// Two dice are rolled and the higher is kept.
    Advantage,
    /// Two dice are rolled and the lower is kept.
    Disadvantage,
}

impl Vantage {
    /// Combine two states: opposites cancel, repeats change nothing.
    pub fn combine(self, other: Vantage) -> Vantage {
        match (self, other) {
            (Vantage::Normal, x) | (x, Vantage::Normal) => x,
            (Vantage::Advantage, Vantage::Disadvantage) => Vantage::Normal,
            (Vantage::Disadvantage, Vantage::Advantage) => Vantage::Normal,
            (Vantage::Advantage, Vantage::Advantage) => Vantage::Advantage,
            (Vantage::Disadvantage, Vantage::Disadvantage) => Vantage::Disadvantage,
        }
    }

    /// Lowercase name used in option summaries.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Advantage => "advantage",
            Self::Disadvantage => "disadvantage",
        }
    }
}

impl std::fmt::Display for Vantage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How generated dice are ordered before the kept prefix is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest die first.
    Ascending,
    /// Largest die first.
    Descending,
}

impl SortDirection {
    /// Sort dice in place in this direction.
    pub fn sort(self, dice: &mut [u32]) {
        match self {
            Self::Ascending => dice.sort_unstable(),
            Self::Descending => dice.sort_unstable_by(|a, b| b.cmp(a)),
        }
    }

    fn keeping(extreme: Extreme) -> Self {
        match extreme {
            Extreme::Highest => Self::Descending,
            Extreme::Lowest => Self::Ascending,
        }
    }

    fn dropping(extreme: Extreme) -> Self {
        match extreme {
            Extreme::Highest => Self::Ascending,
            Extreme::Lowest => Self::Descending,
        }
    }
}

/// Most dice a single roll may generate.
pub const MAX_DICE: u32 = 1_000;

/// A normalized, validated description of one roll.
///
/// Only [`RollPlan::evaluate`] builds plans, so `keep_count` never exceeds
/// `eval_count`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollPlan {
    times_to_roll: u32,
    eval_count: u32,
    keep_count: u32,
    sort_direction: SortDirection,
    additive: i64,
    vantage: Vantage,
    options: String,
}

impl RollPlan {
    /// Fold `modifiers` into a plan for `times_to_roll` dice.
    ///
    /// Fails with [`MechError::InvalidDice`] when `times_to_roll` is zero or
    /// above [`MAX_DICE`], and with [`MechError::InvalidOption`] when a
    /// vantage modifier is used on more than one die, when a drop removes
    /// more dice than are currently kept, or when the final keep count
    /// exceeds the dice rolled.
    pub fn evaluate(times_to_roll: u32, modifiers: &[RollModifier]) -> MechResult<Self> {
        if times_to_roll == 0 {
            return Err(MechError::InvalidDice(
                "at least one die must be rolled".to_string(),
            ));
        }
        if times_to_roll > MAX_DICE {
            return Err(MechError::InvalidDice(format!(
                "cannot roll {times_to_roll} dice, the limit is {MAX_DICE}"
            )));
        }

        let mut plan = Self {
            times_to_roll,
            eval_count: times_to_roll,
            keep_count: times_to_roll,
            sort_direction: SortDirection::Descending,
            additive: 0,
            vantage: Vantage::Normal,
            options: String::new(),
        };
        let mut saw_vantage = false;

        for modifier in modifiers {
            match *modifier {
                RollModifier::Keep { extreme, count } => {
                    plan.sort_direction = SortDirection::keeping(extreme);
                    plan.keep_count = count;
                    plan.options.push_str(&format!("keep {extreme}: {count}; "));
                }
                RollModifier::Drop { extreme, count } => {
                    if count > plan.keep_count {
                        return Err(MechError::InvalidOption(format!(
                            "cannot drop {count} dice when only {} are kept",
                            plan.keep_count
                        )));
                    }
                    plan.sort_direction = SortDirection::dropping(extreme);
                    plan.keep_count -= count;
                    plan.options.push_str(&format!("drop {extreme}: {count}; "));
                }
                RollModifier::Add(amount) => {
                    plan.additive = plan.additive.saturating_add(amount);
                    plan.options.push_str(&format!("add: {amount}; "));
                }
                RollModifier::Subtract(amount) => {
                    plan.additive = plan.additive.saturating_sub(amount);
                    plan.options.push_str(&format!("subtract: {amount}; "));
                }
                RollModifier::Advantage | RollModifier::Disadvantage => {
                    if times_to_roll != 1 {
                        return Err(MechError::InvalidOption(format!(
                            "{modifier} only applies to a single die, not {times_to_roll}"
                        )));
                    }
                    saw_vantage = true;
                    let requested = if *modifier == RollModifier::Advantage {
                        Vantage::Advantage
                    } else {
                        Vantage::Disadvantage
                    };
                    plan.apply_vantage(requested);
                }
            }
        }

        if plan.keep_count > plan.eval_count {
            return Err(MechError::InvalidOption(format!(
                "cannot keep {} of {} dice",
                plan.keep_count, plan.eval_count
            )));
        }

        if saw_vantage {
            plan.options.push_str(&format!("vantage: {}; ", plan.vantage));
        }

        Ok(plan)
    }

    /// Parse modifier tokens and evaluate them in one step.
    pub fn from_tokens<S: AsRef<str>>(times_to_roll: u32, tokens: &[S]) -> MechResult<Self> {
        Self::evaluate(times_to_roll, &parse_modifiers(tokens)?)
    }

    fn apply_vantage(&mut self, requested: Vantage) {
        let next = self.vantage.combine(requested);
        if next == self.vantage {
            return;
        }
        match next {
            Vantage::Advantage => {
                self.eval_count = 2;
                self.sort_direction = SortDirection::Descending;
            }
            Vantage::Disadvantage => {
                self.eval_count = 2;
                self.sort_direction = SortDirection::Ascending;
            }
            Vantage::Normal => {
                self.eval_count = 1;
                if requested == Vantage::Disadvantage {
                    self.sort_direction = SortDirection::Descending;
                }
            }
        }
        self.vantage = next;
    }

    /// The number of dice the caller asked for.
    pub fn times_to_roll(&self) -> u32 {
        self.times_to_roll
    }

    /// The number of dice that will actually be generated.
    pub fn eval_count(&self) -> u32 {
        self.eval_count
    }

    /// The number of sorted dice that count toward the result.
    pub fn keep_count(&self) -> u32 {
        self.keep_count
    }

    /// The order applied before taking the kept prefix.
    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    /// Flat amount added to the kept dice.
    pub fn additive(&self) -> i64 {
        self.additive
    }

    /// Final advantage state.
    pub fn vantage(&self) -> Vantage {
        self.vantage
    }

    /// Human-readable summary of the applied modifiers.
    pub fn options(&self) -> &str {
        &self.options
    }
}
