//! Roll modifier tokens.
//!
//! Callers describe modifiers as short phrases such as `"keep highest 3"`
//! or `"advantage"`. Each phrase is parsed once into a [`RollModifier`]
//! before any plan is evaluated.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MechError, MechResult};

/// Which end of the sorted dice a keep or drop applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extreme {
    /// The largest dice.
    Highest,
    /// The smallest dice.
    Lowest,
}

impl Extreme {
    /// The keyword used in modifier tokens.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Highest => "highest",
            Self::Lowest => "lowest",
        }
    }
}

impl FromStr for Extreme {
    type Err = MechError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "highest" => Ok(Self::Highest),
            "lowest" => Ok(Self::Lowest),
            other => Err(MechError::InvalidOption(format!(
                "unknown direction '{other}', expected 'highest' or 'lowest'"
            ))),
        }
    }
}

impl std::fmt::Display for Extreme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single parsed roll modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollModifier {
    /// Keep only the `count` dice at one end.
    Keep {
        /// Which end to keep.
        extreme: Extreme,
        /// How many dice to keep.
        count: u32,
    },
    /// Discard `count` dice from one end.
    Drop {
        /// Which end to discard.
        extreme: Extreme,
        /// How many dice to discard.
        count: u32,
    },
    /// Add a flat amount to the result.
    Add(i64),
    /// Subtract a flat amount from the result.
    Subtract(i64),
    /// Roll twice and keep the better die.
    Advantage,
    /// Roll twice and keep the worse die.
    Disadvantage,
}

impl FromStr for RollModifier {
    type Err = MechError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let words: Vec<String> = s.split_whitespace().map(str::to_lowercase).collect();
        let words: Vec<&str> = words.iter().map(String::as_str).collect();

        match words.as_slice() {
            ["keep", extreme, count] => Ok(Self::Keep {
                extreme: extreme.parse()?,
                count: parse_count(s, count)?,
            }),
            ["drop", extreme, count] => Ok(Self::Drop {
                extreme: extreme.parse()?,
                count: parse_count(s, count)?,
            }),
            ["add", amount] => Ok(Self::Add(parse_amount(s, amount)?)),
            ["subtract", amount] => Ok(Self::Subtract(parse_amount(s, amount)?)),
            ["advantage"] => Ok(Self::Advantage),
            ["disadvantage"] => Ok(Self::Disadvantage),
            [] => Err(MechError::InvalidOption("empty option".to_string())),
            [verb, ..] if KNOWN_VERBS.contains(verb) => Err(MechError::InvalidOption(format!(
                "wrong number of arguments in '{}'",
                s.trim()
            ))),
            [verb, ..] => Err(MechError::InvalidOption(format!(
                "unknown option '{verb}'"
            ))),
        }
    }
}

const KNOWN_VERBS: [&str; 6] = [
    "keep",
    "drop",
    "add",
    "subtract",
    "advantage",
    "disadvantage",
];

fn parse_count(token: &str, word: &str) -> MechResult<u32> {
    word.parse().map_err(|_| {
        MechError::InvalidOption(format!("'{word}' is not a dice count in '{}'", token.trim()))
    })
}

fn parse_amount(token: &str, word: &str) -> MechResult<i64> {
    word.parse().map_err(|_| {
        MechError::InvalidOption(format!("'{word}' is not a number in '{}'", token.trim()))
    })
}

impl std::fmt::Display for RollModifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Keep { extreme, count } => write!(f, "keep {extreme} {count}"),
            Self::Drop { extreme, count } => write!(f, "drop {extreme} {count}"),
            Self::Add(n) => write!(f, "add {n}"),
            Self::Subtract(n) => write!(f, "subtract {n}"),
            Self::Advantage => write!(f, "advantage"),
            Self::Disadvantage => write!(f, "disadvantage"),
        }
    }
}

/// Parse a list of modifier tokens, failing on the first bad one.
pub fn parse_modifiers<S: AsRef<str>>(tokens: &[S]) -> MechResult<Vec<RollModifier>> {
    tokens.iter().map(|t| t.as_ref().parse()).collect()
}
