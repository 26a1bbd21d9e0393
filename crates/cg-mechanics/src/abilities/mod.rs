//! Ability scores: the six abilities, per-ability records, and modifiers.
//!
//! Ability arrays are produced in two steps. [`generation`] turns a
//! rolling option into six raw values and assigns them by priority order;
//! [`array`] layers bonuses on top, clamps, and derives modifiers.

pub mod array;
pub mod generation;

pub use array::{AbilityArray, BonusCategory};
pub use generation::{
    AbilityRequest, BaseAbilities, POINTBUY_EVEN, POINTBUY_ONEMAX, POINTBUY_THREEMAX,
    POINTBUY_TWOMAX, RollingOption, STANDARD_ARRAY, get_ability_array, parse_sort_order,
    point_buy_cost, validate_sort_order,
};

use std::ops::{Index, IndexMut};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MechError;

/// One of the six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    /// Strength.
    Str,
    /// Dexterity.
    Dex,
    /// Constitution.
    Con,
    /// Intelligence.
    Int,
    /// Wisdom.
    Wis,
    /// Charisma.
    Cha,
}

impl Ability {
    /// All abilities in canonical order.
    pub const ALL: [Ability; 6] = [
        Self::Str,
        Self::Dex,
        Self::Con,
        Self::Int,
        Self::Wis,
        Self::Cha,
    ];

    /// The three-letter code.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Str => "str",
            Self::Dex => "dex",
            Self::Con => "con",
            Self::Int => "int",
            Self::Wis => "wis",
            Self::Cha => "cha",
        }
    }
}

impl FromStr for Ability {
    type Err = MechError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "str" => Ok(Self::Str),
            "dex" => Ok(Self::Dex),
            "con" => Ok(Self::Con),
            "int" => Ok(Self::Int),
            "wis" => Ok(Self::Wis),
            "cha" => Ok(Self::Cha),
            _ => Err(MechError::UnknownAbility(s.to_string())),
        }
    }
}

impl std::fmt::Display for Ability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One integer per ability.
///
/// Serializes as an object keyed by ability code. Missing keys read as 0;
/// unknown keys are rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AbilityScores {
    /// Strength.
    pub str: i32,
    /// Dexterity.
    pub dex: i32,
    /// Constitution.
    pub con: i32,
    /// Intelligence.
    pub int: i32,
    /// Wisdom.
    pub wis: i32,
    /// Charisma.
    pub cha: i32,
}

impl AbilityScores {
    /// Build a record by evaluating `f` for every ability.
    pub fn from_fn(mut f: impl FnMut(Ability) -> i32) -> Self {
        let mut scores = Self::default();
        for ability in Ability::ALL {
            scores[ability] = f(ability);
        }
        scores
    }

    /// Iterate `(ability, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Ability, i32)> + '_ {
        Ability::ALL.into_iter().map(move |a| (a, self[a]))
    }
}

impl Index<Ability> for AbilityScores {
    type Output = i32;

    fn index(&self, ability: Ability) -> &i32 {
        match ability {
            Ability::Str => &self.str,
            Ability::Dex => &self.dex,
            Ability::Con => &self.con,
            Ability::Int => &self.int,
            Ability::Wis => &self.wis,
            Ability::Cha => &self.cha,
        }
    }
}

impl IndexMut<Ability> for AbilityScores {
    fn index_mut(&mut self, ability: Ability) -> &mut i32 {
        match ability {
            Ability::Str => &mut self.str,
            Ability::Dex => &mut self.dex,
            Ability::Con => &mut self.con,
            Ability::Int => &mut self.int,
            Ability::Wis => &mut self.wis,
            Ability::Cha => &mut self.cha,
        }
    }
}

const MODIFIER_TABLE: [i32; 30] = [
    -5, -4, -4, -3, -3, -2, -2, -1, -1, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9,
    9, 10,
];

/// The modifier for an ability score.
///
/// Scores 1 through 30 come from the standard table; anything else follows
/// the same `floor((score - 10) / 2)` curve.
pub fn ability_modifier(score: i32) -> i32 {
    match usize::try_from(score) {
        Ok(n @ 1..=30) => MODIFIER_TABLE[n - 1],
        _ => (i64::from(score) - 10).div_euclid(2) as i32,
    }
}
