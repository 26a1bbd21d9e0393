//! Final ability scores with bonuses, clamping, and modifiers.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::abilities::generation::{BaseAbilities, RollingOption};
use crate::abilities::{Ability, AbilityScores, ability_modifier};
use crate::error::{MechError, MechResult};

/// Highest score for ordinary characters.
pub const NORMAL_CEILING: i32 = 20;
/// Highest score for monsters and gods.
pub const ELEVATED_CEILING: i32 = 30;

/// A bonus layer that can be adjusted after generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BonusCategory {
    /// Increases gained by levelling up.
    LevelChangeIncrease,
    /// Any other bonus.
    AdditionalBonus,
}

impl BonusCategory {
    /// The category name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LevelChangeIncrease => "LevelChangeIncrease",
            Self::AdditionalBonus => "AdditionalBonus",
        }
    }
}

impl FromStr for BonusCategory {
    type Err = MechError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-'], "").as_str() {
            "levelchangeincrease" | "level" => Ok(Self::LevelChangeIncrease),
            "additionalbonus" | "bonus" => Ok(Self::AdditionalBonus),
            _ => Err(MechError::UnknownBonusCategory(s.to_string())),
        }
    }
}

impl std::fmt::Display for BonusCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A complete set of ability scores.
///
/// `values` and `modifiers` are always derived from the base and bonus
/// layers; the only mutation is [`AbilityArray::adjust_values`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AbilityArray {
    raw: [i32; 6],
    rolling_option: RollingOption,
    sort_order: [Ability; 6],
    base: AbilityScores,
    level_change_increase: AbilityScores,
    additional_bonus: AbilityScores,
    values: AbilityScores,
    modifiers: AbilityScores,
    is_monster_or_god: bool,
    ctx_ref: String,
}

impl AbilityArray {
    /// Combine generated base scores with bonus layers.
    pub fn build(
        base: BaseAbilities,
        level_change_increase: AbilityScores,
        additional_bonus: AbilityScores,
        is_monster_or_god: bool,
        ctx_ref: &str,
    ) -> Self {
        let mut array = Self {
            raw: base.raw,
            rolling_option: base.rolling_option,
            sort_order: base.sort_order,
            base: base.base,
            level_change_increase,
            additional_bonus,
            values: AbilityScores::default(),
            modifiers: AbilityScores::default(),
            is_monster_or_god,
            ctx_ref: ctx_ref.to_string(),
        };
        array.recompute();
        array
    }

    fn recompute(&mut self) {
        let ceiling = self.ceiling();
        self.values = AbilityScores::from_fn(|a| {
            let total = i64::from(self.base[a])
                + i64::from(self.level_change_increase[a])
                + i64::from(self.additional_bonus[a]);
            i32::try_from(total.min(i64::from(ceiling))).unwrap_or(i32::MIN)
        });
        self.modifiers = AbilityScores::from_fn(|a| ability_modifier(self.values[a]));
    }

    /// The highest value any score may reach.
    pub fn ceiling(&self) -> i32 {
        if self.is_monster_or_god {
            ELEVATED_CEILING
        } else {
            NORMAL_CEILING
        }
    }

    /// Add `delta` to one ability in a bonus layer and recompute.
    ///
    /// Layers wrap on overflow, so an adjustment is always undone by the
    /// opposite delta.
    pub fn adjust_values(&mut self, category: BonusCategory, ability: Ability, delta: i32) {
        let layer = match category {
            BonusCategory::LevelChangeIncrease => &mut self.level_change_increase,
            BonusCategory::AdditionalBonus => &mut self.additional_bonus,
        };
        layer[ability] = layer[ability].wrapping_add(delta);
        self.recompute();
        tracing::debug!(
            ctx_ref = %self.ctx_ref,
            category = %category,
            ability = %ability,
            delta,
            value = self.values[ability],
            "ability adjusted"
        );
    }

    /// Final score for an ability.
    pub fn score(&self, ability: Ability) -> i32 {
        self.values[ability]
    }

    /// Modifier for an ability.
    pub fn modifier(&self, ability: Ability) -> i32 {
        self.modifiers[ability]
    }

    /// Final score looked up by ability code.
    pub fn get_score(&self, code: &str) -> MechResult<i32> {
        Ok(self.score(code.parse()?))
    }

    /// Modifier looked up by ability code.
    pub fn get_modifier(&self, code: &str) -> MechResult<i32> {
        Ok(self.modifier(code.parse()?))
    }

    /// Raw generated values, highest first.
    pub fn raw(&self) -> &[i32; 6] {
        &self.raw
    }

    /// How the raw values were produced.
    pub fn rolling_option(&self) -> RollingOption {
        self.rolling_option
    }

    /// Abilities in priority order.
    pub fn sort_order(&self) -> &[Ability; 6] {
        &self.sort_order
    }

    /// Scores as assigned from the raw values.
    pub fn base(&self) -> &AbilityScores {
        &self.base
    }

    /// Level advancement layer.
    pub fn level_change_increase(&self) -> &AbilityScores {
        &self.level_change_increase
    }

    /// Additional bonus layer.
    pub fn additional_bonus(&self) -> &AbilityScores {
        &self.additional_bonus
    }

    /// Final clamped scores.
    pub fn values(&self) -> &AbilityScores {
        &self.values
    }

    /// Modifiers for the final scores.
    pub fn modifiers(&self) -> &AbilityScores {
        &self.modifiers
    }

    /// Whether the elevated ceiling applies.
    pub fn is_monster_or_god(&self) -> bool {
        self.is_monster_or_god
    }

    /// Correlation tag.
    pub fn ctx_ref(&self) -> &str {
        &self.ctx_ref
    }
}
