//! Raw ability values and their assignment to abilities.

use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::abilities::array::AbilityArray;
use crate::abilities::{Ability, AbilityScores};
use crate::dice::modifier::{Extreme, RollModifier};
use crate::dice::roll::Roller;
use crate::dice::source::RandomSource;
use crate::error::{MechError, MechResult};

/// The standard array.
pub const STANDARD_ARRAY: [i32; 6] = [15, 14, 13, 12, 10, 8];
/// 27-point buy spread evenly.
pub const POINTBUY_EVEN: [i32; 6] = [13, 13, 13, 12, 12, 12];
/// 27-point buy with one 15.
pub const POINTBUY_ONEMAX: [i32; 6] = [15, 12, 12, 12, 12, 10];
/// 27-point buy with two 15s.
pub const POINTBUY_TWOMAX: [i32; 6] = [15, 15, 11, 10, 10, 10];
/// 27-point buy with three 15s.
pub const POINTBUY_THREEMAX: [i32; 6] = [15, 15, 15, 8, 8, 8];

/// Strategy for producing six raw ability values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollingOption {
    /// Roll 4d6 and drop the lowest die, six times.
    Common,
    /// Roll 3d6, six times.
    Strict,
    /// The standard array.
    Standard,
    /// Point buy, all scores 12 or 13.
    PointbuyEven,
    /// Point buy with one maxed score.
    PointbuyOnemax,
    /// Point buy with two maxed scores.
    PointbuyTwomax,
    /// Point buy with three maxed scores.
    PointbuyThreemax,
}

impl RollingOption {
    /// Every rolling option.
    pub const ALL: [RollingOption; 7] = [
        Self::Common,
        Self::Strict,
        Self::Standard,
        Self::PointbuyEven,
        Self::PointbuyOnemax,
        Self::PointbuyTwomax,
        Self::PointbuyThreemax,
    ];

    /// The option tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Strict => "strict",
            Self::Standard => "standard",
            Self::PointbuyEven => "pointbuy_even",
            Self::PointbuyOnemax => "pointbuy_onemax",
            Self::PointbuyTwomax => "pointbuy_twomax",
            Self::PointbuyThreemax => "pointbuy_threemax",
        }
    }

    /// The predefined values for array-based options, highest first.
    ///
    /// Returns `None` for dice-driven options.
    pub fn fixed_array(self) -> Option<[i32; 6]> {
        match self {
            Self::Standard => Some(STANDARD_ARRAY),
            Self::PointbuyEven => Some(POINTBUY_EVEN),
            Self::PointbuyOnemax => Some(POINTBUY_ONEMAX),
            Self::PointbuyTwomax => Some(POINTBUY_TWOMAX),
            Self::PointbuyThreemax => Some(POINTBUY_THREEMAX),
            Self::Common | Self::Strict => None,
        }
    }

    fn dice(self) -> Option<(u32, &'static [RollModifier])> {
        const DROP_LOWEST: &[RollModifier] = &[RollModifier::Drop {
            extreme: Extreme::Lowest,
            count: 1,
        }];
        match self {
            Self::Common => Some((4, DROP_LOWEST)),
            Self::Strict => Some((3, &[])),
            _ => None,
        }
    }
}

impl FromStr for RollingOption {
    type Err = MechError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|o| o.as_str() == tag)
            .ok_or_else(|| MechError::UnknownRollingOption(s.to_string()))
    }
}

impl std::fmt::Display for RollingOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cost of a set of scores under the 27-point buy.
///
/// Returns `None` if any score is outside 8..=15.
pub fn point_buy_cost(scores: &[i32]) -> Option<u32> {
    scores
        .iter()
        .map(|&score| match score {
            8 => Some(0),
            9 => Some(1),
            10 => Some(2),
            11 => Some(3),
            12 => Some(4),
            13 => Some(5),
            14 => Some(7),
            15 => Some(9),
            _ => None,
        })
        .sum()
}

/// Check that `order` names every ability exactly once.
pub fn validate_sort_order(order: &[Ability]) -> MechResult<()> {
    if order.len() != Ability::ALL.len() {
        return Err(MechError::InvalidSortOrder(format!(
            "expected 6 abilities, got {}",
            order.len()
        )));
    }
    for ability in Ability::ALL {
        let seen = order.iter().filter(|&&a| a == ability).count();
        if seen != 1 {
            return Err(MechError::InvalidSortOrder(format!(
                "'{ability}' appears {seen} times"
            )));
        }
    }
    Ok(())
}

/// Parse a comma- or space-separated list of six ability codes.
pub fn parse_sort_order(s: &str) -> MechResult<[Ability; 6]> {
    let parsed = s
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(str::parse)
        .collect::<MechResult<Vec<Ability>>>()?;
    validate_sort_order(&parsed)?;
    let mut order = Ability::ALL;
    order.copy_from_slice(&parsed);
    Ok(order)
}

/// Six raw values and their assignment by priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaseAbilities {
    /// The six values before assignment, highest first.
    pub raw: [i32; 6],
    /// How the values were produced.
    pub rolling_option: RollingOption,
    /// Abilities in priority order; `raw[i]` goes to `sort_order[i]`.
    pub sort_order: [Ability; 6],
    /// The assigned scores.
    pub base: AbilityScores,
}

/// Everything needed to build an [`AbilityArray`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityRequest {
    /// Generation strategy.
    pub rolling_option: RollingOption,
    /// Abilities in priority order.
    pub sort_order: [Ability; 6],
    /// Increases from level advancement.
    pub level_change_increase: AbilityScores,
    /// Any other bonuses.
    pub additional_bonus: AbilityScores,
    /// Correlation tag for audit output.
    pub ctx_ref: String,
    /// Raises the score ceiling from 20 to 30.
    pub is_monster_or_god: bool,
}

impl Default for AbilityRequest {
    fn default() -> Self {
        Self {
            rolling_option: RollingOption::Common,
            sort_order: Ability::ALL,
            level_change_increase: AbilityScores::default(),
            additional_bonus: AbilityScores::default(),
            ctx_ref: String::new(),
            is_monster_or_god: false,
        }
    }
}

impl<R: RandomSource> Roller<R> {
    /// Produce six raw values and assign them in priority order.
    ///
    /// Dice-driven options roll six times, each under its own correlation
    /// tag derived from `ctx_ref`.
    pub fn base_ability_array(
        &mut self,
        rolling_option: RollingOption,
        sort_order: &[Ability; 6],
        ctx_ref: &str,
    ) -> MechResult<BaseAbilities> {
        validate_sort_order(sort_order)?;

        let raw = match rolling_option.dice() {
            Some((times, modifiers)) => self.roll_raw(times, modifiers, ctx_ref)?,
            None => rolling_option
                .fixed_array()
                .ok_or_else(|| MechError::UnknownRollingOption(rolling_option.to_string()))?,
        };

        let mut base = AbilityScores::default();
        for (ability, value) in sort_order.iter().zip(raw) {
            base[*ability] = value;
        }

        let abilities = BaseAbilities {
            raw,
            rolling_option,
            sort_order: *sort_order,
            base,
        };
        self.audit().record_abilities(ctx_ref, &abilities);
        Ok(abilities)
    }

    /// Generate a complete ability array.
    pub fn ability_array(&mut self, request: &AbilityRequest) -> MechResult<AbilityArray> {
        let base = self.base_ability_array(
            request.rolling_option,
            &request.sort_order,
            &request.ctx_ref,
        )?;
        Ok(AbilityArray::build(
            base,
            request.level_change_increase,
            request.additional_bonus,
            request.is_monster_or_god,
            &request.ctx_ref,
        ))
    }

    fn roll_raw(
        &mut self,
        times: u32,
        modifiers: &[RollModifier],
        ctx_ref: &str,
    ) -> MechResult<[i32; 6]> {
        let mut raw = [0; 6];
        for (index, slot) in raw.iter_mut().enumerate() {
            let tag = format!(
                "{ctx_ref}-{}-{}-{index}",
                Utc::now().timestamp_millis(),
                Uuid::new_v4().simple()
            );
            let roll = self.roll_with(6, times, &tag, modifiers)?;
            *slot = roll.result().clamp(i32::MIN.into(), i32::MAX.into()) as i32;
        }
        raw.sort_unstable_by(|a, b| b.cmp(a));
        Ok(raw)
    }
}

/// Generate an ability array with operating-system entropy.
pub fn get_ability_array(request: &AbilityRequest) -> MechResult<AbilityArray> {
    Roller::secure().ability_array(request)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::abilities::Ability::*;
    use crate::dice::audit::{RollAudit, SilentAudit};
    use crate::dice::roll::Roll;
    use crate::dice::source::FixedSequence;

    #[derive(Default)]
    struct CtxRefs(Mutex<Vec<String>>);

    impl RollAudit for CtxRefs {
        fn record(&self, roll: &Roll) {
            self.0.lock().unwrap().push(roll.ctx_ref().to_string());
        }
    }

    #[derive(Default)]
    struct AbilityLog(Mutex<Vec<(String, BaseAbilities)>>);

    impl RollAudit for AbilityLog {
        fn record(&self, _roll: &Roll) {}

        fn record_abilities(&self, ctx_ref: &str, abilities: &BaseAbilities) {
            self.0
                .lock()
                .unwrap()
                .push((ctx_ref.to_string(), abilities.clone()));
        }
    }

    fn fixed(values: &[u32]) -> Roller<FixedSequence> {
        Roller::new(FixedSequence::new(values.to_vec())).with_audit(SilentAudit)
    }

    #[test]
    fn standard_array_assigned_by_priority() {
        let order = [Dex, Con, Str, Cha, Wis, Int];
        let base = fixed(&[1])
            .base_ability_array(RollingOption::Standard, &order, "ctx")
            .unwrap();
        assert_eq!(base.raw, [15, 14, 13, 12, 10, 8]);
        assert_eq!(base.base[Dex], 15);
        assert_eq!(base.base[Con], 14);
        assert_eq!(base.base[Str], 13);
        assert_eq!(base.base[Cha], 12);
        assert_eq!(base.base[Wis], 10);
        assert_eq!(base.base[Int], 8);
    }

    #[test]
    fn generated_abilities_reach_the_audit_sink() {
        let audit = Arc::new(AbilityLog::default());
        let mut roller = Roller::new(FixedSequence::constant(4)).with_shared_audit(audit.clone());
        let standard = roller
            .base_ability_array(RollingOption::Standard, &Ability::ALL, "npc")
            .unwrap();
        let common = roller
            .base_ability_array(RollingOption::Common, &Ability::ALL, "pc")
            .unwrap();

        let log = audit.0.lock().unwrap();
        assert_eq!(
            *log,
            vec![("npc".to_string(), standard), ("pc".to_string(), common)]
        );
    }

    #[test]
    fn invalid_sort_order_is_not_audited() {
        let audit = Arc::new(AbilityLog::default());
        let mut roller = Roller::new(FixedSequence::constant(4)).with_shared_audit(audit.clone());
        let order = [Str, Str, Con, Int, Wis, Cha];
        assert!(
            roller
                .base_ability_array(RollingOption::Standard, &order, "ctx")
                .is_err()
        );
        assert!(audit.0.lock().unwrap().is_empty());
    }

    #[test]
    fn fixed_arrays_do_not_roll() {
        let audit = Arc::new(CtxRefs::default());
        let mut roller =
            Roller::new(FixedSequence::new(Vec::new())).with_shared_audit(audit.clone());
        for option in RollingOption::ALL {
            if let Some(values) = option.fixed_array() {
                let base = roller
                    .base_ability_array(option, &Ability::ALL, "ctx")
                    .unwrap();
                assert_eq!(base.raw, values);
            }
        }
        assert!(audit.0.lock().unwrap().is_empty());
    }

    #[test]
    fn point_buy_arrays_cost_27() {
        for values in [POINTBUY_EVEN, POINTBUY_ONEMAX, POINTBUY_TWOMAX, POINTBUY_THREEMAX] {
            assert_eq!(point_buy_cost(&values), Some(27));
        }
        assert_eq!(point_buy_cost(&STANDARD_ARRAY), Some(27));
        assert_eq!(point_buy_cost(&[16, 8, 8, 8, 8, 8]), None);
        assert_eq!(point_buy_cost(&[]), Some(0));
    }

    #[test]
    fn common_drops_lowest_and_sorts() {
        let dice = [
            6, 5, 4, 1, // 15
            3, 3, 3, 3, // 9
            6, 6, 6, 6, // 18
            2, 1, 1, 1, // 4
            5, 4, 3, 2, // 12
            1, 1, 1, 1, // 3
        ];
        let base = fixed(&dice)
            .base_ability_array(RollingOption::Common, &Ability::ALL, "ctx")
            .unwrap();
        assert_eq!(base.raw, [18, 15, 12, 9, 4, 3]);
        assert_eq!(base.base[Str], 18);
        assert_eq!(base.base[Cha], 3);
    }

    #[test]
    fn strict_sums_three_dice() {
        let dice = [6, 6, 6, 1, 1, 1, 4, 4, 4, 2, 3, 4, 5, 5, 5, 1, 2, 3];
        let base = fixed(&dice)
            .base_ability_array(RollingOption::Strict, &Ability::ALL, "ctx")
            .unwrap();
        assert_eq!(base.raw, [18, 15, 12, 9, 6, 3]);
    }

    #[test]
    fn each_ability_roll_gets_its_own_ctx_ref() {
        let audit = Arc::new(CtxRefs::default());
        let mut roller =
            Roller::new(FixedSequence::constant(4)).with_shared_audit(audit.clone());
        roller
            .base_ability_array(RollingOption::Common, &Ability::ALL, "req")
            .unwrap();

        let refs = audit.0.lock().unwrap();
        assert_eq!(refs.len(), 6);
        for (index, tag) in refs.iter().enumerate() {
            let parts: Vec<&str> = tag.split('-').collect();
            assert_eq!(parts.len(), 4, "{tag}");
            assert_eq!(parts[0], "req");
            assert!(parts[1].parse::<i64>().is_ok());
            assert_eq!(parts[2].len(), 32);
            assert_eq!(parts[3], index.to_string());
        }
        assert_ne!(refs[0], refs[1]);
    }

    #[test]
    fn rolling_option_tags() {
        assert_eq!(
            "pointbuy_twomax".parse::<RollingOption>().unwrap(),
            RollingOption::PointbuyTwomax
        );
        assert_eq!(
            "Standard".parse::<RollingOption>().unwrap(),
            RollingOption::Standard
        );
        for option in RollingOption::ALL {
            assert_eq!(option.as_str().parse::<RollingOption>().unwrap(), option);
            let json = serde_json::to_value(option).unwrap();
            assert_eq!(json, serde_json::json!(option.as_str()));
        }
        assert!(matches!(
            "heroic".parse::<RollingOption>(),
            Err(MechError::UnknownRollingOption(tag)) if tag == "heroic"
        ));
    }

    #[test]
    fn sort_order_must_be_a_permutation() {
        let order = [Str, Str, Con, Int, Wis, Cha];
        let result = fixed(&[1]).base_ability_array(RollingOption::Standard, &order, "ctx");
        assert!(matches!(result, Err(MechError::InvalidSortOrder(_))));
    }

    #[test]
    fn parse_sort_order_accepts_commas_and_spaces() {
        assert_eq!(
            parse_sort_order("dex,con,str,cha,wis,int").unwrap(),
            [Dex, Con, Str, Cha, Wis, Int]
        );
        assert_eq!(
            parse_sort_order("DEX CON STR CHA WIS INT").unwrap(),
            [Dex, Con, Str, Cha, Wis, Int]
        );
        assert!(matches!(
            parse_sort_order("dex,con,str"),
            Err(MechError::InvalidSortOrder(_))
        ));
        assert!(matches!(
            parse_sort_order("dex,con,str,cha,wis,luck"),
            Err(MechError::UnknownAbility(_))
        ));
    }

    #[test]
    fn ability_array_applies_bonuses() {
        let request = AbilityRequest {
            rolling_option: RollingOption::Standard,
            sort_order: [Dex, Con, Str, Cha, Wis, Int],
            level_change_increase: AbilityScores {
                dex: 2,
                ..Default::default()
            },
            additional_bonus: AbilityScores {
                dex: 5,
                int: 1,
                ..Default::default()
            },
            ctx_ref: "npc-7".to_string(),
            is_monster_or_god: false,
        };
        let array = fixed(&[1]).ability_array(&request).unwrap();
        assert_eq!(array.score(Dex), 20);
        assert_eq!(array.modifier(Dex), 5);
        assert_eq!(array.score(Int), 9);
        assert_eq!(array.modifier(Int), -1);
        assert_eq!(array.ctx_ref(), "npc-7");
        assert_eq!(array.rolling_option(), RollingOption::Standard);
    }

    #[test]
    fn secure_ability_array_in_range() {
        let array = get_ability_array(&AbilityRequest::default()).unwrap();
        for (_, value) in array.values().iter() {
            assert!((3..=18).contains(&value));
        }
        let raw = array.raw();
        assert!(raw.windows(2).all(|w| w[0] >= w[1]));
    }
}
