//! Dice-roll evaluation and ability-score derivation for Chargen.
//!
//! Rolls are described as a die size, a dice count, and modifier phrases
//! such as `"drop lowest 1"` or `"advantage"`. A [`Roller`] evaluates the
//! phrases into a [`RollPlan`], draws dice from its [`RandomSource`], and
//! reports each [`Roll`] to an audit sink. The same roller generates
//! six-ability arrays from a [`RollingOption`], assigns them by priority
//! order, and layers bonuses into an [`AbilityArray`].

pub mod abilities;
pub mod config;
pub mod dice;
pub mod error;

pub use abilities::{
    Ability, AbilityArray, AbilityRequest, AbilityScores, BaseAbilities, BonusCategory,
    RollingOption, ability_modifier, get_ability_array, point_buy_cost,
};
pub use config::RollerConfig;
pub use dice::{
    DiceNotation, EngineRng, FixedSequence, RandomSource, Roll, RollAudit, RollModifier,
    RollPlan, Roller, SecureRandom, SeededRandom, SilentAudit, TracingAudit, Vantage,
    perform_roll,
};
pub use error::{MechError, MechResult};
