//! Roll execution and the resolved roll record.

use std::sync::Arc;

use serde::Serialize;

use crate::config::RollerConfig;
use crate::dice::audit::{RollAudit, SilentAudit, TracingAudit};
use crate::dice::modifier::{RollModifier, parse_modifiers};
use crate::dice::plan::RollPlan;
use crate::dice::source::{EngineRng, RandomSource, SecureRandom};
use crate::error::{MechError, MechResult};

/// One resolved dice evaluation.
///
/// Serialized field names are part of the public wire shape and must not
/// change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Roll {
    sides: u32,
    times_to_roll: u32,
    rolls_generated: Vec<u32>,
    rolls_used: Vec<u32>,
    additive_value: i64,
    result: i64,
    options: String,
    ctx_ref: String,
}

impl Roll {
    /// Number of faces on each die.
    pub fn sides(&self) -> u32 {
        self.sides
    }

    /// Number of dice requested before modifiers.
    pub fn times_to_roll(&self) -> u32 {
        self.times_to_roll
    }

    /// Every generated die, in the order used to pick the kept ones.
    pub fn rolls_generated(&self) -> &[u32] {
        &self.rolls_generated
    }

    /// The dice that count toward the result.
    pub fn rolls_used(&self) -> &[u32] {
        &self.rolls_used
    }

    /// Net flat modifier.
    pub fn additive_value(&self) -> i64 {
        self.additive_value
    }

    /// Sum of the used dice plus the flat modifier.
    pub fn result(&self) -> i64 {
        self.result
    }

    /// Summary of the applied modifiers.
    pub fn options(&self) -> &str {
        &self.options
    }

    /// Caller-supplied correlation tag.
    pub fn ctx_ref(&self) -> &str {
        &self.ctx_ref
    }
}

impl std::fmt::Display for Roll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kept = self.rolls_used.len();
        let values: Vec<String> = self
            .rolls_generated
            .iter()
            .enumerate()
            .map(|(i, v)| {
                if i < kept {
                    v.to_string()
                } else {
                    format!("({v})")
                }
            })
            .collect();
        write!(f, "[{}]", values.join(", "))?;
        if self.additive_value > 0 {
            write!(f, " + {}", self.additive_value)?;
        } else if self.additive_value < 0 {
            write!(f, " - {}", self.additive_value.unsigned_abs())?;
        }
        write!(f, " = {}", self.result)
    }
}

/// Resolves rolls with an owned random source and a shared audit sink.
pub struct Roller<R = SecureRandom> {
    source: R,
    audit: Arc<dyn RollAudit + Send + Sync>,
}

impl Roller<SecureRandom> {
    /// A roller backed by operating-system entropy and `tracing` audit.
    pub fn secure() -> Self {
        Self::new(SecureRandom)
    }
}

impl Roller<EngineRng> {
    /// Build a roller from configuration.
    pub fn from_config(config: &RollerConfig) -> Self {
        let roller = Self::new(EngineRng::from_seed(config.seed));
        if config.audit {
            roller
        } else {
            roller.with_audit(SilentAudit)
        }
    }
}

impl<R: RandomSource> Roller<R> {
    /// Create a roller that audits through `tracing`.
    pub fn new(source: R) -> Self {
        Self {
            source,
            audit: Arc::new(TracingAudit),
        }
    }

    /// Replace the audit sink.
    pub fn with_audit(self, audit: impl RollAudit + Send + Sync + 'static) -> Self {
        self.with_shared_audit(Arc::new(audit))
    }

    /// Replace the audit sink with one shared with other rollers.
    pub fn with_shared_audit(mut self, audit: Arc<dyn RollAudit + Send + Sync>) -> Self {
        self.audit = audit;
        self
    }

    pub(crate) fn audit(&self) -> &(dyn RollAudit + Send + Sync) {
        self.audit.as_ref()
    }

    /// Roll `times_to_roll` dice of `sides` faces under the given option tokens.
    ///
    /// Tokens use the phrase form accepted by [`RollModifier`]'s parser,
    /// for example `"drop lowest 1"` or `"advantage"`.
    pub fn perform_roll<S: AsRef<str>>(
        &mut self,
        sides: u32,
        times_to_roll: u32,
        ctx_ref: &str,
        options: &[S],
    ) -> MechResult<Roll> {
        let modifiers = parse_modifiers(options)?;
        self.roll_with(sides, times_to_roll, ctx_ref, &modifiers)
    }

    /// Roll with already-parsed modifiers.
    pub fn roll_with(
        &mut self,
        sides: u32,
        times_to_roll: u32,
        ctx_ref: &str,
        modifiers: &[RollModifier],
    ) -> MechResult<Roll> {
        let plan = RollPlan::evaluate(times_to_roll, modifiers)?;
        self.execute(sides, &plan, ctx_ref)
    }

    /// Generate, order, and keep dice according to an evaluated plan.
    pub fn execute(&mut self, sides: u32, plan: &RollPlan, ctx_ref: &str) -> MechResult<Roll> {
        if sides == 0 {
            return Err(MechError::InvalidDice(
                "a die needs at least one side".to_string(),
            ));
        }

        let mut generated = (0..plan.eval_count())
            .map(|_| self.source.roll_die(sides))
            .collect::<MechResult<Vec<u32>>>()?;
        plan.sort_direction().sort(&mut generated);

        let used = generated[..plan.keep_count() as usize].to_vec();
        let dice_total: i64 = used.iter().map(|&v| i64::from(v)).sum();

        let roll = Roll {
            sides,
            times_to_roll: plan.times_to_roll(),
            rolls_generated: generated,
            rolls_used: used,
            additive_value: plan.additive(),
            result: dice_total.saturating_add(plan.additive()),
            options: plan.options().to_string(),
            ctx_ref: ctx_ref.to_string(),
        };

        self.audit.record(&roll);
        Ok(roll)
    }
}

/// Roll with operating-system entropy and `tracing` audit.
pub fn perform_roll<S: AsRef<str>>(
    sides: u32,
    times_to_roll: u32,
    ctx_ref: &str,
    options: &[S],
) -> MechResult<Roll> {
    Roller::secure().perform_roll(sides, times_to_roll, ctx_ref, options)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::dice::source::FixedSequence;

    #[derive(Default)]
    struct RecordingAudit {
        rolls: Mutex<Vec<Roll>>,
    }

    impl RollAudit for RecordingAudit {
        fn record(&self, roll: &Roll) {
            self.rolls.lock().unwrap().push(roll.clone());
        }
    }

    fn fixed(values: &[u32]) -> Roller<FixedSequence> {
        Roller::new(FixedSequence::new(values.to_vec())).with_audit(SilentAudit)
    }

    #[test]
    fn plain_roll_sums_everything() {
        let roll = fixed(&[2, 5, 3])
            .perform_roll::<&str>(6, 3, "ctx", &[])
            .unwrap();
        assert_eq!(roll.rolls_generated(), &[5, 3, 2]);
        assert_eq!(roll.rolls_used(), &[5, 3, 2]);
        assert_eq!(roll.result(), 10);
        assert_eq!(roll.options(), "");
        assert_eq!(roll.ctx_ref(), "ctx");
    }

    #[test]
    fn drop_lowest_keeps_top_three() {
        let roll = fixed(&[1, 6, 4, 3])
            .perform_roll(6, 4, "ctx", &["drop lowest 1"])
            .unwrap();
        assert_eq!(roll.rolls_generated(), &[6, 4, 3, 1]);
        assert_eq!(roll.rolls_used(), &[6, 4, 3]);
        assert_eq!(roll.result(), 13);
        assert_eq!(roll.options(), "drop lowest: 1; ");
    }

    #[test]
    fn drop_highest_keeps_bottom() {
        let roll = fixed(&[1, 6, 4, 3])
            .perform_roll(6, 4, "ctx", &["drop highest 1"])
            .unwrap();
        assert_eq!(roll.rolls_generated(), &[1, 3, 4, 6]);
        assert_eq!(roll.rolls_used(), &[1, 3, 4]);
        assert_eq!(roll.result(), 8);
    }

    #[test]
    fn keep_highest_and_lowest() {
        let roll = fixed(&[2, 9, 5, 7])
            .perform_roll(10, 4, "ctx", &["keep highest 2"])
            .unwrap();
        assert_eq!(roll.rolls_used(), &[9, 7]);

        let roll = fixed(&[2, 9, 5, 7])
            .perform_roll(10, 4, "ctx", &["keep lowest 2"])
            .unwrap();
        assert_eq!(roll.rolls_used(), &[2, 5]);
    }

    #[test]
    fn advantage_keeps_the_greater() {
        let roll = fixed(&[7, 15])
            .perform_roll(20, 1, "ctx", &["advantage"])
            .unwrap();
        assert_eq!(roll.rolls_generated(), &[15, 7]);
        assert_eq!(roll.rolls_used(), &[15]);
        assert_eq!(roll.result(), 15);
        assert_eq!(roll.options(), "vantage: advantage; ");
    }

    #[test]
    fn disadvantage_keeps_the_lesser() {
        let roll = fixed(&[7, 15])
            .perform_roll(20, 1, "ctx", &["disadvantage"])
            .unwrap();
        assert_eq!(roll.rolls_generated(), &[7, 15]);
        assert_eq!(roll.rolls_used(), &[7]);
    }

    #[test]
    fn cancelled_vantage_rolls_once() {
        let roll = fixed(&[12, 3])
            .perform_roll(20, 1, "ctx", &["disadvantage", "advantage"])
            .unwrap();
        assert_eq!(roll.rolls_generated(), &[12]);
        assert_eq!(roll.rolls_used(), &[12]);
        assert_eq!(roll.options(), "vantage: normal; ");
    }

    #[test]
    fn additive_applies_to_result() {
        let roll = fixed(&[4])
            .perform_roll(6, 1, "ctx", &["add 5", "subtract 7"])
            .unwrap();
        assert_eq!(roll.additive_value(), -2);
        assert_eq!(roll.result(), 2);
    }

    #[test]
    fn dropping_everything_leaves_additive() {
        let roll = fixed(&[3, 4])
            .perform_roll(6, 2, "ctx", &["drop lowest 2", "add 1"])
            .unwrap();
        assert!(roll.rolls_used().is_empty());
        assert_eq!(roll.rolls_generated().len(), 2);
        assert_eq!(roll.result(), 1);
    }

    #[test]
    fn invalid_options_fail_before_rolling() {
        let audit = Arc::new(RecordingAudit::default());
        let mut roller =
            Roller::new(FixedSequence::constant(3)).with_shared_audit(audit.clone());
        assert!(matches!(
            roller.perform_roll(6, 3, "ctx", &["advantage"]),
            Err(MechError::InvalidOption(_))
        ));
        assert!(matches!(
            roller.perform_roll(6, 3, "ctx", &["keep sideways 1"]),
            Err(MechError::InvalidOption(_))
        ));
        assert!(matches!(
            roller.perform_roll::<&str>(0, 3, "ctx", &[]),
            Err(MechError::InvalidDice(_))
        ));
        assert!(audit.rolls.lock().unwrap().is_empty());
    }

    #[test]
    fn source_failure_propagates() {
        let mut roller = Roller::new(FixedSequence::new(Vec::new())).with_audit(SilentAudit);
        assert!(matches!(
            roller.perform_roll::<&str>(6, 1, "ctx", &[]),
            Err(MechError::RandomGeneration(_))
        ));
    }

    #[test]
    fn every_roll_is_audited() {
        let audit = Arc::new(RecordingAudit::default());
        let mut roller =
            Roller::new(FixedSequence::new(vec![2, 6])).with_shared_audit(audit.clone());
        let first = roller.perform_roll::<&str>(6, 1, "first", &[]).unwrap();
        let second = roller.perform_roll::<&str>(6, 1, "second", &[]).unwrap();
        let recorded = audit.rolls.lock().unwrap();
        assert_eq!(*recorded, vec![first, second]);
        assert_eq!(recorded[1].ctx_ref(), "second");
    }

    #[test]
    fn secure_roll_in_range() {
        let roll = perform_roll(20, 1, "ctx", &["advantage"]).unwrap();
        assert_eq!(roll.rolls_generated().len(), 2);
        assert_eq!(roll.rolls_used(), &[roll.rolls_generated()[0]]);
        assert!((1..=20).contains(&roll.result()));
    }

    #[test]
    fn from_config_seeded_is_reproducible() {
        let config = RollerConfig::default().with_seed(7).with_audit(false);
        let a = Roller::from_config(&config)
            .perform_roll::<&str>(20, 5, "ctx", &[])
            .unwrap();
        let b = Roller::from_config(&config)
            .perform_roll::<&str>(20, 5, "ctx", &[])
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn display_marks_dropped_dice() {
        let roll = fixed(&[1, 6, 4, 3])
            .perform_roll(6, 4, "ctx", &["drop lowest 1", "add 2"])
            .unwrap();
        assert_eq!(roll.to_string(), "[6, 4, 3, (1)] + 2 = 15");

        let roll = fixed(&[5])
            .perform_roll(6, 1, "ctx", &["subtract 1"])
            .unwrap();
        assert_eq!(roll.to_string(), "[5] - 1 = 4");
    }

    #[test]
    fn serializes_with_stable_field_names() {
        let roll = fixed(&[3, 5])
            .perform_roll(6, 2, "abc", &["keep highest 1"])
            .unwrap();
        let json = serde_json::to_value(&roll).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "Sides": 6,
                "TimesToRoll": 2,
                "RollsGenerated": [5, 3],
                "RollsUsed": [5],
                "AdditiveValue": 0,
                "Result": 5,
                "Options": "keep highest: 1; ",
                "CtxRef": "abc"
            })
        );
    }
}
