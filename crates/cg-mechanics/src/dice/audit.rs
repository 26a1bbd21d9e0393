//! Audit reporting for resolved rolls.
//!
//! Every successful roll is handed to a [`RollAudit`] sink owned by the
//! [`Roller`](crate::dice::Roller) that produced it. Sinks return nothing,
//! so a logging problem can never fail a roll.

use crate::abilities::BaseAbilities;
use crate::dice::roll::Roll;

/// Receives every roll a roller resolves.
pub trait RollAudit {
    /// Record one resolved roll.
    fn record(&self, roll: &Roll);

    /// Record a generated set of base abilities. Does nothing by default.
    fn record_abilities(&self, _ctx_ref: &str, _abilities: &BaseAbilities) {}
}

/// Writes one structured `tracing` event per roll.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAudit;

impl RollAudit for TracingAudit {
    fn record(&self, roll: &Roll) {
        tracing::info!(
            target: "cg_mechanics::audit",
            ctx_ref = %roll.ctx_ref(),
            sides = roll.sides(),
            times_to_roll = roll.times_to_roll(),
            eval_count = roll.rolls_generated().len(),
            keep_count = roll.rolls_used().len(),
            options = %roll.options(),
            additive = roll.additive_value(),
            rolls_used = ?roll.rolls_used(),
            rolls_generated = ?roll.rolls_generated(),
            result = roll.result(),
            "dice rolled"
        );
    }

    fn record_abilities(&self, ctx_ref: &str, abilities: &BaseAbilities) {
        tracing::debug!(
            target: "cg_mechanics::audit",
            ctx_ref,
            rolling_option = %abilities.rolling_option,
            raw = ?abilities.raw,
            "base abilities generated"
        );
    }
}

/// Discards every roll.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudit;

impl RollAudit for SilentAudit {
    fn record(&self, _roll: &Roll) {}
}
