//! Configuration for building a [`Roller`](crate::dice::Roller).

/// Configuration for a roller.
#[derive(Debug, Clone)]
pub struct RollerConfig {
    /// RNG seed for reproducible rolls. `None` uses operating-system entropy.
    pub seed: Option<u64>,
    /// Whether resolved rolls are written to the `tracing` audit target.
    pub audit: bool,
}

impl Default for RollerConfig {
    fn default() -> Self {
        Self {
            seed: None,
            audit: true,
        }
    }
}

impl RollerConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enable or disable roll auditing.
    pub fn with_audit(mut self, audit: bool) -> Self {
        self.audit = audit;
        self
    }
}
