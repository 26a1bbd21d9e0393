//! Error types for the mechanics engine.

/// Errors that can occur while rolling dice or deriving ability scores.
#[derive(Debug, thiserror::Error)]
pub enum MechError {
    /// The secure entropy source could not produce a value.
    #[error("random generation failed: {0}")]
    RandomGeneration(String),

    /// A roll modifier token is malformed or cannot be applied.
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// A die size or dice count is out of range.
    #[error("invalid dice: {0}")]
    InvalidDice(String),

    /// An ability code is not one of the six known abilities.
    #[error("unknown ability: {0}")]
    UnknownAbility(String),

    /// A rolling option tag is not recognized.
    #[error("unknown rolling option: {0}")]
    UnknownRollingOption(String),

    /// A bonus category is not one that can be adjusted.
    #[error("unknown bonus category: {0}")]
    UnknownBonusCategory(String),

    /// An ability priority order does not name every ability exactly once.
    #[error("invalid sort order: {0}")]
    InvalidSortOrder(String),
}

/// Convenience result type for mechanics operations.
pub type MechResult<T> = Result<T, MechError>;
