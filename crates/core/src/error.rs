//! Sampling errors.

/// Errors raised while drawing spells.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SampleError {
    /// A slot table entry asks for more spells than the filtered corpus holds.
    #[error(
        "not enough eligible spells at level {level}: need {required}, found {available} (short by {})",
        .required - .available
    )]
    InsufficientEligibleRecords {
        level: u8,
        required: usize,
        available: usize,
    },

    /// No other spell at the same level can replace the one being rerolled.
    #[error("no replacement for '{name}' at level {level}")]
    NoReplacement { name: String, level: u8 },
}
