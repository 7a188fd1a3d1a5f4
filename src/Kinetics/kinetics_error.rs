use thiserror::Error;

/// error types for mechanism loading, reaction extraction and report writing
#[derive(Debug, Error)]
pub enum ReactionInfoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("reaction {index}: unknown reaction type {code}, not supported")]
    UnsupportedReactionType { index: usize, code: u32 },
    #[error("reaction {index}: species '{species}' is not declared in the mechanism")]
    UnknownSpecies { index: usize, species: String },
    #[error("reaction {index}: missing {what}")]
    MissingRateData { index: usize, what: &'static str },
    #[error("reaction {index}: cannot parse equation '{equation}'")]
    InvalidEquation { index: usize, equation: String },
    #[error("reaction {index}: expected {expected} fall-off parameters, found {found}")]
    InvalidFalloffParameters {
        index: usize,
        expected: usize,
        found: usize,
    },
}
