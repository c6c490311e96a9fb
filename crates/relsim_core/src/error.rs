use thiserror::Error;

/// Input-validation and dispatch errors for a simulation request.
///
/// Every variant is fatal to the request it was raised for: a silently
/// defaulted input would corrupt the reported probabilities without any
/// visible symptom, so violations surface immediately with the offending
/// values attached.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("fixture {index} references unknown team: {team}")]
    UnknownTeam { team: String, index: usize },

    #[error("no rating supplied for team: {team}")]
    MissingRating { team: String },

    #[error("matches-played denominator must be positive")]
    ZeroMatchesPlayed,

    #[error("chaos factor {value} outside [0.0, 0.5]")]
    ChaosOutOfRange { value: f64 },

    #[error("trial count must be positive")]
    ZeroTrials,

    #[error("league has no teams")]
    EmptyLeague,

    #[error("relegation slots ({slots}) must be fewer than teams ({teams})")]
    TooManyRelegationSlots { slots: usize, teams: usize },

    #[error("worker pool construction failed: {0}")]
    WorkerPool(String),
}

pub type Result<T> = std::result::Result<T, SimError>;
