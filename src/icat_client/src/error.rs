use thiserror::Error;

/// Failures surfaced by the catalog client. Provisioning is fail-fast: every
/// variant aborts the command that hit it, nothing is retried or rolled back.
#[derive(Error, Debug)]
pub enum IcatError {
    #[error("authentication rejected for mechanism '{mechanism}': {message}")]
    Auth { mechanism: String, message: String },

    #[error("{entity_type} with id {id} not found")]
    NotFound { entity_type: String, id: i64 },

    #[error("catalog rejected {context}: {message}")]
    Rejected { context: String, message: String },

    #[error("unexpected catalog response: {0}")]
    Protocol(String),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

pub type IcatResult<T> = Result<T, IcatError>;
