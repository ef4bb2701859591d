use thiserror::Error;

#[derive(Debug, Error)]
pub enum PadopError {
    #[error("not initialized: run 'padop init'")]
    NotInitialized,

    #[error("unknown event: {0}")]
    UnknownEvent(String),

    #[error("unknown flag: {0}")]
    UnknownFlag(String),

    #[error("invalid unit name '{0}': expected <application>/<number>")]
    InvalidUnitName(String),

    #[error("invalid status level: {0}")]
    InvalidStatusLevel(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PadopError>;
