use thiserror::Error;

/// Rejections raised while turning user input into a match document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("choose two different competitors")]
    SameCompetitor,

    #[error("unknown competitor '{0}'")]
    UnknownCompetitor(String),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid score for {field}: '{value}'")]
    InvalidScore { field: &'static str, value: String },
}

/// Failures reported by a match store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("write failed: {0}")]
    Write(String),

    #[error("no match with id '{0}'")]
    NotFound(String),

    #[error("subscription failed: {0}")]
    Subscription(String),

    #[error("store is closed")]
    Closed,
}

impl StoreError {
    /// True for every failure of an add or delete request.
    pub fn is_write_error(&self) -> bool {
        matches!(self, StoreError::Write(_) | StoreError::NotFound(_) | StoreError::Closed)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error("wrong passphrase")]
    Rejected,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("config file already exists at {0}")]
    AlreadyExists(String),

    #[error("failed to write config file: {0}")]
    WriteFile(#[source] std::io::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Gate(#[from] GateError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
