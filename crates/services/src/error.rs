//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::SessionSettingsError;
use quiz_core::runner::RunnerError;

/// Errors emitted by `HttpProgressSink` and other progress sinks.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressSinkError {
    #[error("progress request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("progress sink rejected record: {0}")]
    Rejected(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by identity providers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IdentityError {
    #[error("identity token is empty")]
    EmptyToken,
    #[error("sign-in failed: {0}")]
    SignIn(String),
}

/// Errors emitted while reading configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid {key} value: {raw}")]
    InvalidValue { key: &'static str, raw: String },
    #[error(transparent)]
    Settings(#[from] SessionSettingsError),
}

/// Errors emitted by `QuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no questions match the current filter")]
    NoQuestions,
    #[error("no quiz is running")]
    NotRunning,
    #[error(transparent)]
    Runner(#[from] RunnerError),
}
