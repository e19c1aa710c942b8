use std::env;

use quiz_core::model::SessionSettings;

use crate::error::ConfigError;

pub const ENV_SESSION_SIZE: &str = "QUIZ_SESSION_SIZE";
pub const ENV_PROGRESS_URL: &str = "QUIZ_PROGRESS_URL";
pub const ENV_USER_NAME: &str = "QUIZ_USER_NAME";
pub const ENV_AUTH_TOKEN: &str = "QUIZ_AUTH_TOKEN";

/// Runtime configuration read from the environment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuizConfig {
    pub session: SessionSettings,
    /// Progress endpoint; `None` means records are only logged.
    pub progress_url: Option<String>,
    pub user_name: Option<String>,
    pub auth_token: Option<String>,
}

impl QuizConfig {
    /// Read configuration from `QUIZ_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `QUIZ_SESSION_SIZE` is not a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`QuizConfig::from_env`] with an injectable lookup, for tests.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the session size is invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let session = match get(ENV_SESSION_SIZE) {
            Some(raw) => {
                let size: usize = raw.parse().map_err(|_| ConfigError::InvalidValue {
                    key: ENV_SESSION_SIZE,
                    raw: raw.clone(),
                })?;
                SessionSettings::new(size)?
            }
            None => SessionSettings::default(),
        };

        Ok(Self {
            session,
            progress_url: get(ENV_PROGRESS_URL),
            user_name: get(ENV_USER_NAME),
            auth_token: get(ENV_AUTH_TOKEN),
        })
    }
}
