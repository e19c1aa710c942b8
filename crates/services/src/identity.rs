use async_trait::async_trait;
use tracing::warn;
use uuid::Uuid;

use crate::error::IdentityError;

/// Where a user id came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySource {
    Provider,
    /// Generated locally after the provider failed.
    Fallback,
}

/// Opaque user identity attached to progress records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub source: IdentitySource,
}

impl Identity {
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            user_id: Uuid::new_v4().to_string(),
            source: IdentitySource::Fallback,
        }
    }
}

/// Signs the user in and hands back an opaque user id.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self) -> Result<String, IdentityError>;
}

/// Identity backed by a pre-issued token.
#[derive(Debug, Clone)]
pub struct TokenIdentity {
    token: String,
}

impl TokenIdentity {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl IdentityProvider for TokenIdentity {
    async fn sign_in(&self) -> Result<String, IdentityError> {
        let token = self.token.trim();
        if token.is_empty() {
            return Err(IdentityError::EmptyToken);
        }
        Ok(token.to_owned())
    }
}

/// Anonymous sign-in: every call yields a fresh random id.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousIdentity;

#[async_trait]
impl IdentityProvider for AnonymousIdentity {
    async fn sign_in(&self) -> Result<String, IdentityError> {
        Ok(Uuid::new_v4().to_string())
    }
}

/// Resolve the user's identity, falling back to a local id if sign-in fails.
pub async fn resolve_identity(provider: &dyn IdentityProvider) -> Identity {
    match provider.sign_in().await {
        Ok(user_id) => Identity {
            user_id,
            source: IdentitySource::Provider,
        },
        Err(err) => {
            warn!(error = %err, "sign-in failed, using a local identity");
            Identity::fallback()
        }
    }
}
