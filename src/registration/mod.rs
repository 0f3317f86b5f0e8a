//! Registration pipeline: validate → hash → persist, with both stages timed.
//!
//! Every failure aborts the request and is returned to the caller; nothing is
//! retried here. Registering the same email twice makes two persistence
//! attempts and the store decides which one wins.

mod validation;

pub use validation::{MAX_EMAIL_LEN, MAX_PASSWORD_LEN, ValidationError, normalize_email};

use crate::{
    metrics::MetricsRecorder,
    password::{self, CostParameters, OsSaltSource, PasswordError, SaltSource},
    storage::{CredentialStore, PersistenceError},
};
use secrecy::{ExposeSecret, SecretString};
use std::{sync::Arc, time::Instant};
use thiserror::Error;
use tokio::task;
use tracing::{debug, error, instrument};

/// Registration input; `Debug` never shows the password.
#[derive(Debug)]
pub struct RegistrationRequest {
    pub email: String,
    pub password: SecretString,
}

impl RegistrationRequest {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Client,
    Internal,
}

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("password hashing failed: {0}")]
    Hashing(#[from] PasswordError),
    #[error("saving credential failed: {0}")]
    Persistence(#[from] PersistenceError),
}

impl RegistrationError {
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) => ErrorCategory::Client,
            Self::Hashing(_) | Self::Persistence(_) => ErrorCategory::Internal,
        }
    }
}

pub struct Registrar {
    params: CostParameters,
    store: Arc<dyn CredentialStore>,
    metrics: Arc<dyn MetricsRecorder>,
    salt_source: Arc<dyn SaltSource>,
}

impl Registrar {
    #[must_use]
    pub fn new(
        params: CostParameters,
        store: Arc<dyn CredentialStore>,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Self {
        Self {
            params,
            store,
            metrics,
            salt_source: Arc::new(OsSaltSource),
        }
    }

    /// Replace the OS generator as the source of salts.
    #[must_use]
    pub fn with_salt_source(mut self, source: Arc<dyn SaltSource>) -> Self {
        self.salt_source = source;
        self
    }

    #[must_use]
    pub const fn params(&self) -> &CostParameters {
        &self.params
    }

    /// Run the pipeline for one request.
    ///
    /// # Errors
    /// Returns the first failure: `Validation` for bad input, `Hashing` if no
    /// salt or key could be produced, `Persistence` if the store refused.
    #[instrument(skip(self, request))]
    pub async fn register(&self, request: RegistrationRequest) -> Result<(), RegistrationError> {
        let email = normalize_email(&request.email)?;
        validation::check_password(request.password.expose_secret())?;

        let encoded_hash = self.hash(request.password).await?;

        let start = Instant::now();
        self.store.save(&email, &encoded_hash).await?;
        self.metrics
            .observe_persistence(start.elapsed().as_secs_f64());

        debug!("credential stored");

        Ok(())
    }

    // Argon2 blocks for tens of milliseconds, keep it off the async workers.
    async fn hash(&self, secret: SecretString) -> Result<String, PasswordError> {
        let params = self.params;
        let source = Arc::clone(&self.salt_source);

        let (encoded_hash, elapsed) = task::spawn_blocking(move || {
            let start = Instant::now();
            let result = password::hash_password_with(
                secret.expose_secret().as_bytes(),
                &params,
                source.as_ref(),
            );
            (result, start.elapsed())
        })
        .await
        .map_err(|err| {
            error!("hashing task failed: {err}");
            PasswordError::Interrupted
        })?;

        let encoded_hash = encoded_hash?;
        self.metrics.observe_hashing(elapsed.as_secs_f64());

        Ok(encoded_hash)
    }
}
