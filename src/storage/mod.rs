//! Credential persistence.
//!
//! The pipeline only needs `save`; `ping` backs the health endpoint. Email is
//! the unique key and enforcing it is the store's job.

mod memory;
mod postgres;

pub use memory::MemoryCredentialStore;
pub use postgres::PgCredentialStore;

use std::{future::Future, pin::Pin};
use thiserror::Error;

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("a credential for this email already exists")]
    DuplicateEmail,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub trait CredentialStore: Send + Sync {
    /// Persist `encoded_hash` under `email`.
    fn save<'a>(
        &'a self,
        email: &'a str,
        encoded_hash: &'a str,
    ) -> StoreFuture<'a, Result<(), PersistenceError>>;

    /// Check the backing store is reachable.
    fn ping(&self) -> StoreFuture<'_, Result<(), PersistenceError>>;
}
