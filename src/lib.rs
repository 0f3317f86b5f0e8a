//! # Registrar
//!
//! `registrar` accepts user registrations (email + password), hashes the
//! password with **Argon2id** and stores the resulting credential in
//! `PostgreSQL`.
//!
//! ## Credential format
//!
//! Passwords are never stored. Each registration draws a fresh 16-byte salt
//! from the OS CSPRNG, derives a 32-byte key with Argon2id
//! (`m=65536 KiB, t=3, p=2` by default) and persists a single self-describing
//! string:
//!
//! ```text
//! $argon2id$v=19$m=65536,t=3,p=2$<base64 salt>$<base64 key>
//! ```
//!
//! Base64 is the standard alphabet without padding. Because the cost
//! parameters travel with every hash, they can be raised later without
//! invalidating existing credentials.
//!
//! ## Metrics
//!
//! Hashing and persistence latency are recorded in two Prometheus histograms
//! (`generate_hash_duration_seconds`, `save_user_duration_seconds`) and exposed
//! on `GET /metrics`. An observation is only recorded when its stage succeeds.
//!
//! ## Errors
//!
//! Invalid input is a `400`; every other failure (entropy, hashing, database,
//! duplicate email) is a generic `500`. A failed request never takes the
//! process down.

pub mod api;
pub mod cli;
pub mod metrics;
pub mod password;
pub mod registration;
pub mod storage;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
