//! Argon2id password hashing.
//!
//! A hash is built in three steps: a fresh salt from the OS CSPRNG
//! ([`salt::generate_salt`]), an Argon2id derivation over the password and
//! salt ([`kdf::derive`]), and the PHC-style string that carries algorithm,
//! version, cost parameters, salt and key ([`phc::encode`]).
//!
//! Salt and derived key buffers are zeroed when dropped. None of them, nor the
//! password, ever appear in an error message or log line.

pub mod kdf;
pub mod params;
pub mod phc;
pub mod salt;

pub use kdf::{derive, derive_with_version};
pub use params::CostParameters;
pub use phc::{EncodedHash, decode, encode};
pub use salt::{OsSaltSource, SaltSource, generate_salt, generate_salt_from};

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("secure random source unavailable")]
    RandomnessUnavailable,
    #[error("invalid argon2 parameters: {0}")]
    InvalidParameters(&'static str),
    #[error("argon2 key derivation failed")]
    Derivation,
    #[error("malformed encoded hash: {0}")]
    MalformedEncoding(&'static str),
    #[error("hashing task did not complete")]
    Interrupted,
}

/// Hash `password` with a fresh salt and return the encoded hash string.
///
/// # Errors
/// Returns `PasswordError::RandomnessUnavailable` if no salt can be generated,
/// or a parameter/derivation error if `params` are unusable.
pub fn hash_password(password: &[u8], params: &CostParameters) -> Result<String, PasswordError> {
    hash_password_with(password, params, &OsSaltSource)
}

/// [`hash_password`] with the salt drawn from `source`.
///
/// # Errors
/// Same as [`hash_password`].
pub fn hash_password_with(
    password: &[u8],
    params: &CostParameters,
    source: &dyn SaltSource,
) -> Result<String, PasswordError> {
    let salt = generate_salt_from(source, params.salt_length())?;
    let key = derive(password, &salt, params)?;
    Ok(encode(params, &salt, &key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::{
        Algorithm, Argon2, Params, Version,
        password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    };

    fn light() -> CostParameters {
        CostParameters::new(1024, 1, 2, 16, 32).unwrap()
    }

    #[test]
    fn hash_decodes_to_the_used_parameters() {
        let params = light();
        let encoded = hash_password(b"correct horse", &params).unwrap();
        let decoded = decode(&encoded).unwrap();

        assert_eq!(*decoded.params(), params);
        assert_eq!(decoded.salt().len(), 16);
        assert_eq!(decoded.key().len(), 32);
    }

    #[test]
    fn stored_key_is_reproducible_from_stored_salt() {
        let params = light();
        let encoded = hash_password(b"correct horse", &params).unwrap();
        let decoded = decode(&encoded).unwrap();

        let key = derive(b"correct horse", decoded.salt(), decoded.params()).unwrap();
        assert_eq!(key.as_slice(), decoded.key());

        let wrong = derive(b"battery staple", decoded.salt(), decoded.params()).unwrap();
        assert_ne!(wrong.as_slice(), decoded.key());
    }

    #[test]
    fn same_password_gets_a_new_salt_each_time() {
        let params = light();
        let first = hash_password(b"pw", &params).unwrap();
        let second = hash_password(b"pw", &params).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn argon2_crate_verifies_our_hashes() {
        let encoded = hash_password(b"correct horse", &CostParameters::default()).unwrap();
        let parsed = PasswordHash::new(&encoded).unwrap();

        assert!(
            Argon2::default()
                .verify_password(b"correct horse", &parsed)
                .is_ok()
        );
        assert!(
            Argon2::default()
                .verify_password(b"wrong", &parsed)
                .is_err()
        );
    }

    #[test]
    fn legacy_version_hashes_rederive_with_their_version() {
        let salt = SaltString::encode_b64(&[5u8; 16]).unwrap();
        let legacy = Argon2::new(
            Algorithm::Argon2id,
            Version::V0x10,
            Params::new(1024, 1, 1, Some(32)).unwrap(),
        );
        let stored = legacy.hash_password(b"pw", &salt).unwrap().to_string();
        assert!(stored.starts_with("$argon2id$v=16$m=1024,t=1,p=1$"));

        let decoded = decode(&stored).unwrap();
        assert_eq!(decoded.version(), 0x10);

        let key =
            derive_with_version(b"pw", decoded.salt(), decoded.params(), decoded.version())
                .unwrap();
        assert_eq!(key.as_slice(), decoded.key());

        // the current version must not silently stand in for the recorded one
        let current = derive(b"pw", decoded.salt(), decoded.params()).unwrap();
        assert_ne!(current.as_slice(), decoded.key());
    }

    #[test]
    fn truncated_key_is_rejected_on_decode() {
        // three bytes is below the Argon2 minimum tag length
        let err = decode("$argon2id$v=19$m=65536,t=3,p=2$c29tZXNhbHRzb21lc2FsdA$AAAA").unwrap_err();
        assert_eq!(
            err,
            PasswordError::MalformedEncoding("cost parameters out of range")
        );
    }

    #[test]
    fn errors_do_not_echo_inputs() {
        let err = decode("$argon2id$v=19$m=65536,t=3,p=2$hunter2hunter2$!!").unwrap_err();
        assert!(!err.to_string().contains("hunter2"));
    }
}
