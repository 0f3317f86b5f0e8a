use super::PasswordError;
use rand::{RngCore, rngs::OsRng};
use tracing::error;
use zeroize::Zeroizing;

/// Source of salt bytes.
pub trait SaltSource: Send + Sync {
    /// Fill `salt` completely or fail; partial output is never used.
    ///
    /// # Errors
    /// Returns `PasswordError::RandomnessUnavailable` if no entropy is available.
    fn fill(&self, salt: &mut [u8]) -> Result<(), PasswordError>;
}

/// The operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsSaltSource;

impl SaltSource for OsSaltSource {
    fn fill(&self, salt: &mut [u8]) -> Result<(), PasswordError> {
        OsRng.try_fill_bytes(salt).map_err(|err| {
            error!("OS random generator unavailable: {err}");
            PasswordError::RandomnessUnavailable
        })
    }
}

/// Fill a fresh buffer of `length` bytes from the operating system CSPRNG.
///
/// # Errors
/// Returns `PasswordError::RandomnessUnavailable` if the OS entropy source
/// cannot be read. Callers must not retry.
pub fn generate_salt(length: u32) -> Result<Zeroizing<Vec<u8>>, PasswordError> {
    generate_salt_from(&OsSaltSource, length)
}

/// Like [`generate_salt`], reading from `source`.
///
/// # Errors
/// Propagates the source's failure.
pub fn generate_salt_from(
    source: &dyn SaltSource,
    length: u32,
) -> Result<Zeroizing<Vec<u8>>, PasswordError> {
    let length = usize::try_from(length)
        .map_err(|_| PasswordError::InvalidParameters("salt length exceeds address space"))?;
    let mut salt = Zeroizing::new(vec![0u8; length]);

    source.fill(&mut salt)?;

    Ok(salt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_requested_length() {
        for length in [8, 16, 32, 64] {
            let salt = generate_salt(length).unwrap();
            assert_eq!(salt.len(), length as usize);
        }
    }

    #[test]
    fn successive_salts_differ() {
        let a = generate_salt(16).unwrap();
        let b = generate_salt(16).unwrap();
        assert_ne!(*a, *b);
    }

    #[test]
    fn salt_is_not_all_zero() {
        let salt = generate_salt(32).unwrap();
        assert!(salt.iter().any(|&byte| byte != 0));
    }

    struct Exhausted;

    impl SaltSource for Exhausted {
        fn fill(&self, _salt: &mut [u8]) -> Result<(), PasswordError> {
            Err(PasswordError::RandomnessUnavailable)
        }
    }

    #[test]
    fn source_failure_is_reported() {
        assert_eq!(
            generate_salt_from(&Exhausted, 16).unwrap_err(),
            PasswordError::RandomnessUnavailable
        );
    }
}
