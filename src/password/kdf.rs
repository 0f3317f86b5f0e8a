use super::{CostParameters, PasswordError};
use argon2::{Algorithm, Argon2, Params, Version};
use zeroize::Zeroizing;

/// Argon2 version written into new hashes.
pub const ARGON2_VERSION: Version = Version::V0x13;

/// Derive an Argon2id key of `params.key_length()` bytes with the current
/// version.
///
/// Deterministic for a given (password, salt, params) triple.
///
/// # Errors
/// Returns `PasswordError::InvalidParameters` if `params` are out of range and
/// `PasswordError::Derivation` if Argon2 rejects the inputs.
pub fn derive(
    password: &[u8],
    salt: &[u8],
    params: &CostParameters,
) -> Result<Zeroizing<Vec<u8>>, PasswordError> {
    derive_with_version(password, salt, params, u32::from(ARGON2_VERSION))
}

/// Derive with an explicit Argon2 version, e.g. the one recorded in a stored
/// hash (`0x10` or `0x13`).
///
/// # Errors
/// Same as [`derive`], plus `PasswordError::InvalidParameters` for an unknown
/// version number.
pub fn derive_with_version(
    password: &[u8],
    salt: &[u8],
    params: &CostParameters,
    version: u32,
) -> Result<Zeroizing<Vec<u8>>, PasswordError> {
    params.validate()?;

    let version = Version::try_from(version)
        .map_err(|_| PasswordError::InvalidParameters("unsupported argon2 version"))?;

    let key_length =
        usize::try_from(params.key_length()).map_err(|_| PasswordError::Derivation)?;

    let argon2_params = Params::new(
        params.memory_kib(),
        params.iterations(),
        u32::from(params.parallelism()),
        Some(key_length),
    )
    .map_err(|_| PasswordError::Derivation)?;

    let argon2 = Argon2::new(Algorithm::Argon2id, version, argon2_params);

    let mut key = Zeroizing::new(vec![0u8; key_length]);
    argon2
        .hash_password_into(password, salt, &mut key)
        .map_err(|_| PasswordError::Derivation)?;

    Ok(key)
}
