use super::PasswordError;

/// Smallest salt Argon2 accepts.
pub const MIN_SALT_LEN: u32 = 8;
/// Smallest tag Argon2 can produce.
pub const MIN_KEY_LEN: u32 = 4;
/// Largest memory cost accepted (4 GiB). Argon2 allocates it per derivation
/// and an allocation failure aborts the process.
pub const MAX_MEMORY_KIB: u32 = 4 * 1024 * 1024;
/// Upper bound for salt and key lengths.
pub const MAX_OUTPUT_LEN: u32 = 1024;

/// Argon2id cost knobs plus the byte lengths of the salt and derived key.
///
/// Every value ends up in (or is recoverable from) the encoded hash, so old
/// hashes stay verifiable after a deployment changes its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostParameters {
    memory_kib: u32,
    iterations: u32,
    parallelism: u8,
    salt_length: u32,
    key_length: u32,
}

impl Default for CostParameters {
    fn default() -> Self {
        Self {
            // 64 MiB
            memory_kib: 64 * 1024,
            iterations: 3,
            parallelism: 2,
            salt_length: 16,
            key_length: 32,
        }
    }
}

impl CostParameters {
    /// Build validated parameters.
    ///
    /// # Errors
    /// Returns `PasswordError::InvalidParameters` if a value is zero or below
    /// the Argon2 minimums.
    pub fn new(
        memory_kib: u32,
        iterations: u32,
        parallelism: u8,
        salt_length: u32,
        key_length: u32,
    ) -> Result<Self, PasswordError> {
        let params = Self {
            memory_kib,
            iterations,
            parallelism,
            salt_length,
            key_length,
        };
        params.validate()?;
        Ok(params)
    }

    #[must_use]
    pub const fn memory_kib(&self) -> u32 {
        self.memory_kib
    }

    #[must_use]
    pub const fn iterations(&self) -> u32 {
        self.iterations
    }

    #[must_use]
    pub const fn parallelism(&self) -> u8 {
        self.parallelism
    }

    #[must_use]
    pub const fn salt_length(&self) -> u32 {
        self.salt_length
    }

    #[must_use]
    pub const fn key_length(&self) -> u32 {
        self.key_length
    }

    /// Check the invariants `new` enforces.
    ///
    /// # Errors
    /// Returns `PasswordError::InvalidParameters` naming the first violated bound.
    pub fn validate(&self) -> Result<(), PasswordError> {
        if self.iterations == 0 {
            return Err(PasswordError::InvalidParameters(
                "iterations must be >= 1",
            ));
        }
        if self.parallelism == 0 {
            return Err(PasswordError::InvalidParameters(
                "parallelism must be >= 1",
            ));
        }
        if self.memory_kib < 8 * u32::from(self.parallelism) {
            return Err(PasswordError::InvalidParameters(
                "memory cost must be at least 8 KiB per lane",
            ));
        }
        if self.memory_kib > MAX_MEMORY_KIB {
            return Err(PasswordError::InvalidParameters(
                "memory cost must not exceed 4 GiB",
            ));
        }
        if self.salt_length < MIN_SALT_LEN {
            return Err(PasswordError::InvalidParameters(
                "salt length must be at least 8 bytes",
            ));
        }
        if self.key_length < MIN_KEY_LEN {
            return Err(PasswordError::InvalidParameters(
                "key length must be at least 4 bytes",
            ));
        }
        if self.salt_length > MAX_OUTPUT_LEN || self.key_length > MAX_OUTPUT_LEN {
            return Err(PasswordError::InvalidParameters(
                "salt and key length must not exceed 1024 bytes",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_deployment_values() {
        let params = CostParameters::default();
        assert_eq!(params.memory_kib(), 65536);
        assert_eq!(params.iterations(), 3);
        assert_eq!(params.parallelism(), 2);
        assert_eq!(params.salt_length(), 16);
        assert_eq!(params.key_length(), 32);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn zero_values_are_rejected() {
        assert!(CostParameters::new(0, 3, 2, 16, 32).is_err());
        assert!(CostParameters::new(65536, 0, 2, 16, 32).is_err());
        assert!(CostParameters::new(65536, 3, 0, 16, 32).is_err());
        assert!(CostParameters::new(65536, 3, 2, 0, 32).is_err());
        assert!(CostParameters::new(65536, 3, 2, 16, 0).is_err());
    }

    #[test]
    fn memory_must_cover_every_lane() {
        assert!(CostParameters::new(15, 1, 2, 16, 32).is_err());
        assert!(CostParameters::new(16, 1, 2, 16, 32).is_ok());
    }

    #[test]
    fn short_salt_and_key_are_rejected() {
        assert!(matches!(
            CostParameters::new(1024, 1, 1, 7, 32),
            Err(PasswordError::InvalidParameters(_))
        ));
        assert!(matches!(
            CostParameters::new(1024, 1, 1, 16, 3),
            Err(PasswordError::InvalidParameters(_))
        ));
    }

    #[test]
    fn oversized_values_are_rejected() {
        assert!(CostParameters::new(MAX_MEMORY_KIB, 1, 1, 16, 32).is_ok());
        assert!(matches!(
            CostParameters::new(MAX_MEMORY_KIB + 1, 1, 1, 16, 32),
            Err(PasswordError::InvalidParameters(_))
        ));
        assert!(CostParameters::new(u32::MAX, 1, 1, 16, 32).is_err());
        assert!(CostParameters::new(1024, 1, 1, MAX_OUTPUT_LEN + 1, 32).is_err());
        assert!(CostParameters::new(1024, 1, 1, 16, u32::MAX).is_err());
    }
}
