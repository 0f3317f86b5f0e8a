//! Encoded hash string format.
//!
//! `$argon2id$v=<version>$m=<memory KiB>,t=<iterations>,p=<lanes>$<salt>$<key>`
//!
//! Salt and key use the standard base64 alphabet without padding. The string
//! is the persisted credential, so its shape must never change for a given
//! algorithm + version pair.

use super::{CostParameters, PasswordError, kdf::ARGON2_VERSION};
use base64ct::{Base64Unpadded, Encoding};
use std::fmt;
use zeroize::Zeroizing;

pub const ALGORITHM: &str = "argon2id";

/// Argon2 versions a verifier can still meet in stored credentials.
pub const SUPPORTED_VERSIONS: [u32; 2] = [0x10, 0x13];

const FIELD_SEPARATOR: char = '$';

/// Components recovered from an encoded hash.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedHash {
    algorithm: String,
    version: u32,
    params: CostParameters,
    salt: Zeroizing<Vec<u8>>,
    key: Zeroizing<Vec<u8>>,
}

impl EncodedHash {
    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Cost parameters; salt and key lengths are the decoded byte lengths.
    #[must_use]
    pub const fn params(&self) -> &CostParameters {
        &self.params
    }

    #[must_use]
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    #[must_use]
    pub fn key(&self) -> &[u8] {
        &self.key
    }
}

impl fmt::Debug for EncodedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedHash")
            .field("algorithm", &self.algorithm)
            .field("version", &self.version)
            .field("params", &self.params)
            .field("salt", &"***")
            .field("key", &"***")
            .finish()
    }
}

/// Serialize an Argon2id result into its canonical string.
#[must_use]
pub fn encode(params: &CostParameters, salt: &[u8], key: &[u8]) -> String {
    format!(
        "${ALGORITHM}$v={}$m={},t={},p={}${}${}",
        u32::from(ARGON2_VERSION),
        params.memory_kib(),
        params.iterations(),
        params.parallelism(),
        Base64Unpadded::encode_string(salt),
        Base64Unpadded::encode_string(key),
    )
}

/// Parse an encoded hash back into its components.
///
/// # Errors
/// Returns `PasswordError::MalformedEncoding` if the field count, algorithm
/// tag, version, cost segment or base64 payloads are invalid.
pub fn decode(encoded: &str) -> Result<EncodedHash, PasswordError> {
    let fields: Vec<&str> = encoded.split(FIELD_SEPARATOR).collect();
    let [leading, algorithm, version, costs, salt, key] = fields.as_slice() else {
        return Err(PasswordError::MalformedEncoding(
            "expected 5 '$'-prefixed fields",
        ));
    };

    if !leading.is_empty() {
        return Err(PasswordError::MalformedEncoding("missing leading '$'"));
    }

    if *algorithm != ALGORITHM {
        return Err(PasswordError::MalformedEncoding("unknown algorithm tag"));
    }

    let version = version
        .strip_prefix("v=")
        .ok_or(PasswordError::MalformedEncoding("missing version field"))
        .and_then(|value| parse_number::<u32>(value, "version is not numeric"))?;
    if !SUPPORTED_VERSIONS.contains(&version) {
        return Err(PasswordError::MalformedEncoding("unsupported version"));
    }

    let (memory_kib, iterations, parallelism) = parse_costs(costs)?;

    let salt = decode_segment(salt, "invalid salt encoding")?;
    let key = decode_segment(key, "invalid key encoding")?;

    let salt_length = u32::try_from(salt.len())
        .map_err(|_| PasswordError::MalformedEncoding("salt too long"))?;
    let key_length = u32::try_from(key.len())
        .map_err(|_| PasswordError::MalformedEncoding("key too long"))?;

    let params = CostParameters::new(memory_kib, iterations, parallelism, salt_length, key_length)
        .map_err(|_| PasswordError::MalformedEncoding("cost parameters out of range"))?;

    Ok(EncodedHash {
        algorithm: (*algorithm).to_string(),
        version,
        params,
        salt,
        key,
    })
}

// `m=<u32>,t=<u32>,p=<u8>`, in that order and nothing else.
fn parse_costs(costs: &str) -> Result<(u32, u32, u8), PasswordError> {
    let parts: Vec<&str> = costs.split(',').collect();
    let [memory, iterations, parallelism] = parts.as_slice() else {
        return Err(PasswordError::MalformedEncoding(
            "expected m, t and p cost fields",
        ));
    };

    let memory = cost_value(memory, "m=")?;
    let iterations = cost_value(iterations, "t=")?;
    let parallelism = cost_value(parallelism, "p=")?;

    Ok((memory, iterations, parallelism))
}

fn cost_value<T: std::str::FromStr>(field: &str, prefix: &str) -> Result<T, PasswordError> {
    let value = field
        .strip_prefix(prefix)
        .ok_or(PasswordError::MalformedEncoding("unexpected cost field"))?;
    parse_number(value, "cost field is not numeric")
}

// Canonical decimal only: `str::parse` also takes "+3" and "03", which would
// let distinct strings decode to the same components.
fn parse_number<T: std::str::FromStr>(
    value: &str,
    reason: &'static str,
) -> Result<T, PasswordError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PasswordError::MalformedEncoding(reason));
    }
    if value.len() > 1 && value.starts_with('0') {
        return Err(PasswordError::MalformedEncoding(reason));
    }
    value
        .parse::<T>()
        .map_err(|_| PasswordError::MalformedEncoding(reason))
}

fn decode_segment(
    segment: &str,
    reason: &'static str,
) -> Result<Zeroizing<Vec<u8>>, PasswordError> {
    if segment.is_empty() {
        return Err(PasswordError::MalformedEncoding(reason));
    }
    Base64Unpadded::decode_vec(segment)
        .map(Zeroizing::new)
        .map_err(|_| PasswordError::MalformedEncoding(reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    const SAMPLE: &str = "$argon2id$v=19$m=65536,t=3,p=2$c29tZXNhbHRzb21lc2FsdA$ZGVmZ2hpamtsbW5vcHFyc3R1dnd4eXp7fH1+f4CBgoM";

    fn sample_salt() -> Vec<u8> {
        (0u8..16).collect()
    }

    fn sample_key() -> Vec<u8> {
        (100u8..132).collect()
    }

    #[test]
    fn encode_matches_grammar() {
        let encoded = encode(&CostParameters::default(), &sample_salt(), &sample_key());
        let grammar = Regex::new(
            r"^\$argon2id\$v=\d+\$m=\d+,t=\d+,p=\d+\$[A-Za-z0-9+/]+\$[A-Za-z0-9+/]+$",
        )
        .unwrap();
        assert!(grammar.is_match(&encoded), "{encoded}");
        assert!(encoded.starts_with("$argon2id$v=19$m=65536,t=3,p=2$"));
    }

    #[test]
    fn round_trip_preserves_components() {
        let params = CostParameters::default();
        let salt = sample_salt();
        let key = sample_key();

        let decoded = decode(&encode(&params, &salt, &key)).unwrap();

        assert_eq!(decoded.algorithm(), ALGORITHM);
        assert_eq!(decoded.version(), 19);
        assert_eq!(*decoded.params(), params);
        assert_eq!(decoded.salt(), salt.as_slice());
        assert_eq!(decoded.key(), key.as_slice());
    }

    #[test]
    fn decode_reports_lengths_from_payloads() {
        let params = CostParameters::new(1024, 1, 1, 8, 4).unwrap();
        let decoded = decode(&encode(&params, &[1u8; 24], &[2u8; 48])).unwrap();
        assert_eq!(decoded.params().salt_length(), 24);
        assert_eq!(decoded.params().key_length(), 48);
        assert_eq!(decoded.params().memory_kib(), 1024);
    }

    #[test]
    fn decode_accepts_sample() {
        let decoded = decode(SAMPLE).unwrap();
        assert_eq!(decoded.salt(), b"somesaltsomesalt");
        assert_eq!(decoded.key(), (100u8..132).collect::<Vec<_>>().as_slice());
        assert_eq!(decoded.params().parallelism(), 2);
    }

    #[test]
    fn decode_accepts_legacy_version() {
        let legacy = SAMPLE.replace("v=19", "v=16");
        assert_eq!(decode(&legacy).unwrap().version(), 16);
    }

    #[test]
    fn wrong_field_count_is_malformed() {
        for input in [
            "",
            "$argon2id",
            "$argon2id$v=19$m=65536,t=3,p=2$c29tZXNhbHRzb21lc2FsdA",
            format!("{SAMPLE}$extra").as_str(),
            &SAMPLE[1..],
        ] {
            assert!(
                matches!(decode(input), Err(PasswordError::MalformedEncoding(_))),
                "{input}"
            );
        }
    }

    #[test]
    fn unknown_algorithm_is_malformed() {
        for tag in ["argon2i", "argon2d", "bcrypt", "ARGON2ID", ""] {
            let input = SAMPLE.replacen("argon2id", tag, 1);
            assert!(matches!(
                decode(&input),
                Err(PasswordError::MalformedEncoding("unknown algorithm tag"))
            ));
        }
    }

    #[test]
    fn bad_version_is_malformed() {
        for version in ["v=", "v=x", "19", "v=+19", "v=20"] {
            let input = SAMPLE.replacen("v=19", version, 1);
            assert!(
                matches!(decode(&input), Err(PasswordError::MalformedEncoding(_))),
                "{input}"
            );
        }
    }

    #[test]
    fn non_numeric_cost_fields_are_malformed() {
        for costs in [
            "m=abc,t=3,p=2",
            "m=65536,t=three,p=2",
            "m=65536,t=3,p=",
            "m=65536,t=3,p=-2",
            "m=65536,t=3,p=256",
            "m=65536,t=3",
            "t=3,m=65536,p=2",
            "m=65536,t=3,p=2,k=1",
            "m=65536;t=3;p=2",
        ] {
            let input = SAMPLE.replacen("m=65536,t=3,p=2", costs, 1);
            assert!(
                matches!(decode(&input), Err(PasswordError::MalformedEncoding(_))),
                "{input}"
            );
        }
    }

    #[test]
    fn leading_zeros_are_malformed() {
        for (from, to) in [
            ("v=19", "v=019"),
            ("m=65536", "m=065536"),
            ("t=3", "t=03"),
            ("p=2", "p=002"),
        ] {
            let input = SAMPLE.replacen(from, to, 1);
            assert!(
                matches!(decode(&input), Err(PasswordError::MalformedEncoding(_))),
                "{input}"
            );
        }
    }

    #[test]
    fn decoded_sample_reencodes_to_itself() {
        let decoded = decode(SAMPLE).unwrap();
        assert_eq!(
            encode(decoded.params(), decoded.salt(), decoded.key()),
            SAMPLE
        );
    }

    #[test]
    fn out_of_range_costs_are_malformed() {
        let input = SAMPLE.replacen("t=3", "t=0", 1);
        assert!(matches!(
            decode(&input),
            Err(PasswordError::MalformedEncoding("cost parameters out of range"))
        ));
    }

    #[test]
    fn invalid_base64_is_malformed() {
        let salt = "c29tZXNhbHRzb21lc2FsdA";
        for bad in ["c29tZXNhbHRzb21lc2FsdA==", "c29t*XNhbHRzb21lc2FsdA", "-_-_", "c29tZ"] {
            let input = SAMPLE.replacen(salt, bad, 1);
            assert!(
                matches!(decode(&input), Err(PasswordError::MalformedEncoding(_))),
                "{input}"
            );
        }
    }

    #[test]
    fn empty_payloads_are_malformed() {
        let input = "$argon2id$v=19$m=65536,t=3,p=2$$S2V5";
        assert!(matches!(
            decode(input),
            Err(PasswordError::MalformedEncoding("invalid salt encoding"))
        ));
    }

    #[test]
    fn debug_hides_payloads() {
        let decoded = decode(SAMPLE).unwrap();
        let debug = format!("{decoded:?}");
        assert!(debug.contains("***"));
        assert!(!debug.contains("115, 111, 109"));
    }
}
