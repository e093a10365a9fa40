//! Content fingerprints for shortened environment slugs.
//!
//! GitLab appends a six character suffix to environment slugs it has to
//! shorten. The suffix is the tail of the base 36 rendering of the SHA-256
//! digest of the raw environment name:
//!
//! ```text
//! Digest::SHA2.hexdigest(name).to_i(16).to_s(36).last(6)
//! ```
//!
//! Only the last six base 36 digits are needed, so the digest is reduced
//! modulo 36^6 instead of being converted in full.

use sha2::{Digest, Sha256};

/// Number of characters in a fingerprint
pub const FINGERPRINT_LEN: usize = 6;

const BASE36_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// 36^6, the number of distinct fingerprints
const FINGERPRINT_MODULUS: u64 = 36u64.pow(FINGERPRINT_LEN as u32);

/// Compute the fingerprint of a raw (unsanitised) name.
///
/// The result is always [`FINGERPRINT_LEN`] lowercase base 36 characters.
///
/// # Example
///
/// ```
/// use gitlab_ci_env_slug::fingerprint;
///
/// assert_eq!(
///     fingerprint("deployment-review/TEST-branch-with-really-long-name"),
///     "l58kaf"
/// );
/// ```
#[must_use]
pub fn fingerprint(name: &str) -> String {
    let digest = Sha256::digest(name.as_bytes());

    // Big-endian digest value mod 36^6; the accumulator stays below 2^40.
    let mut remainder = digest.iter().fold(0u64, |acc, byte| {
        (acc * 256 + u64::from(*byte)) % FINGERPRINT_MODULUS
    });

    let mut out = [b'0'; FINGERPRINT_LEN];
    for slot in out.iter_mut().rev() {
        #[allow(clippy::cast_possible_truncation)]
        let index = (remainder % 36) as usize;
        *slot = BASE36_ALPHABET[index];
        remainder /= 36;
    }

    out.iter().map(|&b| char::from(b)).collect()
}
