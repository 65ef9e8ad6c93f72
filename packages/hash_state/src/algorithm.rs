//! Hash algorithm registry
//!
//! Maps each algorithm tag to its digest length and to its availability
//! under the current mode policy. Raw `u8` tags are the identifiers used on
//! the wire; anything outside the known set is rejected with
//! [`HashError::InvalidAlgorithm`], never reported as merely unavailable.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::policy::ModePolicy;
use crate::{HashError, Result};

/// MD5 digest length in bytes
pub const MD5_DIGEST_LENGTH: usize = 16;
/// SHA-1 digest length in bytes
pub const SHA1_DIGEST_LENGTH: usize = 20;
/// SHA-224 digest length in bytes
pub const SHA224_DIGEST_LENGTH: usize = 28;
/// SHA-256 digest length in bytes
pub const SHA256_DIGEST_LENGTH: usize = 32;
/// SHA-384 digest length in bytes
pub const SHA384_DIGEST_LENGTH: usize = 48;
/// SHA-512 digest length in bytes
pub const SHA512_DIGEST_LENGTH: usize = 64;
/// Combined MD5 || SHA-1 digest length in bytes
pub const MD5_SHA1_DIGEST_LENGTH: usize = MD5_DIGEST_LENGTH + SHA1_DIGEST_LENGTH;
/// Largest digest any algorithm produces
pub const MAX_DIGEST_LENGTH: usize = SHA512_DIGEST_LENGTH;

/// Hash algorithms a [`HashState`](crate::HashState) can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    /// No hashing; updates are discarded and the digest is empty
    #[default]
    None,
    /// MD5
    Md5,
    /// SHA-1
    Sha1,
    /// SHA-224
    Sha224,
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
    /// MD5 and SHA-1 driven in lockstep, output MD5 || SHA-1 (TLS 1.0/1.1 handshake hash)
    Md5Sha1,
}

impl HashAlgorithm {
    /// Every algorithm in wire-tag order
    pub const ALL: [HashAlgorithm; 8] = [
        Self::None,
        Self::Md5,
        Self::Sha1,
        Self::Sha224,
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
        Self::Md5Sha1,
    ];

    /// Digest output length in bytes
    #[must_use]
    pub const fn digest_size(self) -> usize {
        match self {
            Self::None => 0,
            Self::Md5 => MD5_DIGEST_LENGTH,
            Self::Sha1 => SHA1_DIGEST_LENGTH,
            Self::Sha224 => SHA224_DIGEST_LENGTH,
            Self::Sha256 => SHA256_DIGEST_LENGTH,
            Self::Sha384 => SHA384_DIGEST_LENGTH,
            Self::Sha512 => SHA512_DIGEST_LENGTH,
            Self::Md5Sha1 => MD5_SHA1_DIGEST_LENGTH,
        }
    }

    /// Algorithms that restricted mode refuses
    #[must_use]
    pub const fn is_weak(self) -> bool {
        matches!(self, Self::Md5 | Self::Md5Sha1)
    }

    /// Whether the algorithm may be initialized under `policy`
    ///
    /// This does not account for a state's legacy MD5 override; see
    /// [`HashState::allow_legacy_override`](crate::HashState::allow_legacy_override).
    pub fn is_available<P: ModePolicy + ?Sized>(self, policy: &P) -> bool {
        !(self.is_weak() && policy.is_restricted())
    }

    /// Wire identifier of the algorithm
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Md5 => 1,
            Self::Sha1 => 2,
            Self::Sha224 => 3,
            Self::Sha256 => 4,
            Self::Sha384 => 5,
            Self::Sha512 => 6,
            Self::Md5Sha1 => 7,
        }
    }

    /// Lowercase algorithm name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
            Self::Md5Sha1 => "md5_sha1",
        }
    }
}

impl TryFrom<u8> for HashAlgorithm {
    type Error = HashError;

    fn try_from(tag: u8) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|alg| alg.tag() == tag)
            .ok_or_else(|| HashError::invalid_algorithm(format!("unknown tag {tag}")))
    }
}

impl From<HashAlgorithm> for u8 {
    fn from(alg: HashAlgorithm) -> Self {
        alg.tag()
    }
}

impl FromStr for HashAlgorithm {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|alg| alg.as_str() == name)
            .ok_or_else(|| HashError::invalid_algorithm(format!("unknown name {s:?}")))
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Digest length for a raw wire tag
///
/// # Errors
///
/// Returns [`HashError::InvalidAlgorithm`] if `tag` is not a known algorithm.
pub fn digest_size(tag: u8) -> Result<usize> {
    HashAlgorithm::try_from(tag).map(HashAlgorithm::digest_size)
}

/// Availability of a raw wire tag under `policy`
///
/// # Errors
///
/// Returns [`HashError::InvalidAlgorithm`] if `tag` is not a known algorithm.
pub fn is_available<P: ModePolicy + ?Sized>(tag: u8, policy: &P) -> Result<bool> {
    HashAlgorithm::try_from(tag).map(|alg| alg.is_available(policy))
}
