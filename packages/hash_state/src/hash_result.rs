//! Finished digest output

use crate::HashAlgorithm;

/// Digest bytes produced by [`HashState::finish`](crate::HashState::finish)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashResult {
    algorithm: HashAlgorithm,
    bytes: Vec<u8>,
}

impl HashResult {
    /// Wrap digest bytes produced by `algorithm`
    #[must_use]
    pub fn new(algorithm: HashAlgorithm, bytes: Vec<u8>) -> Self {
        Self { algorithm, bytes }
    }

    /// Algorithm that produced the digest
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Get the raw bytes of the digest
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Convert to a Vec<u8>
    #[must_use]
    pub fn to_vec(self) -> Vec<u8> {
        self.bytes
    }

    /// Get the digest as a lowercase hexadecimal string
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// For `Md5Sha1` digests, the MD5 and SHA-1 halves
    #[must_use]
    pub fn split_md5_sha1(&self) -> Option<(&[u8], &[u8])> {
        (self.algorithm == HashAlgorithm::Md5Sha1)
            .then(|| self.bytes.split_at(crate::algorithm::MD5_DIGEST_LENGTH))
    }

    /// Get the length of the digest in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the digest is empty (only for `HashAlgorithm::None`)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<HashResult> for Vec<u8> {
    fn from(result: HashResult) -> Self {
        result.bytes
    }
}

impl AsRef<[u8]> for HashResult {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Display for HashResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}
