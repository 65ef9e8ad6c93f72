//! Direct backend: drives each algorithm's own context type
//!
//! Contexts are plain values with no external handles, so `copy` is a
//! by-value clone and `free` has nothing to release.

use std::fmt;

use digest::Digest;
use md5::Md5;
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512};

use super::{check_output_size, BackendKind, HashBackend};
use crate::algorithm::MD5_DIGEST_LENGTH;
use crate::{HashAlgorithm, HashError, Result};

/// Internal hasher state for the bound algorithm
#[derive(Clone, Default)]
enum DirectContext {
    #[default]
    None,
    Md5(Md5),
    Sha1(Sha1),
    Sha224(Sha224),
    Sha256(Sha256),
    Sha384(Sha384),
    Sha512(Sha512),
    Md5Sha1 { md5: Md5, sha1: Sha1 },
}

impl DirectContext {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::None => Self::None,
            HashAlgorithm::Md5 => Self::Md5(Md5::new()),
            HashAlgorithm::Sha1 => Self::Sha1(Sha1::new()),
            HashAlgorithm::Sha224 => Self::Sha224(Sha224::new()),
            HashAlgorithm::Sha256 => Self::Sha256(Sha256::new()),
            HashAlgorithm::Sha384 => Self::Sha384(Sha384::new()),
            HashAlgorithm::Sha512 => Self::Sha512(Sha512::new()),
            HashAlgorithm::Md5Sha1 => Self::Md5Sha1 {
                md5: Md5::new(),
                sha1: Sha1::new(),
            },
        }
    }

    fn algorithm(&self) -> HashAlgorithm {
        match self {
            Self::None => HashAlgorithm::None,
            Self::Md5(_) => HashAlgorithm::Md5,
            Self::Sha1(_) => HashAlgorithm::Sha1,
            Self::Sha224(_) => HashAlgorithm::Sha224,
            Self::Sha256(_) => HashAlgorithm::Sha256,
            Self::Sha384(_) => HashAlgorithm::Sha384,
            Self::Sha512(_) => HashAlgorithm::Sha512,
            Self::Md5Sha1 { .. } => HashAlgorithm::Md5Sha1,
        }
    }
}

/// Finalize `hasher` into `out` and leave it ready for new input
fn finalize_into<D: digest::DynDigest>(hasher: &mut D, out: &mut [u8]) -> Result<()> {
    let len = out.len();
    digest::DynDigest::finalize_into_reset(hasher, out)
        .map_err(|_| HashError::digest_failed(format!("output buffer of {len} bytes rejected")))
}

/// Backend holding one concrete context per algorithm
#[derive(Clone, Default)]
pub struct DirectBackend {
    context: DirectContext,
}

impl DirectBackend {
    /// Create an unbound backend
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Debug for DirectBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectBackend")
            .field("algorithm", &self.context.algorithm())
            .finish()
    }
}

impl HashBackend for DirectBackend {
    const KIND: BackendKind = BackendKind::Direct;

    fn acquire(&mut self) -> Result<()> {
        Ok(())
    }

    // MD5 is never withheld from this backend, so there is nothing to override.
    fn allow_legacy_override(&mut self) -> Result<()> {
        Ok(())
    }

    fn legacy_override(&self) -> bool {
        false
    }

    fn algorithm(&self) -> HashAlgorithm {
        self.context.algorithm()
    }

    fn init(&mut self, algorithm: HashAlgorithm) -> Result<()> {
        self.context = DirectContext::new(algorithm);
        Ok(())
    }

    fn update(&mut self, data: &[u8]) -> Result<()> {
        match &mut self.context {
            DirectContext::None => {}
            DirectContext::Md5(h) => Digest::update(h, data),
            DirectContext::Sha1(h) => Digest::update(h, data),
            DirectContext::Sha224(h) => Digest::update(h, data),
            DirectContext::Sha256(h) => Digest::update(h, data),
            DirectContext::Sha384(h) => Digest::update(h, data),
            DirectContext::Sha512(h) => Digest::update(h, data),
            DirectContext::Md5Sha1 { md5, sha1 } => {
                Digest::update(sha1, data);
                Digest::update(md5, data);
            }
        }
        Ok(())
    }

    fn digest(&mut self, out: &mut [u8]) -> Result<()> {
        check_output_size(self.context.algorithm(), out.len())?;

        match &mut self.context {
            DirectContext::None => Ok(()),
            DirectContext::Md5(h) => finalize_into(h, out),
            DirectContext::Sha1(h) => finalize_into(h, out),
            DirectContext::Sha224(h) => finalize_into(h, out),
            DirectContext::Sha256(h) => finalize_into(h, out),
            DirectContext::Sha384(h) => finalize_into(h, out),
            DirectContext::Sha512(h) => finalize_into(h, out),
            DirectContext::Md5Sha1 { md5, sha1 } => {
                let (md5_out, sha1_out) = out.split_at_mut(MD5_DIGEST_LENGTH);
                finalize_into(sha1, sha1_out)?;
                finalize_into(md5, md5_out)
            }
        }
    }

    fn copy_from(&mut self, src: &Self) -> Result<()> {
        self.context = src.context.clone();
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.init(self.context.algorithm())
    }

    fn free(&mut self) -> Result<()> {
        Ok(())
    }
}
