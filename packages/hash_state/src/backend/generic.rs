//! Generic backend: drives opaque digest contexts
//!
//! A primary context carries the bound algorithm (SHA-1 for MD5 || SHA-1)
//! and a secondary context carries MD5 in dual mode only. Contexts are
//! duplicated through their own cloning facility, never aliased.

use std::fmt;

use digest::DynDigest;
use md5::Md5;
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512};
use tracing::{debug, trace};

use super::{check_output_size, BackendKind, HashBackend};
use crate::algorithm::MD5_DIGEST_LENGTH;
use crate::{HashAlgorithm, HashError, Result};

/// Digest primitive behind an opaque handle
trait OpaqueDigest: DynDigest + Send + Sync {
    /// Independent copy of the in-progress computation
    fn duplicate(&self) -> Box<dyn OpaqueDigest>;
}

impl<T> OpaqueDigest for T
where
    T: DynDigest + Clone + Send + Sync + 'static,
{
    fn duplicate(&self) -> Box<dyn OpaqueDigest> {
        Box::new(self.clone())
    }
}

/// Primitive for a single-stream algorithm; `None` and `Md5Sha1` have none
fn open_primitive(algorithm: HashAlgorithm) -> Option<Box<dyn OpaqueDigest>> {
    match algorithm {
        HashAlgorithm::None | HashAlgorithm::Md5Sha1 => None,
        HashAlgorithm::Md5 => Some(Box::new(Md5::default())),
        HashAlgorithm::Sha1 => Some(Box::new(Sha1::default())),
        HashAlgorithm::Sha224 => Some(Box::new(Sha224::default())),
        HashAlgorithm::Sha256 => Some(Box::new(Sha256::default())),
        HashAlgorithm::Sha384 => Some(Box::new(Sha384::default())),
        HashAlgorithm::Sha512 => Some(Box::new(Sha512::default())),
    }
}

/// Handle lifecycle of one opaque context
enum Handle {
    /// Not held; every operation fails until reacquired
    Released,
    /// Held but not bound to a primitive
    Acquired,
    /// Bound to a primitive
    Bound {
        algorithm: HashAlgorithm,
        digest: Box<dyn OpaqueDigest>,
    },
}

/// One opaque context plus its policy exception flag
struct GenericContext {
    handle: Handle,
    md5_allowed: bool,
}

impl GenericContext {
    const fn released() -> Self {
        Self {
            handle: Handle::Released,
            md5_allowed: false,
        }
    }

    fn acquire(&mut self) {
        self.handle = Handle::Acquired;
        self.md5_allowed = false;
    }

    fn release(&mut self) {
        self.handle = Handle::Released;
        self.md5_allowed = false;
    }

    fn is_held(&self) -> bool {
        !matches!(self.handle, Handle::Released)
    }

    fn bind(&mut self, algorithm: HashAlgorithm) -> Result<()> {
        if !self.is_held() {
            return Err(HashError::InitFailed(format!(
                "cannot bind {algorithm} to a released context"
            )));
        }
        // Rebinding the same primitive restarts it in place.
        if let Handle::Bound {
            algorithm: bound,
            digest,
        } = &mut self.handle
        {
            if *bound == algorithm {
                digest.reset();
                return Ok(());
            }
        }
        self.handle = match open_primitive(algorithm) {
            Some(digest) => Handle::Bound { algorithm, digest },
            None => Handle::Acquired,
        };
        Ok(())
    }

    fn update(&mut self, data: &[u8]) -> Result<()> {
        match &mut self.handle {
            Handle::Released => Err(HashError::update_failed("context is released")),
            Handle::Acquired => Err(HashError::update_failed("context not bound to a primitive")),
            Handle::Bound { digest, .. } => {
                digest.update(data);
                Ok(())
            }
        }
    }

    fn finalize_into(&mut self, out: &mut [u8]) -> Result<()> {
        match &mut self.handle {
            Handle::Released => Err(HashError::digest_failed("context is released")),
            Handle::Acquired => Err(HashError::digest_failed("context not bound to a primitive")),
            Handle::Bound { algorithm, digest } => {
                let len = out.len();
                digest.finalize_into_reset(out).map_err(|_| {
                    HashError::digest_failed(format!("{algorithm} rejected a {len}-byte output"))
                })
            }
        }
    }

    /// Duplicate the handle state of `src`; the flag is handled by the caller
    fn copy_from(&mut self, src: &GenericContext) -> Result<()> {
        if !self.is_held() {
            return Err(HashError::CopyFailed("destination context is released".into()));
        }
        self.handle = match &src.handle {
            Handle::Released => {
                return Err(HashError::CopyFailed("source context is released".into()));
            }
            Handle::Acquired => Handle::Acquired,
            Handle::Bound { algorithm, digest } => Handle::Bound {
                algorithm: *algorithm,
                digest: (**digest).duplicate(),
            },
        };
        Ok(())
    }

    /// Wipe in-progress input without releasing the handle; clears the MD5 exception
    fn wipe(&mut self) -> Result<()> {
        match &mut self.handle {
            Handle::Released => Err(HashError::WipeFailed("context is released".into())),
            Handle::Acquired => {
                self.md5_allowed = false;
                Ok(())
            }
            Handle::Bound { digest, .. } => {
                digest.reset();
                self.md5_allowed = false;
                Ok(())
            }
        }
    }
}

/// Backend holding a primary and a secondary opaque context
pub struct GenericBackend {
    algorithm: HashAlgorithm,
    primary: GenericContext,
    secondary: GenericContext,
}

impl GenericBackend {
    /// Create a backend with no contexts held; call [`HashBackend::acquire`] next
    #[must_use]
    pub const fn new() -> Self {
        Self {
            algorithm: HashAlgorithm::None,
            primary: GenericContext::released(),
            secondary: GenericContext::released(),
        }
    }

    /// Whether both opaque contexts are held
    #[must_use]
    pub fn is_acquired(&self) -> bool {
        self.primary.is_held() && self.secondary.is_held()
    }
}

impl Default for GenericBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GenericBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericBackend")
            .field("algorithm", &self.algorithm)
            .field("acquired", &self.is_acquired())
            .field("md5_allowed", &self.primary.md5_allowed)
            .finish()
    }
}

impl HashBackend for GenericBackend {
    const KIND: BackendKind = BackendKind::Generic;

    fn acquire(&mut self) -> Result<()> {
        self.primary.acquire();
        self.secondary.acquire();
        self.algorithm = HashAlgorithm::None;
        trace!("Acquired generic digest contexts");
        Ok(())
    }

    fn allow_legacy_override(&mut self) -> Result<()> {
        if !self.primary.is_held() {
            return Err(HashError::null_resource(
                "legacy override on a released context",
            ));
        }
        self.primary.md5_allowed = true;
        debug!("Legacy MD5 override enabled for generic digest context");
        Ok(())
    }

    fn legacy_override(&self) -> bool {
        self.primary.md5_allowed
    }

    fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    fn init(&mut self, algorithm: HashAlgorithm) -> Result<()> {
        match algorithm {
            HashAlgorithm::Md5Sha1 => {
                self.primary.bind(HashAlgorithm::Sha1)?;
                self.secondary.bind(HashAlgorithm::Md5)?;
            }
            other => self.primary.bind(other)?,
        }
        self.algorithm = algorithm;
        Ok(())
    }

    fn update(&mut self, data: &[u8]) -> Result<()> {
        match self.algorithm {
            HashAlgorithm::None => Ok(()),
            HashAlgorithm::Md5Sha1 => {
                self.primary.update(data)?;
                self.secondary.update(data)
            }
            _ => self.primary.update(data),
        }
    }

    fn digest(&mut self, out: &mut [u8]) -> Result<()> {
        check_output_size(self.algorithm, out.len())?;

        match self.algorithm {
            HashAlgorithm::None => Ok(()),
            HashAlgorithm::Md5Sha1 => {
                let (md5_out, sha1_out) = out.split_at_mut(MD5_DIGEST_LENGTH);
                self.primary.finalize_into(sha1_out)?;
                self.secondary.finalize_into(md5_out)
            }
            _ => self.primary.finalize_into(out),
        }
    }

    fn copy_from(&mut self, src: &Self) -> Result<()> {
        if src.primary.md5_allowed {
            self.allow_legacy_override()?;
        } else {
            self.primary.md5_allowed = false;
        }

        match src.algorithm {
            HashAlgorithm::None => {}
            HashAlgorithm::Md5Sha1 => {
                self.primary.copy_from(&src.primary)?;
                self.secondary.copy_from(&src.secondary)?;
            }
            _ => self.primary.copy_from(&src.primary)?,
        }
        self.algorithm = src.algorithm;
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        let reassert_md5 = self.algorithm == HashAlgorithm::Md5 && self.primary.md5_allowed;

        self.primary.wipe()?;
        if self.algorithm == HashAlgorithm::Md5Sha1 {
            self.secondary.wipe()?;
        }

        // Wiping clears the MD5 exception; restore it before rebinding.
        if reassert_md5 {
            self.allow_legacy_override()?;
        }

        self.init(self.algorithm)
    }

    fn free(&mut self) -> Result<()> {
        self.primary.release();
        self.secondary.release();
        self.algorithm = HashAlgorithm::None;
        trace!("Released generic digest contexts");
        Ok(())
    }
}
