//! Digest backends
//!
//! - direct.rs - one concrete context per algorithm, copied by value
//! - generic.rs - opaque boxed contexts with the legacy MD5 override
//!
//! Both produce byte-identical output for every algorithm, including the
//! MD5 || SHA-1 layout of [`HashAlgorithm::Md5Sha1`].

pub mod direct;
pub mod generic;

pub use direct::DirectBackend;
pub use generic::GenericBackend;

use serde::{Deserialize, Serialize};

use crate::policy::ModePolicy;
use crate::{HashAlgorithm, HashError, Result};

/// Which backend a state is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendKind {
    /// Per-algorithm contexts, used outside restricted mode
    Direct,
    /// Opaque generic contexts, required in restricted mode
    Generic,
}

impl BackendKind {
    /// Backend required by the current mode policy
    pub fn for_policy<P: ModePolicy + ?Sized>(policy: &P) -> Self {
        if policy.is_restricted() {
            Self::Generic
        } else {
            Self::Direct
        }
    }
}

/// Operations every digest backend provides
pub trait HashBackend {
    /// Backend variant
    const KIND: BackendKind;

    /// Acquire whatever resources the backend holds outside its own value
    fn acquire(&mut self) -> Result<()>;

    /// Permit MD5 for the legacy TLS PRF construction; must precede `init`
    fn allow_legacy_override(&mut self) -> Result<()>;

    /// Whether the legacy MD5 override is currently set
    fn legacy_override(&self) -> bool;

    /// Algorithm currently bound
    fn algorithm(&self) -> HashAlgorithm;

    /// Bind `algorithm` and start a fresh digest
    fn init(&mut self, algorithm: HashAlgorithm) -> Result<()>;

    /// Feed bytes into the bound digest
    fn update(&mut self, data: &[u8]) -> Result<()>;

    /// Finalize into `out`, which must be exactly `algorithm().digest_size()` long
    fn digest(&mut self, out: &mut [u8]) -> Result<()>;

    /// Become an independent duplicate of `src`
    fn copy_from(&mut self, src: &Self) -> Result<()>;

    /// Restart the bound algorithm from empty input
    fn reset(&mut self) -> Result<()>;

    /// Release held resources
    fn free(&mut self) -> Result<()>;
}

/// Reject output buffers whose length differs from the algorithm's digest size
pub(crate) fn check_output_size(algorithm: HashAlgorithm, actual: usize) -> Result<()> {
    let expected = algorithm.digest_size();
    if actual == expected {
        Ok(())
    } else {
        Err(HashError::SizeMismatch { expected, actual })
    }
}
