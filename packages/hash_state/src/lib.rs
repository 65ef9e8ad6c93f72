//! # Cryypt Hash State
//!
//! A single streaming hash state over MD5, SHA-1, SHA-2 and the combined
//! MD5 || SHA-1 digest used by TLS 1.0/1.1 handshakes, switching between two
//! backends according to a restricted (FIPS) mode policy:
//!
//! - **Direct**: per-algorithm context values, used outside restricted mode.
//! - **Generic**: opaque boxed contexts, required in restricted mode, with a
//!   per-state exception that lets MD5 through for the legacy TLS PRF.
//!
//! Both backends produce byte-identical digests.
//!
//! ## Quick Start
//!
//! ```rust
//! use cryypt_hash_state::{HashAlgorithm, HashState, PolicyConfig};
//!
//! # fn main() -> cryypt_hash_state::Result<()> {
//! let mut state = HashState::new(PolicyConfig::unrestricted())?;
//! state.init(HashAlgorithm::Sha256)?;
//! state.update(b"abc")?;
//! let digest = state.finish()?;
//! assert_eq!(digest.len(), 32);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod algorithm;
pub mod backend;
pub mod error;
pub mod hash_result;
pub mod policy;
pub mod state;

// Re-export error types
pub use error::{HashError, Result};

pub use algorithm::{digest_size, is_available, HashAlgorithm, MAX_DIGEST_LENGTH};
pub use backend::{BackendKind, DirectBackend, GenericBackend, HashBackend};
pub use hash_result::HashResult;
pub use policy::{
    is_restricted_mode, set_restricted_mode, ModePolicy, PolicyConfig, ProcessPolicy,
};
pub use state::HashState;

/// Hash `data` in one call under the process-wide mode policy
///
/// # Errors
///
/// Returns [`HashError::InvalidAlgorithm`] if the algorithm is unavailable in
/// the current mode.
pub fn hash(algorithm: HashAlgorithm, data: &[u8]) -> Result<HashResult> {
    hash_with_policy(ProcessPolicy, algorithm, data)
}

/// Hash `data` in one call under `policy`
///
/// # Errors
///
/// Returns [`HashError::InvalidAlgorithm`] if `policy` forbids the algorithm.
pub fn hash_with_policy<P: ModePolicy>(
    policy: P,
    algorithm: HashAlgorithm,
    data: &[u8],
) -> Result<HashResult> {
    let mut state = HashState::new(policy)?;
    state.init(algorithm)?;
    state.update(data)?;
    let result = state.finish()?;
    state.free()?;
    Ok(result)
}
