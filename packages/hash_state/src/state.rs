//! Hash state dispatch
//!
//! A [`HashState`] is bound to exactly one backend at a time. The binding is
//! re-derived from the mode policy at the lifecycle entry points (`acquire`,
//! `allow_legacy_override`, `init`, `reset`, `free`) and never by `update`,
//! `digest` or `copy_from`, which always run on the backend already bound.

use std::io;

use tracing::debug;

use crate::backend::{BackendKind, DirectBackend, GenericBackend, HashBackend};
use crate::policy::{ModePolicy, ProcessPolicy};
use crate::{HashAlgorithm, HashError, HashResult, Result};

/// Digest storage, interpreted solely by which backend owns it
#[derive(Debug)]
enum Backend {
    Direct(DirectBackend),
    Generic(GenericBackend),
}

/// Apply the same call to whichever backend is bound
macro_rules! forward {
    ($backend:expr, $b:ident => $call:expr) => {
        match $backend {
            Backend::Direct($b) => $call,
            Backend::Generic($b) => $call,
        }
    };
}

impl Backend {
    /// A backend of `kind` with its resources acquired
    fn acquired(kind: BackendKind) -> Result<Self> {
        let mut backend = match kind {
            BackendKind::Direct => Self::Direct(DirectBackend::new()),
            BackendKind::Generic => Self::Generic(GenericBackend::new()),
        };
        forward!(&mut backend, b => b.acquire())?;
        Ok(backend)
    }

    fn kind(&self) -> BackendKind {
        match self {
            Self::Direct(_) => DirectBackend::KIND,
            Self::Generic(_) => GenericBackend::KIND,
        }
    }
}

/// Streaming hash state over any supported algorithm
///
/// Outside restricted mode the state drives per-algorithm contexts directly;
/// in restricted mode it drives opaque generic contexts and refuses MD5
/// unless [`allow_legacy_override`](Self::allow_legacy_override) was called
/// before `init`. Both backends produce identical digests.
///
/// A state is single-owner: callers serialize all operations on it. After
/// any fatal error (see [`HashError::is_fatal`]) the state must be
/// re-initialized before further use.
#[derive(Debug)]
pub struct HashState<P: ModePolicy = ProcessPolicy> {
    policy: P,
    backend: Backend,
    bytes_processed: u64,
}

impl<P: ModePolicy> HashState<P> {
    /// Create a state bound to the backend `policy` currently requires
    ///
    /// # Errors
    ///
    /// Returns [`HashError::NullResource`] if backend resources cannot be acquired.
    pub fn new(policy: P) -> Result<Self> {
        let kind = BackendKind::for_policy(&policy);
        let backend = Backend::acquired(kind)?;
        debug!(backend = ?kind, "Created hash state");
        Ok(Self {
            policy,
            backend,
            bytes_processed: 0,
        })
    }

    /// Re-run the creation step on this state, e.g. after [`free`](Self::free)
    ///
    /// # Errors
    ///
    /// Returns [`HashError::NullResource`] if backend resources cannot be acquired.
    pub fn acquire(&mut self) -> Result<()> {
        let kind = BackendKind::for_policy(&self.policy);
        forward!(&mut self.backend, b => b.free())?;
        self.backend = Backend::acquired(kind)?;
        self.bytes_processed = 0;
        Ok(())
    }

    /// Rebind to the backend the policy now requires; true if the binding changed
    fn select_backend(&mut self) -> Result<bool> {
        let wanted = BackendKind::for_policy(&self.policy);
        let current = self.backend.kind();
        if wanted == current {
            return Ok(false);
        }

        debug!(
            from = ?current,
            to = ?wanted,
            algorithm = %self.algorithm(),
            "Mode policy changed, rebinding hash backend"
        );
        forward!(&mut self.backend, b => b.free())?;
        self.backend = Backend::acquired(wanted)?;
        Ok(true)
    }

    /// Permit MD5 on this state for the TLS 1.0/1.1 PRF despite restricted mode
    ///
    /// Must be called before [`init`](Self::init). The exception is dropped
    /// by [`free`](Self::free) and carried over by [`copy_from`](Self::copy_from)
    /// and [`reset`](Self::reset).
    ///
    /// # Errors
    ///
    /// Returns [`HashError::NullResource`] if the state's contexts were released.
    pub fn allow_legacy_override(&mut self) -> Result<()> {
        self.select_backend()?;
        forward!(&mut self.backend, b => b.allow_legacy_override())
    }

    /// Whether the legacy MD5 exception is set on this state
    pub fn legacy_override(&self) -> bool {
        forward!(&self.backend, b => b.legacy_override())
    }

    /// Bind `algorithm` and start a fresh digest
    ///
    /// # Errors
    ///
    /// Returns [`HashError::InvalidAlgorithm`] if the policy forbids the
    /// algorithm, or [`HashError::InitFailed`] if the backend cannot start it.
    pub fn init(&mut self, algorithm: HashAlgorithm) -> Result<()> {
        self.select_backend()?;
        self.checked_init(algorithm)
    }

    /// Policy gate in front of every backend `init`
    fn checked_init(&mut self, algorithm: HashAlgorithm) -> Result<()> {
        let permitted = algorithm.is_available(&self.policy)
            || (algorithm == HashAlgorithm::Md5 && self.legacy_override());
        if !permitted {
            return Err(HashError::invalid_algorithm(format!(
                "{algorithm} is not available in restricted mode"
            )));
        }

        forward!(&mut self.backend, b => b.init(algorithm))?;
        self.bytes_processed = 0;
        Ok(())
    }

    /// Feed bytes into the digest
    ///
    /// # Errors
    ///
    /// Returns [`HashError::UpdateFailed`] if the bound backend rejects the input.
    pub fn update(&mut self, data: &[u8]) -> Result<()> {
        forward!(&mut self.backend, b => b.update(data))?;
        self.bytes_processed += data.len() as u64;
        Ok(())
    }

    /// Finalize into `out`, which must be exactly [`digest_size`](Self::digest_size) bytes
    ///
    /// # Errors
    ///
    /// Returns [`HashError::SizeMismatch`] for a wrongly sized buffer, or
    /// [`HashError::DigestFailed`] if finalization fails.
    pub fn digest(&mut self, out: &mut [u8]) -> Result<()> {
        forward!(&mut self.backend, b => b.digest(out))
    }

    /// Finalize into a newly allocated [`HashResult`]
    ///
    /// # Errors
    ///
    /// Returns [`HashError::DigestFailed`] if finalization fails.
    pub fn finish(&mut self) -> Result<HashResult> {
        let algorithm = self.algorithm();
        let mut out = vec![0u8; algorithm.digest_size()];
        self.digest(&mut out)?;
        Ok(HashResult::new(algorithm, out))
    }

    /// Become an independent duplicate of `src`, including its legacy override
    ///
    /// The destination takes on the source's backend; later updates to either
    /// state do not affect the other. The source's algorithm must pass this
    /// state's policy gate, and a restricted destination only accepts a source
    /// bound to the generic backend.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::InvalidAlgorithm`] if this state's policy forbids
    /// the source's algorithm, or [`HashError::CopyFailed`] if the source's
    /// backend is not permitted here or the contexts cannot be duplicated.
    pub fn copy_from<Q: ModePolicy>(&mut self, src: &HashState<Q>) -> Result<()> {
        let algorithm = src.algorithm();
        let permitted = algorithm.is_available(&self.policy)
            || (algorithm == HashAlgorithm::Md5 && src.legacy_override());
        if !permitted {
            return Err(HashError::invalid_algorithm(format!(
                "cannot copy a {algorithm} state into a restricted state"
            )));
        }

        let kind = src.backend.kind();
        let required = BackendKind::for_policy(&self.policy);
        if required == BackendKind::Generic && kind != BackendKind::Generic {
            return Err(HashError::CopyFailed(format!(
                "restricted state cannot take a {kind:?} backend"
            )));
        }

        if self.backend.kind() != kind {
            forward!(&mut self.backend, b => b.free())?;
            self.backend = Backend::acquired(kind)?;
        }

        match (&mut self.backend, &src.backend) {
            (Backend::Direct(to), Backend::Direct(from)) => to.copy_from(from)?,
            (Backend::Generic(to), Backend::Generic(from)) => to.copy_from(from)?,
            _ => return Err(HashError::CopyFailed("backend mismatch".into())),
        }
        self.bytes_processed = src.bytes_processed;
        Ok(())
    }

    /// A fresh state holding a duplicate of this one
    ///
    /// # Errors
    ///
    /// Returns [`HashError::CopyFailed`] if the contexts cannot be duplicated.
    pub fn try_clone(&self) -> Result<Self>
    where
        P: Clone,
    {
        let mut dup = Self::new(self.policy.clone())?;
        dup.copy_from(self)?;
        Ok(dup)
    }

    /// Restart the bound algorithm from empty input
    ///
    /// If the policy changed since the state was bound, the state moves to
    /// the required backend and the algorithm passes the policy gate again.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::WipeFailed`] if the contexts cannot be wiped.
    pub fn reset(&mut self) -> Result<()> {
        let algorithm = self.algorithm();
        if self.select_backend()? {
            return self.checked_init(algorithm);
        }

        forward!(&mut self.backend, b => b.reset())?;
        self.bytes_processed = 0;
        Ok(())
    }

    /// Release backend resources; the state needs [`acquire`](Self::acquire) before reuse
    ///
    /// # Errors
    ///
    /// Propagates backend release failures.
    pub fn free(&mut self) -> Result<()> {
        self.select_backend()?;
        forward!(&mut self.backend, b => b.free())?;
        self.bytes_processed = 0;
        Ok(())
    }

    /// Algorithm currently bound
    pub fn algorithm(&self) -> HashAlgorithm {
        forward!(&self.backend, b => b.algorithm())
    }

    /// Digest length of the bound algorithm
    pub fn digest_size(&self) -> usize {
        self.algorithm().digest_size()
    }

    /// Backend currently bound
    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Bytes fed since the last `init` or `reset`
    pub fn bytes_processed(&self) -> u64 {
        self.bytes_processed
    }

    /// The mode policy this state consults
    pub fn policy(&self) -> &P {
        &self.policy
    }
}

impl<P: ModePolicy> io::Write for HashState<P> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf)
            .map_err(io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
