//! Restricted (FIPS) mode policy
//!
//! Backend selection and algorithm availability read the mode through
//! [`ModePolicy`]. A [`HashState`](crate::HashState) owns its policy, so both
//! branches can be exercised deterministically; [`ProcessPolicy`] is the
//! process-wide flag used when no explicit policy is given.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{HashError, Result};

/// Environment variable seeding the process-wide restricted mode flag
pub const FIPS_MODE_ENV: &str = "CRYYPT_FIPS_MODE";

static RESTRICTED_MODE: Lazy<AtomicBool> = Lazy::new(|| {
    let restricted = PolicyConfig::from_env().restricted;
    debug!(restricted, env = FIPS_MODE_ENV, "Seeded process restricted mode");
    AtomicBool::new(restricted)
});

/// Source of the restricted mode flag
pub trait ModePolicy {
    /// Whether only certified algorithms and the generic backend may be used
    fn is_restricted(&self) -> bool;
}

/// Static mode policy, loadable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Operate in restricted (certified) mode
    #[serde(default)]
    pub restricted: bool,
}

impl PolicyConfig {
    /// Unrestricted policy
    #[must_use]
    pub const fn unrestricted() -> Self {
        Self { restricted: false }
    }

    /// Restricted policy
    #[must_use]
    pub const fn restricted() -> Self {
        Self { restricted: true }
    }

    /// Read the policy from `CRYYPT_FIPS_MODE`
    ///
    /// `1`, `true`, `yes` and `on` (any case) enable restricted mode; an
    /// unset or unrecognized value leaves it disabled.
    #[must_use]
    pub fn from_env() -> Self {
        let restricted = std::env::var(FIPS_MODE_ENV)
            .map(|value| parse_flag(&value))
            .unwrap_or(false);
        Self { restricted }
    }

    /// Parse the policy from a JSON document such as `{"restricted": true}`
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Configuration`] if the document is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| HashError::Configuration(e.to_string()))
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl ModePolicy for PolicyConfig {
    fn is_restricted(&self) -> bool {
        self.restricted
    }
}

/// The process-wide restricted mode flag
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessPolicy;

impl ModePolicy for ProcessPolicy {
    fn is_restricted(&self) -> bool {
        is_restricted_mode()
    }
}

/// Query the process-wide restricted mode flag
pub fn is_restricted_mode() -> bool {
    RESTRICTED_MODE.load(Ordering::Acquire)
}

/// Switch the process-wide restricted mode flag
///
/// Live states pick the change up at their next `init`, `reset`, `free` or
/// `allow_legacy_override`.
pub fn set_restricted_mode(restricted: bool) {
    RESTRICTED_MODE.store(restricted, Ordering::Release);
    debug!(restricted, "Process restricted mode changed");
}

impl ModePolicy for AtomicBool {
    fn is_restricted(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

impl<T: ModePolicy + ?Sized> ModePolicy for &T {
    fn is_restricted(&self) -> bool {
        (**self).is_restricted()
    }
}

impl<T: ModePolicy + ?Sized> ModePolicy for Arc<T> {
    fn is_restricted(&self) -> bool {
        (**self).is_restricted()
    }
}
