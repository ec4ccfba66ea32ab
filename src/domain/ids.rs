//! Domain identifier types
//!
//! Newtype wrappers that keep export job identities from being mixed up
//! with other string or UUID values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Export job identifier newtype wrapper
///
/// A fresh identity is allocated for every export start; identities are
/// never reused across runs.
///
/// # Examples
///
/// ```
/// use tilepack::domain::ids::JobId;
/// use std::str::FromStr;
///
/// let first = JobId::generate();
/// let second = JobId::generate();
/// assert_ne!(first, second);
///
/// let parsed = JobId::from_str("6f1c1c4e-3d0b-4bd5-9a3e-0d3f9d6b2a10").unwrap();
/// assert_eq!(parsed.to_string(), "6f1c1c4e-3d0b-4bd5-9a3e-0d3f9d6b2a10");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(Uuid);

impl JobId {
    /// Allocates a new random job identity
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Returns the first eight characters, handy for log lines and file names
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JobId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| format!("Invalid job ID '{s}': {e}"))
    }
}
