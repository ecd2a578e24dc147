//! Version upgrade policy
//!
//! The platform only accepts sequential minor upgrades within the single
//! supported major version. Validating locally turns a late remote
//! rejection into an immediate, precise error before anything is submitted.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The single major version the platform supports.
pub const SUPPORTED_MAJOR: u64 = 1;

/// Rule violations detected before a version change is submitted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// The version string lacks numeric major and minor components.
    #[error("Version {0:?} should specify numeric major and minor components (e.g. \"1.26\")")]
    MalformedVersion(String),

    #[error("The only supported major version is {supported}, requested {0}", supported = SUPPORTED_MAJOR)]
    UnsupportedMajor(ClusterVersion),

    #[error("Cannot downgrade cluster from {from} to {to}")]
    Downgrade {
        from: ClusterVersion,
        to: ClusterVersion,
    },

    /// Anything other than exactly the next minor version, including the
    /// version already running.
    #[error("Cannot upgrade cluster from {from} to {to}, only the next minor version is allowed")]
    MinorSkip {
        from: ClusterVersion,
        to: ClusterVersion,
    },
}

/// A control plane version, ordered by (major, minor, patch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClusterVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl ClusterVersion {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for ClusterVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.patch == 0 {
            write!(f, "{}.{}", self.major, self.minor)
        } else {
            write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
        }
    }
}

impl FromStr for ClusterVersion {
    type Err = PolicyError;

    /// Parse "major.minor" or "major.minor.patch"; the patch component
    /// defaults to 0. Extra segments are ignored.
    fn from_str(s: &str) -> Result<Self, PolicyError> {
        let segments: Vec<&str> = s.split('.').collect();
        if segments.len() < 2 {
            return Err(PolicyError::MalformedVersion(s.to_string()));
        }

        let mut numbers = [0u64; 3];
        for (slot, segment) in numbers.iter_mut().zip(&segments) {
            *slot = segment
                .parse()
                .map_err(|_| PolicyError::MalformedVersion(s.to_string()))?;
        }

        Ok(ClusterVersion::new(numbers[0], numbers[1], numbers[2]))
    }
}

/// A validated version change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionTransition {
    pub from: ClusterVersion,
    pub to: ClusterVersion,
}

impl fmt::Display for VersionTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// Check a version change against the upgrade rules.
///
/// Rules apply in order: both versions must parse, both majors must equal
/// [`SUPPORTED_MAJOR`], the target must not be lower, and the target minor
/// must be exactly one above the current minor.
pub fn validate_transition(from: &str, to: &str) -> Result<VersionTransition, PolicyError> {
    let from: ClusterVersion = from.parse()?;
    let to: ClusterVersion = to.parse()?;

    if from.major != SUPPORTED_MAJOR {
        return Err(PolicyError::UnsupportedMajor(from));
    }
    if to.major != SUPPORTED_MAJOR {
        return Err(PolicyError::UnsupportedMajor(to));
    }
    if to < from {
        return Err(PolicyError::Downgrade { from, to });
    }
    if to.minor != from.minor + 1 {
        return Err(PolicyError::MinorSkip { from, to });
    }

    Ok(VersionTransition { from, to })
}
