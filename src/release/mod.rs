mod artifact;
mod bundler;
mod record;

pub use bundler::{BundleRequest, bundle};

use std::fmt;
use std::str::FromStr;

/// Argument validation failures, reported before any file is touched
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BundleError {
    #[error("invalid environment {0:?}: expected one of staging, production")]
    InvalidEnvironment(String),
    #[error("invalid version {0:?}: expected a semantic version such as 1.2.3")]
    InvalidVersion(String),
}

/// Deployment tier a bundle run writes into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = BundleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(BundleError::InvalidEnvironment(other.to_string())),
        }
    }
}

/// A release version as given on the command line.
///
/// Accepts full semantic versions and the `MAJOR.MINOR` shorthand. The
/// original text is kept so that paths and stored records use it verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseVersion(String);

impl ReleaseVersion {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ReleaseVersion {
    type Err = BundleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BundleError::InvalidVersion(s.to_string());

        if semver::Version::parse(s).is_err() {
            // MAJOR.MINOR shorthand
            let (major, minor) = s.split_once('.').ok_or_else(invalid)?;
            let is_number = |part: &str| {
                !part.is_empty()
                    && part.bytes().all(|b| b.is_ascii_digit())
                    && (part == "0" || !part.starts_with('0'))
            };
            if !is_number(major) || !is_number(minor) {
                return Err(invalid());
            }
            semver::Version::parse(&format!("{major}.{minor}.0")).map_err(|_| invalid())?;
        }

        Ok(Self(s.to_string()))
    }
}
