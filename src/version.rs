//! Semantic version model with increment rules and canonical formatting.
//!
//! Numeric components are stored as integers so they can never hold a
//! non-numeric value; text coming from disk goes through [`parse_component`]
//! which substitutes the field default for malformed text and only fails
//! when a valid integer does not fit.

use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;

use thiserror::Error;

/// Default major component for a project without a stored version.
pub const DEFAULT_MAJOR: u64 = 0;
/// Default minor component for a project without a stored version.
pub const DEFAULT_MINOR: u64 = 1;
/// Default patch component for a project without a stored version.
pub const DEFAULT_PATCH: u64 = 0;
/// Default text placed between the patch number and the pre-release.
pub const DEFAULT_PRERELEASE_PREFIX: &str = "-";
/// Default text placed before the build metadata.
pub const DEFAULT_BUILDMETA_PREFIX: &str = "+";
/// Default text joining major, minor and patch.
pub const DEFAULT_SEPARATOR: &str = ".";

/// Component bumped by [`Version::increment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncrementTarget {
    /// Bump major, reset minor and patch.
    Major,
    /// Bump minor, reset patch.
    Minor,
    /// Bump patch.
    Patch,
}

impl IncrementTarget {
    /// Lowercase name used on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Patch => "patch",
        }
    }
}

impl fmt::Display for IncrementTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when text does not name an increment target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown increment target '{0}' (expected major, minor or patch)")]
pub struct UnknownTarget(pub String);

impl FromStr for IncrementTarget {
    type Err = UnknownTarget;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "major" => Ok(Self::Major),
            "minor" => Ok(Self::Minor),
            "patch" => Ok(Self::Patch),
            _ => Err(UnknownTarget(value.to_string())),
        }
    }
}

/// In-memory semantic version state for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre_release: String,
    pub pre_release_prefix: String,
    pub build_meta: String,
    pub build_meta_prefix: String,
    pub separator: String,
}

impl Default for Version {
    fn default() -> Self {
        Self {
            major: DEFAULT_MAJOR,
            minor: DEFAULT_MINOR,
            patch: DEFAULT_PATCH,
            pre_release: String::new(),
            pre_release_prefix: DEFAULT_PRERELEASE_PREFIX.to_string(),
            build_meta: String::new(),
            build_meta_prefix: DEFAULT_BUILDMETA_PREFIX.to_string(),
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

impl Version {
    /// Create a release version with default prefixes and separator.
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            ..Self::default()
        }
    }

    /// Bump one numeric component and clear the pre-release and build metadata.
    ///
    /// Components saturate at `u64::MAX`.
    pub fn increment(&mut self, target: IncrementTarget) {
        match target {
            IncrementTarget::Major => {
                self.major = self.major.saturating_add(1);
                self.minor = 0;
                self.patch = 0;
            }
            IncrementTarget::Minor => {
                self.minor = self.minor.saturating_add(1);
                self.patch = 0;
            }
            IncrementTarget::Patch => {
                self.patch = self.patch.saturating_add(1);
            }
        }
        self.pre_release.clear();
        self.build_meta.clear();
    }

    /// Set the build metadata, or bump it when no explicit value is given.
    ///
    /// Numeric metadata is incremented; anything else restarts at `1`.
    pub fn increment_build_meta(&mut self, explicit: Option<&str>) {
        self.build_meta = match explicit {
            Some(value) => value.to_string(),
            None => match self.build_meta.parse::<u64>() {
                Ok(current) => current.saturating_add(1).to_string(),
                Err(_) => "1".to_string(),
            },
        };
    }

    /// Canonical version string, e.g. `1.0.0-rc1+5`.
    pub fn semver(&self) -> String {
        self.to_string()
    }

    /// Check the canonical string against strict SemVer 2.0.
    ///
    /// Fails for custom separators or prefixes and for identifiers SemVer
    /// does not allow.
    pub fn to_semver(&self) -> Result<semver::Version, semver::Error> {
        semver::Version::parse(&self.semver())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = &self.separator;
        write!(f, "{}{sep}{}{sep}{}", self.major, self.minor, self.patch)?;
        if !self.pre_release.is_empty() {
            write!(f, "{}{}", self.pre_release_prefix, self.pre_release)?;
        }
        if !self.build_meta.is_empty() {
            write!(f, "{}{}", self.build_meta_prefix, self.build_meta)?;
        }
        Ok(())
    }
}

/// Returned when a stored component is a valid integer too large for `u64`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Version component '{value}' exceeds {max}", max = u64::MAX)]
pub struct ComponentOverflow {
    /// Stored text, trimmed.
    pub value: String,
}

/// Parse a stored numeric component.
///
/// Missing and malformed values both take the per-field `default`, so
/// `minor=abc` loads as the minor default rather than `0`. Surrounding
/// whitespace is ignored. A digit string beyond `u64::MAX` is an error
/// instead of a silent reset.
pub fn parse_component(value: Option<&str>, default: u64) -> Result<u64, ComponentOverflow> {
    let Some(text) = value.map(str::trim) else {
        return Ok(default);
    };
    match text.parse::<u64>() {
        Ok(parsed) => Ok(parsed),
        Err(err) if *err.kind() == IntErrorKind::PosOverflow => Err(ComponentOverflow {
            value: text.to_string(),
        }),
        Err(_) => Ok(default),
    }
}
