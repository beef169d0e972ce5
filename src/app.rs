//! One invocation of the version workflow: load, apply a command, save.
//!
//! The [`Version`] lives only for the duration of [`run`]; the properties
//! file is the source of truth between invocations.

use crate::config::SemverConfig;
use crate::store::{self, StoreError};
use crate::version::{IncrementTarget, Version};

/// Mutation applied to the stored version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Leave the version as is; still writes the file so a first run bootstraps it.
    Show,
    /// Bump major, minor or patch.
    Increment(IncrementTarget),
    /// Set the build metadata, or bump it when no value is given.
    BuildMeta(Option<String>),
}

impl Command {
    /// Apply this command to `version` in place.
    pub fn apply(&self, version: &mut Version) {
        match self {
            Self::Show => {}
            Self::Increment(target) => version.increment(*target),
            Self::BuildMeta(explicit) => version.increment_build_meta(explicit.as_deref()),
        }
    }
}

/// Load the version, apply `command`, persist, and return the result.
pub fn run(config: &SemverConfig, command: &Command) -> Result<Version, StoreError> {
    let path = &config.properties;
    tracing::debug!(
        "Attempting to read properties from `{}` [exists: {}, is_file: {}]",
        path.display(),
        path.exists(),
        path.is_file()
    );
    let mut version = store::load_version(config)?;
    tracing::debug!("Loaded version {version}");

    command.apply(&mut version);
    store::save_version(config, &version)?;

    match command {
        Command::Show => tracing::debug!("Version: {version}"),
        _ => tracing::info!("Version: {version}"),
    }
    if let Err(err) = version.to_semver() {
        tracing::warn!("Version {version} is not valid SemVer 2.0: {err}");
    }
    Ok(version)
}
