//! Persistence of a [`Version`] as named keys in a properties file.
//!
//! Loading never invents state the file does not hold: missing keys take the
//! model defaults and a missing file yields [`Version::default`]. Saving
//! merges into whatever the file already contains, so entries not managed
//! here survive untouched.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::config::SemverConfig;
use crate::properties::Properties;
use crate::version::{
    DEFAULT_BUILDMETA_PREFIX, DEFAULT_MAJOR, DEFAULT_MINOR, DEFAULT_PATCH,
    DEFAULT_PRERELEASE_PREFIX, DEFAULT_SEPARATOR, Version, parse_component,
};

mod errors;

#[cfg(test)]
mod tests;

pub use errors::StoreError;
use errors::absolute;

/// Header comment written at the top of every saved file.
pub const HEADER_COMMENT: &str = "Generated by propver";

/// Load the version stored at `config.properties`.
pub fn load_version(config: &SemverConfig) -> Result<Version, StoreError> {
    match read_properties(&config.properties)? {
        Some(properties) => version_from_properties(&properties, config, &config.properties),
        None => Ok(Version::default()),
    }
}

/// Write `version` to `config.properties`, keeping unrelated entries.
pub fn save_version(config: &SemverConfig, version: &Version) -> Result<(), StoreError> {
    let mut properties = read_properties(&config.properties)?.unwrap_or_default();
    merge_version(&mut properties, config, version);
    write_properties(&config.properties, &properties)
}

/// Build a version from the configured keys, defaulting anything missing.
fn version_from_properties(
    properties: &Properties,
    config: &SemverConfig,
    path: &Path,
) -> Result<Version, StoreError> {
    let component = |key: &str, default: u64| {
        parse_component(properties.get(key), default).map_err(|source| StoreError::Overflow {
            path: absolute(path),
            key: key.to_string(),
            source,
        })
    };
    let text = |key: &str, default: &str| properties.get(key).unwrap_or(default).to_string();
    Ok(Version {
        major: component(&config.major_key, DEFAULT_MAJOR)?,
        minor: component(&config.minor_key, DEFAULT_MINOR)?,
        patch: component(&config.patch_key, DEFAULT_PATCH)?,
        pre_release: text(&config.pre_release_key, ""),
        pre_release_prefix: text(&config.pre_release_prefix_key, DEFAULT_PRERELEASE_PREFIX),
        build_meta: text(&config.build_meta_key, ""),
        build_meta_prefix: text(&config.build_meta_prefix_key, DEFAULT_BUILDMETA_PREFIX),
        separator: text(&config.separator_key, DEFAULT_SEPARATOR),
    })
}

/// Overwrite the version keys in `properties`.
///
/// Prefix and separator keys are only written when they carry a
/// non-default value or were already present.
pub fn merge_version(properties: &mut Properties, config: &SemverConfig, version: &Version) {
    let existing: &Properties = properties;
    let optional: Vec<(String, String)> = optional_fields(config, version)
        .into_iter()
        .filter(|field| field.should_emit(existing))
        .map(|field| (field.key.to_string(), field.value.to_string()))
        .collect();

    properties.insert(&config.major_key, version.major.to_string());
    properties.insert(&config.minor_key, version.minor.to_string());
    properties.insert(&config.patch_key, version.patch.to_string());
    properties.insert(&config.pre_release_key, version.pre_release.as_str());
    properties.insert(&config.build_meta_key, version.build_meta.as_str());
    for (key, value) in optional {
        properties.insert(key, value);
    }
}

/// A field that is written only when it matters.
struct OptionalField<'a> {
    key: &'a str,
    value: &'a str,
    default: &'static str,
}

impl OptionalField<'_> {
    fn should_emit(&self, existing: &Properties) -> bool {
        self.value != self.default || existing.contains_key(self.key)
    }
}

fn optional_fields<'a>(config: &'a SemverConfig, version: &'a Version) -> [OptionalField<'a>; 3] {
    [
        OptionalField {
            key: &config.build_meta_prefix_key,
            value: &version.build_meta_prefix,
            default: DEFAULT_BUILDMETA_PREFIX,
        },
        OptionalField {
            key: &config.pre_release_prefix_key,
            value: &version.pre_release_prefix,
            default: DEFAULT_PRERELEASE_PREFIX,
        },
        OptionalField {
            key: &config.separator_key,
            value: &version.separator,
            default: DEFAULT_SEPARATOR,
        },
    ]
}

/// Read and parse `path`; `Ok(None)` when it does not exist.
fn read_properties(path: &Path) -> Result<Option<Properties>, StoreError> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Read {
                path: absolute(path),
                source,
            });
        }
    };
    if !metadata.is_file() {
        return Err(StoreError::NotReadable {
            path: absolute(path),
        });
    }
    let bytes = std::fs::read(path).map_err(|source| StoreError::Read {
        path: absolute(path),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|source| StoreError::Decode {
        path: absolute(path),
        source,
    })?;
    Properties::parse(&text)
        .map(Some)
        .map_err(|source| StoreError::Parse {
            path: absolute(path),
            source,
        })
}

/// Replace `path` with the serialized properties via a synced temporary file.
///
/// An existing symlink is resolved first so the link target is updated and
/// the link itself stays in place.
fn write_properties(path: &Path, properties: &Properties) -> Result<(), StoreError> {
    let existing = std::fs::metadata(path).ok();
    if let Some(metadata) = &existing {
        if !metadata.is_file() || metadata.permissions().readonly() {
            return Err(StoreError::NotWritable {
                path: absolute(path),
            });
        }
    }

    let write_error = |source: std::io::Error| StoreError::Write {
        path: absolute(path),
        source,
    };
    let target = match &existing {
        Some(_) => std::fs::canonicalize(path).map_err(write_error)?,
        None => path.to_path_buf(),
    };

    let dir = parent_dir(&target);
    std::fs::create_dir_all(&dir).map_err(|source| StoreError::CreateDir {
        path: absolute(&dir),
        source,
    })?;

    let mut file = NamedTempFile::new_in(&dir).map_err(write_error)?;
    let permissions = match &existing {
        Some(metadata) => Some(metadata.permissions()),
        None => new_file_permissions(),
    };
    if let Some(permissions) = permissions {
        std::fs::set_permissions(file.path(), permissions).map_err(write_error)?;
    }
    file.write_all(properties.to_text(Some(HEADER_COMMENT)).as_bytes())
        .map_err(write_error)?;
    file.as_file().sync_all().map_err(write_error)?;
    file.persist(&target).map_err(|err| write_error(err.error))?;
    Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(unix)]
fn new_file_permissions() -> Option<std::fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(std::fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<std::fs::Permissions> {
    None
}
