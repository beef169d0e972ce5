use std::path::PathBuf;

/// Properties file used when nothing else is configured.
pub const DEFAULT_PROPERTIES_FILE: &str = "version.properties";

pub(super) fn default_properties() -> PathBuf {
    PathBuf::from(DEFAULT_PROPERTIES_FILE)
}

pub(super) fn default_major_key() -> String {
    "major".to_string()
}

pub(super) fn default_minor_key() -> String {
    "minor".to_string()
}

pub(super) fn default_patch_key() -> String {
    "patch".to_string()
}

pub(super) fn default_pre_release_key() -> String {
    "preRelease".to_string()
}

pub(super) fn default_pre_release_prefix_key() -> String {
    "preReleasePrefix".to_string()
}

pub(super) fn default_build_meta_key() -> String {
    "buildMeta".to_string()
}

pub(super) fn default_build_meta_prefix_key() -> String {
    "buildMetaPrefix".to_string()
}

pub(super) fn default_separator_key() -> String {
    "separator".to_string()
}
