use std::path::Path;

use super::*;
use crate::version::IncrementTarget;
use tempfile::tempdir;

fn config_at(path: &Path) -> SemverConfig {
    SemverConfig::with_properties(path)
}

fn read(path: &Path) -> Properties {
    Properties::parse(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().unwrap();
    let config = config_at(&dir.path().join("version.properties"));
    let version = load_version(&config).unwrap();
    assert_eq!(version, Version::default());
    assert_eq!(version.semver(), "0.1.0");
    assert!(!config.properties.exists());
}

#[test]
fn loads_configured_keys() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("version.properties");
    std::fs::write(
        &path,
        "version.major=3\nversion.minor=7\nversion.patch=1\nversion.pre=rc2\nversion.meta=44\n",
    )
    .unwrap();
    let config = SemverConfig {
        major_key: "version.major".into(),
        minor_key: "version.minor".into(),
        patch_key: "version.patch".into(),
        pre_release_key: "version.pre".into(),
        build_meta_key: "version.meta".into(),
        ..config_at(&path)
    };
    let version = load_version(&config).unwrap();
    assert_eq!(version.semver(), "3.7.1-rc2+44");
}

#[test]
fn malformed_numbers_fall_back_to_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("version.properties");
    std::fs::write(&path, "major=abc\nminor=\npatch=4.2\n").unwrap();
    let version = load_version(&config_at(&path)).unwrap();
    assert_eq!(version.major, 0);
    assert_eq!(version.minor, 1);
    assert_eq!(version.patch, 0);
}

#[test]
fn directory_at_path_is_not_readable() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("version.properties");
    std::fs::create_dir(&path).unwrap();
    let config = config_at(&path);

    let err = load_version(&config).unwrap_err();
    assert!(matches!(err, StoreError::NotReadable { .. }));
    assert!(err.to_string().contains("version.properties"));

    let err = save_version(&config, &Version::default()).unwrap_err();
    assert!(matches!(err, StoreError::NotReadable { .. }));
}

#[test]
fn error_paths_are_absolute() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("version.properties");
    std::fs::create_dir(&path).unwrap();
    match load_version(&config_at(&path)).unwrap_err() {
        StoreError::NotReadable { path } => assert!(path.is_absolute()),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn invalid_utf8_is_a_decode_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("version.properties");
    std::fs::write(&path, [b'm', b'=', 0xff, 0xfe]).unwrap();
    let err = load_version(&config_at(&path)).unwrap_err();
    assert!(matches!(err, StoreError::Decode { .. }));
}

#[test]
fn malformed_escape_is_a_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("version.properties");
    std::fs::write(&path, "major=\\uZZZZ\n").unwrap();
    let err = load_version(&config_at(&path)).unwrap_err();
    assert!(matches!(err, StoreError::Parse { .. }));
}

#[test]
fn first_save_omits_default_prefixes_and_separator() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("version.properties");
    let config = config_at(&path);
    save_version(&config, &Version::default()).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        text,
        "#Generated by propver\nbuildMeta=\nmajor=0\nminor=1\npatch=0\npreRelease=\n"
    );
}

#[test]
fn custom_separator_is_written() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("version.properties");
    let config = config_at(&path);
    let version = Version {
        separator: "_".into(),
        ..Version::new(1, 2, 3)
    };
    save_version(&config, &version).unwrap();
    let props = read(&path);
    assert_eq!(props.get("separator"), Some("_"));
    assert!(!props.contains_key("preReleasePrefix"));
    assert!(!props.contains_key("buildMetaPrefix"));
}

#[test]
fn existing_optional_key_is_always_re_emitted() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("version.properties");
    std::fs::write(&path, "major=1\nminor=0\npatch=0\nseparator=_\n").unwrap();
    let config = config_at(&path);

    let mut version = load_version(&config).unwrap();
    assert_eq!(version.semver(), "1_0_0");
    version.separator = DEFAULT_SEPARATOR.to_string();
    save_version(&config, &version).unwrap();

    assert_eq!(read(&path).get("separator"), Some("."));
}

#[test]
fn foreign_keys_survive_increment_and_save() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("version.properties");
    std::fs::write(&path, "major=1\nminor=0\npatch=0\nowner=alice\n").unwrap();
    let config = config_at(&path);

    for target in [IncrementTarget::Patch, IncrementTarget::Minor, IncrementTarget::Major] {
        let mut version = load_version(&config).unwrap();
        version.increment(target);
        save_version(&config, &version).unwrap();
        assert_eq!(read(&path).get("owner"), Some("alice"));
    }
    assert_eq!(load_version(&config).unwrap().semver(), "2.0.0");
}

#[test]
fn round_trip_without_increment_keeps_content() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("version.properties");
    std::fs::write(
        &path,
        "zeta=last\nmajor=2\nminor=5\npatch=9\npreRelease=rc1\nbuildMeta=7\nbuildMetaPrefix=+\nalpha=first\n",
    )
    .unwrap();
    let config = config_at(&path);
    let before = read(&path);

    let version = load_version(&config).unwrap();
    save_version(&config, &version).unwrap();
    assert_eq!(read(&path), before);
    assert_eq!(load_version(&config).unwrap(), version);
}

#[test]
fn repeated_saves_are_byte_identical() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("version.properties");
    std::fs::write(&path, "owner=alice\nmajor=1\nteam=core\n").unwrap();
    let config = config_at(&path);
    let version = load_version(&config).unwrap();

    save_version(&config, &version).unwrap();
    let first = std::fs::read(&path).unwrap();
    save_version(&config, &version).unwrap();
    let second = std::fs::read(&path).unwrap();
    assert_eq!(first, second);
}

#[test]
fn mutated_state_round_trips_exactly() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("version.properties");
    let config = config_at(&path);
    let mut version = load_version(&config).unwrap();
    version.increment(IncrementTarget::Minor);
    version.pre_release = "beta".into();
    version.pre_release_prefix = "~".into();
    version.increment_build_meta(Some("build 7"));
    save_version(&config, &version).unwrap();
    assert_eq!(load_version(&config).unwrap(), version);
}

#[test]
fn read_only_destination_is_not_writable() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("version.properties");
    std::fs::write(&path, "major=1\n").unwrap();
    let mut permissions = std::fs::metadata(&path).unwrap().permissions();
    permissions.set_readonly(true);
    std::fs::set_permissions(&path, permissions).unwrap();

    let err = save_version(&config_at(&path), &Version::new(2, 0, 0)).unwrap_err();
    assert!(matches!(err, StoreError::NotWritable { .. }));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "major=1\n");
}

#[test]
fn save_creates_missing_parent_directories() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("version.properties");
    save_version(&config_at(&path), &Version::new(1, 0, 0)).unwrap();
    assert_eq!(read(&path).get("major"), Some("1"));
}

#[test]
fn merge_applies_optional_field_table() {
    let config = SemverConfig::default();
    let mut props: Properties = [("preReleasePrefix", "-")].into_iter().collect();
    let version = Version {
        build_meta_prefix: "#".into(),
        ..Version::default()
    };
    merge_version(&mut props, &config, &version);
    assert_eq!(props.get("buildMetaPrefix"), Some("#"));
    assert_eq!(props.get("preReleasePrefix"), Some("-"));
    assert!(!props.contains_key("separator"));
}

#[test]
fn oversized_component_is_rejected_not_reset() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("version.properties");
    let original = "major=1\nminor=0\npatch=99999999999999999999\n";
    std::fs::write(&path, original).unwrap();
    let config = config_at(&path);

    match load_version(&config).unwrap_err() {
        StoreError::Overflow { key, source, .. } => {
            assert_eq!(key, "patch");
            assert_eq!(source.value, "99999999999999999999");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
}

#[cfg(unix)]
#[test]
fn save_through_symlink_updates_the_target() {
    let dir = tempdir().unwrap();
    let real = dir.path().join("real.properties");
    let link = dir.path().join("version.properties");
    std::fs::write(&real, "major=1\nminor=0\npatch=0\nowner=alice\n").unwrap();
    std::os::unix::fs::symlink(&real, &link).unwrap();
    let config = config_at(&link);

    let mut version = load_version(&config).unwrap();
    version.increment(IncrementTarget::Patch);
    save_version(&config, &version).unwrap();

    assert!(std::fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    let props = read(&real);
    assert_eq!(props.get("patch"), Some("1"));
    assert_eq!(props.get("owner"), Some("alice"));
    assert_eq!(load_version(&config).unwrap().semver(), "1.0.1");
}
