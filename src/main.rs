#![deny(missing_docs)]
#![deny(warnings)]

//! Command-line entry point: bump or show the version stored in a properties file.

use std::path::PathBuf;

use propver::config::{CONFIG_FILE_NAME, SemverConfig};
use propver::logging;
use propver::{Command, IncrementTarget};

fn main() {
    let options = match parse_args(std::env::args().skip(1).collect()) {
        Ok(Some(options)) => options,
        Ok(None) => return,
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(2);
        }
    };

    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    match run(options) {
        Ok(semver) => println!("{semver}"),
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(1);
        }
    }
}

fn run(options: Options) -> Result<String, String> {
    let config = resolve_config(&options)?;
    let version = propver::run(&config, &options.command).map_err(|err| err.to_string())?;
    Ok(version.semver())
}

/// Config file (explicit or `propver.toml` if present), then flag overrides.
fn resolve_config(options: &Options) -> Result<SemverConfig, String> {
    let mut config = match &options.config_path {
        Some(path) => SemverConfig::load(path),
        None => SemverConfig::load_or_default(&PathBuf::from(CONFIG_FILE_NAME)),
    }
    .map_err(|err| err.to_string())?;

    if let Some(path) = &options.properties {
        config.properties = path.clone();
    }
    for (field, value) in &options.key_overrides {
        *field.slot(&mut config) = value.clone();
    }
    Ok(config)
}

#[derive(Debug, PartialEq)]
struct Options {
    command: Command,
    config_path: Option<PathBuf>,
    properties: Option<PathBuf>,
    key_overrides: Vec<(KeyField, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyField {
    Major,
    Minor,
    Patch,
    PreRelease,
    PreReleasePrefix,
    BuildMeta,
    BuildMetaPrefix,
    Separator,
}

impl KeyField {
    fn from_flag(flag: &str) -> Option<Self> {
        Some(match flag {
            "--major-key" => Self::Major,
            "--minor-key" => Self::Minor,
            "--patch-key" => Self::Patch,
            "--pre-release-key" => Self::PreRelease,
            "--pre-release-prefix-key" => Self::PreReleasePrefix,
            "--build-meta-key" => Self::BuildMeta,
            "--build-meta-prefix-key" => Self::BuildMetaPrefix,
            "--separator-key" => Self::Separator,
            _ => return None,
        })
    }

    fn slot(self, config: &mut SemverConfig) -> &mut String {
        match self {
            Self::Major => &mut config.major_key,
            Self::Minor => &mut config.minor_key,
            Self::Patch => &mut config.patch_key,
            Self::PreRelease => &mut config.pre_release_key,
            Self::PreReleasePrefix => &mut config.pre_release_prefix_key,
            Self::BuildMeta => &mut config.build_meta_key,
            Self::BuildMetaPrefix => &mut config.build_meta_prefix_key,
            Self::Separator => &mut config.separator_key,
        }
    }
}

fn parse_args(args: Vec<String>) -> Result<Option<Options>, String> {
    let mut command = None;
    let mut build_meta_value = None;
    let mut config_path = None;
    let mut properties = None;
    let mut key_overrides = Vec::new();

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "-h" | "--help" => {
                println!("{}", help_text());
                return Ok(None);
            }
            "-c" | "--config" => {
                config_path = Some(PathBuf::from(next_value(&args, &mut i, arg)?));
            }
            "-p" | "--properties" => {
                properties = Some(PathBuf::from(next_value(&args, &mut i, arg)?));
            }
            flag if flag.starts_with("--") => {
                let field = KeyField::from_flag(flag)
                    .ok_or_else(|| format!("Unknown argument '{flag}'\n\n{}", help_text()))?;
                let value = next_value(&args, &mut i, flag)?;
                if value.is_empty() {
                    return Err(format!("{flag} requires a non-empty key"));
                }
                key_overrides.push((field, value));
            }
            word if command.is_none() => {
                command = Some(parse_command(word)?);
            }
            value if command == Some(Command::BuildMeta(None)) && build_meta_value.is_none() => {
                build_meta_value = Some(value.to_string());
            }
            unexpected => {
                return Err(format!("Unexpected argument '{unexpected}'\n\n{}", help_text()));
            }
        }
        i += 1;
    }

    let command = match command {
        Some(Command::BuildMeta(_)) => Command::BuildMeta(build_meta_value),
        Some(command) => command,
        None => return Err(format!("Missing command\n\n{}", help_text())),
    };
    Ok(Some(Options {
        command,
        config_path,
        properties,
        key_overrides,
    }))
}

fn parse_command(word: &str) -> Result<Command, String> {
    match word {
        "show" => Ok(Command::Show),
        "build-meta" => Ok(Command::BuildMeta(None)),
        other => other
            .parse::<IncrementTarget>()
            .map(Command::Increment)
            .map_err(|err| format!("{err}\n\n{}", help_text())),
    }
}

fn next_value(args: &[String], i: &mut usize, name: &str) -> Result<String, String> {
    let next = args
        .get(*i + 1)
        .ok_or_else(|| format!("Missing value for {name}"))?;
    *i += 1;
    Ok(next.clone())
}

fn help_text() -> String {
    format!(
        "Usage: propver [options] <show|major|minor|patch|build-meta [VALUE]>\n\n\
Commands:\n\
  show                          Print the stored version (creates the file on first run)\n\
  major | minor | patch         Increment a component and clear pre-release/build metadata\n\
  build-meta [VALUE]            Set build metadata, or increment it when numeric\n\n\
Options:\n\
  -c, --config <FILE>           TOML configuration (default: {CONFIG_FILE_NAME} if present)\n\
  -p, --properties <FILE>       Properties file holding the version\n\
  --major-key <KEY>             Key names, one flag per field:\n\
  --minor-key <KEY>               --patch-key, --pre-release-key,\n\
  --pre-release-prefix-key <KEY>  --build-meta-key, --build-meta-prefix-key,\n\
  --separator-key <KEY>\n\
  -h, --help                    Show help\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn parses_increment_commands() {
        let options = parse_args(args(&["minor"])).unwrap().unwrap();
        assert_eq!(options.command, Command::Increment(IncrementTarget::Minor));
        assert!(options.key_overrides.is_empty());
    }

    #[test]
    fn parses_build_meta_with_and_without_value() {
        let options = parse_args(args(&["build-meta"])).unwrap().unwrap();
        assert_eq!(options.command, Command::BuildMeta(None));

        let options = parse_args(args(&["build-meta", "sha.1"])).unwrap().unwrap();
        assert_eq!(options.command, Command::BuildMeta(Some("sha.1".into())));
    }

    #[test]
    fn parses_paths_and_key_overrides() {
        let options = parse_args(args(&[
            "-p",
            "gradle/version.properties",
            "--config",
            "ci.toml",
            "--separator-key",
            "version.sep",
            "patch",
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(options.properties, Some(PathBuf::from("gradle/version.properties")));
        assert_eq!(options.config_path, Some(PathBuf::from("ci.toml")));
        assert_eq!(
            options.key_overrides,
            vec![(KeyField::Separator, "version.sep".to_string())]
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_args(args(&[])).is_err());
        assert!(parse_args(args(&["major", "minor"])).is_err());
        assert!(parse_args(args(&["release"])).is_err());
        assert!(parse_args(args(&["--bogus", "x", "major"])).is_err());
        assert!(parse_args(args(&["major", "--major-key"])).is_err());
    }

    #[test]
    fn help_short_circuits() {
        assert_eq!(parse_args(args(&["--help", "major"])).unwrap(), None);
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&config_path, "major_key = \"v.major\"\nbuild_meta_key = \"v.meta\"\n").unwrap();
        let options = Options {
            command: Command::Show,
            config_path: Some(config_path),
            properties: Some(PathBuf::from("other.properties")),
            key_overrides: vec![(KeyField::BuildMeta, "meta".into())],
        };
        let config = resolve_config(&options).unwrap();
        assert_eq!(config.properties, PathBuf::from("other.properties"));
        assert_eq!(config.major_key, "v.major");
        assert_eq!(config.build_meta_key, "meta");
        assert_eq!(config.minor_key, "minor");
    }
}
