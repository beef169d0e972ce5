use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::properties::PropertiesError;
use crate::version::ComponentOverflow;

/// Errors that abort loading or saving the version file.
///
/// Paths are absolute so the message points at the exact file involved.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The path exists but is not a readable regular file.
    #[error("Unable to read version from: `{path}`")]
    NotReadable {
        /// Offending path.
        path: PathBuf,
    },
    /// Reading the file failed.
    #[error("Unable to read version from: `{path}`: {source}")]
    Read {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// The file is not valid UTF-8.
    #[error("Unable to decode version file `{path}`: {source}")]
    Decode {
        /// File that failed to decode.
        path: PathBuf,
        /// UTF-8 decoding error.
        source: std::string::FromUtf8Error,
    },
    /// The file holds malformed properties syntax.
    #[error("Invalid version file `{path}`: {source}")]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Properties syntax error.
        source: PropertiesError,
    },
    /// A version key holds an integer too large to bump.
    #[error("Invalid version file `{path}`: key `{key}`: {source}")]
    Overflow {
        /// File holding the value.
        path: PathBuf,
        /// Configured key of the component.
        key: String,
        /// The out-of-range value.
        source: ComponentOverflow,
    },
    /// The destination is read-only.
    #[error("Unable to write version to: `{path}`")]
    NotWritable {
        /// Read-only destination.
        path: PathBuf,
    },
    /// Creating the destination directory failed.
    #[error("Unable to create directory `{path}`: {source}")]
    CreateDir {
        /// Directory that failed to create.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Writing the file failed.
    #[error("Unable to write version to: `{path}`: {source}")]
    Write {
        /// File that failed to write.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
}

/// Absolute form of `path` for error reporting.
pub(super) fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
