//! Semantic version bookkeeping backed by a `.properties` file.
/// Load/apply/save workflow for a single invocation.
pub mod app;
/// Key names and file location.
pub mod config;
/// Tracing subscriber setup.
pub mod logging;
/// `.properties` text codec.
pub mod properties;
/// Version persistence.
pub mod store;
/// Semantic version model.
pub mod version;

pub use app::{Command, run};
pub use config::SemverConfig;
pub use store::{StoreError, load_version, save_version};
pub use version::{IncrementTarget, Version};
