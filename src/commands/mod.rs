//! # CLI Command Implementations
//!
//! Each subcommand of `qx-builder` lives in its own file with:
//! - an `Args` struct derived with `clap`, and
//! - an `execute` function that resolves paths, calls into the `qx_builder`
//!   library, and prints the outcome.

pub mod build;
pub mod completions;
pub mod policies;
pub mod validate;

use std::path::{Path, PathBuf};

use qx_builder::fetch::is_remote;

/// Profile location used when `--config` is not given
pub const DEFAULT_PROFILE: &str = "profiles/config.yaml";

/// Output file used when `--output` is not given
pub const DEFAULT_OUTPUT: &str = "MyQuantumultX.conf";

/// Resolve the profile path from the flag or the default
pub fn profile_path(flag: Option<PathBuf>) -> PathBuf {
    flag.unwrap_or_else(|| PathBuf::from(DEFAULT_PROFILE))
}

/// Resolve a base location against the directory holding the profile.
///
/// URLs and absolute paths are returned unchanged.
pub fn resolve_base(profile: &Path, location: &str) -> String {
    if is_remote(location) || location.starts_with("file://") || Path::new(location).is_absolute()
    {
        return location.to_string();
    }
    match profile.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(location).display().to_string(),
        _ => location.to_string(),
    }
}
