//! # Error Suggestions
//!
//! Helpers that build CLI errors carrying `hint:` lines, so a failure says
//! both what went wrong and what to try next.

use std::path::Path;

/// The profile file does not exist.
pub fn profile_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Profile not found: {path}\n\n\
         hint: Create profiles/config.yaml with at least 'base: {{ url: ... }}'\n\
         hint: Use -c/--config to specify a different path\n\
         hint: Set QX_BUILDER_CONFIG environment variable",
        path = path.display()
    )
}

/// The base configuration could not be downloaded in strict mode.
pub fn base_unavailable(url: &str, error: &crate::error::Error) -> anyhow::Error {
    anyhow::anyhow!(
        "Could not fetch base configuration {url}: {error}\n\n\
         hint: Check the URL in 'base.url' and your network connection\n\
         hint: Drop --strict to build from an empty skeleton instead"
    )
}
