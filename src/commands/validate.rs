//! Implementation of the `validate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use qx_builder::config;
use qx_builder::output::{OutputConfig, Status};
use qx_builder::suggestions;

use super::profile_path;

/// Check a profile for errors
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the profile (default: profiles/config.yaml)
    #[arg(short, long, value_name = "FILE", env = "QX_BUILDER_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Execute the validate command
pub fn execute(args: ValidateArgs, color: &str) -> Result<()> {
    let output = OutputConfig::from_env_and_flag(color);
    let profile_file = profile_path(args.config);
    if !profile_file.exists() {
        return Err(suggestions::profile_not_found(&profile_file));
    }

    let profile = config::from_file(&profile_file)
        .with_context(|| format!("Failed to load profile {}", profile_file.display()))?;
    profile
        .validate()
        .with_context(|| format!("Invalid profile {}", profile_file.display()))?;

    println!(
        "{} Profile is valid: {}",
        output.marker(Status::Ok),
        profile_file.display()
    );
    println!("   Base: {}", profile.base.url);
    println!("   Patches: {}", profile.patches.len());
    println!(
        "   Overrides: {} general, {} mitm",
        profile.general.len(),
        profile.mitm.len()
    );
    println!(
        "   Local rules: {} top, {} bottom",
        profile.local_filters.top.len(),
        profile.local_filters.bottom.len()
    );
    println!("   Remote rules: {}", profile.remote_filters.len());
    println!("   Replacements: {}", profile.replacements.len());
    Ok(())
}
