//! Implementation of the `policies` command.
//!
//! Lists the policy groups of the base configuration so `policy_map` entries
//! can be written against the names that actually exist.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use qx_builder::config;
use qx_builder::fetch::{Fetcher, SourceFetcher};
use qx_builder::output::{OutputConfig, Status};
use qx_builder::parser;
use qx_builder::policies::policy_groups;
use qx_builder::suggestions;

use super::{profile_path, resolve_base};

/// List the policy groups of a base configuration
#[derive(Args, Debug)]
pub struct PoliciesArgs {
    /// Path to the profile whose base is inspected (default: profiles/config.yaml)
    #[arg(short, long, value_name = "FILE", env = "QX_BUILDER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Inspect this URL or file instead of the profile's base
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Print the groups as JSON
    #[arg(long)]
    pub json: bool,

    /// Download timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 15)]
    pub timeout: u64,
}

/// Execute the policies command
pub fn execute(args: PoliciesArgs, color: &str) -> Result<()> {
    let output = OutputConfig::from_env_and_flag(color);

    let location = match args.url {
        Some(url) => url,
        None => {
            let profile_file = profile_path(args.config);
            if !profile_file.exists() {
                return Err(suggestions::profile_not_found(&profile_file));
            }
            let profile = config::from_file(&profile_file).with_context(|| {
                format!("Failed to load profile {}", profile_file.display())
            })?;
            resolve_base(&profile_file, &profile.base.url)
        }
    };

    let fetcher = SourceFetcher::new(Duration::from_secs(args.timeout))?;
    let content = fetcher
        .fetch(&location)
        .with_context(|| format!("Failed to fetch {location}"))?;
    let model = parser::parse(&content);
    let groups = policy_groups(&model);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }

    if groups.is_empty() {
        println!("{} No policy groups found in {location}", output.marker(Status::Warn));
        return Ok(());
    }
    println!("Policy groups in {location}:");
    for group in &groups {
        println!("{} {} ({})", output.marker(Status::Info), group.name, group.kind);
    }
    Ok(())
}
