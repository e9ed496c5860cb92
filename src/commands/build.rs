//! Implementation of the `build` command.
//!
//! Loads the profile, fetches the base configuration it names, applies every
//! edit, and writes the result (or prints it with `--dry-run`).

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use qx_builder::builder::{self, BuildOptions};
use qx_builder::config;
use qx_builder::fetch::SourceFetcher;
use qx_builder::operators::upsert::UpsertOutcome;
use qx_builder::output::{OutputConfig, Status};
use qx_builder::session::{BuildEvent, BuildStats, LogReporter, Reporter};
use qx_builder::suggestions;

use super::{profile_path, resolve_base, DEFAULT_OUTPUT};

/// Build the configuration described by a profile
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Path to the profile (default: profiles/config.yaml)
    #[arg(short, long, value_name = "FILE", env = "QX_BUILDER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Where to write the generated configuration
    #[arg(short, long, value_name = "FILE", env = "QX_BUILDER_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Print the generated configuration to stdout instead of writing it
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Fail when the base configuration cannot be fetched
    #[arg(long)]
    pub strict: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Download timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 15)]
    pub timeout: u64,
}

/// Prints the notable build steps and forwards everything to the log
struct ConsoleReporter {
    output: OutputConfig,
    log: LogReporter,
}

impl Reporter for ConsoleReporter {
    fn report(&mut self, event: &BuildEvent<'_>) {
        self.log.report(event);
        let out = &self.output;
        match event {
            BuildEvent::BaseLoaded { url, lines } => {
                println!("{} Base loaded: {url} ({lines} lines)", out.marker(Status::Download))
            }
            BuildEvent::BaseUnavailable { url, .. } => println!(
                "{} Base unavailable: {url}, building from empty skeleton",
                out.marker(Status::Warn)
            ),
            BuildEvent::SectionMissing { section } => println!(
                "{} [{section}] not found, filter skipped",
                out.marker(Status::Warn)
            ),
            BuildEvent::Patched {
                section,
                mode,
                removed,
                ..
            } => println!(
                "{} [{section}] {}: removed {removed} lines",
                out.marker(Status::Filter),
                mode.label()
            ),
            BuildEvent::Upserted {
                section,
                key,
                value,
                outcome,
            } if *outcome != UpsertOutcome::Unchanged => println!(
                "{} [{section}] {key}={value}",
                out.marker(Status::Settings)
            ),
            BuildEvent::RemoteAdded { tag, policy } => {
                println!("{} {tag} -> {policy}", out.marker(Status::Remote))
            }
            BuildEvent::Written { path, .. } => {
                println!("{} Saved to {}", out.marker(Status::Save), path.display())
            }
            _ => {}
        }
    }
}

/// Execute the build command
pub fn execute(args: BuildArgs, color: &str) -> Result<()> {
    let output = OutputConfig::from_env_and_flag(color);
    let quiet = args.quiet || args.dry_run;

    let profile_file = profile_path(args.config);
    if !profile_file.exists() {
        return Err(suggestions::profile_not_found(&profile_file));
    }

    let mut profile = config::from_file(&profile_file)
        .with_context(|| format!("Failed to load profile {}", profile_file.display()))?;
    profile.base.url = resolve_base(&profile_file, &profile.base.url);

    if !quiet {
        println!("{} Building Quantumult X configuration", output.marker(Status::Start));
    }

    let fetcher = SourceFetcher::new(Duration::from_secs(args.timeout))?;
    let reporter: Box<dyn Reporter> = if quiet {
        Box::new(LogReporter)
    } else {
        Box::new(ConsoleReporter {
            output: output.clone(),
            log: LogReporter,
        })
    };

    let options = BuildOptions {
        strict: args.strict,
    };
    let mut session = match builder::build(&profile, &fetcher, reporter, options) {
        Ok(session) => session,
        Err(e) if e.is_network() => {
            return Err(suggestions::base_unavailable(&profile.base.url, &e))
        }
        Err(e) => return Err(e.into()),
    };

    if args.dry_run {
        print!("{}", session.render());
        return Ok(());
    }

    let target = args.output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    session.write(&target)?;

    if !quiet {
        print_summary(&output, session.stats());
    }
    Ok(())
}

fn print_summary(output: &OutputConfig, stats: &BuildStats) {
    println!(
        "{} Done: {} lines removed, {} keys set, {} lines added, {} remote rules",
        output.marker(Status::Ok),
        stats.removed_lines,
        stats.keys_set,
        stats.lines_inserted,
        stats.remote_rules
    );
    if stats.missing_sections > 0 {
        println!(
            "{} {} filtered sections were missing from the base",
            output.marker(Status::Info),
            stats.missing_sections
        );
    }
}
