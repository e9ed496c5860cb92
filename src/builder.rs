//! Profile-driven build pipeline
//!
//! This module applies a [`Profile`] to a fresh [`BuildSession`] in a fixed
//! order:
//!
//! 1. Fetch and parse the base configuration (skeleton only when the fetch
//!    fails, unless `strict` is set).
//! 2. Keyword patches, in profile order.
//! 3. `[general]` overrides, then `[mitm]` overrides.
//! 4. DNS lines, custom policies, and generic `append` lines (back).
//! 5. Top local rules with policy aliases substituted (front), then bottom
//!    local rules (back).
//! 6. Remote rule references at the profile's `remote_position`.
//! 7. Regex replacements.
//!
//! Rendering and writing are left to the caller.

use log::info;

use crate::config::Profile;
use crate::error::{Error, Result};
use crate::fetch::Fetcher;
use crate::operators::Position;
use crate::session::{BuildSession, Reporter};

/// Knobs that are not part of the profile
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Fail instead of continuing on the skeleton when the base cannot be
    /// fetched
    pub strict: bool,
}

/// Run every profile step and return the session for rendering
pub fn build(
    profile: &Profile,
    fetcher: &dyn Fetcher,
    reporter: Box<dyn Reporter>,
    options: BuildOptions,
) -> Result<BuildSession> {
    profile.validate()?;

    let mut session = BuildSession::new(reporter);
    session.set_strategies(profile.strategies());

    load_base(&mut session, profile, fetcher, options)?;
    apply_edits(&mut session, profile)?;

    let stats = session.stats();
    info!(
        "Build finished: {} removed, {} keys set, {} lines added, {} remote rules",
        stats.removed_lines, stats.keys_set, stats.lines_inserted, stats.remote_rules
    );
    Ok(session)
}

fn load_base(
    session: &mut BuildSession,
    profile: &Profile,
    fetcher: &dyn Fetcher,
    options: BuildOptions,
) -> Result<()> {
    let url = profile.base.url.as_str();
    match fetcher.fetch(url) {
        Ok(content) => session.load_base(url, &content),
        Err(e) if options.strict => return Err(e),
        Err(e @ Error::HttpClient { .. }) => return Err(e),
        Err(e) => session.base_unavailable(url, e.to_string()),
    }
    Ok(())
}

/// Apply the edit steps of a profile to an already loaded session
pub fn apply_edits(session: &mut BuildSession, profile: &Profile) -> Result<()> {
    for (section, rule) in &profile.patches {
        session.patch(section, &rule.keywords, rule.strategy);
    }

    for (key, value) in &profile.general {
        session.upsert("general", key, value);
    }
    for (key, value) in &profile.mitm {
        session.upsert("mitm", key, value);
    }

    for line in &profile.dns {
        session.insert("dns", line, Position::Back);
    }
    for line in &profile.custom_policies {
        session.insert("policy", line, Position::Back);
    }
    for (section, lines) in &profile.append {
        for line in lines {
            session.insert(section, line, Position::Back);
        }
    }

    for rule in &profile.local_filters.top {
        let rule = profile.substitute_policies(rule);
        session.insert("filter_local", &rule, Position::Front);
    }
    for rule in &profile.local_filters.bottom {
        session.insert("filter_local", rule, Position::Back);
    }

    for filter in &profile.remote_filters {
        let rule = profile.remote_rule(filter)?;
        session.add_remote_rule(&rule, profile.remote_position);
    }

    for (pattern, replacement) in profile.compiled_replacements()? {
        session.replace(&pattern, replacement);
    }

    Ok(())
}
