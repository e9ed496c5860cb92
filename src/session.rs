//! Build sessions
//!
//! A [`BuildSession`] owns the model for one build run together with the
//! statistics gathered while editing it and the [`Reporter`] that observes
//! each step. Sessions are created at the start of a run and consumed at the
//! end; nothing is shared between runs.

use log::{debug, info, warn};
use regex::Regex;
use std::path::Path;

use crate::error::Result;
use crate::model::ConfigModel;
use crate::operators::{
    self, upsert::UpsertOutcome, FilterMode, MergeStrategies, Position,
};
use crate::parser;
use crate::remote::{RemoteRule, FILTER_REMOTE};
use crate::writer;

/// Something that happened during a build
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent<'a> {
    /// The base configuration was parsed
    BaseLoaded { url: &'a str, lines: usize },
    /// The base configuration could not be fetched; the build continues on
    /// the skeleton
    BaseUnavailable { url: &'a str, message: String },
    /// A filter targeted a section the model does not have
    SectionMissing { section: &'a str },
    /// A keyword filter ran
    Patched {
        section: &'a str,
        mode: FilterMode,
        removed: usize,
        remaining: usize,
    },
    /// A key was set
    Upserted {
        section: &'a str,
        key: &'a str,
        value: &'a str,
        outcome: UpsertOutcome,
    },
    /// A line was added to a section
    Inserted {
        section: &'a str,
        line: &'a str,
        position: Position,
    },
    /// A line was already present and was not added again
    DuplicateSkipped { section: &'a str, line: &'a str },
    /// A remote rule reference was added
    RemoteAdded { tag: &'a str, policy: &'a str },
    /// A regex replacement ran
    Replaced { pattern: &'a str, lines: usize },
    /// The rendered configuration was written
    Written { path: &'a Path, bytes: usize },
}

/// Observer of build events
pub trait Reporter {
    fn report(&mut self, event: &BuildEvent<'_>);
}

/// Reporter that forwards events to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&mut self, event: &BuildEvent<'_>) {
        match event {
            BuildEvent::BaseLoaded { url, lines } => {
                info!("Loaded base configuration from {url} ({lines} lines)")
            }
            BuildEvent::BaseUnavailable { url, message } => {
                warn!("Base configuration {url} unavailable, continuing with empty skeleton: {message}")
            }
            BuildEvent::SectionMissing { section } => {
                warn!("Section [{section}] not found in base configuration, skipping filter")
            }
            BuildEvent::Patched {
                section,
                mode,
                removed,
                remaining,
            } => info!(
                "[{section}] filtered ({}): removed {removed}, kept {remaining}",
                mode.label()
            ),
            BuildEvent::Upserted {
                section,
                key,
                value,
                outcome,
            } => info!("[{section}] set {key}={value} ({outcome:?})"),
            BuildEvent::Inserted {
                section,
                line,
                position,
            } => debug!("[{section}] added at {position:?}: {line}"),
            BuildEvent::DuplicateSkipped { section, line } => {
                debug!("[{section}] already contains: {line}")
            }
            BuildEvent::RemoteAdded { tag, policy } => {
                info!("Added remote rule {tag} -> {policy}")
            }
            BuildEvent::Replaced { pattern, lines } => {
                info!("Replaced /{pattern}/ in {lines} lines")
            }
            BuildEvent::Written { path, bytes } => {
                info!("Wrote {} ({bytes} bytes)", path.display())
            }
        }
    }
}

/// Reporter that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&mut self, _event: &BuildEvent<'_>) {}
}

/// Counters accumulated over one build run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildStats {
    pub removed_lines: usize,
    pub missing_sections: usize,
    pub keys_set: usize,
    pub lines_inserted: usize,
    pub duplicates_skipped: usize,
    pub remote_rules: usize,
    pub lines_replaced: usize,
    pub base_available: bool,
}

/// One build run: a model, its statistics, and its reporter
pub struct BuildSession {
    model: ConfigModel,
    stats: BuildStats,
    strategies: MergeStrategies,
    reporter: Box<dyn Reporter>,
}

impl std::fmt::Debug for BuildSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildSession")
            .field("model", &self.model)
            .field("stats", &self.stats)
            .field("strategies", &self.strategies)
            .finish_non_exhaustive()
    }
}

impl BuildSession {
    /// Start a session on the canonical skeleton with the default merge
    /// strategies
    pub fn new(reporter: Box<dyn Reporter>) -> Self {
        Self::with_model(ConfigModel::with_skeleton(), reporter)
    }

    /// Start a session on an existing model
    pub fn with_model(model: ConfigModel, reporter: Box<dyn Reporter>) -> Self {
        Self {
            model,
            stats: BuildStats::default(),
            strategies: MergeStrategies::default(),
            reporter,
        }
    }

    /// Replace the merge strategy table used by [`BuildSession::upsert`]
    pub fn set_strategies(&mut self, strategies: MergeStrategies) {
        self.strategies = strategies;
    }

    pub fn model(&self) -> &ConfigModel {
        &self.model
    }

    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    /// Parse the base configuration text into the model
    pub fn load_base(&mut self, url: &str, content: &str) {
        let before = self.model.line_count();
        parser::parse_into(&mut self.model, content);
        self.stats.base_available = true;
        self.reporter.report(&BuildEvent::BaseLoaded {
            url,
            lines: self.model.line_count() - before,
        });
    }

    /// Record that the base could not be fetched
    pub fn base_unavailable(&mut self, url: &str, message: String) {
        self.stats.base_available = false;
        self.reporter
            .report(&BuildEvent::BaseUnavailable { url, message });
    }

    /// Keyword-filter one section; see [`operators::patch::apply`]
    pub fn patch<S: AsRef<str>>(&mut self, section: &str, keywords: &[S], mode: FilterMode) {
        match operators::patch::apply(&mut self.model, section, keywords, mode) {
            Some(outcome) => {
                self.stats.removed_lines += outcome.removed();
                self.reporter.report(&BuildEvent::Patched {
                    section,
                    mode,
                    removed: outcome.removed(),
                    remaining: outcome.after,
                });
            }
            None => {
                self.stats.missing_sections += 1;
                self.reporter.report(&BuildEvent::SectionMissing { section });
            }
        }
    }

    /// Remove lines containing one keyword, reporting only actual removals
    pub fn remove_matching(&mut self, section: &str, keyword: &str) -> usize {
        let removed = operators::patch::remove_matching(&mut self.model, section, keyword);
        if removed > 0 {
            self.stats.removed_lines += removed;
            let remaining = self.model.section(section).map_or(0, |s| s.len());
            self.reporter.report(&BuildEvent::Patched {
                section,
                mode: FilterMode::Exclude,
                removed,
                remaining,
            });
        }
        removed
    }

    /// Set a key in a key-value section; see [`operators::upsert::apply`]
    pub fn upsert(&mut self, section: &str, key: &str, value: &str) -> UpsertOutcome {
        let outcome =
            operators::upsert::apply(&mut self.model, section, key, value, &self.strategies);
        if outcome != UpsertOutcome::Unchanged {
            self.stats.keys_set += 1;
        }
        self.reporter.report(&BuildEvent::Upserted {
            section,
            key,
            value,
            outcome,
        });
        outcome
    }

    /// Add a line at one end of a section unless already present
    pub fn insert(&mut self, section: &str, line: &str, position: Position) -> bool {
        let inserted = operators::insert::apply(&mut self.model, section, line, position);
        if inserted {
            self.stats.lines_inserted += 1;
            self.reporter.report(&BuildEvent::Inserted {
                section,
                line,
                position,
            });
        } else {
            self.stats.duplicates_skipped += 1;
            self.reporter
                .report(&BuildEvent::DuplicateSkipped { section, line });
        }
        inserted
    }

    /// Add a remote rule reference to `filter_remote`
    pub fn add_remote_rule(&mut self, rule: &RemoteRule, position: Position) -> bool {
        let line = rule.to_line();
        let inserted = self.insert(FILTER_REMOTE, &line, position);
        if inserted {
            self.stats.remote_rules += 1;
            self.reporter.report(&BuildEvent::RemoteAdded {
                tag: &rule.tag,
                policy: &rule.policy,
            });
        }
        inserted
    }

    /// Regex-replace across every line of the model
    pub fn replace(&mut self, pattern: &Regex, replacement: &str) -> usize {
        let lines = operators::replace::apply(&mut self.model, pattern, replacement);
        self.stats.lines_replaced += lines;
        self.reporter.report(&BuildEvent::Replaced {
            pattern: pattern.as_str(),
            lines,
        });
        lines
    }

    /// Render the current model
    pub fn render(&self) -> String {
        writer::render(&self.model)
    }

    /// Write the rendered model to `path`
    pub fn write<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        writer::write_to_file(&self.model, path)?;
        let bytes = self.render().len();
        self.reporter.report(&BuildEvent::Written { path, bytes });
        Ok(())
    }

    /// End the session, handing back the model and its statistics
    pub fn finish(self) -> (ConfigModel, BuildStats) {
        (self.model, self.stats)
    }
}
