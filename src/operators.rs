//! Edit operators applied to a [`ConfigModel`]
//!
//! Each operator lives in its own submodule with an `apply` entry point,
//! mirroring the way profile entries map onto model mutations:
//!
//! - `patch`: keyword filtering of one section (exclude or retain).
//! - `upsert`: at most one `key=value` line per key, with per-key merge
//!   strategies.
//! - `insert`: deduplicated insertion at the front or back of a section.
//! - `remote`: injection of a remote rule reference line.
//! - `replace`: regex substitution over every line of the model.
//!
//! Operators never fail on missing sections. Filtering a missing section is
//! vacuous and reported as such; adding content creates the section.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::ConfigModel;
use crate::remote::RemoteRule;

/// How a keyword filter treats matching lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Drop every line containing at least one keyword
    #[default]
    #[serde(alias = "blacklist")]
    Exclude,
    /// Keep only lines containing at least one keyword
    #[serde(alias = "whitelist")]
    Retain,
}

impl FilterMode {
    /// Short label used in log output
    pub fn label(self) -> &'static str {
        match self {
            FilterMode::Exclude => "blacklist",
            FilterMode::Retain => "whitelist",
        }
    }
}

/// Which end of a section an insertion lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    #[serde(alias = "start", alias = "top")]
    Front,
    #[default]
    #[serde(alias = "end", alias = "bottom")]
    Back,
}

/// How an upsert treats a key that already has a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeStrategy {
    /// Overwrite the existing value
    Replace,
    /// Append to the comma-joined value list unless already present
    AppendDedup,
}

/// Key to merge strategy table consulted by [`upsert::apply`].
///
/// Keys not in the table use [`MergeStrategy::Replace`]. The default table
/// accumulates the MITM `hostname` list instead of overwriting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeStrategies {
    table: HashMap<String, MergeStrategy>,
}

impl Default for MergeStrategies {
    fn default() -> Self {
        let mut strategies = Self::empty();
        strategies.set("hostname", MergeStrategy::AppendDedup);
        strategies
    }
}

impl MergeStrategies {
    /// A table where every key is replaced
    pub fn empty() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// Set the strategy for one key
    pub fn set<S: Into<String>>(&mut self, key: S, strategy: MergeStrategy) {
        self.table.insert(key.into(), strategy);
    }

    /// Strategy that applies to `key`
    pub fn strategy_for(&self, key: &str) -> MergeStrategy {
        self.table
            .get(key)
            .copied()
            .unwrap_or(MergeStrategy::Replace)
    }
}

/// Keyword filter
pub mod patch {
    use super::*;

    /// Line counts around a filter run
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PatchOutcome {
        pub before: usize,
        pub after: usize,
    }

    impl PatchOutcome {
        /// Number of lines the filter dropped
        pub fn removed(&self) -> usize {
            self.before - self.after
        }
    }

    /// Whether `line` contains any of `keywords` as a substring
    pub fn matches_any<S: AsRef<str>>(line: &str, keywords: &[S]) -> bool {
        keywords.iter().any(|keyword| line.contains(keyword.as_ref()))
    }

    /// Filter the lines of `section` by keyword.
    ///
    /// Returns `None` when the section does not exist or is still a skeleton
    /// placeholder, i.e. the base never declared it. With no keywords,
    /// `Exclude` keeps every line and `Retain` drops every line.
    pub fn apply<S: AsRef<str>>(
        model: &mut ConfigModel,
        section: &str,
        keywords: &[S],
        mode: FilterMode,
    ) -> Option<PatchOutcome> {
        let lines = model
            .section_mut(section)
            .filter(|section| !section.is_seeded())?
            .lines_mut();
        let before = lines.len();

        lines.retain(|line| {
            let hit = matches_any(line, keywords);
            match mode {
                FilterMode::Exclude => !hit,
                FilterMode::Retain => hit,
            }
        });

        Some(PatchOutcome {
            before,
            after: lines.len(),
        })
    }

    /// Drop every line of `section` containing `keyword`.
    ///
    /// Returns the number of removed lines; a missing section removes none.
    pub fn remove_matching(model: &mut ConfigModel, section: &str, keyword: &str) -> usize {
        apply(model, section, &[keyword], FilterMode::Exclude)
            .map(|outcome| outcome.removed())
            .unwrap_or(0)
    }
}

/// Key-value upsert
pub mod upsert {
    use super::*;

    /// What an upsert did to the section
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum UpsertOutcome {
        /// No line had the key; a new one was appended
        Inserted,
        /// The existing line now carries the new value
        Replaced,
        /// The value was appended to the existing list
        Merged,
        /// The value was already present; nothing changed
        Unchanged,
    }

    /// Whether a line assigns `key`, as `key=...` or `key =...`
    pub fn line_has_key(line: &str, key: &str) -> bool {
        let trimmed = line.trim();
        match trimmed.strip_prefix(key) {
            Some(rest) => rest.starts_with('=') || rest.starts_with(" ="),
            None => false,
        }
    }

    /// Value part of a `key=value` line, trimmed
    pub fn line_value(line: &str) -> &str {
        line.split_once('=')
            .map(|(_, value)| value.trim())
            .unwrap_or("")
    }

    fn append_unique(list: &mut String, value: &str) {
        if value.is_empty() || list.contains(value) {
            return;
        }
        if !list.is_empty() {
            list.push_str(", ");
        }
        list.push_str(value);
    }

    /// Set `key` to `value` in `section`, creating the section if needed.
    ///
    /// When several lines already carry the key they collapse into one at
    /// the position of the first; under `AppendDedup` their values are
    /// merged into that line first.
    pub fn apply(
        model: &mut ConfigModel,
        section: &str,
        key: &str,
        value: &str,
        strategies: &MergeStrategies,
    ) -> UpsertOutcome {
        let lines = model.section_mut_or_create(section).lines_mut();
        let matches: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line_has_key(line, key))
            .map(|(index, _)| index)
            .collect();

        let Some(&first) = matches.first() else {
            lines.push(format!("{key}={value}"));
            return UpsertOutcome::Inserted;
        };

        let (new_line, outcome) = match strategies.strategy_for(key) {
            MergeStrategy::Replace => (format!("{key}={value}"), UpsertOutcome::Replaced),
            MergeStrategy::AppendDedup => {
                let mut merged = String::new();
                for &index in &matches {
                    append_unique(&mut merged, line_value(&lines[index]));
                }
                if matches.len() == 1 && merged.contains(value) {
                    return UpsertOutcome::Unchanged;
                }
                append_unique(&mut merged, value);
                (format!("{key}={merged}"), UpsertOutcome::Merged)
            }
        };

        for &index in matches[1..].iter().rev() {
            lines.remove(index);
        }
        let unchanged = matches.len() == 1 && lines[first] == new_line;
        lines[first] = new_line;

        if unchanged {
            UpsertOutcome::Unchanged
        } else {
            outcome
        }
    }
}

/// Deduplicated positional insertion
pub mod insert {
    use super::*;

    /// Insert `line` into `section` unless an identical line exists.
    ///
    /// Returns whether the line was inserted. Front insertion makes the line
    /// the new first element, so consecutive front insertions end up in
    /// reverse call order.
    pub fn apply(model: &mut ConfigModel, section: &str, line: &str, position: Position) -> bool {
        let target = model.section_mut_or_create(section);
        if target.contains(line) {
            return false;
        }

        let lines = target.lines_mut();
        match position {
            Position::Front => lines.insert(0, line.to_string()),
            Position::Back => lines.push(line.to_string()),
        }
        true
    }
}

/// Remote rule reference injection
pub mod remote {
    use super::*;
    use crate::remote::FILTER_REMOTE;

    /// Insert the reference line for `rule` into `filter_remote`.
    ///
    /// Returns whether the line was new.
    pub fn apply(model: &mut ConfigModel, rule: &RemoteRule, position: Position) -> bool {
        insert::apply(model, FILTER_REMOTE, &rule.to_line(), position)
    }
}

/// Regex substitution across the whole model
pub mod replace {
    use super::*;
    use regex::Regex;

    /// Replace every match of `pattern` in every line with `replacement`.
    ///
    /// The replacement may use capture groups (`$1`). Returns the number of
    /// lines that changed.
    pub fn apply(model: &mut ConfigModel, pattern: &Regex, replacement: &str) -> usize {
        let mut changed = 0;
        for section in model.sections_mut() {
            for line in section.lines_mut().iter_mut() {
                let replaced = pattern.replace_all(line, replacement);
                if replaced != line.as_str() {
                    *line = replaced.into_owned();
                    changed += 1;
                }
            }
        }
        changed
    }
}
