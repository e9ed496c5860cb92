//! Remote rule references
//!
//! A remote rule reference is a single `filter_remote` line pointing at an
//! externally hosted rule list:
//!
//! ```text
//! <url>, tag=<tag>, force-policy=<policy>, update-interval=<secs>, opt-parser=true, enabled=<bool>
//! ```
//!
//! `opt-parser=true` lets the client parse lists that are not written in
//! its native syntax.

use std::fmt;

/// Section receiving remote rule references.
pub const FILTER_REMOTE: &str = "filter_remote";

/// Refresh interval used when none is given, in seconds.
pub const DEFAULT_UPDATE_INTERVAL: u64 = 86400;

/// URL template of the blackmatrix7 rule collection.
const BLACKMATRIX7_TEMPLATE: &str =
    "https://raw.githubusercontent.com/blackmatrix7/ios_rule_script/master/rule/QuantumultX/{name}/{name}.list";

/// Where a remote rule list lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSource {
    /// An explicit list URL
    Url(String),
    /// A list from the blackmatrix7 collection, by directory name
    Blackmatrix7 { name: String },
}

impl RuleSource {
    /// Resolve the source to its list URL
    pub fn url(&self) -> String {
        match self {
            RuleSource::Url(url) => url.clone(),
            RuleSource::Blackmatrix7 { name } => BLACKMATRIX7_TEMPLATE.replace("{name}", name),
        }
    }
}

/// A remote rule reference ready to be rendered as a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRule {
    pub source: RuleSource,
    pub tag: String,
    pub policy: String,
    pub enabled: bool,
    pub update_interval: u64,
}

impl RemoteRule {
    /// Create an enabled reference with the default refresh interval
    pub fn new<T: Into<String>, P: Into<String>>(source: RuleSource, tag: T, policy: P) -> Self {
        Self {
            source,
            tag: tag.into(),
            policy: policy.into(),
            enabled: true,
            update_interval: DEFAULT_UPDATE_INTERVAL,
        }
    }

    /// Set whether the client should load the list
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the refresh interval in seconds
    pub fn update_interval(mut self, seconds: u64) -> Self {
        self.update_interval = seconds;
        self
    }

    /// Render the `filter_remote` line
    pub fn to_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RemoteRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, tag={}, force-policy={}, update-interval={}, opt-parser=true, enabled={}",
            self.source.url(),
            self.tag,
            self.policy,
            self.update_interval,
            self.enabled
        )
    }
}
