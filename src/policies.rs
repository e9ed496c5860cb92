//! Policy group discovery
//!
//! Local rules and remote references name policy groups that must exist in
//! the base configuration's `[policy]` section. This module lists those
//! groups so a profile's `policy_map` can be written against the real names.
//! Group lines look like `static=国外流量, proxy, direct, img-url=...`.

use serde::Serialize;

use crate::model::ConfigModel;

/// Policy group kinds recognized as the leading `kind=name` field
pub const GROUP_KINDS: [&str; 5] = [
    "static",
    "available",
    "round-robin",
    "url-latency-benchmark",
    "dest-hash",
];

/// A policy group declared in `[policy]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyGroup {
    pub kind: String,
    pub name: String,
}

/// Parse one `[policy]` line into its group, if it declares one
pub fn parse_group(line: &str) -> Option<PolicyGroup> {
    let first = line.split(',').next()?;
    let (kind, name) = first.split_once('=')?;
    let kind = kind.trim();
    if !GROUP_KINDS.contains(&kind) {
        return None;
    }
    Some(PolicyGroup {
        kind: kind.to_string(),
        name: name.trim().to_string(),
    })
}

/// All policy groups of the model, in declaration order
pub fn policy_groups(model: &ConfigModel) -> Vec<PolicyGroup> {
    model
        .lines("policy")
        .unwrap_or_default()
        .iter()
        .filter_map(|line| parse_group(line))
        .collect()
}
