//! # Profile Schema and Parsing
//!
//! This module defines the YAML profile that drives a build: where the base
//! configuration lives and which edits to apply to it. A complete profile
//! looks like this:
//!
//! ```yaml
//! base:
//!   url: https://example.com/QuantumultX.conf
//! patches:
//!   rewrite_remote:
//!     strategy: blacklist        # or whitelist
//!     keywords: [YouTube, Bilibili]
//! general:
//!   geo_location_checker: disabled
//! mitm:
//!   hostname: api.example.com
//! dns:
//!   - server=223.5.5.5
//! custom_policies:
//!   - static=家庭网络, direct
//! append:
//!   rewrite_local:
//!     - ^https://ads.example.com url reject
//! local_filters:
//!   top:
//!     - ip-cidr, 192.168.0.0/16, my_home, tag=LAN
//!   bottom:
//!     - geoip, cn, direct
//! policy_map:
//!   my_home: 🏠 家庭网络
//! remote_filters:
//!   - source: blackmatrix7
//!     name: OpenAI
//!     tag: ChatGPT
//!     policy: proxy
//!   - url: https://example.com/ads.list
//!     tag: Ads
//!     policy: reject
//!     enabled: false
//! remote_position: front
//! replacements:
//!   - pattern: "img-url=.*"
//!     with: "img-url=https://example.com/icon.png"
//! merge_strategies:
//!   skip-proxy: append-dedup
//! ```
//!
//! Mappings whose order matters (`patches`, `general`, `mitm`, `append`,
//! `policy_map`) keep the order written in the file.

use crate::error::{Error, Result};
use crate::operators::{FilterMode, MergeStrategies, MergeStrategy, Position};
use crate::remote::{RemoteRule, RuleSource, DEFAULT_UPDATE_INTERVAL};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;

/// Name of the built-in blackmatrix7 rule provider
pub const BLACKMATRIX7: &str = "blackmatrix7";

/// Where to download the base configuration from
#[derive(Debug, Clone, Deserialize)]
pub struct BaseSource {
    /// HTTP(S) URL, `file://` URL, or local path
    pub url: String,
}

/// Keyword filter for one section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatchRule {
    #[serde(default)]
    pub strategy: FilterMode,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Local rules injected at either end of `filter_local`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocalFilters {
    /// High-priority rules, inserted at the front
    #[serde(default)]
    pub top: Vec<String>,
    /// Fallback rules, appended at the back
    #[serde(default)]
    pub bottom: Vec<String>,
}

/// A remote rule list reference
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteFilter {
    /// Named provider shorthand (currently only `blackmatrix7`)
    #[serde(default)]
    pub source: Option<String>,
    /// List name within the provider
    #[serde(default)]
    pub name: Option<String>,
    /// Explicit list URL, used when no provider is given
    #[serde(default)]
    pub url: Option<String>,
    pub tag: String,
    /// Policy name, looked up in `policy_map` first
    pub policy: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_update_interval")]
    pub update_interval: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_update_interval() -> u64 {
    DEFAULT_UPDATE_INTERVAL
}

fn default_remote_position() -> Position {
    Position::Front
}

/// Regex substitution applied to every line
#[derive(Debug, Clone, Deserialize)]
pub struct Replacement {
    pub pattern: String,
    #[serde(alias = "replacement")]
    pub with: String,
}

/// The complete build profile
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub base: BaseSource,
    #[serde(default, deserialize_with = "ordered::mapping")]
    pub patches: Vec<(String, PatchRule)>,
    #[serde(default, deserialize_with = "ordered::scalars")]
    pub general: Vec<(String, String)>,
    #[serde(default, deserialize_with = "ordered::scalars")]
    pub mitm: Vec<(String, String)>,
    #[serde(default)]
    pub dns: Vec<String>,
    #[serde(default)]
    pub custom_policies: Vec<String>,
    #[serde(default, deserialize_with = "ordered::mapping")]
    pub append: Vec<(String, Vec<String>)>,
    #[serde(default)]
    pub local_filters: LocalFilters,
    #[serde(default, deserialize_with = "ordered::scalars")]
    pub policy_map: Vec<(String, String)>,
    #[serde(default)]
    pub remote_filters: Vec<RemoteFilter>,
    #[serde(default = "default_remote_position")]
    pub remote_position: Position,
    #[serde(default)]
    pub replacements: Vec<Replacement>,
    #[serde(default)]
    pub merge_strategies: HashMap<String, MergeStrategy>,
}

impl Profile {
    /// Look up a policy alias, falling back to the name itself
    pub fn resolve_policy<'a>(&'a self, name: &'a str) -> &'a str {
        self.policy_map
            .iter()
            .find(|(alias, _)| alias == name)
            .map(|(_, real)| real.as_str())
            .unwrap_or(name)
    }

    /// Replace `, alias,` occurrences in a local rule with the real policy
    /// name, for every alias in `policy_map` order
    pub fn substitute_policies(&self, rule: &str) -> String {
        self.policy_map
            .iter()
            .fold(rule.to_string(), |rule, (alias, real)| {
                rule.replace(&format!(", {alias},"), &format!(", {real},"))
            })
    }

    /// Default merge strategies extended with the profile's overrides
    pub fn strategies(&self) -> MergeStrategies {
        let mut strategies = MergeStrategies::default();
        for (key, strategy) in &self.merge_strategies {
            strategies.set(key.clone(), *strategy);
        }
        strategies
    }

    /// Build the remote rule for a profile entry
    pub fn remote_rule(&self, filter: &RemoteFilter) -> Result<RemoteRule> {
        let source = match (filter.source.as_deref(), &filter.url) {
            (Some(BLACKMATRIX7), _) => {
                let name = filter.name.clone().ok_or_else(|| Error::ConfigParse {
                    message: format!("Remote filter '{}' uses blackmatrix7 without a name", filter.tag),
                    hint: Some("Add 'name:' with the rule directory, e.g. 'name: OpenAI'".to_string()),
                })?;
                RuleSource::Blackmatrix7 { name }
            }
            (_, Some(url)) => RuleSource::Url(url.clone()),
            (Some(other), None) => {
                return Err(Error::ConfigParse {
                    message: format!("Remote filter '{}' has unknown source '{}'", filter.tag, other),
                    hint: Some("Use 'source: blackmatrix7' or give an explicit 'url:'".to_string()),
                })
            }
            (None, None) => {
                return Err(Error::ConfigParse {
                    message: format!("Remote filter '{}' has neither source nor url", filter.tag),
                    hint: Some("Add 'url:' or 'source: blackmatrix7' with 'name:'".to_string()),
                })
            }
        };

        Ok(RemoteRule::new(source, filter.tag.clone(), self.resolve_policy(&filter.policy))
            .enabled(filter.enabled)
            .update_interval(filter.update_interval))
    }

    /// Compile the replacement patterns in profile order
    pub fn compiled_replacements(&self) -> Result<Vec<(Regex, &str)>> {
        self.replacements
            .iter()
            .map(|replacement| -> Result<(Regex, &str)> {
                Ok((Regex::new(&replacement.pattern)?, replacement.with.as_str()))
            })
            .collect()
    }

    /// Check everything that can be checked without fetching the base
    pub fn validate(&self) -> Result<()> {
        if self.base.url.trim().is_empty() {
            return Err(Error::ConfigParse {
                message: "Base url is empty".to_string(),
                hint: Some("Set 'base.url' to the configuration to start from".to_string()),
            });
        }

        for filter in &self.remote_filters {
            let rule = self.remote_rule(filter)?;
            if let RuleSource::Url(url) = &rule.source {
                url::Url::parse(url)?;
            }
        }

        self.compiled_replacements()?;
        Ok(())
    }
}

/// Order-preserving deserializers for YAML mappings
mod ordered {
    use serde::de::{DeserializeOwned, Error as _};
    use serde::{Deserialize, Deserializer};
    use serde_yaml::{Mapping, Value};

    fn scalar_to_string<E: serde::de::Error>(value: Value) -> Result<String, E> {
        match value {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Null => Ok(String::new()),
            other => Err(E::custom(format!("expected a scalar value, found {other:?}"))),
        }
    }

    fn entries<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Mapping, D::Error> {
        Ok(Option::<Mapping>::deserialize(deserializer)?.unwrap_or_default())
    }

    /// Mapping of string keys to scalar values, stringified
    pub fn scalars<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<(String, String)>, D::Error> {
        entries(deserializer)?
            .into_iter()
            .map(|(key, value)| -> Result<(String, String), D::Error> {
                Ok((scalar_to_string::<D::Error>(key)?, scalar_to_string::<D::Error>(value)?))
            })
            .collect()
    }

    /// Mapping of string keys to structured values
    pub fn mapping<'de, D: Deserializer<'de>, T: DeserializeOwned>(
        deserializer: D,
    ) -> Result<Vec<(String, T)>, D::Error> {
        entries(deserializer)?
            .into_iter()
            .map(|(key, value)| -> Result<(String, T), D::Error> {
                let key = scalar_to_string::<D::Error>(key)?;
                let value = serde_yaml::from_value(value).map_err(D::Error::custom)?;
                Ok((key, value))
            })
            .collect()
    }
}

/// Parse a YAML string into a `Profile`
pub fn parse(yaml_content: &str) -> Result<Profile> {
    let profile: Profile = serde_yaml::from_str(yaml_content)?;
    Ok(profile)
}

/// Parse a `Profile` from a YAML file path
pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Profile> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
base:
  url: https://example.com/QuantumultX.conf
patches:
  rewrite_remote:
    strategy: blacklist
    keywords: [YouTube, Bilibili]
  filter_remote:
    strategy: whitelist
    keywords: [Apple]
general:
  geo_location_checker: disabled
  server_check_timeout: 2000
  resource_parser_enabled: true
mitm:
  hostname: api.example.com
dns:
  - server=223.5.5.5
custom_policies:
  - static=家庭网络, direct
append:
  rewrite_local:
    - ^https://ads.example.com url reject
local_filters:
  top:
    - ip-cidr, 192.168.0.0/16, my_home, tag=LAN
  bottom:
    - geoip, cn, direct
policy_map:
  my_home: 🏠 家庭网络
  proxy: 国外流量
remote_filters:
  - source: blackmatrix7
    name: OpenAI
    tag: ChatGPT
    policy: proxy
  - url: https://example.com/ads.list
    tag: Ads
    policy: reject
    enabled: false
    update_interval: 3600
remote_position: back
replacements:
  - pattern: "img-url=.*"
    with: "img-url=https://example.com/icon.png"
merge_strategies:
  skip-proxy: append-dedup
"#;

    #[test]
    fn test_parse_full_profile() {
        let profile = parse(FULL).unwrap();
        assert_eq!(profile.base.url, "https://example.com/QuantumultX.conf");

        assert_eq!(profile.patches.len(), 2);
        assert_eq!(profile.patches[0].0, "rewrite_remote");
        assert_eq!(profile.patches[0].1.strategy, FilterMode::Exclude);
        assert_eq!(profile.patches[1].1.strategy, FilterMode::Retain);

        assert_eq!(
            profile.general,
            vec![
                ("geo_location_checker".to_string(), "disabled".to_string()),
                ("server_check_timeout".to_string(), "2000".to_string()),
                ("resource_parser_enabled".to_string(), "true".to_string()),
            ]
        );
        assert_eq!(profile.mitm[0].1, "api.example.com");
        assert_eq!(profile.append[0].0, "rewrite_local");
        assert_eq!(profile.local_filters.top.len(), 1);
        assert_eq!(profile.remote_filters.len(), 2);
        assert_eq!(profile.remote_position, Position::Back);
        assert_eq!(profile.replacements[0].with, "img-url=https://example.com/icon.png");
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_minimal_profile_defaults() {
        let profile = parse("base:\n  url: base.conf\n").unwrap();
        assert!(profile.patches.is_empty());
        assert!(profile.general.is_empty());
        assert!(profile.remote_filters.is_empty());
        assert_eq!(profile.remote_position, Position::Front);
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_null_mappings_are_empty() {
        let profile = parse("base:\n  url: base.conf\ngeneral:\npatches:\n").unwrap();
        assert!(profile.general.is_empty());
        assert!(profile.patches.is_empty());
    }

    #[test]
    fn test_patch_defaults_to_blacklist() {
        let profile = parse("base:\n  url: b\npatches:\n  dns:\n    keywords: [x]\n").unwrap();
        assert_eq!(profile.patches[0].1.strategy, FilterMode::Exclude);
    }

    #[test]
    fn test_missing_base_is_error() {
        assert!(parse("general:\n  a: 1\n").is_err());
    }

    #[test]
    fn test_resolve_and_substitute_policies() {
        let profile = parse(FULL).unwrap();
        assert_eq!(profile.resolve_policy("proxy"), "国外流量");
        assert_eq!(profile.resolve_policy("reject"), "reject");
        assert_eq!(
            profile.substitute_policies("ip-cidr, 192.168.0.0/16, my_home, tag=LAN"),
            "ip-cidr, 192.168.0.0/16, 🏠 家庭网络, tag=LAN"
        );
        // Only whole comma-delimited fields are substituted
        assert_eq!(
            profile.substitute_policies("host, my_home.lan, direct"),
            "host, my_home.lan, direct"
        );
    }

    #[test]
    fn test_remote_rule_resolution() {
        let profile = parse(FULL).unwrap();
        let openai = profile.remote_rule(&profile.remote_filters[0]).unwrap();
        assert_eq!(openai.policy, "国外流量");
        assert!(openai.to_line().contains("/OpenAI/OpenAI.list"));

        let ads = profile.remote_rule(&profile.remote_filters[1]).unwrap();
        assert_eq!(
            ads.to_line(),
            "https://example.com/ads.list, tag=Ads, force-policy=reject, update-interval=3600, opt-parser=true, enabled=false"
        );
    }

    #[test]
    fn test_remote_rule_without_location_fails() {
        let profile = parse(
            "base:\n  url: b\nremote_filters:\n  - tag: X\n    policy: proxy\n",
        )
        .unwrap();
        let err = profile.validate().unwrap_err();
        assert!(err.to_string().contains("neither source nor url"));
        assert!(err.to_string().contains("hint:"));
    }

    #[test]
    fn test_blackmatrix7_without_name_fails() {
        let profile = parse(
            "base:\n  url: b\nremote_filters:\n  - source: blackmatrix7\n    tag: X\n    policy: proxy\n",
        )
        .unwrap();
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_invalid_remote_url_fails() {
        let profile = parse(
            "base:\n  url: b\nremote_filters:\n  - url: not a url\n    tag: X\n    policy: proxy\n",
        )
        .unwrap();
        assert!(matches!(profile.validate(), Err(Error::UrlParse(_))));
    }

    #[test]
    fn test_invalid_replacement_regex_fails() {
        let profile = parse(
            "base:\n  url: b\nreplacements:\n  - pattern: \"[unclosed\"\n    with: x\n",
        )
        .unwrap();
        assert!(matches!(profile.validate(), Err(Error::Regex(_))));
    }

    #[test]
    fn test_empty_base_url_fails() {
        let profile = parse("base:\n  url: \"  \"\n").unwrap();
        assert!(matches!(profile.validate(), Err(Error::ConfigParse { .. })));
    }

    #[test]
    fn test_strategies_extend_defaults() {
        let profile = parse(FULL).unwrap();
        let strategies = profile.strategies();
        assert_eq!(strategies.strategy_for("hostname"), MergeStrategy::AppendDedup);
        assert_eq!(strategies.strategy_for("skip-proxy"), MergeStrategy::AppendDedup);
        assert_eq!(strategies.strategy_for("dns_exclusion_list"), MergeStrategy::Replace);
    }

    #[test]
    fn test_from_file_nonexistent() {
        let result = from_file("nonexistent_profile.yaml");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_bundled_profile_is_valid() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/profiles/config.yaml");
        let profile = from_file(path).unwrap();
        profile.validate().unwrap();
        assert_eq!(profile.remote_position, Position::Front);
        for filter in &profile.remote_filters {
            let url = profile.remote_rule(filter).unwrap().source.url();
            assert!(!url.contains("example.com"), "placeholder list {url}");
        }
        assert_eq!(
            profile.substitute_policies("ip-cidr, 192.168.1.0/24, my_home, no-resolve"),
            "ip-cidr, 192.168.1.0/24, 🏠 家庭网络, no-resolve"
        );
    }
}
