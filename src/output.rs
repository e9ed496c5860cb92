//! # Output Configuration
//!
//! Controls how the CLI decorates its progress lines. With colors enabled,
//! status markers are emoji; otherwise they fall back to bracketed words
//! that read well in logs and dumb terminals.
//!
//! In `auto` mode the following are honored:
//! - `NO_COLOR` (any value) disables decoration
//! - `CLICOLOR=0` disables decoration
//! - `CLICOLOR_FORCE=1` forces decoration even without a TTY
//! - `TERM=dumb` disables decoration

use std::env;

/// Output configuration for the CLI
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether emoji markers should be used
    pub use_color: bool,
}

impl OutputConfig {
    /// Resolve from the `--color` flag value (`always`, `never`, or `auto`)
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// Marker for a status line
    pub fn marker(&self, status: Status) -> &'static str {
        if self.use_color {
            status.emoji()
        } else {
            status.plain()
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Kinds of status line printed by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Start,
    Download,
    Filter,
    Settings,
    Remote,
    Save,
    Ok,
    Warn,
    Info,
}

impl Status {
    fn emoji(self) -> &'static str {
        match self {
            Status::Start => "🚀",
            Status::Download => "📥",
            Status::Filter => "✂️",
            Status::Settings => "⚙️",
            Status::Remote => "☁️",
            Status::Save => "💾",
            Status::Ok => "✅",
            Status::Warn => "⚠️",
            Status::Info => "👉",
        }
    }

    fn plain(self) -> &'static str {
        match self {
            Status::Start => "[START]",
            Status::Download => "[FETCH]",
            Status::Filter => "[FILTER]",
            Status::Settings => "[SET]",
            Status::Remote => "[REMOTE]",
            Status::Save => "[SAVE]",
            Status::Ok => "[OK]",
            Status::Warn => "[WARN]",
            Status::Info => "[INFO]",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_color_always() {
        assert!(OutputConfig::from_env_and_flag("always").use_color);
        assert!(OutputConfig::from_env_and_flag("ALWAYS").use_color);
    }

    #[test]
    fn test_color_never() {
        assert!(!OutputConfig::from_env_and_flag("never").use_color);
    }

    #[test]
    #[serial]
    fn test_no_color_env_disables_auto() {
        env::set_var("NO_COLOR", "1");
        let config = OutputConfig::from_env_and_flag("auto");
        env::remove_var("NO_COLOR");
        assert!(!config.use_color);
    }

    #[test]
    fn test_marker_variants() {
        let colored = OutputConfig { use_color: true };
        let plain = OutputConfig { use_color: false };
        assert_eq!(colored.marker(Status::Ok), "✅");
        assert_eq!(plain.marker(Status::Ok), "[OK]");
        assert_eq!(plain.marker(Status::Remote), "[REMOTE]");
        assert_eq!(plain.marker(Status::Settings), "[SET]");
    }
}
