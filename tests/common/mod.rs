//! Shared test utilities for the CLI end-to-end tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_base(bases::SMALL).with_profile(profiles::MINIMAL);
//!     fixture.command().args(["build", "-c", "config.yaml"]).assert().success();
//! }
//! ```

use assert_cmd::cargo::cargo_bin_cmd;
use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::bases;
    #[allow(unused_imports)]
    pub use super::profiles;
    pub use super::TestFixture;
}

/// Base configurations written next to the profile as `base.conf`.
#[allow(dead_code)]
pub mod bases {
    /// A small base with the sections a profile usually touches.
    pub const SMALL: &str = "\
;Quantumult X base
[general]
server_check_url=http://www.qualcomm.cn/generate_204
network_check_url=http://www.baidu.com/

[dns]
server=119.29.29.29

[policy]
static=国外流量, proxy, direct
static=TikTok, proxy, direct
static=ADBlock, reject, direct

[filter_local]
host-suffix,local,direct
final,国外流量

[mitm]
hostname = a.example.com
";
}

/// Profiles written to `config.yaml`; they refer to `base.conf`.
#[allow(dead_code)]
pub mod profiles {
    /// Base only, no edits.
    pub const MINIMAL: &str = "base:\n  url: base.conf\n";

    /// Exercises every kind of edit without any network access.
    pub const FULL: &str = r#"
base:
  url: base.conf
patches:
  policy:
    strategy: blacklist
    keywords: ["TikTok"]
general:
  server_check_url: http://cp.cloudflare.com/generate_204
mitm:
  hostname: b.example.com
dns:
  - server=223.5.5.5
local_filters:
  top:
    - ip-cidr, 192.168.1.0/24, home, no-resolve
  bottom:
    - ip-cidr, 10.0.0.0/8, direct
policy_map:
  home: direct
  proxy: 国外流量
remote_filters:
  - source: blackmatrix7
    name: Apple
    tag: Apple
    policy: proxy
"#;

    /// Not YAML a profile can be read from.
    pub const INVALID_YAML: &str = "base: [unclosed";

    /// Parses but fails validation.
    pub const NO_BASE_URL: &str = "base:\n  url: \"\"\n";
}

/// A temporary directory holding a profile and the files it refers to.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write `config.yaml` with the given content.
    pub fn with_profile(self, content: &str) -> Self {
        self.with_file("config.yaml", content)
    }

    /// Write `base.conf` with the given content.
    #[allow(dead_code)]
    pub fn with_base(self, content: &str) -> Self {
        self.with_file("base.conf", content)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the profile.
    pub fn profile_path(&self) -> PathBuf {
        self.temp_dir.path().join("config.yaml")
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// A `qx-builder` command running in the fixture directory with
    /// decoration off and the profile environment variables cleared.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = cargo_bin_cmd!("qx-builder");
        cmd.current_dir(self.path())
            .env_remove("QX_BUILDER_CONFIG")
            .env_remove("QX_BUILDER_OUTPUT")
            .env("NO_COLOR", "1")
            .arg("--color")
            .arg("never");
        cmd
    }

    /// Read a file from the fixture directory.
    #[allow(dead_code)]
    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.path().join(path)).expect("Failed to read file")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
