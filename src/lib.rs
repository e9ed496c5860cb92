//! # QX Builder Library
//!
//! This library builds a personalized Quantumult X configuration: it fetches
//! a base configuration, splits it into sections, applies the edits described
//! by a YAML profile, and renders the result. It backs the `qx-builder`
//! command-line tool but can be driven directly.
//!
//! ## Quick Example
//!
//! ```
//! use qx_builder::operators::{FilterMode, Position};
//! use qx_builder::session::{BuildSession, NullReporter};
//!
//! let mut session = BuildSession::new(Box::new(NullReporter));
//! session.load_base("inline", "[general]\nporttest=1\n[policy]\nstatic=A\n");
//! session.patch("policy", &["B"], FilterMode::Exclude);
//! session.upsert("general", "porttest", "2");
//! session.insert("filter_local", "ip-cidr,10.0.0.0/8,DIRECT", Position::Front);
//!
//! let rendered = session.render();
//! assert!(rendered.contains("[general]\nporttest=2\n"));
//! assert!(rendered.contains("[filter_local]\nip-cidr,10.0.0.0/8,DIRECT\n"));
//! ```
//!
//! ## Core Concepts
//!
//! - **Model (`model`)**: ordered sections of raw lines, optionally
//!   pre-seeded with the canonical section skeleton.
//! - **Parser (`parser`)**: turns any text into a model; it never fails on
//!   structure.
//! - **Operators (`operators`, `remote`)**: keyword filters, key upserts,
//!   deduplicated insertion, remote rule references, and regex replacement.
//! - **Writer (`writer`)**: deterministic rendering back to text.
//! - **Sessions (`session`)**: one build run with its statistics and an
//!   injected reporter.
//! - **Profiles (`config`, `builder`, `fetch`)**: the YAML profile, the fixed
//!   pipeline that applies it, and retrieval of the base configuration.

pub mod builder;
pub mod config;
pub mod error;
pub mod fetch;
pub mod model;
pub mod operators;
pub mod output;
pub mod parser;
pub mod policies;
pub mod remote;
pub mod session;
pub mod suggestions;
pub mod writer;

#[cfg(test)]
mod model_proptest;
