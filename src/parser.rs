//! Section parser
//!
//! Splits configuration text into the sections of a [`ConfigModel`]. Any
//! text is accepted: lines before the first `[name]` marker land in the
//! header pseudo-section, and a source without markers becomes a single
//! header section.

use crate::error::{Error, Result};
use crate::model::{ConfigModel, HEADER};

/// Return the section name if `line` is a section marker.
///
/// A marker starts with `[` and the name runs up to the first `]`, so
/// `[a]b]` names `a` and anything after the closing bracket is ignored.
/// The line is expected to be trimmed already.
///
/// # Examples
///
/// ```
/// use qx_builder::parser::section_marker;
///
/// assert_eq!(section_marker("[filter_local]"), Some("filter_local"));
/// assert_eq!(section_marker("host, example.com, proxy"), None);
/// ```
pub fn section_marker(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('[')?;
    let end = rest.find(']')?;
    Some(&rest[..end])
}

/// Parse text into a model pre-seeded with the canonical skeleton
pub fn parse(content: &str) -> ConfigModel {
    let mut model = ConfigModel::with_skeleton();
    parse_into(&mut model, content);
    model
}

/// Parse text into an existing model.
///
/// The cursor starts at the header. Unseen section names are appended at
/// the end of the current order; a repeated name re-opens the existing
/// section instead of creating a second one.
pub fn parse_into(model: &mut ConfigModel, content: &str) {
    let mut current = HEADER.to_string();

    for line in content.lines() {
        let trimmed = line.trim();
        match section_marker(trimmed) {
            Some(name) => {
                current = name.to_string();
                model.section_mut_or_create(&current);
            }
            None => model.push_line(&current, trimmed),
        }
    }
}

/// Decode raw bytes as UTF-8 and parse them into `model`.
///
/// `source_name` only feeds the error message.
pub fn parse_bytes(model: &mut ConfigModel, bytes: &[u8], source_name: &str) -> Result<()> {
    let content = std::str::from_utf8(bytes).map_err(|_| Error::Decode {
        source_name: source_name.to_string(),
    })?;
    parse_into(model, content);
    Ok(())
}
