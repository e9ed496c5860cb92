//! Rendering a [`ConfigModel`] back to text
//!
//! Output layout:
//!
//! 1. Header lines, without a marker.
//! 2. For every other section: a blank separator line, `[name]`, then the
//!    section's non-blank lines.
//!
//! Blank lines are dropped. Every section the source declared or an edit
//! reached is written, even when empty. Skeleton placeholders are written
//! only when they belong to [`ALWAYS_EMITTED`]. Rendering only reads the
//! model, so the same model always yields the same bytes.

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::model::ConfigModel;

/// Skeleton sections whose marker is written even when nothing reached them.
pub const ALWAYS_EMITTED: [&str; 4] = ["general", "dns", "policy", "filter_local"];

/// Serialize the model to configuration text
pub fn render(model: &ConfigModel) -> String {
    let mut output = String::new();

    for section in model.sections() {
        let lines = section.lines().iter().filter(|line| !line.is_empty());

        if !section.is_header() {
            if section.is_seeded() && !ALWAYS_EMITTED.contains(&section.name()) {
                continue;
            }
            output.push('\n');
            output.push('[');
            output.push_str(section.name());
            output.push_str("]\n");
        }

        for line in lines {
            output.push_str(line);
            output.push('\n');
        }
    }

    output
}

/// Render the model and write it to `path`.
///
/// Missing parent directories are created. The model is left untouched when
/// writing fails.
pub fn write_to_file<P: AsRef<Path>>(model: &ConfigModel, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, render(model))?;
    Ok(())
}
