//! In-memory configuration model
//!
//! A `ConfigModel` is an ordered list of named sections, each holding the raw
//! text lines that belong to it. Lines are opaque: only the operators in
//! [`crate::operators`] look inside them.
//!
//! Sections created by [`ConfigModel::with_skeleton`] start out as
//! placeholders. A placeholder only fixes where a section renders; it does
//! not count as present until the parser or an edit operator reaches it.

/// Reserved name of the pseudo-section holding text before the first marker.
pub const HEADER: &str = "header";

/// Canonical section order used to pre-seed a model before parsing.
///
/// Sections discovered while parsing that are not listed here are appended
/// after this block in first-seen order.
pub const CANONICAL_SECTIONS: [&str; 12] = [
    "general",
    "dns",
    "policy",
    "server_remote",
    "filter_remote",
    "rewrite_remote",
    "server_local",
    "filter_local",
    "rewrite_local",
    "task_local",
    "http_backend",
    "mitm",
];

/// A named, ordered group of lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    lines: Vec<String>,
    seeded: bool,
}

impl Section {
    /// Create an empty section
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            lines: Vec::new(),
            seeded: false,
        }
    }

    fn placeholder(name: &str) -> Self {
        Self {
            seeded: true,
            ..Self::new(name)
        }
    }

    /// Section name as it appears between the brackets
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lines in order, including blank ones kept from parsing
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Whether this is the header pseudo-section
    pub fn is_header(&self) -> bool {
        self.name == HEADER
    }

    /// Whether this is a skeleton placeholder nothing has reached yet
    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    /// Whether the section holds no lines at all
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of lines, blank ones included
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether a byte-identical line is present
    pub fn contains(&self, line: &str) -> bool {
        self.lines.iter().any(|existing| existing == line)
    }

    pub(crate) fn lines_mut(&mut self) -> &mut Vec<String> {
        &mut self.lines
    }
}

/// Ordered mapping from section name to its lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigModel {
    sections: Vec<Section>,
}

impl Default for ConfigModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigModel {
    /// Create a model holding only the empty header section
    pub fn new() -> Self {
        Self {
            sections: vec![Section::new(HEADER)],
        }
    }

    /// Create a model pre-seeded with the canonical section skeleton
    pub fn with_skeleton() -> Self {
        let mut model = Self::new();
        for name in CANONICAL_SECTIONS {
            model.sections.push(Section::placeholder(name));
        }
        model
    }

    /// All sections in render order
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Section names in render order
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(Section::name)
    }

    /// Look up a section by name
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.name == name)
    }

    /// Lines of a section, if it exists
    pub fn lines(&self, name: &str) -> Option<&[String]> {
        self.section(name).map(Section::lines)
    }

    /// Whether a section with this name exists, placeholders excluded
    pub fn contains_section(&self, name: &str) -> bool {
        self.section(name).is_some_and(|section| !section.seeded)
    }

    /// Total number of lines across all sections
    pub fn line_count(&self) -> usize {
        self.sections.iter().map(Section::len).sum()
    }

    /// Mutable lookup that never creates
    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|section| section.name == name)
    }

    /// Find a section, appending it at the end of the order when missing.
    ///
    /// A placeholder reached this way becomes a real section.
    pub fn section_mut_or_create(&mut self, name: &str) -> &mut Section {
        let index = match self.sections.iter().position(|section| section.name == name) {
            Some(index) => index,
            None => {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            }
        };
        let section = &mut self.sections[index];
        section.seeded = false;
        section
    }

    /// Append a raw line to a section, creating the section if needed.
    ///
    /// No dedup happens here; this is the parser's channel.
    pub fn push_line<S: Into<String>>(&mut self, section: &str, line: S) {
        self.section_mut_or_create(section).lines.push(line.into());
    }

    pub(crate) fn sections_mut(&mut self) -> impl Iterator<Item = &mut Section> {
        self.sections.iter_mut()
    }
}
