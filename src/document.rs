//! Section document parsing.
//!
//! The document is a list of entries, each started by a `-` marker line and
//! carrying up to three labeled fields:
//!
//! ```text
//! - name: "Sleep"
//!   color: "#1f2d3d"
//!   started: "23:00"
//! ```
//!
//! Only `name`, `color` and `started` are read. Everything else is skipped, so
//! documents with extra fields still load.

use crate::error::{ClockError, Result};
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;
use tracing::debug;

/// Logical name of the section document.
pub const SECTIONS_RESOURCE: &str = "sections.yaml";

static FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(name|color|started):\s*(.*)").expect("field pattern is valid")
});

/// One entry of the section document, as written. Fields the entry did not
/// carry stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionRecord {
    pub name: Option<String>,
    pub color: Option<String>,
    pub started: Option<String>,
}

impl SectionRecord {
    fn set_field(&mut self, label: &str, value: String) {
        match label {
            "name" => self.name = Some(value),
            "color" => self.color = Some(value),
            "started" => self.started = Some(value),
            _ => {}
        }
    }
}

/// Parses section document text into records, keeping source order.
///
/// Never fails: malformed entries come back with missing fields.
pub fn parse_sections(text: &str) -> Vec<SectionRecord> {
    let mut sections = Vec::new();
    let mut pending: Option<SectionRecord> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('#') {
            continue;
        }
        let field_text = match trimmed.strip_prefix('-') {
            Some(rest) => {
                sections.extend(pending.replace(SectionRecord::default()));
                rest
            }
            None => line,
        };
        // Field lines ahead of the first marker have no record to land in.
        if let Some(record) = pending.as_mut() {
            if let Some((label, value)) = extract_field(field_text) {
                record.set_field(label, value);
            }
        }
    }
    sections.extend(pending);

    debug!(count = sections.len(), "parsed section document");
    sections
}

fn extract_field(line: &str) -> Option<(&'static str, String)> {
    let captures = FIELD.captures(line)?;
    let label = match &captures[1] {
        "name" => "name",
        "color" => "color",
        _ => "started",
    };
    Some((label, clean_value(&captures[2])))
}

/// Trims whitespace and any quotes at either end, balanced or not. Quotes
/// inside the value are kept.
fn clean_value(raw: &str) -> String {
    raw.trim()
        .trim_matches(['"', '\''])
        .trim()
        .to_string()
}

/// Where the section document comes from.
pub trait DocumentSource {
    /// Fetches the full text of the named resource.
    fn fetch(&self, resource: &str) -> Result<String>;
}

/// Reads documents from files under a root directory.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DocumentSource for FileSource {
    fn fetch(&self, resource: &str) -> Result<String> {
        let path = self.root.join(resource);
        std::fs::read_to_string(&path).map_err(|source| ClockError::document(path, source))
    }
}
