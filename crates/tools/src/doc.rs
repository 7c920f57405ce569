//! Documentation block extraction.
//!
//! A tool may be declared with a free-form documentation block instead of
//! (or in addition to) an explicit description. The leading paragraph
//! becomes the description; lines in an `Args:` section describe parameters:
//!
//! ```text
//! Get the current weather for a given city.
//!
//! Args:
//!     city (str): The name of the city.
//!     unit: The temperature unit, 'celsius' or 'fahrenheit'.
//! ```
//!
//! Extraction never fails. Anything it cannot find is simply absent.

use regex::Regex;
use std::sync::LazyLock;

static ARGS_SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)Args:(.*)").expect("valid regex"));

/// A parsed documentation block.
#[derive(Debug, Clone, Default)]
pub struct DocBlock {
    text: String,
}

impl DocBlock {
    pub fn parse(raw: &str) -> Self {
        Self { text: clean(raw) }
    }

    /// The first paragraph, or `None` if the block is blank.
    pub fn summary(&self) -> Option<&str> {
        let summary = self.text.split("\n\n").next()?.trim();
        (!summary.is_empty()).then_some(summary)
    }

    /// The description of `name` from the `Args:` section, if any.
    pub fn parameter(&self, name: &str) -> Option<String> {
        let section = ARGS_SECTION.captures(&self.text)?.get(1)?.as_str();
        let pattern = format!(
            r"(?m)^\s*{}\s*(?:\([^)]*\))?\s*:\s*(.*)$",
            regex::escape(name)
        );
        let line = Regex::new(&pattern).ok()?;
        let description = line.captures(section)?.get(1)?.as_str().trim();
        Some(description.to_string())
    }
}

/// Strip surrounding blank lines and the common indentation of all lines
/// after the first.
fn clean(raw: &str) -> String {
    let mut lines = raw.lines();
    let first = lines.next().unwrap_or_default().trim_start();
    let rest: Vec<&str> = lines.collect();

    let indent = rest
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut cleaned = vec![first.trim_end()];
    cleaned.extend(rest.iter().map(|line| {
        let line = line.trim_end();
        line.get(indent..).unwrap_or(line.trim_start())
    }));

    cleaned.join("\n").trim().to_string()
}
