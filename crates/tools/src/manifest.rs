//! Manifest view over a registry.

use crate::ToolDescriptor;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fmt;

/// Rendered in place of an empty manifest.
pub const NO_TOOLS_AVAILABLE: &str = "No tools available.";

/// Borrowed, restartable view of the registered tools in registration order.
///
/// Iterating never mutates anything, so the same manifest can be walked
/// any number of times.
#[derive(Debug, Clone, Copy)]
pub struct Manifest<'a> {
    tools: &'a [ToolDescriptor],
}

impl<'a> Manifest<'a> {
    pub(crate) fn new(tools: &'a [ToolDescriptor]) -> Self {
        Self { tools }
    }

    pub fn iter(&self) -> std::slice::Iter<'a, ToolDescriptor> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Render for embedding in a prompt: pretty JSON with 4-space indent,
    /// or [`NO_TOOLS_AVAILABLE`] when empty.
    pub fn render(&self) -> String {
        if self.is_empty() {
            return NO_TOOLS_AVAILABLE.to_string();
        }
        let mut buf = Vec::new();
        let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        match self.tools.serialize(&mut ser) {
            Ok(()) => String::from_utf8(buf).unwrap_or_default(),
            Err(_) => String::new(),
        }
    }
}

impl<'a> IntoIterator for Manifest<'a> {
    type Item = &'a ToolDescriptor;
    type IntoIter = std::slice::Iter<'a, ToolDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.tools.iter()
    }
}

impl<'a> IntoIterator for &Manifest<'a> {
    type Item = &'a ToolDescriptor;
    type IntoIter = std::slice::Iter<'a, ToolDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.tools.iter()
    }
}

impl Serialize for Manifest<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.tools.serialize(serializer)
    }
}

impl fmt::Display for Manifest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
