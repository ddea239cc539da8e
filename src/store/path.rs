//! Database keys.

use crate::error::{DashError, Result};
use std::fmt;

/// Characters the Realtime Database refuses inside a key segment.
const FORBIDDEN: [char; 5] = ['.', '$', '#', '[', ']'];

/// Slash-separated location in the database tree, e.g. `orders/{uid}/latest`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DbPath {
    segments: Vec<String>,
}

impl DbPath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a path; leading, trailing and repeated slashes are ignored.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut path = Self::root();
        for segment in raw.split('/').filter(|segment| !segment.is_empty()) {
            validate_segment(raw, segment)?;
            path.segments.push(segment.to_string());
        }
        Ok(path)
    }

    /// Descend into `child`, which may itself contain several segments.
    ///
    /// An empty child is rejected so that a blank user id can never widen a read
    /// to the parent node.
    pub fn child(&self, child: &str) -> Result<Self> {
        let relative = Self::parse(child)?;
        if relative.is_root() {
            return Err(DashError::invalid_path(
                format!("{self}/{child}"),
                "child path is empty",
            ));
        }
        let mut segments = self.segments.clone();
        segments.extend(relative.segments);
        Ok(Self { segments })
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// Last segment, `None` for the root.
    pub fn key(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }
}

fn validate_segment(raw: &str, segment: &str) -> Result<()> {
    if let Some(bad) = segment.chars().find(|c| FORBIDDEN.contains(c)) {
        return Err(DashError::invalid_path(
            raw,
            format!("segment '{segment}' contains '{bad}'"),
        ));
    }
    if segment.chars().any(char::is_control) {
        return Err(DashError::invalid_path(
            raw,
            format!("segment '{}' contains a control character", segment.escape_debug()),
        ));
    }
    Ok(())
}

impl fmt::Display for DbPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}
