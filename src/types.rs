//! Core value types shared by the trap, bus and mount modules.

use crate::error::{BootstrapError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated element tag name, lowercased.
///
/// Accepts an ASCII letter followed by ASCII letters, digits, `-`, `_`,
/// `.` or `:`. Names containing `-` are custom elements.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagName(String);

impl TagName {
    pub fn new(name: &str) -> Result<Self> {
        let mut chars = name.chars();
        let valid = match chars.next() {
            Some(first) if first.is_ascii_alphabetic() => chars
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':')),
            _ => false,
        };
        if !valid {
            return Err(BootstrapError::InvalidTagName(name.to_string()));
        }
        Ok(TagName(name.to_ascii_lowercase()))
    }

    /// Build from a name known to be valid.
    pub(crate) fn from_static(name: &'static str) -> Self {
        debug_assert!(TagName::new(name).is_ok());
        TagName(name.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this names a custom element (contains a hyphen).
    pub fn is_custom(&self) -> bool {
        self.0.contains('-')
    }
}

impl fmt::Debug for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TagName {
    type Error = BootstrapError;

    fn try_from(value: String) -> Result<Self> {
        TagName::new(&value)
    }
}

impl From<TagName> for String {
    fn from(tag: TagName) -> Self {
        tag.0
    }
}

/// An uncaught runtime error as reported by the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub message: String,
    pub url: String,
    /// Line number; `0` means the error has no usable location
    /// (for example a cross-origin script).
    pub line: u32,
}

impl ErrorEvent {
    pub fn new(message: impl Into<String>, url: impl Into<String>, line: u32) -> Self {
        Self {
            message: message.into(),
            url: url.into(),
            line,
        }
    }

    pub fn is_actionable(&self) -> bool {
        self.line != 0
    }
}
