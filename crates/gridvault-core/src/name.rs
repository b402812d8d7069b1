use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SheetError;

/// Sheet targeted by table reads and writes until a client selects another one
pub const DEFAULT_SHEET_NAME: &str = "defaultCollection";

/// A validated, non-empty sheet name
///
/// Names are compared byte for byte. Whitespace is significant and no
/// normalization is applied, so `"Budget"` and `"Budget "` are two sheets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SheetName(String);

impl SheetName {
    /// Validate a raw name
    pub fn parse(raw: impl Into<String>) -> Result<Self, SheetError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(SheetError::InvalidName);
        }
        Ok(Self(raw))
    }

    /// Parse an optional field from a request body, treating absence as empty
    pub fn from_field(raw: Option<String>) -> Result<Self, SheetError> {
        Self::parse(raw.unwrap_or_default())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for SheetName {
    fn default() -> Self {
        Self(DEFAULT_SHEET_NAME.to_string())
    }
}

impl fmt::Display for SheetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SheetName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SheetName {
    type Error = SheetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<SheetName> for String {
    fn from(name: SheetName) -> Self {
        name.0
    }
}
