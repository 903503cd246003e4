//! CaseKey - discriminant name shared by case tables and subjects.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of a case. A subject selects a case by owning a key with this name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseKey(String);

impl CaseKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CaseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for CaseKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CaseKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CaseKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}
