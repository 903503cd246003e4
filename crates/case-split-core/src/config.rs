//! MatchConfig - dispatch settings loaded from JSON.

use serde::{Deserialize, Serialize};

use crate::dispatch::ScanOrder;
use crate::domain::TableError;
use crate::table::{CaseTable, CaseTableBuilder};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchConfig {
    pub scan_order: ScanOrder,

    /// Case keys that must be registered before a table is built.
    pub expected_cases: Vec<String>,
}

impl MatchConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Applies the config to a builder.
    pub fn apply<R>(&self, builder: CaseTableBuilder<R>) -> CaseTableBuilder<R> {
        let builder = builder.scan_order(self.scan_order);
        if self.expected_cases.is_empty() {
            return builder;
        }
        let expected: Vec<&str> = self.expected_cases.iter().map(String::as_str).collect();
        builder.expect_cases(&expected)
    }

    /// Builds a table from `builder` under this config.
    pub fn build<R>(&self, builder: CaseTableBuilder<R>) -> Result<CaseTable<R>, TableError> {
        self.apply(builder).build()
    }
}
