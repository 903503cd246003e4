//! Case file format for the CLI.
//!
//! ```json
//! {
//!   "config": { "scan_order": "case_table", "expected_cases": ["ok"] },
//!   "cases": {
//!     "ok": "payload",
//!     "err": { "field": "reason" },
//!     "pending": { "constant": "waiting" }
//!   }
//! }
//! ```
//!
//! Cases keep file order. A key repeated in `cases` is rejected as a
//! duplicate case rather than overwriting the earlier entry.

use std::fmt;
use std::path::Path;

use anyhow::Context;
use case_split_core::{CaseTable, CaseValue, MatchConfig, ScanOrder};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseFile {
    #[serde(default)]
    pub config: MatchConfig,
    #[serde(deserialize_with = "entries_in_order")]
    pub cases: Vec<(String, Value)>,
}

/// Reads a JSON object as its raw entries, repeated keys included.
fn entries_in_order<'de, D>(deserializer: D) -> Result<Vec<(String, Value)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct EntriesVisitor;

    impl<'de> Visitor<'de> for EntriesVisitor {
        type Value = Vec<(String, Value)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an object of case specs")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, Value>()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(EntriesVisitor)
}

/// How a case resolves.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseSpec {
    /// Return this value regardless of the payload.
    Constant(Value),
    /// Return one field of the payload, `null` when absent.
    Field(String),
    /// Return the payload unchanged.
    Payload,
}

impl CaseSpec {
    pub fn into_case_value(self) -> CaseValue<Value> {
        match self {
            CaseSpec::Constant(value) => CaseValue::Constant(value),
            CaseSpec::Field(name) => CaseValue::handler(move |payload: &Value| {
                payload.get(&name).cloned().unwrap_or(Value::Null)
            }),
            CaseSpec::Payload => CaseValue::handler(|payload: &Value| payload.clone()),
        }
    }
}

impl CaseFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read case file {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("parse case file {}", path.display()))
    }

    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Builds the case table; `scan_order` overrides the file's config.
    pub fn into_table(self, scan_order: Option<ScanOrder>) -> anyhow::Result<CaseTable<Value>> {
        let mut config = self.config;
        if let Some(order) = scan_order {
            config.scan_order = order;
        }

        let mut builder = CaseTable::builder();
        for (key, spec) in self.cases {
            let spec: CaseSpec = serde_json::from_value(spec)
                .with_context(|| format!("invalid spec for case '{key}'"))?;
            builder = builder.case(key, spec.into_case_value())?;
        }
        Ok(config.build(builder)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use case_split_core::{Subject, TableError};
    use rstest::rstest;
    use serde_json::json;

    const FILE: &str = r#"{
        "cases": {
            "ok": "payload",
            "err": { "field": "reason" },
            "pending": { "constant": "waiting" }
        }
    }"#;

    fn table(order: Option<ScanOrder>) -> CaseTable<Value> {
        CaseFile::parse(FILE).unwrap().into_table(order).unwrap()
    }

    #[rstest]
    #[case::payload(Subject::new().with("ok", json!([1, 2])), json!([1, 2]))]
    #[case::field(Subject::new().with("err", json!({ "reason": "boom" })), json!("boom"))]
    #[case::missing_field(Subject::new().with("err", json!({})), Value::Null)]
    #[case::constant(Subject::new().with("pending", 3), json!("waiting"))]
    fn resolves_each_spec(#[case] subject: Subject, #[case] expected: Value) {
        assert_eq!(table(None).split(&subject).unwrap(), expected);
    }

    #[test]
    fn keeps_file_order() {
        let keys: Vec<String> = table(None).keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["ok", "err", "pending"]);
    }

    #[test]
    fn scan_order_override_wins() {
        let table = table(Some(ScanOrder::Subject));
        assert_eq!(table.scan_order(), ScanOrder::Subject);
    }

    #[test]
    fn config_section_is_applied() {
        let raw = r#"{
            "config": { "scan_order": "subject", "expected_cases": ["ok", "gone"] },
            "cases": { "ok": "payload" }
        }"#;
        let err = CaseFile::parse(raw).unwrap().into_table(None).unwrap_err();
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn repeated_case_key_is_a_duplicate() {
        let raw = r#"{ "cases": { "a": "payload", "a": { "constant": 1 } } }"#;
        let err = CaseFile::parse(raw).unwrap().into_table(None).unwrap_err();
        let table_err = err.downcast_ref::<TableError>();
        assert!(matches!(table_err, Some(TableError::DuplicateCase(k)) if k.as_str() == "a"));
    }

    #[test]
    fn rejects_unknown_spec() {
        let raw = r#"{ "cases": { "ok": { "call": "x" } } }"#;
        let err = CaseFile::parse(raw).unwrap().into_table(None).unwrap_err();
        assert!(err.to_string().contains("'ok'"));
    }
}
