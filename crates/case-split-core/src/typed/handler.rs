//! TypedCase - `Fn(T) -> R` を `CaseHandler<R>` に変換する
//!
//! # 学習ポイント
//! - Type erasure パターン (TypedCase<T, F> → dyn CaseHandler<R>)
//! - `PhantomData<fn(T)>` は T を所有しないので Send/Sync に影響しない

use std::marker::PhantomData;

use serde_json::Value;

use super::case::Case;
use crate::domain::{CaseHandler, CaseKey, MatchError};

pub struct TypedCase<T: Case, F> {
    f: F,
    _marker: PhantomData<fn(T)>,
}

impl<T: Case, F> TypedCase<T, F> {
    pub fn new(f: F) -> Self {
        Self {
            f,
            _marker: PhantomData,
        }
    }
}

impl<T, F, R> CaseHandler<R> for TypedCase<T, F>
where
    T: Case,
    F: Fn(T) -> R + Send + Sync,
{
    fn handle(&self, payload: &Value) -> Result<R, MatchError> {
        let case: T =
            serde_json::from_value(payload.clone()).map_err(|source| MatchError::Decode {
                key: CaseKey::new(T::KEY),
                source,
            })?;
        Ok((self.f)(case))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::ScanOrder;
    use crate::domain::Subject;
    use crate::table::CaseTable;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Charged {
        amount: u64,
    }

    impl Case for Charged {
        const KEY: &'static str = "charged";
    }

    #[derive(Debug, Deserialize)]
    struct Refunded(String);

    impl Case for Refunded {
        const KEY: &'static str = "refunded";
    }

    fn ledger() -> CaseTable<String> {
        CaseTable::builder()
            .on::<Charged, _>(|c| format!("charged {}", c.amount))
            .unwrap()
            .on::<Refunded, _>(|Refunded(reason)| format!("refunded: {reason}"))
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn typed_handler_decodes_payload() {
        let handler = TypedCase::<Charged, _>::new(|c: Charged| c.amount * 2);
        assert_eq!(handler.handle(&json!({ "amount": 21 })).unwrap(), 42);
    }

    #[test]
    fn typed_cases_dispatch_by_key() {
        let table = ledger();
        let subject = Subject::new().with("refunded", "duplicate");
        assert_eq!(table.split(&subject).unwrap(), "refunded: duplicate");

        let subject = Subject::new().with("charged", json!({ "amount": 7 }));
        assert_eq!(table.split(&subject).unwrap(), "charged 7");
    }

    #[test]
    fn decode_failure_names_the_case() {
        let table = ledger().with_scan_order(ScanOrder::Subject);
        let subject = Subject::new().with("charged", json!({ "amount": "lots" }));
        let err = table.split(&subject).unwrap_err();
        assert!(matches!(&err, MatchError::Decode { key, .. } if key.as_str() == "charged"));
    }

    #[test]
    fn typed_case_key_collides_with_plain_registration() {
        let result = CaseTable::<String>::builder()
            .constant("charged", "flat".to_string())
            .unwrap()
            .on::<Charged, _>(|c| c.amount.to_string());
        assert!(result.is_err());
    }
}
