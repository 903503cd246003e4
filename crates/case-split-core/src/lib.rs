//! case-split-core
//!
//! Tagged-union style dispatch over key-value records: a case table maps case
//! keys to constants or handlers, and a subject selects the case whose key it
//! owns.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（CaseKey, CaseValue, Subject, errors）
//! - **table**: CaseTable と CaseTableBuilder
//! - **dispatch**: ScanOrder, case_split, Matcher（カリー化）
//! - **typed**: 型付き Case API（Case trait, TypedCase）
//! - **config**: MatchConfig
//!
//! ```ignore
//! let cases = Arc::new(
//!     CaseTable::builder()
//!         .constant("a", json!(1))?
//!         .handler("b", |v| json!(v.as_i64().unwrap_or(0) + 1))?
//!         .build()?,
//! );
//!
//! let split = case_split(&cases, Some(&Subject::new().with("b", 5)))?;
//! assert_eq!(split.ready(), Some(json!(6)));
//! ```

pub mod config;
pub mod dispatch;
pub mod domain;
pub mod table;
pub mod typed;

pub use self::config::MatchConfig;
pub use self::dispatch::{case_split, Matcher, ScanOrder, Split};
pub use self::domain::{CaseHandler, CaseKey, CaseValue, MatchError, Subject, TableError};
pub use self::table::{CaseTable, CaseTableBuilder};
pub use self::typed::{Case, TypedCase};
