//! Domain model (case keys, case values, subjects, errors).

pub mod case_key;
pub mod case_value;
pub mod errors;
pub mod subject;

pub use self::case_key::CaseKey;
pub use self::case_value::{CaseHandler, CaseValue};
pub use self::errors::{MatchError, TableError};
pub use self::subject::Subject;
