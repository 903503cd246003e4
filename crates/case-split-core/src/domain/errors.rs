//! Errors - dispatch and table construction failures.

use thiserror::Error;

use super::case_key::CaseKey;

/// MatchError is returned by a dispatch.
///
/// The dispatcher never recovers from any of these; they go straight back to
/// the caller.
#[derive(Debug, Error)]
pub enum MatchError {
    /// No key of the subject is registered in the case table.
    /// `subject` is the compact JSON rendering of the subject.
    #[error("no case for {subject}")]
    NoMatchingCase { subject: String },

    /// A constant case was selected by a subject-order scan, which only
    /// invokes handlers.
    #[error("case '{0}' holds a constant, but subject-order scans only invoke handlers")]
    NotCallable(CaseKey),

    #[error("payload for case '{key}' could not be decoded: {source}")]
    Decode {
        key: CaseKey,
        #[source]
        source: serde_json::Error,
    },

    #[error("subject could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("subject must be a JSON object, found {0}")]
    NotARecord(&'static str),

    #[error("{0}")]
    Handler(String),
}

impl MatchError {
    pub fn handler(message: impl Into<String>) -> Self {
        Self::Handler(message.into())
    }
}

/// TableError covers case table construction.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("case '{0}' is already registered")]
    DuplicateCase(CaseKey),

    #[error("Missing cases: {0:?}. These cases were expected but not registered.")]
    MissingCases(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_matching_case_embeds_subject() {
        let err = MatchError::NoMatchingCase {
            subject: r#"{"z":2}"#.to_string(),
        };
        assert_eq!(err.to_string(), r#"no case for {"z":2}"#);
    }

    #[test]
    fn decode_error_keeps_source() {
        let source = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        let err = MatchError::Decode {
            key: CaseKey::new("count"),
            source,
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("'count'"));
    }
}
