//! Dispatch - select the matching case of a subject and resolve it.
//!
//! # Scan order
//! - `ScanOrder::CaseTable`（既定）: ケース表の登録順に走査。Constant はそのまま返す。
//! - `ScanOrder::Subject`: subject のキー順に走査。Handler のみ呼び出し可能。
//!
//! The two orders only differ when a subject owns more than one registered
//! key, or when a constant is selected.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use crate::domain::{CaseKey, CaseValue, MatchError, Subject};
use crate::table::CaseTable;

/// Which mapping drives the scan for the first shared key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanOrder {
    /// Walk the case table's keys in registration order.
    #[default]
    CaseTable,

    /// Walk the subject's keys in insertion order. Selected cases must be handlers.
    Subject,
}

impl fmt::Display for ScanOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanOrder::CaseTable => f.write_str("case_table"),
            ScanOrder::Subject => f.write_str("subject"),
        }
    }
}

/// Result of `case_split`: a value, or a matcher waiting for its subject.
pub enum Split<R> {
    Ready(R),
    Deferred(Matcher<R>),
}

impl<R> Split<R> {
    pub fn ready(self) -> Option<R> {
        match self {
            Split::Ready(value) => Some(value),
            Split::Deferred(_) => None,
        }
    }

    pub fn into_matcher(self) -> Option<Matcher<R>> {
        match self {
            Split::Ready(_) => None,
            Split::Deferred(matcher) => Some(matcher),
        }
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Split::Deferred(_))
    }
}

impl<R: fmt::Debug> fmt::Debug for Split<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Split::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Split::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

/// Dispatches `subject` against `cases`.
///
/// With `None`, nothing is scanned and a `Matcher` bound to `cases` is
/// returned; calling it later gives the same result as passing the subject
/// here.
pub fn case_split<R: Clone>(
    cases: &Arc<CaseTable<R>>,
    subject: Option<&Subject>,
) -> Result<Split<R>, MatchError> {
    match subject {
        None => Ok(Split::Deferred(Matcher::new(Arc::clone(cases)))),
        Some(subject) => cases.split(subject).map(Split::Ready),
    }
}

impl<R: Clone> CaseTable<R> {
    /// Dispatches immediately.
    pub fn split(&self, subject: &Subject) -> Result<R, MatchError> {
        let order = self.scan_order();
        let Some((key, value, payload)) = self.select(subject) else {
            debug!(subject = %subject, %order, "no case matched");
            return Err(MatchError::NoMatchingCase {
                subject: subject.to_string(),
            });
        };
        debug!(case = %key, %order, "case selected");

        match (value, order) {
            (CaseValue::Constant(constant), ScanOrder::CaseTable) => Ok(constant.clone()),
            (CaseValue::Constant(_), ScanOrder::Subject) => {
                Err(MatchError::NotCallable(key.clone()))
            }
            (CaseValue::Handler(handler), _) => handler.handle(payload),
        }
    }

    /// First (key, case, payload) shared by the table and the subject.
    fn select<'t, 's>(
        &'t self,
        subject: &'s Subject,
    ) -> Option<(&'t CaseKey, &'t CaseValue<R>, &'s Value)> {
        match self.scan_order() {
            ScanOrder::CaseTable => self.iter().find_map(|(key, value)| {
                subject.get(key.as_str()).map(|payload| (key, value, payload))
            }),
            ScanOrder::Subject => subject.iter().find_map(|(name, payload)| {
                self.entry(name).map(|(key, value)| (key, value, payload))
            }),
        }
    }
}

/// Matcher is a case table waiting for its subject.
///
/// Cloning is cheap; the table is shared.
pub struct Matcher<R> {
    cases: Arc<CaseTable<R>>,
}

impl<R> Matcher<R> {
    pub fn new(cases: Arc<CaseTable<R>>) -> Self {
        trace!(cases = cases.len(), order = %cases.scan_order(), "matcher created");
        Self { cases }
    }
}

impl<R: Clone> Matcher<R> {
    pub fn call(&self, subject: &Subject) -> Result<R, MatchError> {
        self.cases.split(subject)
    }

    /// Turns the matcher into a plain closure.
    pub fn into_fn(self) -> impl Fn(&Subject) -> Result<R, MatchError> + Send + Sync
    where
        R: Send + Sync,
    {
        move |subject| self.call(subject)
    }
}

impl<R> Clone for Matcher<R> {
    fn clone(&self) -> Self {
        Self {
            cases: Arc::clone(&self.cases),
        }
    }
}

impl<R> From<Arc<CaseTable<R>>> for Matcher<R> {
    fn from(cases: Arc<CaseTable<R>>) -> Self {
        Self::new(cases)
    }
}
