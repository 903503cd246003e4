//! CaseValue - what a case resolves to: a constant or a handler.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::errors::MatchError;

/// CaseHandler is the object-safe handler stored in a case table.
///
/// It receives the subject's payload at the matched key. Closures are adapted
/// through `CaseValue::handler` / `CaseValue::try_handler`, typed cases through
/// `typed::TypedCase`.
pub trait CaseHandler<R>: Send + Sync {
    fn handle(&self, payload: &Value) -> Result<R, MatchError>;
}

/// CaseValue is either a constant or a handler.
///
/// The variant decides how a matched case resolves; nothing is probed at
/// dispatch time.
pub enum CaseValue<R> {
    Constant(R),
    Handler(Arc<dyn CaseHandler<R>>),
}

impl<R> CaseValue<R> {
    pub fn constant(value: R) -> Self {
        Self::Constant(value)
    }

    /// Wraps an infallible closure.
    pub fn handler<F>(f: F) -> Self
    where
        F: Fn(&Value) -> R + Send + Sync + 'static,
        R: 'static,
    {
        Self::Handler(Arc::new(FnHandler(f)))
    }

    /// Wraps a closure that may fail; its error is returned from the dispatch as is.
    pub fn try_handler<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Result<R, MatchError> + Send + Sync + 'static,
        R: 'static,
    {
        Self::Handler(Arc::new(TryFnHandler(f)))
    }

    pub fn from_handler<H>(handler: H) -> Self
    where
        H: CaseHandler<R> + 'static,
    {
        Self::Handler(Arc::new(handler))
    }
}

impl<R: Clone> Clone for CaseValue<R> {
    fn clone(&self) -> Self {
        match self {
            Self::Constant(value) => Self::Constant(value.clone()),
            Self::Handler(handler) => Self::Handler(Arc::clone(handler)),
        }
    }
}

impl<R: fmt::Debug> fmt::Debug for CaseValue<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Self::Handler(_) => f.write_str("Handler(..)"),
        }
    }
}

struct FnHandler<F>(F);

impl<R, F> CaseHandler<R> for FnHandler<F>
where
    F: Fn(&Value) -> R + Send + Sync,
{
    fn handle(&self, payload: &Value) -> Result<R, MatchError> {
        Ok((self.0)(payload))
    }
}

struct TryFnHandler<F>(F);

impl<R, F> CaseHandler<R> for TryFnHandler<F>
where
    F: Fn(&Value) -> Result<R, MatchError> + Send + Sync,
{
    fn handle(&self, payload: &Value) -> Result<R, MatchError> {
        (self.0)(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn handler_receives_payload() {
        let value = CaseValue::handler(|v: &Value| v.as_i64().unwrap_or(0) + 1);
        let CaseValue::Handler(h) = value else {
            panic!("expected handler");
        };
        assert_eq!(h.handle(&json!(5)).unwrap(), 6);
    }

    #[test]
    fn try_handler_propagates_error() {
        let value: CaseValue<i64> =
            CaseValue::try_handler(|_| Err(MatchError::handler("refused")));
        let CaseValue::Handler(h) = value else {
            panic!("expected handler");
        };
        let err = h.handle(&Value::Null).unwrap_err();
        assert_eq!(err.to_string(), "refused");
    }

    #[test]
    fn debug_hides_handler_body() {
        let constant = CaseValue::constant(1);
        let handler = CaseValue::handler(|_| 2);
        assert_eq!(format!("{constant:?}"), "Constant(1)");
        assert_eq!(format!("{handler:?}"), "Handler(..)");
    }
}
