//! CaseTable - ordered registry of cases, and its builder.
//!
//! # 設計
//! - 構築時は mutable（builder / insert）
//! - dispatch 時は immutable（`Arc<CaseTable<R>>` で共有）
//! - 二重登録はエラー、期待される case の不足は build() 時に検出（Fail-fast）

use std::collections::HashMap;

use serde_json::Value;

use crate::dispatch::ScanOrder;
use crate::domain::{CaseHandler, CaseKey, CaseValue, MatchError, TableError};
use crate::typed::{Case, TypedCase};

/// CaseTable maps case keys to constants or handlers.
///
/// Insertion order is kept: it is the scan order for `ScanOrder::CaseTable`.
pub struct CaseTable<R> {
    cases: Vec<(CaseKey, CaseValue<R>)>,
    index: HashMap<CaseKey, usize>,
    scan_order: ScanOrder,
}

impl<R> CaseTable<R> {
    pub fn new() -> Self {
        Self {
            cases: Vec::new(),
            index: HashMap::new(),
            scan_order: ScanOrder::default(),
        }
    }

    pub fn builder() -> CaseTableBuilder<R> {
        CaseTableBuilder::new()
    }

    /// Register a case. A key can be registered only once.
    pub fn insert(
        &mut self,
        key: impl Into<CaseKey>,
        value: CaseValue<R>,
    ) -> Result<(), TableError> {
        let key = key.into();
        if self.index.contains_key(&key) {
            return Err(TableError::DuplicateCase(key));
        }
        self.index.insert(key.clone(), self.cases.len());
        self.cases.push((key, value));
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&CaseValue<R>> {
        self.entry(key).map(|(_, value)| value)
    }

    pub(crate) fn entry(&self, key: &str) -> Option<(&CaseKey, &CaseValue<R>)> {
        self.index.get(key).map(|&i| {
            let (key, value) = &self.cases[i];
            (key, value)
        })
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CaseKey, &CaseValue<R>)> {
        self.cases.iter().map(|(key, value)| (key, value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &CaseKey> {
        self.cases.iter().map(|(key, _)| key)
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn scan_order(&self) -> ScanOrder {
        self.scan_order
    }

    pub fn with_scan_order(mut self, scan_order: ScanOrder) -> Self {
        self.scan_order = scan_order;
        self
    }
}

impl<R> Default for CaseTable<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Clone> Clone for CaseTable<R> {
    fn clone(&self) -> Self {
        Self {
            cases: self.cases.clone(),
            index: self.index.clone(),
            scan_order: self.scan_order,
        }
    }
}

impl<R: std::fmt::Debug> std::fmt::Debug for CaseTable<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaseTable")
            .field("cases", &self.cases)
            .field("scan_order", &self.scan_order)
            .finish()
    }
}

/// CaseTableBuilder はケース表を構築
///
/// # 使用例
/// ```ignore
/// let table = CaseTable::builder()
///     .constant("a", 1)?
///     .handler("b", |v| v.as_i64().unwrap_or(0) + 1)?
///     .expect_cases(&["a", "b"])
///     .build()?;
/// ```
///
/// Registration errors surface immediately; missing expected cases surface in
/// `build()`.
pub struct CaseTableBuilder<R> {
    table: CaseTable<R>,
    expected_cases: Option<Vec<String>>,
}

impl<R> CaseTableBuilder<R> {
    pub fn new() -> Self {
        Self {
            table: CaseTable::new(),
            expected_cases: None,
        }
    }

    pub fn case(mut self, key: impl Into<CaseKey>, value: CaseValue<R>) -> Result<Self, TableError> {
        self.table.insert(key, value)?;
        Ok(self)
    }

    pub fn constant(self, key: impl Into<CaseKey>, value: R) -> Result<Self, TableError> {
        self.case(key, CaseValue::Constant(value))
    }

    pub fn handler<F>(self, key: impl Into<CaseKey>, f: F) -> Result<Self, TableError>
    where
        F: Fn(&Value) -> R + Send + Sync + 'static,
        R: 'static,
    {
        self.case(key, CaseValue::handler(f))
    }

    pub fn try_handler<F>(self, key: impl Into<CaseKey>, f: F) -> Result<Self, TableError>
    where
        F: Fn(&Value) -> Result<R, MatchError> + Send + Sync + 'static,
        R: 'static,
    {
        self.case(key, CaseValue::try_handler(f))
    }

    pub fn from_handler<H>(self, key: impl Into<CaseKey>, handler: H) -> Result<Self, TableError>
    where
        H: CaseHandler<R> + 'static,
    {
        self.case(key, CaseValue::from_handler(handler))
    }

    /// Registers a typed case under `T::KEY`; the payload is decoded into `T`.
    pub fn on<T, F>(self, f: F) -> Result<Self, TableError>
    where
        T: Case,
        F: Fn(T) -> R + Send + Sync + 'static,
        R: 'static,
    {
        self.from_handler(T::KEY, TypedCase::<T, F>::new(f))
    }

    pub fn scan_order(mut self, scan_order: ScanOrder) -> Self {
        self.table.scan_order = scan_order;
        self
    }

    /// Declares case keys that `build()` requires to be registered.
    pub fn expect_cases(mut self, keys: &[&str]) -> Self {
        self.expected_cases = Some(keys.iter().map(|k| k.to_string()).collect());
        self
    }

    pub fn build(self) -> Result<CaseTable<R>, TableError> {
        if let Some(expected) = self.expected_cases {
            let missing: Vec<String> = expected
                .into_iter()
                .filter(|key| !self.table.contains_key(key))
                .collect();
            if !missing.is_empty() {
                return Err(TableError::MissingCases(missing));
            }
        }
        Ok(self.table)
    }
}

impl<R> Default for CaseTableBuilder<R> {
    fn default() -> Self {
        Self::new()
    }
}
