//! The type-hint index.
//!
//! Every type hint stripped from a specification class leaves a record
//! behind: either the fully-qualified type it resolved to, or the reason it
//! cannot back a double.  The index accumulates records across every class
//! rewritten during a run; the double generator reads them back with
//! [`TypeHintIndex::lookup`].
//!
//! Records are append-only.  Nothing is deduplicated; when the same
//! `(class, method, parameter)` is recorded twice, the later record wins on
//! lookup while both stay in the log.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;

use crate::error::InvalidTypeHint;
use crate::types::{InvalidTypeHintRecord, TypeHintRecord};

/// Receiver for the records produced by a rewrite.
pub trait TypeHintSink {
    fn add(&self, record: TypeHintRecord);
    fn add_invalid(&self, record: InvalidTypeHintRecord);
}

impl<T: TypeHintSink + ?Sized> TypeHintSink for Arc<T> {
    fn add(&self, record: TypeHintRecord) {
        (**self).add(record);
    }

    fn add_invalid(&self, record: InvalidTypeHintRecord) {
        (**self).add_invalid(record);
    }
}

/// Lookup key.  PHP class and method names are case-insensitive, parameter
/// names are not.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct IndexKey {
    class: String,
    method: String,
    parameter: String,
}

impl IndexKey {
    fn new(class: &str, method: &str, parameter: &str) -> Self {
        Self {
            class: class.trim_start_matches('\\').to_ascii_lowercase(),
            method: method.to_ascii_lowercase(),
            parameter: parameter.trim_start_matches('$').to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Valid(usize),
    Invalid(usize),
}

#[derive(Debug, Default)]
struct IndexInner {
    records: Vec<TypeHintRecord>,
    invalid: Vec<InvalidTypeHintRecord>,
    by_key: HashMap<IndexKey, Slot>,
}

/// A serialisable copy of the index contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexSnapshot {
    pub type_hints: Vec<TypeHintRecord>,
    pub invalid_type_hints: Vec<InvalidTypeHintRecord>,
}

/// In-memory, thread-safe [`TypeHintSink`].
#[derive(Debug, Default)]
pub struct TypeHintIndex {
    inner: RwLock<IndexInner>,
}

impl TypeHintIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// The declared type of a parameter.
    ///
    /// Returns `Ok(None)` when nothing was recorded (the parameter had no
    /// type hint, or its class was never rewritten), and `Err` when the
    /// type was recorded as unusable for a double.
    pub fn lookup(
        &self,
        class: &str,
        method: &str,
        parameter: &str,
    ) -> Result<Option<String>, InvalidTypeHint> {
        let inner = self.inner.read();
        match inner.by_key.get(&IndexKey::new(class, method, parameter)) {
            None => Ok(None),
            Some(Slot::Valid(i)) => Ok(Some(inner.records[*i].type_hint.clone())),
            Some(Slot::Invalid(i)) => {
                let record = &inner.invalid[*i];
                Err(InvalidTypeHint {
                    class: record.class.clone(),
                    method: record.method.clone(),
                    parameter: record.parameter.name.clone(),
                    reason: record.reason,
                })
            }
        }
    }

    /// Every successfully resolved record, in insertion order.
    pub fn records(&self) -> Vec<TypeHintRecord> {
        self.inner.read().records.clone()
    }

    /// Every rejected record, in insertion order.
    pub fn invalid_records(&self) -> Vec<InvalidTypeHintRecord> {
        self.inner.read().invalid.clone()
    }

    pub fn snapshot(&self) -> IndexSnapshot {
        let inner = self.inner.read();
        IndexSnapshot {
            type_hints: inner.records.clone(),
            invalid_type_hints: inner.invalid.clone(),
        }
    }

    /// Total number of records of either kind.
    pub fn len(&self) -> usize {
        let inner = self.inner.read();
        inner.records.len() + inner.invalid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TypeHintSink for TypeHintIndex {
    fn add(&self, record: TypeHintRecord) {
        let key = IndexKey::new(&record.class, &record.method, &record.parameter.name);
        let mut inner = self.inner.write();
        let slot = Slot::Valid(inner.records.len());
        inner.records.push(record);
        inner.by_key.insert(key, slot);
    }

    fn add_invalid(&self, record: InvalidTypeHintRecord) {
        let key = IndexKey::new(&record.class, &record.method, &record.parameter.name);
        let mut inner = self.inner.write();
        let slot = Slot::Invalid(inner.invalid.len());
        inner.invalid.push(record);
        inner.by_key.insert(key, slot);
    }
}
