use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use crate::document::Document;
use crate::store::{ContentStore, LoadDocumentsError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Error)]
pub enum FindContentError {
    #[error("LoadDocuments: {source}")]
    LoadDocuments {
        #[from]
        source: LoadDocumentsError,
    },
}

/// Builder over a `ContentStore`, consumed by `find`.
#[derive(Debug, Clone)]
pub struct ContentQuery<'a> {
    store: &'a ContentStore,
    filters: Vec<(String, Value)>,
    sorts: Vec<(String, Direction)>,
    skip: usize,
    limit: Option<usize>,
}

impl<'a> ContentQuery<'a> {
    pub(crate) fn new(store: &'a ContentStore) -> Self {
        Self {
            store,
            filters: Vec::new(),
            sorts: Vec::new(),
            skip: 0,
            limit: None,
        }
    }

    /// Keeps documents whose `field` equals `value`. A missing field never matches.
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    /// Adds a sort key. Keys apply in the order they were added.
    pub fn sort(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.sorts.push((field.into(), direction));
        self
    }

    pub fn skip(mut self, n: usize) -> Self {
        self.skip = n;
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn find(self) -> Result<Vec<Document>, FindContentError> {
        let documents = self.store.load_documents()?;
        Ok(self.apply(documents))
    }

    /// Runs filter, sort and paging over already loaded documents.
    pub fn apply(&self, documents: Vec<Document>) -> Vec<Document> {
        let mut matched: Vec<Document> = documents
            .into_iter()
            .filter(|doc| {
                self.filters
                    .iter()
                    .all(|(field, value)| doc.get(field) == Some(value))
            })
            .collect();

        // `sort_by` is stable, so ties keep load order.
        matched.sort_by(|a, b| {
            self.sorts
                .iter()
                .map(|(field, direction)| compare_field(a.get(field), b.get(field), *direction))
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        });

        let paged = matched.into_iter().skip(self.skip);
        match self.limit {
            Some(limit) => paged.take(limit).collect(),
            None => paged.collect(),
        }
    }
}

/// Missing and null values sort last in either direction.
fn compare_field(a: Option<&Value>, b: Option<&Value>, direction: Direction) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match direction {
            Direction::Ascending => compare_values(a, b),
            Direction::Descending => compare_values(a, b).reverse(),
        },
    }
}

/// Total order: values rank by tier first, timestamp strings sitting between
/// numbers and plain strings, then compare within their tier.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    let (a_time, b_time) = (as_timestamp(a), as_timestamp(b));
    let rank = type_rank(a, a_time.is_some()).cmp(&type_rank(b, b_time.is_some()));
    if rank.is_ne() {
        return rank;
    }

    if let (Some(a), Some(b)) = (a_time, b_time) {
        return a.cmp(&b);
    }

    match (a, b) {
        (Value::Number(a), Value::Number(b)) => {
            let (a, b) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
            a.total_cmp(&b)
        }
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}

fn type_rank(value: &Value, is_timestamp: bool) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) if is_timestamp => 3,
        Value::String(_) => 4,
        Value::Array(_) => 5,
        Value::Object(_) => 6,
    }
}

fn as_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let s = value.as_str()?;

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
}
