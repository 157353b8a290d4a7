//! Core types for IPL Plots: records, values and the error taxonomy.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

pub type Season = i64;
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

/// A single cell. CSV input always arrives as `Text`; numeric variants exist
/// for records built in code.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Int(i64),
    Float(f64),
}

impl Value {
    pub fn as_text(&self) -> std::borrow::Cow<'_, str> {
        match self {
            Value::Text(s) => std::borrow::Cow::Borrowed(s.as_str()),
            Value::Int(i) => std::borrow::Cow::Owned(i.to_string()),
            Value::Float(f) => std::borrow::Cow::Owned(f.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

/// One row of an external table. Rows read from the same file share their
/// header list.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    headers: Arc<[String]>,
    values: Vec<Value>,
}

impl Record {
    pub fn new(headers: Arc<[String]>, values: Vec<Value>) -> Self {
        Self { headers, values }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let (headers, values): (Vec<String>, Vec<Value>) = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .unzip();
        Self { headers: headers.into(), values }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Looks up a field. Rows shorter than their header simply lack the
    /// trailing fields.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.headers
            .iter()
            .position(|h| h == field)
            .and_then(|idx| self.values.get(idx))
    }

    pub fn value(&self, field: &str) -> Result<&Value> {
        self.get(field).ok_or_else(|| CoreError::MissingField {
            field: field.to_string(),
        })
    }

    pub fn text(&self, field: &str) -> Result<std::borrow::Cow<'_, str>> {
        self.value(field).map(Value::as_text)
    }

    pub fn int(&self, field: &str) -> Result<i64> {
        match self.value(field)? {
            Value::Int(i) => Ok(*i),
            Value::Float(f) if f.fract() == 0.0 => Ok(*f as i64),
            Value::Text(s) => s.trim().parse().map_err(|_| CoreError::Value {
                field: field.to_string(),
                value: s.clone(),
            }),
            other => Err(CoreError::Value {
                field: field.to_string(),
                value: other.to_string(),
            }),
        }
    }

    pub fn float(&self, field: &str) -> Result<f64> {
        match self.value(field)? {
            Value::Int(i) => Ok(*i as f64),
            Value::Float(f) => Ok(*f),
            Value::Text(s) => s.trim().parse().map_err(|_| CoreError::Value {
                field: field.to_string(),
                value: s.clone(),
            }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.headers.iter().map(String::as_str).zip(self.values.iter())
    }
}

/// Coarse classification of [`CoreError`], used by callers that branch on
/// the kind of failure rather than its details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingField,
    Value,
    Range,
    EmptyResult,
    Io,
}

#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    #[error("record is missing field `{field}`")]
    MissingField { field: String },
    #[error("field `{field}` is not numeric: {value:?}")]
    Value { field: String, value: String },
    #[error("limit must be non-negative, got {limit}")]
    Range { limit: i64 },
    #[error("nothing to plot: {0}")]
    EmptyResult(String),
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("csv error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::MissingField { .. } => ErrorKind::MissingField,
            CoreError::Value { .. } => ErrorKind::Value,
            CoreError::Range { .. } => ErrorKind::Range,
            CoreError::EmptyResult(_) => ErrorKind::EmptyResult,
            CoreError::Io { .. } | CoreError::Csv { .. } => ErrorKind::Io,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CoreError::Io { path: path.into(), source }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        CoreError::Csv { path: path.into(), source }
    }
}

pub mod deliveries;
pub mod matches;
pub mod umpires;
