use shared::error::{AppError, AppResult};

/// A scalar cell value crossing the repository/database boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Integer(i64),
    Text(String),
    Null,
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.into())
    }
}

/// One stored record: an ordered list of `(column, value)` pairs.
///
/// Column order is preserved from insertion, which keeps the SQL the
/// backends generate deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row(Vec<(String, Value)>);

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append, used by the repositories.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(column, value);
        self
    }

    pub fn push(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.0.push((column.into(), value.into()));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(column, _)| column.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.0.iter().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(column, value)| (column.as_str(), value))
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Typed accessor for an integer column.
    pub fn integer(&self, column: &str) -> AppResult<i64> {
        match self.get(column) {
            Some(Value::Integer(value)) => Ok(*value),
            Some(other) => Err(AppError::ConversionEntityError(format!(
                "column {column} holds {other:?}, expected an integer"
            ))),
            None => Err(AppError::ConversionEntityError(format!(
                "column {column} is missing"
            ))),
        }
    }

    /// Typed accessor for a text column.
    pub fn text(&self, column: &str) -> AppResult<&str> {
        match self.get(column) {
            Some(Value::Text(value)) => Ok(value),
            Some(other) => Err(AppError::ConversionEntityError(format!(
                "column {column} holds {other:?}, expected text"
            ))),
            None => Err(AppError::ConversionEntityError(format!(
                "column {column} is missing"
            ))),
        }
    }
}
