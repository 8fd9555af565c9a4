//! Record - ordered field -> optional scalar mapping
//!
//! Used for dataset rows and for partial query input alike.
//! Field order is insertion order and is preserved by every operation.

use serde::{Deserialize, Serialize};

// ============================================================================
// VALUE
// ============================================================================

/// Scalar cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    /// Parse a raw cell: numbers become `Number`, anything else `Text`
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(n) => Value::Number(n),
            Err(_) => Value::Text(trimmed.to_string()),
        }
    }

    /// Numeric view of the value; text is parsed on demand
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// NaN counts as missing
    pub fn is_nan(&self) -> bool {
        matches!(self, Value::Number(n) if n.is_nan())
    }

    /// Key used for frequency tables and one-hot columns
    pub fn category_key(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // Below 1e15 every whole f64 fits an i64 exactly
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

/// True when the cell is absent or NaN
pub fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None => true,
        Some(v) => v.is_nan(),
    }
}

// ============================================================================
// RECORD
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    fields: Vec<(String, Option<Value>)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, keeping its original position if it already exists
    pub fn set(&mut self, name: impl Into<String>, value: Option<Value>) {
        let name = name.into();
        if let Some(slot) = self.fields.iter_mut().find(|(k, _)| *k == name) {
            slot.1 = value;
        } else {
            self.fields.push((name, value));
        }
    }

    /// Builder-style `set`
    pub fn with(mut self, name: impl Into<String>, value: Option<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Present value of a field; absent fields and explicit nulls both yield `None`
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .and_then(|(_, v)| v.as_ref())
    }

    /// Rename a field in place; an existing field named `to` is replaced
    pub fn rename(&mut self, from: &str, to: &str) {
        if from == to || !self.contains(from) {
            return;
        }
        self.fields.retain(|(k, _)| k != to);
        if let Some(slot) = self.fields.iter_mut().find(|(k, _)| k == from) {
            slot.0 = to.to_string();
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == name)
    }

    /// Fields in insertion order, including explicit nulls
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True when any field is absent or NaN
    pub fn has_missing(&self) -> bool {
        self.fields.iter().any(|(_, v)| is_missing(v.as_ref()))
    }
}

impl FromIterator<(String, Option<Value>)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Option<Value>)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.set(k, v);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_parse() {
        assert_eq!(Value::parse(" 42 "), Value::Number(42.0));
        assert_eq!(Value::parse("abc"), Value::Text("abc".to_string()));
        assert_eq!(Value::Text("1.5".to_string()).as_number(), Some(1.5));
    }

    #[test]
    fn test_record_keeps_order_on_overwrite() {
        let mut record = Record::new()
            .with("b", Some(1.0.into()))
            .with("a", None);
        record.set("b", Some(2.0.into()));

        let names: Vec<_> = record.field_names().collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(record.get("b"), Some(&Value::Number(2.0)));
        assert!(record.contains("a"));
        assert_eq!(record.get("a"), None);
    }

    #[test]
    fn test_rename_keeps_position() {
        let mut record = Record::new()
            .with("age", Some(40.0.into()))
            .with("class", Some("positive".into()))
            .with("ckd", None);
        record.rename("class", "ckd");
        record.rename("missing", "x");

        let names: Vec<_> = record.field_names().collect();
        assert_eq!(names, vec!["age", "ckd"]);
        assert_eq!(record.get("ckd"), Some(&Value::from("positive")));
    }

    #[test]
    fn test_category_key_of_large_whole_numbers() {
        assert_eq!(Value::Number(80.0).category_key(), "80");
        assert_eq!(Value::Number(-3.0).category_key(), "-3");
        let a = Value::Number(1e19).category_key();
        let b = Value::Number(2e19).category_key();
        assert_ne!(a, b);
        assert_ne!(a, i64::MAX.to_string());
    }

    #[test]
    fn test_nan_is_missing() {
        assert!(is_missing(Some(&Value::Number(f64::NAN))));
        assert!(is_missing(None));
        assert!(!is_missing(Some(&Value::Number(0.0))));
    }
}
