//! Risk Report - ordered dataset name -> percentage mapping

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::constants::NO_DATA_MESSAGE;

#[derive(Debug, Clone, PartialEq)]
pub enum ReportValue {
    Percentage(f64),
    NoData,
}

impl std::fmt::Display for ReportValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportValue::Percentage(p) => write!(f, "{:.2}%", p),
            ReportValue::NoData => write!(f, "{}", NO_DATA_MESSAGE),
        }
    }
}

/// Entries keep insertion order; "Final Assessment" is inserted first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RiskReport {
    entries: Vec<(String, ReportValue)>,
}

impl RiskReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: ReportValue) {
        self.entries.push((key.into(), value));
    }

    pub fn get(&self, key: &str) -> Option<&ReportValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ReportValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for RiskReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, &value.to_string())?;
        }
        map.end()
    }
}
