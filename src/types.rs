use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::{ColumnMeta, Value};

/// One projected result row.
#[derive(Clone, Debug, PartialEq)]
pub enum Record {
    /// Values in column order.
    Positional(Vec<Value>),
    /// Values keyed by column label, in column order.
    Named(Vec<(String, Value)>),
}

impl Record {
    /// Returns a value by column label. Always `None` for positional records.
    pub fn get(&self, label: &str) -> Option<&Value> {
        match self {
            Self::Positional(_) => None,
            Self::Named(entries) => entries
                .iter()
                .find(|(name, _)| name == label)
                .map(|(_, value)| value),
        }
    }

    /// Returns a value by position.
    pub fn at(&self, index: usize) -> Option<&Value> {
        match self {
            Self::Positional(values) => values.get(index),
            Self::Named(entries) => entries.get(index).map(|(_, value)| value),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Positional(values) => values.len(),
            Self::Named(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Positional(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            Self::Named(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (label, value) in entries {
                    map.serialize_entry(label, value)?;
                }
                map.end()
            }
        }
    }
}

/// Per-statement outcome of a batch execution.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert_id: Option<Value>,
}

/// Formatted response; only the parts the remote side returned are present.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_metadata: Option<Vec<ColumnMeta>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_records_updated: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<Record>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_results: Option<Vec<UpdateResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert_id: Option<Value>,
}
