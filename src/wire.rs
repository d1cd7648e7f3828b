use serde::{Deserialize, Serialize};

use crate::Value;

/// One of the eight variant keys the Data API wraps every value in.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Tag {
    Array,
    Blob,
    Boolean,
    Double,
    Null,
    Long,
    String,
    Struct,
}

impl Tag {
    pub const ALL: [Tag; 8] = [
        Tag::Array,
        Tag::Blob,
        Tag::Boolean,
        Tag::Double,
        Tag::Null,
        Tag::Long,
        Tag::String,
        Tag::Struct,
    ];

    pub fn wire_key(self) -> &'static str {
        match self {
            Self::Array => "arrayValue",
            Self::Blob => "blobValue",
            Self::Boolean => "booleanValue",
            Self::Double => "doubleValue",
            Self::Null => "isNull",
            Self::Long => "longValue",
            Self::String => "stringValue",
            Self::Struct => "structValue",
        }
    }

    pub fn from_wire_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.wire_key() == key)
    }
}

/// A value wrapped in its single-key wire variant, e.g. `{"longValue": 42}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TaggedValue {
    #[serde(rename = "arrayValue")]
    Array(ArrayValue),
    #[serde(rename = "blobValue", with = "base64_bytes")]
    Blob(Vec<u8>),
    #[serde(rename = "booleanValue")]
    Boolean(bool),
    #[serde(rename = "doubleValue")]
    Double(f64),
    /// Always sent as `{"isNull": true}`.
    #[serde(rename = "isNull")]
    Null(bool),
    #[serde(rename = "longValue")]
    Long(i64),
    #[serde(rename = "stringValue")]
    String(String),
    #[serde(rename = "structValue")]
    Struct(serde_json::Value),
}

impl TaggedValue {
    pub fn null() -> Self {
        Self::Null(true)
    }

    pub fn tag(&self) -> Tag {
        match self {
            Self::Array(_) => Tag::Array,
            Self::Blob(_) => Tag::Blob,
            Self::Boolean(_) => Tag::Boolean,
            Self::Double(_) => Tag::Double,
            Self::Null(_) => Tag::Null,
            Self::Long(_) => Tag::Long,
            Self::String(_) => Tag::String,
            Self::Struct(_) => Tag::Struct,
        }
    }

    /// Unwraps the variant into a native value.
    pub fn into_value(self) -> Value {
        match self {
            Self::Array(array) => array.into_value(),
            Self::Blob(bytes) => Value::Blob(bytes),
            Self::Boolean(value) => Value::Bool(value),
            Self::Double(value) => Value::Float(value),
            Self::Null(_) => Value::Null,
            Self::Long(value) => Value::Integer(value),
            Self::String(value) => Value::Text(value),
            Self::Struct(json) => Value::from(json),
        }
    }
}

/// Homogeneous array payload of an `arrayValue`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ArrayValue {
    #[serde(rename = "arrayValues")]
    Arrays(Vec<ArrayValue>),
    #[serde(rename = "booleanValues")]
    Booleans(Vec<bool>),
    #[serde(rename = "doubleValues")]
    Doubles(Vec<f64>),
    #[serde(rename = "longValues")]
    Longs(Vec<i64>),
    #[serde(rename = "stringValues")]
    Strings(Vec<String>),
}

impl ArrayValue {
    pub fn into_value(self) -> Value {
        let values = match self {
            Self::Arrays(arrays) => arrays.into_iter().map(Self::into_value).collect(),
            Self::Booleans(values) => values.into_iter().map(Value::Bool).collect(),
            Self::Doubles(values) => values.into_iter().map(Value::Float).collect(),
            Self::Longs(values) => values.into_iter().map(Value::Integer).collect(),
            Self::Strings(values) => values.into_iter().map(Value::Text).collect(),
        };
        Value::Array(values)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TypeHint {
    Timestamp,
}

/// A named, tagged statement parameter.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    pub value: TaggedValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_hint: Option<TypeHint>,
    /// SQL type the placeholder should be cast to; see [`crate::Engine::cast_placeholder`].
    #[serde(skip)]
    pub cast: Option<String>,
}

/// Formatted parameters for one execution or for a batch.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParameterList {
    Single(Vec<Parameter>),
    Batch(Vec<Vec<Parameter>>),
}

impl ParameterList {
    pub fn is_batch(&self) -> bool {
        matches!(self, Self::Batch(_))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(params) => params.is_empty(),
            Self::Batch(sets) => sets.is_empty(),
        }
    }
}

impl Default for ParameterList {
    fn default() -> Self {
        Self::Single(Vec::new())
    }
}

/// A field as returned by the remote side.
///
/// `isNull: true` wins over any tag that may also be present.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawField {
    pub is_null: Option<bool>,
    pub array_value: Option<ArrayValue>,
    #[serde(default, deserialize_with = "base64_bytes::deserialize_option")]
    pub blob_value: Option<Vec<u8>>,
    pub boolean_value: Option<bool>,
    pub double_value: Option<f64>,
    pub long_value: Option<i64>,
    pub string_value: Option<String>,
    pub struct_value: Option<serde_json::Value>,
}

impl RawField {
    pub fn is_null_marked(&self) -> bool {
        self.is_null == Some(true)
    }

    /// First tag carrying a non-null payload.
    pub fn present_tag(&self) -> Option<Tag> {
        [
            (Tag::Array, self.array_value.is_some()),
            (Tag::Blob, self.blob_value.is_some()),
            (Tag::Boolean, self.boolean_value.is_some()),
            (Tag::Double, self.double_value.is_some()),
            (Tag::Long, self.long_value.is_some()),
            (Tag::String, self.string_value.is_some()),
            (Tag::Struct, self.struct_value.is_some()),
        ]
        .into_iter()
        .find_map(|(tag, present)| present.then_some(tag))
    }

    /// Unwraps the payload stored under `tag`, or `Null` when it is absent.
    pub fn into_value(self, tag: Tag) -> Value {
        let value = match tag {
            Tag::Array => self.array_value.map(ArrayValue::into_value),
            Tag::Blob => self.blob_value.map(Value::Blob),
            Tag::Boolean => self.boolean_value.map(Value::Bool),
            Tag::Double => self.double_value.map(Value::Float),
            Tag::Null => None,
            Tag::Long => self.long_value.map(Value::Integer),
            Tag::String => self.string_value.map(Value::Text),
            Tag::Struct => self.struct_value.map(Value::from),
        };
        value.unwrap_or(Value::Null)
    }
}

impl From<TaggedValue> for RawField {
    fn from(value: TaggedValue) -> Self {
        let mut field = Self::default();
        match value {
            TaggedValue::Array(array) => field.array_value = Some(array),
            TaggedValue::Blob(bytes) => field.blob_value = Some(bytes),
            TaggedValue::Boolean(value) => field.boolean_value = Some(value),
            TaggedValue::Double(value) => field.double_value = Some(value),
            TaggedValue::Null(marker) => field.is_null = Some(marker),
            TaggedValue::Long(value) => field.long_value = Some(value),
            TaggedValue::String(value) => field.string_value = Some(value),
            TaggedValue::Struct(json) => field.struct_value = Some(json),
        }
        field
    }
}

/// Column description supplied alongside result rows.
///
/// Keys other than `label` and `typeName` are kept so metadata can be echoed back verbatim.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMeta {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub type_name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ColumnMeta {
    pub fn new(label: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            type_name: type_name.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Payload of an `executeStatement` or `batchExecuteStatement` response.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResult {
    pub column_metadata: Option<Vec<ColumnMeta>>,
    pub number_of_records_updated: Option<i64>,
    pub records: Option<Vec<Vec<RawField>>>,
    pub generated_fields: Option<Vec<RawField>>,
    pub update_results: Option<Vec<RawUpdateResult>>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUpdateResult {
    #[serde(default)]
    pub generated_fields: Vec<RawField>,
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S, T>(bytes: T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: AsRef<[u8]>,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(de::Error::custom)
    }

    pub fn deserialize_option<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|encoded| STANDARD.decode(encoded).map_err(de::Error::custom))
            .transpose()
    }
}
