use crate::{CodecError, Result, Value};

/// SQL parameter input.
///
/// Accepts a single object of name/value pairs, an array of such objects (merged in order),
/// or an array of arrays for a batch. Objects shaped exactly like `{name, value}` or
/// `{name, value, cast}` are taken as one parameter instead of being split.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Params(Option<Value>);

impl Params {
    /// No bound parameters.
    pub fn none() -> Self {
        Self(None)
    }

    /// Builds one parameter set from name/value pairs.
    pub fn named<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self(Some(Value::object(pairs)))
    }

    /// Builds a batch: one parameter set per item, executed against the same SQL.
    pub fn batch<I, P>(sets: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Params>,
    {
        let sets = sets
            .into_iter()
            .map(|set| match set.into().0 {
                None => Value::Array(Vec::new()),
                Some(Value::Array(members)) => Value::Array(members),
                Some(member) => Value::Array(vec![member]),
            })
            .collect();
        Self(Some(Value::Array(sets)))
    }

    /// Builds a single parameter in its explicit `{name, value[, cast]}` shape.
    pub fn parameter(name: impl Into<String>, value: impl Into<Value>, cast: Option<&str>) -> Self {
        let mut entries = vec![
            ("name".to_owned(), Value::Text(name.into())),
            ("value".to_owned(), value.into()),
        ];
        if let Some(cast) = cast {
            entries.push(("cast".to_owned(), Value::text(cast)));
        }
        Self(Some(Value::Object(entries)))
    }
}

impl From<()> for Params {
    fn from(_: ()) -> Self {
        Self::default()
    }
}

impl From<Value> for Params {
    fn from(value: Value) -> Self {
        Self(Some(value))
    }
}

impl From<serde_json::Value> for Params {
    fn from(value: serde_json::Value) -> Self {
        Self(Some(value.into()))
    }
}

impl From<Vec<Value>> for Params {
    fn from(values: Vec<Value>) -> Self {
        Self(Some(Value::Array(values)))
    }
}

impl From<Vec<(String, Value)>> for Params {
    fn from(pairs: Vec<(String, Value)>) -> Self {
        Self(Some(Value::Object(pairs)))
    }
}

impl<const N: usize> From<[(&str, Value); N]> for Params {
    fn from(pairs: [(&str, Value); N]) -> Self {
        Self::named(pairs)
    }
}

/// Parameter input after its shape has been decided.
#[derive(Debug, PartialEq)]
pub(crate) enum Shape {
    Empty,
    Single(Vec<Value>),
    Batch(Vec<Vec<Value>>),
}

/// A single parameter before type inference.
#[derive(Debug, PartialEq)]
pub(crate) struct NamedValue {
    pub name: String,
    pub value: Value,
    pub cast: Option<String>,
}

pub(crate) fn extract(params: Params) -> Result<Shape> {
    let shape = match params.0 {
        None | Some(Value::Null) => Shape::Empty,
        Some(object @ Value::Object(_)) => Shape::Single(vec![object]),
        Some(Value::Array(items)) => classify_list(items)?,
        Some(other) => {
            return Err(CodecError::shape(format!(
                "parameters must be an object or array, got {}",
                kind(&other)
            )))
        }
    };

    #[cfg(feature = "tracing")]
    tracing::debug!("classified parameter input as {}", shape_name(&shape));

    Ok(shape)
}

fn classify_list(items: Vec<Value>) -> Result<Shape> {
    if items.is_empty() {
        return Ok(Shape::Empty);
    }

    if items.iter().all(|item| matches!(item, Value::Array(_))) {
        let sets = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Array(members) => ensure_objects(members, Some(index)),
                other => Err(CodecError::shape(format!(
                    "parameter set {index} is {}",
                    kind(&other)
                ))),
            })
            .collect::<Result<Vec<_>>>()?;
        return Ok(Shape::Batch(sets));
    }

    ensure_objects(items, None).map(Shape::Single)
}

fn ensure_objects(members: Vec<Value>, set: Option<usize>) -> Result<Vec<Value>> {
    if let Some(bad) = members
        .iter()
        .find(|member| !matches!(member, Value::Object(_)))
    {
        let location = match set {
            Some(index) => format!("parameter set {index}"),
            None => "parameter list".to_owned(),
        };
        return Err(CodecError::shape(format!(
            "{location} must contain only objects, found {}",
            kind(bad)
        )));
    }
    Ok(members)
}

/// Flattens the objects of one parameter set into individual named values.
pub(crate) fn normalize(members: Vec<Value>) -> Result<Vec<NamedValue>> {
    let mut normalized = Vec::new();
    for member in members {
        let entries = match member {
            Value::Object(entries) => entries,
            other => {
                return Err(CodecError::shape(format!(
                    "expected an object, found {}",
                    kind(&other)
                )))
            }
        };

        if let Some(atom) = as_atomic(&entries) {
            normalized.push(atom);
            continue;
        }

        for (name, value) in entries {
            if name.is_empty() {
                return Err(CodecError::shape("parameter name cannot be empty"));
            }
            normalized.push(NamedValue {
                name,
                value,
                cast: None,
            });
        }
    }
    Ok(normalized)
}

fn as_atomic(entries: &[(String, Value)]) -> Option<NamedValue> {
    let field = |key: &str| {
        entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    };

    let expected_keys = if field("cast").is_some() { 3 } else { 2 };
    if entries.len() != expected_keys {
        return None;
    }

    let name = field("name")?.as_str().filter(|name| !name.is_empty())?;
    let value = field("value")?;
    let cast = match field("cast") {
        Some(cast) => Some(cast.as_str()?.to_owned()),
        None => None,
    };

    Some(NamedValue {
        name: name.to_owned(),
        value: value.clone(),
        cast,
    })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Integer(_) | Value::Float(_) => "a number",
        Value::Text(_) => "a string",
        Value::Blob(_) => "a blob",
        Value::Timestamp(_) => "a timestamp",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(feature = "tracing")]
fn shape_name(shape: &Shape) -> &'static str {
    match shape {
        Shape::Empty => "empty",
        Shape::Single(_) => "single",
        Shape::Batch(_) => "batch",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::params::{extract, normalize, NamedValue, Shape};
    use crate::{CodecError, Params, Value};

    #[test]
    fn nothing_is_empty() {
        assert_eq!(extract(Params::none()).expect("must extract"), Shape::Empty);
        assert_eq!(extract(().into()).expect("must extract"), Shape::Empty);
        assert_eq!(extract(json!([]).into()).expect("must extract"), Shape::Empty);
    }

    #[test]
    fn scalar_root_is_invalid_shape() {
        let err = extract(json!("id = 1").into()).expect_err("must fail");
        assert!(matches!(err, CodecError::InvalidParameterShape(_)));

        let err = extract(Value::Integer(3).into()).expect_err("must fail");
        assert!(matches!(err, CodecError::InvalidParameterShape(_)));
    }

    #[test]
    fn array_of_objects_is_single_set() {
        let shape = extract(json!([{ "id": 1 }, { "name": "A" }]).into()).expect("must extract");
        match shape {
            Shape::Single(members) => assert_eq!(members.len(), 2),
            other => panic!("expected single, got {other:?}"),
        }
    }

    #[test]
    fn array_of_arrays_is_batch() {
        let shape = extract(json!([[{ "id": 1 }], [{ "id": 2 }, { "name": "B" }]]).into())
            .expect("must extract");
        match shape {
            Shape::Batch(sets) => {
                assert_eq!(sets.len(), 2);
                assert_eq!(sets[1].len(), 2);
            }
            other => panic!("expected batch, got {other:?}"),
        }
    }

    #[test]
    fn mixed_or_nested_lists_are_rejected() {
        let err = extract(json!([{ "id": 1 }, [{ "id": 2 }]]).into()).expect_err("must fail");
        assert!(matches!(err, CodecError::InvalidParameterShape(_)));

        let err = extract(json!([[[{ "id": 1 }]]]).into()).expect_err("must fail");
        assert!(matches!(err, CodecError::InvalidParameterShape(_)));

        let err = extract(json!([1, 2]).into()).expect_err("must fail");
        assert!(matches!(err, CodecError::InvalidParameterShape(_)));
    }

    #[test]
    fn splits_plain_objects_into_pairs() {
        let normalized =
            normalize(vec![Value::object([("id", Value::from(1)), ("name", Value::text("A"))])])
                .expect("must normalize");

        assert_eq!(
            normalized,
            vec![
                NamedValue {
                    name: "id".to_owned(),
                    value: Value::Integer(1),
                    cast: None,
                },
                NamedValue {
                    name: "name".to_owned(),
                    value: Value::text("A"),
                    cast: None,
                },
            ]
        );
    }

    #[test]
    fn keeps_atomic_parameters_whole() {
        let normalized = normalize(vec![
            Value::from(json!({ "name": "x", "value": { "stringValue": "hi" } })),
            Value::from(json!({ "name": "id", "value": "abc", "cast": "uuid" })),
        ])
        .expect("must normalize");

        assert_eq!(normalized.len(), 2);
        assert_eq!(normalized[0].name, "x");
        assert_eq!(
            normalized[0].value,
            Value::object([("stringValue", Value::text("hi"))])
        );
        assert_eq!(normalized[1].cast.as_deref(), Some("uuid"));
    }

    #[test]
    fn near_atomic_objects_are_split() {
        let normalized = normalize(vec![Value::from(
            json!({ "name": "x", "value": 1, "other": true }),
        )])
        .expect("must normalize");
        assert_eq!(normalized.len(), 3);

        let normalized = normalize(vec![Value::from(json!({ "name": 5, "value": 1 }))])
            .expect("must normalize");
        assert_eq!(normalized[0].name, "name");
    }

    #[test]
    fn empty_key_is_rejected() {
        let err = normalize(vec![Value::object([("", Value::from(1))])]).expect_err("must fail");
        assert!(matches!(err, CodecError::InvalidParameterShape(_)));
    }

    #[test]
    fn batch_builder_wraps_sets() {
        let params = Params::batch([
            Params::named([("id", Value::from(1))]),
            Params::named([("id", Value::from(2))]),
        ]);
        match extract(params).expect("must extract") {
            Shape::Batch(sets) => assert_eq!(sets.len(), 2),
            other => panic!("expected batch, got {other:?}"),
        }
    }

    #[test]
    fn parameter_builder_is_atomic() {
        let params = Params::parameter("id", "abc", Some("uuid"));
        let Shape::Single(members) = extract(params).expect("must extract") else {
            panic!("expected single");
        };
        let normalized = normalize(members).expect("must normalize");
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized[0].cast.as_deref(), Some("uuid"));
    }
}
