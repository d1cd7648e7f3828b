use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::{
    timestamp::format_timestamp, ArrayValue, CodecError, FormatOptions, Parameter, Result, Tag,
    TaggedValue, TypeHint, Value,
};

/// A native value after it has been given its wire tag.
#[derive(Debug, PartialEq)]
pub(crate) struct Encoded {
    pub value: TaggedValue,
    pub type_hint: Option<TypeHint>,
}

impl Encoded {
    fn plain(value: TaggedValue) -> Self {
        Self {
            value,
            type_hint: None,
        }
    }
}

type Rule = fn(&Value, &FormatOptions) -> Option<Encoded>;

// Order matters: integral numbers must be claimed by `long` before `double` sees them,
// and plain objects only get through `pre_tagged` with a recognized single key.
const RULES: [Rule; 8] = [
    string, boolean, long, double, null, timestamp, blob, pre_tagged,
];

pub(crate) fn infer(value: &Value, options: &FormatOptions) -> Option<Encoded> {
    RULES.iter().find_map(|rule| rule(value, options))
}

pub(crate) fn format_parameter(
    name: String,
    value: &Value,
    cast: Option<String>,
    options: &FormatOptions,
) -> Result<Parameter> {
    let Some(encoded) = infer(value, options) else {
        return Err(CodecError::unsupported(name));
    };
    Ok(Parameter {
        name,
        value: encoded.value,
        type_hint: encoded.type_hint,
        cast,
    })
}

fn string(value: &Value, _: &FormatOptions) -> Option<Encoded> {
    value
        .as_str()
        .map(|text| Encoded::plain(TaggedValue::String(text.to_owned())))
}

fn boolean(value: &Value, _: &FormatOptions) -> Option<Encoded> {
    match value {
        Value::Bool(flag) => Some(Encoded::plain(TaggedValue::Boolean(*flag))),
        _ => None,
    }
}

fn long(value: &Value, _: &FormatOptions) -> Option<Encoded> {
    match value {
        Value::Integer(number) => Some(Encoded::plain(TaggedValue::Long(*number))),
        Value::Float(number) => float_as_long(*number).map(|n| Encoded::plain(TaggedValue::Long(n))),
        _ => None,
    }
}

fn double(value: &Value, _: &FormatOptions) -> Option<Encoded> {
    match value {
        Value::Float(number) if number.is_finite() => {
            Some(Encoded::plain(TaggedValue::Double(*number)))
        }
        _ => None,
    }
}

fn null(value: &Value, _: &FormatOptions) -> Option<Encoded> {
    value.is_null().then(|| Encoded::plain(TaggedValue::null()))
}

fn timestamp(value: &Value, options: &FormatOptions) -> Option<Encoded> {
    match value {
        Value::Timestamp(at) => Some(Encoded {
            value: TaggedValue::String(format_timestamp(at, options.treat_as_local_date)),
            type_hint: Some(TypeHint::Timestamp),
        }),
        _ => None,
    }
}

fn blob(value: &Value, _: &FormatOptions) -> Option<Encoded> {
    match value {
        Value::Blob(bytes) => Some(Encoded::plain(TaggedValue::Blob(bytes.clone()))),
        _ => None,
    }
}

fn pre_tagged(value: &Value, _: &FormatOptions) -> Option<Encoded> {
    match value {
        Value::Tagged(tagged) => Some(Encoded::plain(tagged.clone())),
        Value::Object(entries) => match entries.as_slice() {
            [(key, inner)] => {
                let tag = Tag::from_wire_key(key)?;
                tagged_from_native(tag, inner).map(Encoded::plain)
            }
            _ => None,
        },
        _ => None,
    }
}

/// Integral floats inside the `i64` range are longs, precision loss above 2^53 included.
fn float_as_long(number: f64) -> Option<i64> {
    // `i64::MAX as f64` rounds up to 2^63, which is already out of range.
    let in_range = number >= i64::MIN as f64 && number < i64::MAX as f64;
    (number.is_finite() && number.fract() == 0.0 && in_range).then_some(number as i64)
}

fn tagged_from_native(tag: Tag, value: &Value) -> Option<TaggedValue> {
    match (tag, value) {
        (Tag::Array, _) => serde_json::to_value(value)
            .ok()
            .and_then(|json| serde_json::from_value::<ArrayValue>(json).ok())
            .map(TaggedValue::Array),
        (Tag::Blob, Value::Blob(bytes)) => Some(TaggedValue::Blob(bytes.clone())),
        (Tag::Blob, Value::Text(encoded)) => STANDARD.decode(encoded).ok().map(TaggedValue::Blob),
        (Tag::Boolean, Value::Bool(flag)) => Some(TaggedValue::Boolean(*flag)),
        (Tag::Double, Value::Float(number)) => Some(TaggedValue::Double(*number)),
        (Tag::Double, Value::Integer(number)) => Some(TaggedValue::Double(*number as f64)),
        (Tag::Null, Value::Bool(marker)) => Some(TaggedValue::Null(*marker)),
        (Tag::Long, Value::Integer(number)) => Some(TaggedValue::Long(*number)),
        (Tag::Long, Value::Float(number)) => float_as_long(*number).map(TaggedValue::Long),
        (Tag::String, Value::Text(text)) => Some(TaggedValue::String(text.clone())),
        (Tag::Struct, _) => serde_json::to_value(value).ok().map(TaggedValue::Struct),
        _ => None,
    }
}
