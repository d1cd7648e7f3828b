use crate::{
    timestamp::parse_timestamp, CodecOptions, ColumnMeta, FormatOptions, QueryOptions, RawField,
    RawResult, Record, Response, Tag, UpdateResult, Value,
};

const DATE_TYPES: [&str; 4] = ["DATE", "DATETIME", "TIMESTAMP", "TIMESTAMP WITH TIME ZONE"];
const ZONED_TYPE: &str = "TIMESTAMP WITH TIME ZONE";

/// Wire tag of each column, discovered from the first non-null field seen in it.
///
/// Lives for one result set; column types are homogeneous down a result set so a tag is
/// never re-checked once it is known.
#[derive(Debug, Default)]
pub(crate) struct FieldTypeMap {
    tags: Vec<Option<Tag>>,
}

impl FieldTypeMap {
    pub(crate) fn with_columns(columns: usize) -> Self {
        Self {
            tags: vec![None; columns],
        }
    }

    pub(crate) fn tag(&self, column: usize) -> Option<Tag> {
        self.tags.get(column).copied().flatten()
    }

    /// Unwraps `field` found at `column`.
    pub(crate) fn resolve(&mut self, column: usize, field: RawField) -> Value {
        if field.is_null_marked() {
            return Value::Null;
        }

        let tag = match self.tag(column) {
            Some(tag) => tag,
            None => {
                let Some(tag) = field.present_tag() else {
                    return Value::Null;
                };
                if self.tags.len() <= column {
                    self.tags.resize(column + 1, None);
                }
                self.tags[column] = Some(tag);

                #[cfg(feature = "tracing")]
                tracing::debug!("column {} resolved to {}", column, tag.wire_key());

                tag
            }
        };
        field.into_value(tag)
    }
}

/// Applies date deserialization to a value of a column declared as `type_name`.
pub(crate) fn coerce_value(value: Value, type_name: &str, options: &FormatOptions) -> Value {
    if !options.deserialize_date || !DATE_TYPES.iter().any(|t| t.eq_ignore_ascii_case(type_name))
    {
        return value;
    }
    let Value::Text(text) = value else {
        return value;
    };

    let treat_as_local = options.treat_as_local_date || type_name.eq_ignore_ascii_case(ZONED_TYPE);
    match parse_timestamp(&text, treat_as_local) {
        Some(at) => Value::Timestamp(at),
        None => {
            #[cfg(feature = "tracing")]
            tracing::debug!("leaving unparseable {} value '{}' as text", type_name, text);

            Value::Text(text)
        }
    }
}

/// Projects raw rows into records, sharing one [`FieldTypeMap`] across all of them.
///
/// Rows are keyed by label only when `hydrate` is set and column metadata is present.
pub(crate) fn project_records(
    rows: Vec<Vec<RawField>>,
    columns: Option<&[ColumnMeta]>,
    hydrate: bool,
    options: &FormatOptions,
) -> Vec<Record> {
    let columns = columns.unwrap_or_default();
    let mut types = FieldTypeMap::with_columns(columns.len());
    let hydrate = hydrate && !columns.is_empty();

    rows.into_iter()
        .map(|row| {
            let values = row.into_iter().enumerate().map(|(index, field)| {
                let value = types.resolve(index, field);
                let type_name = columns
                    .get(index)
                    .map_or("", |column| column.type_name.as_str());
                coerce_value(value, type_name, options)
            });

            if hydrate {
                Record::Named(label_values(columns, values))
            } else {
                Record::Positional(values.collect())
            }
        })
        .collect()
}

fn label_values(
    columns: &[ColumnMeta],
    values: impl Iterator<Item = Value>,
) -> Vec<(String, Value)> {
    let mut entries: Vec<(String, Value)> = Vec::with_capacity(columns.len());
    for (index, value) in values.enumerate() {
        let label = columns
            .get(index)
            .map_or_else(|| index.to_string(), |column| column.label.clone());
        // A repeated label overwrites the earlier value but keeps its position.
        match entries.iter_mut().find(|(existing, _)| *existing == label) {
            Some(entry) => entry.1 = value,
            None => entries.push((label, value)),
        }
    }
    entries
}

fn insert_id(fields: Vec<RawField>) -> Option<Value> {
    let field = fields.into_iter().next()?;
    if field.is_null_marked() {
        return None;
    }
    let tag = field.present_tag()?;
    Some(field.into_value(tag)).filter(|value| !value.is_null())
}

/// Builds a [`Response`] from whatever parts of `raw` are present.
pub(crate) fn assemble_response(
    raw: RawResult,
    options: &CodecOptions,
    query: &QueryOptions,
) -> Response {
    let RawResult {
        column_metadata,
        number_of_records_updated,
        records,
        generated_fields,
        update_results,
    } = raw;

    let records = records.map(|rows| {
        project_records(
            rows,
            column_metadata.as_deref(),
            query.hydrate(options),
            &options.format_options,
        )
    });

    Response {
        number_of_records_updated: number_of_records_updated.filter(|_| records.is_none()),
        records,
        update_results: update_results.map(|results| {
            results
                .into_iter()
                .map(|result| UpdateResult {
                    insert_id: insert_id(result.generated_fields),
                })
                .collect()
        }),
        insert_id: generated_fields.and_then(insert_id),
        column_metadata: column_metadata.filter(|_| query.include_result_metadata),
    }
}
