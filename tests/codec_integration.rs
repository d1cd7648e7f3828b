use chrono::NaiveDate;
use rds_data_codec::{
    Codec, CodecError, CodecOptions, Engine, ParameterList, Params, QueryOptions, RawField,
    RawResult, Record, TaggedValue, Value,
};
use serde_json::{json, Value as JsonValue};

fn select_payload() -> JsonValue {
    json!({
        "columnMetadata": [
            { "label": "id", "typeName": "INT" },
            { "label": "name", "typeName": "VARCHAR" },
            { "label": "created", "typeName": "TIMESTAMP" }
        ],
        "numberOfRecordsUpdated": 0,
        "records": [
            [
                { "longValue": 1 },
                { "isNull": true },
                { "stringValue": "2021-06-01 08:00:00" }
            ],
            [
                { "longValue": 2 },
                { "stringValue": "Kit" },
                { "stringValue": "2021-06-01 08:00:00.250" }
            ]
        ]
    })
}

#[test]
fn formats_single_parameter_set_to_wire_json() -> anyhow::Result<()> {
    let created = NaiveDate::from_ymd_opt(2021, 6, 1)
        .and_then(|date| date.and_hms_opt(8, 0, 0))
        .expect("must be a valid date")
        .and_utc();

    let params = Params::named([
        ("id", Value::from(7)),
        ("price", Value::from(9.99)),
        ("active", Value::from(true)),
        ("note", Value::Null),
        ("created", Value::timestamp(created)),
        ("raw", Value::blob(vec![1, 2, 3])),
    ]);
    let formatted = Codec::new().format_parameters(params)?;

    assert_eq!(
        serde_json::to_value(&formatted)?,
        json!([
            { "name": "id", "value": { "longValue": 7 } },
            { "name": "price", "value": { "doubleValue": 9.99 } },
            { "name": "active", "value": { "booleanValue": true } },
            { "name": "note", "value": { "isNull": true } },
            {
                "name": "created",
                "value": { "stringValue": "2021-06-01 08:00:00" },
                "typeHint": "TIMESTAMP"
            },
            { "name": "raw", "value": { "blobValue": "AQID" } }
        ])
    );
    Ok(())
}

#[test]
fn escape_hatch_parameters_flow_through() -> anyhow::Result<()> {
    let formatted = Codec::new().format_parameters(json!([
        { "name": "x", "value": { "stringValue": "hi" } },
        { "name": "id", "value": "8c1d5c4e", "cast": "uuid" }
    ]))?;

    let ParameterList::Single(params) = &formatted else {
        panic!("expected a single parameter set");
    };
    assert_eq!(params[0].value, TaggedValue::String("hi".to_owned()));
    assert_eq!(params[1].cast.as_deref(), Some("uuid"));
    assert_eq!(
        Engine::Pg.cast_placeholder(&params[1].name, "uuid"),
        ":id::uuid"
    );
    assert_eq!(
        serde_json::to_value(&formatted)?,
        json!([
            { "name": "x", "value": { "stringValue": "hi" } },
            { "name": "id", "value": { "stringValue": "8c1d5c4e" } }
        ])
    );
    Ok(())
}

#[test]
fn pre_tagged_value_with_cast_keeps_both() -> anyhow::Result<()> {
    let formatted = Codec::new().format_parameters(json!({
        "name": "x",
        "value": { "stringValue": "hi" },
        "cast": "text"
    }))?;

    let ParameterList::Single(params) = &formatted else {
        panic!("expected a single parameter set");
    };
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].name, "x");
    assert_eq!(params[0].value, TaggedValue::String("hi".to_owned()));
    assert_eq!(params[0].cast.as_deref(), Some("text"));
    assert_eq!(
        serde_json::to_value(&formatted)?,
        json!([{ "name": "x", "value": { "stringValue": "hi" } }])
    );
    Ok(())
}

#[test]
fn batch_input_yields_parallel_sets() -> anyhow::Result<()> {
    let formatted = Codec::new().format_parameters(json!([
        [{ "id": 1, "name": "A" }],
        [{ "id": 2, "name": "B" }]
    ]))?;

    assert!(formatted.is_batch());
    assert_eq!(
        serde_json::to_value(&formatted)?,
        json!([
            [
                { "name": "id", "value": { "longValue": 1 } },
                { "name": "name", "value": { "stringValue": "A" } }
            ],
            [
                { "name": "id", "value": { "longValue": 2 } },
                { "name": "name", "value": { "stringValue": "B" } }
            ]
        ])
    );
    Ok(())
}

#[test]
fn invalid_inputs_fail_whole_call() {
    let codec = Codec::new();

    let err = codec
        .format_parameters(json!(true))
        .expect_err("scalar root must fail");
    assert!(matches!(err, CodecError::InvalidParameterShape(_)));

    let err = codec
        .format_parameters(json!({ "id": 1, "tags": ["a", "b"] }))
        .expect_err("array value must fail");
    assert_eq!(err.to_string(), "'tags' is an invalid type");
}

#[test]
fn hydrated_response_keys_rows_by_label() -> anyhow::Result<()> {
    let raw: RawResult = serde_json::from_value(select_payload())?;
    let response = Codec::new().format_response(raw);

    assert!(response.number_of_records_updated.is_none());
    assert_eq!(
        serde_json::to_value(&response)?,
        json!({
            "records": [
                { "id": 1, "name": null, "created": "2021-06-01T08:00:00.000Z" },
                { "id": 2, "name": "Kit", "created": "2021-06-01T08:00:00.250Z" }
            ]
        })
    );
    Ok(())
}

#[test]
fn positional_response_keeps_column_order() -> anyhow::Result<()> {
    let raw: RawResult = serde_json::from_value(select_payload())?;
    let codec = Codec::new().with_options(CodecOptions {
        hydrate_column_names: false,
        ..CodecOptions::default()
    });
    let response = codec.format_response(raw);

    let records = response.records.expect("must contain records");
    assert!(matches!(records[1], Record::Positional(_)));
    assert_eq!(records[1].at(1), Some(&Value::text("Kit")));
    assert!(matches!(records[1].at(2), Some(Value::Timestamp(_))));
    Ok(())
}

#[test]
fn per_call_options_override_defaults() -> anyhow::Result<()> {
    let raw: RawResult = serde_json::from_value(select_payload())?;
    let query = QueryOptions {
        hydrate_column_names: Some(false),
        include_result_metadata: true,
    };
    let response = Codec::new().format_response_with(raw, query);

    let meta = response.column_metadata.expect("must include metadata");
    assert_eq!(meta.len(), 3);
    let records = response.records.expect("must contain records");
    assert_eq!(records[0].at(0), Some(&Value::Integer(1)));
    assert_eq!(records[0].get("id"), None);
    Ok(())
}

#[test]
fn batch_response_reports_update_results() -> anyhow::Result<()> {
    let raw: RawResult = serde_json::from_value(json!({
        "updateResults": [
            { "generatedFields": [{ "longValue": 10 }] },
            { "generatedFields": [] },
            {}
        ]
    }))?;
    let response = Codec::new().format_response(raw);

    assert_eq!(
        serde_json::to_value(&response)?,
        json!({ "updateResults": [{ "insertId": 10 }, {}, {}] })
    );
    Ok(())
}

#[test]
fn wire_values_round_trip_through_raw_fields() -> anyhow::Result<()> {
    let codec = Codec::new();
    let values = [
        Value::text("text"),
        Value::from(false),
        Value::from(123_456_789_i64),
        Value::Null,
        Value::blob(b"bytes".to_vec()),
    ];

    for value in values {
        let ParameterList::Single(params) =
            codec.format_parameters(Params::named([("v", value.clone())]))?
        else {
            panic!("expected a single parameter set");
        };
        let json = serde_json::to_value(&params[0].value)?;
        let field: RawField = serde_json::from_value(json)?;

        let unwrapped = match field.present_tag() {
            Some(tag) if !field.is_null_marked() => field.into_value(tag),
            _ => Value::Null,
        };
        assert_eq!(unwrapped, value);
    }
    Ok(())
}
