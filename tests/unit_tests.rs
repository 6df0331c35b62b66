use query_types::types::{self, BOOLEAN, INTEGER};
use query_types::{Column, RowError, Schema, SchemaDefinition, Type, Value, WireType};
use std::cmp::Ordering;
use std::io::Write;

const EVENTS_SCHEMA: &str = r#"
version: 1
columns:
  - name: id
    type: bigint
  - name: kind
    type: string
  - name: payload
    type: blob
    nullable: true
  - name: happened_at
    type: timestamp
  - name: retries
    type: int
    default: 0
"#;

#[test]
fn test_schema_file_to_wire() -> anyhow::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(EVENTS_SCHEMA.as_bytes())?;

    let schema = SchemaDefinition::from_file(file.path())?.to_schema()?;
    assert_eq!(
        schema.column_names(),
        vec!["id", "kind", "payload", "happened_at", "retries"]
    );

    let row = schema.convert_row(vec![
        Value::UInt16(12),
        Value::from("login"),
        Value::from("raw"),
        Value::from("2023-01-02 15:04:05.000000"),
        Value::Int8(3),
    ])?;
    schema.check_row(&row)?;

    let wire = schema.sql_row(&row)?;
    let encoded: Vec<(WireType, Option<&[u8]>)> =
        wire.iter().map(|w| (w.wire_type(), w.raw())).collect();
    assert_eq!(
        encoded,
        vec![
            (WireType::Int64, Some(&b"12"[..])),
            (WireType::Text, Some(&b"login"[..])),
            (WireType::Blob, Some(&b"raw"[..])),
            (WireType::Timestamp, Some(&b"2023-01-02 15:04:05"[..])),
            (WireType::Int32, Some(&b"3"[..])),
        ]
    );
    Ok(())
}

#[test]
fn test_rows_sort_by_schema_order() -> anyhow::Result<()> {
    let schema = Schema::new(vec![
        Column::new("active", &BOOLEAN),
        Column::new("score", &INTEGER),
    ]);

    let mut rows = vec![
        schema.convert_row(vec![Value::Bool(true), Value::Int64(1)])?,
        schema.convert_row(vec![Value::Bool(false), Value::Int64(50)])?,
        schema.convert_row(vec![Value::Bool(true), Value::Int64(-7)])?,
        schema.convert_row(vec![Value::Bool(false), Value::Int64(2)])?,
    ];
    rows.sort_by(|a, b| schema.compare_rows(a, b));

    let flat: Vec<(bool, i32)> = rows
        .iter()
        .map(|r| match (&r[0], &r[1]) {
            (Value::Bool(b), Value::Int32(i)) => (*b, *i),
            other => panic!("unexpected row {other:?}"),
        })
        .collect();
    assert_eq!(flat, vec![(false, 2), (false, 50), (true, -7), (true, 1)]);
    Ok(())
}

#[test]
fn test_row_errors_are_recoverable() {
    let schema = Schema::new(vec![
        Column::new("a", &INTEGER),
        Column::new("b", &INTEGER),
        Column::new("c", &INTEGER),
    ]);

    let err = schema
        .check_row(&[Value::Int32(1), Value::Int32(2)])
        .unwrap_err();
    assert_eq!(err.to_string(), "expected 3 values, got 2");

    let err = schema
        .convert_row(vec![Value::Int64(1), Value::Int64(1 << 35), Value::Int64(3)])
        .unwrap_err();
    assert!(matches!(err, RowError::Conversion { index: 1, .. }));
    assert!(schema.sql_row(&[Value::Int64(1), Value::Int32(2), Value::Int32(3)]).is_err());
}

#[test]
fn test_descriptors_are_shared_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let ty = types::by_name("integer").expect("registered");
                let v = ty.convert(&Value::Int64(i)).expect("in range");
                ty.compare(&v, &Value::Int32(2))
            })
        })
        .collect();

    let results: Vec<Ordering> = handles
        .into_iter()
        .map(|h| h.join().expect("thread panicked"))
        .collect();
    assert_eq!(
        results,
        vec![Ordering::Less, Ordering::Less, Ordering::Equal, Ordering::Greater]
    );
}

#[test]
fn test_null_ordering_is_not_equality() {
    // NULL sorts as equal to NULL, which is only a sort position.
    assert_eq!(
        types::NULL.compare(&Value::Null, &Value::Null),
        Ordering::Equal
    );
    let col = Column::nullable("x", &types::NULL);
    assert!(col.check(&Value::Null));
    assert!(!Column::new("x", &types::NULL).check(&Value::Null));
}
