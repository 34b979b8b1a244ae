use sql_uow::prelude::*;
use sql_uow::test_utils::{create_lineitem, memory_endpoint};

const INSERT_LINEITEM: &str = "INSERT INTO lineitem (id, name, qty) VALUES (?, ?, ?)";

fn setup() -> Result<Connection, SqlUowError> {
    let conn = Connection::open(&memory_endpoint())?;
    create_lineitem(&conn)?;
    Ok(conn)
}

fn insert_items(conn: &Connection, items: &[(i64, &str, i64)]) -> Result<(), SqlUowError> {
    let mut insert = conn.prepare(INSERT_LINEITEM)?;
    for (id, name, qty) in items {
        let outcome = insert.execute(&[RowValues::Int(*id), (*name).into(), RowValues::Int(*qty)])?;
        assert_eq!(outcome.rows_affected(), Some(1));
    }
    insert.close();
    Ok(())
}

#[test]
fn prepared_insert_is_reusable() -> Result<(), Box<dyn std::error::Error>> {
    let conn = setup()?;
    let mut insert = conn.prepare(INSERT_LINEITEM)?;
    assert_eq!(insert.parameter_count(), 3);
    assert!(insert.columns().is_empty());

    for (id, name, qty) in [(0, "Shirt", 5), (1, "Trousers", 3), (2, "Socks", 12)] {
        insert.execute(&[RowValues::Int(id), name.into(), RowValues::Int(qty)])?;
    }
    let stats = conn.stats();
    assert_eq!(stats.prepares, 1);
    assert_eq!(stats.executions, 3);
    assert_eq!(conn.count_rows("lineitem")?, 3);
    Ok(())
}

#[test]
fn arity_mismatch_never_reaches_backend() -> Result<(), Box<dyn std::error::Error>> {
    let conn = setup()?;
    let mut insert = conn.prepare(INSERT_LINEITEM)?;
    let before = conn.stats();

    let err = insert
        .execute(&[RowValues::Int(1), "Shirt".into()])
        .unwrap_err();
    assert!(matches!(
        err,
        SqlUowError::ArgumentError {
            expected: 3,
            actual: 2
        }
    ));
    assert_eq!(conn.stats(), before);

    let err = conn
        .execute_direct("SELECT name FROM lineitem WHERE id = ?", &[], |_| Ok(()))
        .unwrap_err();
    assert!(matches!(
        err,
        SqlUowError::ArgumentError {
            expected: 1,
            actual: 0
        }
    ));
    assert_eq!(conn.stats(), before);
    Ok(())
}

#[test]
fn insert_then_select_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let conn = setup()?;
    insert_items(&conn, &[(0, "Shirt", 5), (1, "Trousers", 3)])?;

    let mut select = conn.prepare("SELECT id, name, qty FROM lineitem ORDER BY id")?;
    let mut cursor = select.execute(&[])?.into_cursor().expect("select yields rows");
    let mut rows = Vec::new();
    while cursor.advance()? {
        rows.push(cursor.decode_as::<(i64, String, i64)>()?);
    }
    assert_eq!(
        rows,
        vec![(0, "Shirt".to_string(), 5), (1, "Trousers".to_string(), 3)]
    );
    Ok(())
}

#[test]
fn lineitem_inserts_come_back_from_select_all() -> Result<(), Box<dyn std::error::Error>> {
    let conn = setup()?;
    let mut insert = conn.prepare(INSERT_LINEITEM)?;
    for (id, name, qty) in [(0, "Shirt", 5), (1, "Bicycle", 5)] {
        let outcome = insert.execute(&[RowValues::Int(id), name.into(), RowValues::Int(qty)])?;
        assert_eq!(outcome.rows_affected(), Some(1));
    }

    let mut select = conn.prepare("select * from lineitem")?;
    let mut cursor = select.execute(&[])?.into_cursor().expect("rows");
    let mut rows = Vec::new();
    while cursor.advance()? {
        rows.push(cursor.decode_as::<(i64, String, i64)>()?);
    }
    rows.sort();
    assert_eq!(
        rows,
        vec![(0, "Shirt".to_string(), 5), (1, "Bicycle".to_string(), 5)]
    );
    Ok(())
}

#[test]
fn cursor_columns_are_known_before_first_fetch() -> Result<(), Box<dyn std::error::Error>> {
    let conn = setup()?;
    let mut select = conn.prepare("SELECT id, name, qty FROM lineitem")?;
    let cursor = select.execute(&[])?.into_cursor().expect("rows");
    assert_eq!(cursor.column_names(), vec!["id", "name", "qty"]);
    assert_eq!(cursor.columns()[0].column_type, ColumnType::Integer);
    assert_eq!(cursor.columns()[1].column_type, ColumnType::Character);
    assert!(matches!(
        cursor.decode(&[SqlType::Integer, SqlType::Text, SqlType::Integer]),
        Err(SqlUowError::DecodeError(_))
    ));
    Ok(())
}

#[test]
fn exhausted_cursor_stays_exhausted() -> Result<(), Box<dyn std::error::Error>> {
    let conn = setup()?;
    insert_items(&conn, &[(7, "Hat", 1)])?;

    let mut select = conn.prepare("SELECT name FROM lineitem")?;
    let mut cursor = select.execute(&[])?.into_cursor().expect("rows");
    assert!(cursor.advance()?);
    assert_eq!(cursor.decode(&[SqlType::Text])?, vec![RowValues::Text("Hat".into())]);
    assert!(!cursor.advance()?);
    assert!(cursor.is_exhausted());
    assert!(!cursor.advance()?);
    assert!(matches!(
        cursor.decode(&[SqlType::Text]),
        Err(SqlUowError::DecodeError(_))
    ));
    Ok(())
}

#[test]
fn empty_result_ends_on_first_advance() -> Result<(), Box<dyn std::error::Error>> {
    let conn = setup()?;
    let mut select = conn.prepare("SELECT id FROM lineitem WHERE qty > ?")?;
    let mut cursor = select.execute(&[RowValues::Int(100)])?.into_cursor().expect("rows");
    assert!(!cursor.advance()?);
    Ok(())
}

#[test]
fn closed_cursor_rejects_use() -> Result<(), Box<dyn std::error::Error>> {
    let conn = setup()?;
    insert_items(&conn, &[(1, "Shirt", 5), (2, "Socks", 2)])?;

    let mut select = conn.prepare("SELECT id FROM lineitem")?;
    {
        let mut cursor = select.execute(&[])?.into_cursor().expect("rows");
        assert!(cursor.advance()?);
        cursor.close();
        cursor.close();
        assert!(cursor.is_closed());
        assert!(matches!(cursor.advance(), Err(SqlUowError::CursorClosedError)));
        assert!(matches!(
            cursor.decode(&[SqlType::Integer]),
            Err(SqlUowError::CursorClosedError)
        ));
    }

    // The statement can run again once the cursor is gone.
    let mut cursor = select.execute(&[])?.into_cursor().expect("rows");
    let mut seen = 0;
    while cursor.advance()? {
        seen += 1;
    }
    assert_eq!(seen, 2);
    Ok(())
}

#[test]
fn closed_statement_cannot_execute() -> Result<(), Box<dyn std::error::Error>> {
    let conn = setup()?;
    let mut insert = conn.prepare(INSERT_LINEITEM)?;
    insert.close();
    insert.close();
    assert!(insert.is_closed());
    assert!(matches!(
        insert.execute(&[RowValues::Int(1), "x".into(), RowValues::Int(1)]),
        Err(SqlUowError::ExecutionError(_))
    ));
    Ok(())
}

#[test]
fn constraint_violation_is_an_execution_error() -> Result<(), Box<dyn std::error::Error>> {
    let conn = setup()?;
    let mut insert = conn.prepare(INSERT_LINEITEM)?;
    let err = insert
        .execute(&[RowValues::Null, "Shirt".into(), RowValues::Int(5)])
        .unwrap_err();
    assert!(matches!(err, SqlUowError::ExecutionError(_)));
    assert_eq!(conn.count_rows("lineitem")?, 0);
    Ok(())
}

#[test]
fn update_reports_affected_rows() -> Result<(), Box<dyn std::error::Error>> {
    let conn = setup()?;
    insert_items(&conn, &[(1, "Shirt", 5), (2, "Socks", 2), (3, "Hat", 9)])?;

    let mut update = conn.prepare("UPDATE lineitem SET qty = qty + 1 WHERE qty < ?")?;
    let outcome = update.execute(&[RowValues::Int(6)])?;
    assert_eq!(outcome.rows_affected(), Some(2));

    let affected = conn.execute_update("DELETE FROM lineitem WHERE id = ?", &[RowValues::Int(3)])?;
    assert_eq!(affected, 1);
    Ok(())
}

#[test]
fn direct_execution_consumes_cursor() -> Result<(), Box<dyn std::error::Error>> {
    let conn = setup()?;
    insert_items(&conn, &[(1, "Shirt", 5), (2, "Socks", 2)])?;

    let names = conn.execute_direct(
        "SELECT name FROM lineitem WHERE qty >= ? ORDER BY id",
        &[RowValues::Int(1)],
        |outcome| {
            let mut cursor = outcome.into_cursor().expect("rows");
            let mut names = Vec::new();
            while cursor.advance()? {
                let (name,): (String,) = cursor.decode_as()?;
                names.push(name);
            }
            Ok(names)
        },
    )?;
    assert_eq!(names, vec!["Shirt", "Socks"]);

    assert!(matches!(
        conn.execute_update("SELECT id FROM lineitem", &[]),
        Err(SqlUowError::ExecutionError(_))
    ));
    Ok(())
}

#[test]
fn count_rows_validates_table_name() -> Result<(), Box<dyn std::error::Error>> {
    let conn = setup()?;
    assert_eq!(conn.count_rows("lineitem")?, 0);
    assert!(matches!(
        conn.count_rows("lineitem; DROP TABLE lineitem"),
        Err(SqlUowError::StatementError(_))
    ));
    assert!(matches!(
        conn.count_rows("missing_table"),
        Err(SqlUowError::StatementError(_))
    ));
    Ok(())
}

#[test]
fn decode_rejects_cross_family_targets() -> Result<(), Box<dyn std::error::Error>> {
    let conn = setup()?;
    insert_items(&conn, &[(1, "Shirt", 5)])?;

    let mut select = conn.prepare("SELECT id, name FROM lineitem")?;
    let mut cursor = select.execute(&[])?.into_cursor().expect("rows");
    assert!(cursor.advance()?);
    assert!(matches!(
        cursor.decode(&[SqlType::Text, SqlType::Text]),
        Err(SqlUowError::DecodeError(_))
    ));
    assert!(matches!(
        cursor.decode(&[SqlType::Integer]),
        Err(SqlUowError::DecodeError(_))
    ));
    // A failed decode leaves the row readable.
    let (id, name): (i64, String) = cursor.decode_as()?;
    assert_eq!((id, name.as_str()), (1, "Shirt"));
    Ok(())
}
