#![doc = r#"
# sql-uow

Synchronous, single-session access to a relational backend (embedded SQLite via
`rusqlite`) built around five pieces:

* [`Connection`] opens and owns one session described by an [`Endpoint`].
* [`Statement`] is a compiled command with positional `?` placeholders, executed any
  number of times with [`RowValues`] arguments.
* [`Cursor`] walks the rows of one execution forward-only, one row at a time.
* [`UnitOfWork`] groups executions into one atomic, explicitly committed transaction;
  without one, every execution commits on its own.
* [`decode_row`] maps a fetched row onto requested [`SqlType`] targets with no coercion.

```rust,no_run
use sql_uow::prelude::*;

fn main() -> Result<(), SqlUowError> {
    let endpoint = Endpoint::builder()
        .host("localhost")
        .port(50000)
        .database("orders.db")
        .user("app")
        .password("secret")
        .build()?;
    let conn = Connection::open(&endpoint)?;

    let mut insert = conn.prepare("INSERT INTO lineitem (id, name, qty) VALUES (?, ?, ?)")?;
    let uow = conn.begin()?;
    insert.execute(&[RowValues::Int(1), "Bicycle".into(), RowValues::Int(2)])?;
    insert.execute(&[RowValues::Int(2), "Helmet".into(), RowValues::Int(1)])?;
    uow.commit()?;

    let mut select = conn.prepare("SELECT id, name FROM lineitem WHERE qty > ?")?;
    if let ExecutionResult::Rows(mut cursor) = select.execute(&[RowValues::Int(0)])? {
        while cursor.advance()? {
            let (id, name): (i64, String) = cursor.decode_as()?;
            println!("{id} {name}");
        }
    }
    Ok(())
}
```

Async callers can hand the connection to a [`ConnectionWorker`] thread instead.
"#]

pub mod command;
pub mod config;
pub mod connection;
pub mod decode;
pub mod error;
pub mod params;
pub mod prelude;
pub mod results;
pub mod statement;
pub mod stats;
pub mod transaction;
pub mod tx_outcome;
pub mod typed;
pub mod types;
pub mod worker;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use config::{Endpoint, EndpointBuilder, SessionOptions};
pub use connection::Connection;
pub use decode::decode_row;
pub use error::SqlUowError;
pub use results::Cursor;
pub use statement::{ExecutionResult, Statement};
pub use stats::SessionStats;
pub use transaction::{TxState, UnitOfWork};
pub use tx_outcome::TxOutcome;
pub use typed::{FromRow, FromValue};
pub use types::{ColumnDescriptor, ColumnType, RowValues, SqlType};
pub use worker::ConnectionWorker;
