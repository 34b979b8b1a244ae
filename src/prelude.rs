//! Convenient imports for common functionality.
//!
//! ```rust
//! use sql_uow::prelude::*;
//! ```

pub use crate::config::{Endpoint, EndpointBuilder, SessionOptions};
pub use crate::connection::Connection;
pub use crate::decode::decode_row;
pub use crate::error::SqlUowError;
pub use crate::results::Cursor;
pub use crate::statement::{ExecutionResult, Statement};
pub use crate::stats::SessionStats;
pub use crate::transaction::{TxState, UnitOfWork};
pub use crate::tx_outcome::TxOutcome;
pub use crate::typed::{FromRow, FromValue};
pub use crate::types::{ColumnDescriptor, ColumnType, RowValues, SqlType};
pub use crate::worker::ConnectionWorker;
