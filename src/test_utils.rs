//! Fixtures shared by the integration tests and benches.

use std::path::Path;

use crate::config::Endpoint;
use crate::connection::Connection;
use crate::error::SqlUowError;
use crate::types::RowValues;

pub const TEST_PORT: u16 = 50000;

/// Loopback endpoint for a private in-memory database.
#[must_use]
pub fn memory_endpoint() -> Endpoint {
    endpoint_for(":memory:")
}

/// Loopback endpoint for a database file at `path`.
#[must_use]
pub fn file_endpoint(path: &Path) -> Endpoint {
    endpoint_for(&path.to_string_lossy())
}

fn endpoint_for(database: &str) -> Endpoint {
    match Endpoint::new("localhost", TEST_PORT, database, "db2inst1", "db2inst1") {
        Ok(endpoint) => endpoint,
        Err(err) => panic!("fixture endpoint for {database} is invalid: {err}"),
    }
}

pub const LINEITEM_DDL: &str = "CREATE TABLE lineitem (
    id   INTEGER NOT NULL,
    name VARCHAR(20),
    qty  INTEGER
);";

pub const EMPLOYEE_DDL: &str = "CREATE TABLE employee (
    empno    CHAR(6) NOT NULL PRIMARY KEY,
    firstnme VARCHAR(12) NOT NULL,
    midinit  CHAR(1),
    lastname VARCHAR(15) NOT NULL,
    workdept CHAR(3),
    job      CHAR(8),
    salary   DECIMAL(9,2)
);";

/// `(empno, firstnme, lastname, workdept, job)` seed rows.
pub const EMPLOYEES: &[(&str, &str, &str, &str, &str)] = &[
    ("000010", "CHRISTINE", "HAAS", "A00", "PRES"),
    ("000110", "VINCENZO", "LUCCHESSI", "A00", "SALESREP"),
    ("000020", "MICHAEL", "THOMPSON", "B01", "MANAGER"),
    ("000030", "SALLY", "KWAN", "C01", "MANAGER"),
    ("000130", "DELORES", "QUINTANA", "C01", "ANALYST"),
    ("000140", "HEATHER", "NICHOLLS", "C01", "ANALYST"),
    ("000060", "IRVING", "STERN", "D11", "MANAGER"),
    ("000150", "BRUCE", "ADAMSON", "D11", "DESIGNER"),
];

/// Create the `lineitem` table.
///
/// # Errors
/// Propagates execution failures.
pub fn create_lineitem(conn: &Connection) -> Result<(), SqlUowError> {
    conn.execute_batch(LINEITEM_DDL)
}

/// Create and seed the `employee` table.
///
/// # Errors
/// Propagates execution failures.
pub fn create_employee(conn: &Connection) -> Result<(), SqlUowError> {
    conn.execute_batch(EMPLOYEE_DDL)?;
    let mut insert = conn.prepare(
        "INSERT INTO employee (empno, firstnme, lastname, workdept, job, salary)
         VALUES (?, ?, ?, ?, ?, 50000.00)",
    )?;
    for (empno, first, last, dept, job) in EMPLOYEES {
        insert.execute(&[
            RowValues::from(*empno),
            RowValues::from(*first),
            RowValues::from(*last),
            RowValues::from(*dept),
            RowValues::from(*job),
        ])?;
    }
    Ok(())
}

/// `(firstnme, lastname)` of the seeded employees in `dept`, ordered by last name.
#[must_use]
pub fn employees_in(dept: &str) -> Vec<(String, String)> {
    let mut rows: Vec<(String, String)> = EMPLOYEES
        .iter()
        .filter(|(_, _, _, d, _)| *d == dept)
        .map(|(_, first, last, _, _)| ((*first).to_string(), (*last).to_string()))
        .collect();
    rows.sort_by(|a, b| a.1.cmp(&b.1));
    rows
}
