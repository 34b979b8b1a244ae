use std::fmt;

/// Values bound as statement arguments and produced by row decoding.
///
/// Arguments may use any variant; decoding only ever yields `Int`, `Text` or `Null`:
/// ```rust
/// use sql_uow::prelude::*;
///
/// let args = vec![
///     RowValues::Int(0),
///     RowValues::Text("Shirt".into()),
///     RowValues::Int(5),
/// ];
/// # let _ = args;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// NULL value
    Null,
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    /// Short name of the value's storage class, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            RowValues::Int(_) => "integer",
            RowValues::Float(_) => "float",
            RowValues::Text(_) => "text",
            RowValues::Null => "null",
            RowValues::Blob(_) => "blob",
        }
    }
}

impl From<i64> for RowValues {
    fn from(value: i64) -> Self {
        RowValues::Int(value)
    }
}

impl From<i32> for RowValues {
    fn from(value: i32) -> Self {
        RowValues::Int(i64::from(value))
    }
}

impl From<&str> for RowValues {
    fn from(value: &str) -> Self {
        RowValues::Text(value.to_owned())
    }
}

impl From<String> for RowValues {
    fn from(value: String) -> Self {
        RowValues::Text(value)
    }
}

impl<T: Into<RowValues>> From<Option<T>> for RowValues {
    fn from(value: Option<T>) -> Self {
        value.map_or(RowValues::Null, Into::into)
    }
}

/// Target type requested from the row decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    Integer,
    Text,
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlType::Integer => f.write_str("integer"),
            SqlType::Text => f.write_str("text"),
        }
    }
}

/// Column type inferred from the declared type the backend reports for a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    /// `INTEGER`, `INT`, `BIGINT`, `SMALLINT`, ...
    Integer,
    /// `CHAR(n)`, `VARCHAR(n)`, `TEXT`, `CLOB`, ...
    Character,
    /// A declared type outside the integer and character families.
    Other(String),
    /// Expression columns (`count(*)`, literals) carry no declared type.
    Untyped,
}

impl ColumnType {
    /// Infer the family from a declared type, following SQLite's affinity rules for the
    /// integer and character families.
    #[must_use]
    pub fn from_declared(declared: Option<&str>) -> Self {
        let Some(declared) = declared else {
            return ColumnType::Untyped;
        };
        let upper = declared.to_ascii_uppercase();
        if upper.contains("INT") {
            ColumnType::Integer
        } else if upper.contains("CHAR") || upper.contains("CLOB") || upper.contains("TEXT") {
            ColumnType::Character
        } else {
            ColumnType::Other(declared.to_string())
        }
    }
}

/// Name and inferred type of one result column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: String,
    pub column_type: ColumnType,
}

impl ColumnDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>, declared: Option<&str>) -> Self {
        Self {
            name: name.into(),
            column_type: ColumnType::from_declared(declared),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_column_families() {
        assert_eq!(ColumnType::from_declared(Some("INTEGER")), ColumnType::Integer);
        assert_eq!(ColumnType::from_declared(Some("smallint")), ColumnType::Integer);
        assert_eq!(ColumnType::from_declared(Some("VARCHAR(12)")), ColumnType::Character);
        assert_eq!(ColumnType::from_declared(Some("char(3)")), ColumnType::Character);
        assert_eq!(
            ColumnType::from_declared(Some("DECIMAL(9,2)")),
            ColumnType::Other("DECIMAL(9,2)".into())
        );
        assert_eq!(ColumnType::from_declared(None), ColumnType::Untyped);
    }

    #[test]
    fn option_converts_to_null() {
        let missing: Option<i64> = None;
        assert_eq!(RowValues::from(missing), RowValues::Null);
        assert_eq!(RowValues::from(Some("A00")), RowValues::Text("A00".into()));
    }
}
