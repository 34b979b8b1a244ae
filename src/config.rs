use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::SqlUowError;

/// Host names the embedded backend accepts; the session lives in this process.
const LOOPBACK_HOSTS: &[&str] = &["localhost", "127.0.0.1", "::1"];

/// Backend endpoint descriptor.
///
/// All five fields are required and have no defaults. For the embedded SQLite backend
/// `database` is the database file path (or `:memory:`), the host must be a loopback
/// name, and the credentials are carried without being checked by the backend.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    password: String,
}

impl Endpoint {
    /// Build and validate an endpoint.
    ///
    /// # Errors
    /// Returns `SqlUowError::ConfigError` if a field is empty or the port is zero.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        database: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, SqlUowError> {
        let endpoint = Self {
            host: host.into(),
            port,
            database: database.into(),
            user: user.into(),
            password: password.into(),
        };
        endpoint.validate()?;
        Ok(endpoint)
    }

    #[must_use]
    pub fn builder() -> EndpointBuilder {
        EndpointBuilder::default()
    }

    /// Parse a JSON object with the fields `host`, `port`, `database`, `user`, `password`.
    ///
    /// # Errors
    /// Returns `SqlUowError::ConfigError` on malformed JSON, missing or unknown fields, or
    /// failed validation.
    pub fn from_json(json: &str) -> Result<Self, SqlUowError> {
        let endpoint: Endpoint = serde_json::from_str(json)
            .map_err(|e| SqlUowError::ConfigError(format!("invalid endpoint JSON: {e}")))?;
        endpoint.validate()?;
        Ok(endpoint)
    }

    /// Credential handed to the backend driver; never logged.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Check the descriptor is well-formed (does not contact the backend).
    ///
    /// # Errors
    /// Returns `SqlUowError::ConfigError` naming the offending field.
    pub fn validate(&self) -> Result<(), SqlUowError> {
        for (field, value) in [
            ("host", &self.host),
            ("database", &self.database),
            ("user", &self.user),
        ] {
            if value.trim().is_empty() {
                return Err(SqlUowError::ConfigError(format!("{field} must not be empty")));
            }
        }
        if self.port == 0 {
            return Err(SqlUowError::ConfigError("port must be non-zero".into()));
        }
        Ok(())
    }

    /// Whether the host names this machine.
    #[must_use]
    pub fn is_loopback(&self) -> bool {
        LOOPBACK_HOSTS
            .iter()
            .any(|h| h.eq_ignore_ascii_case(self.host.trim()))
    }
}

// Password is never printed.
impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}:{}/{}",
            self.user, self.host, self.port, self.database
        )
    }
}

impl FromStr for Endpoint {
    type Err = SqlUowError;

    /// Parse a keyword connection string:
    /// `HOSTNAME=localhost;PORT=50000;DATABASE=sample.db;UID=db2inst1;PWD=secret`.
    ///
    /// Keys are case-insensitive; `HOST`, `USER` and `PASSWORD` are accepted as aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut builder = EndpointBuilder::default();
        for pair in s.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                SqlUowError::ConfigError(format!("expected KEY=VALUE, got '{pair}'"))
            })?;
            let value = value.trim();
            builder = match key.trim().to_ascii_uppercase().as_str() {
                "HOSTNAME" | "HOST" => builder.host(value),
                "PORT" => {
                    let port = value.parse::<u16>().map_err(|e| {
                        SqlUowError::ConfigError(format!("invalid port '{value}': {e}"))
                    })?;
                    builder.port(port)
                }
                "DATABASE" => builder.database(value),
                "UID" | "USER" => builder.user(value),
                "PWD" | "PASSWORD" => builder.password(value),
                other => {
                    return Err(SqlUowError::ConfigError(format!(
                        "unknown connection string key '{other}'"
                    )));
                }
            };
        }
        builder.build()
    }
}

/// Fluent builder for [`Endpoint`]; every field must be set before `build`.
#[derive(Debug, Clone, Default)]
pub struct EndpointBuilder {
    host: Option<String>,
    port: Option<u16>,
    database: Option<String>,
    user: Option<String>,
    password: Option<String>,
}

impl EndpointBuilder {
    #[must_use]
    pub fn host(mut self, host: &str) -> Self {
        self.host = Some(host.to_string());
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    #[must_use]
    pub fn database(mut self, database: &str) -> Self {
        self.database = Some(database.to_string());
        self
    }

    #[must_use]
    pub fn user(mut self, user: &str) -> Self {
        self.user = Some(user.to_string());
        self
    }

    #[must_use]
    pub fn password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }

    /// Build the endpoint.
    ///
    /// # Errors
    /// Returns `SqlUowError::ConfigError` if any field is missing or invalid.
    pub fn build(self) -> Result<Endpoint, SqlUowError> {
        fn required<T>(value: Option<T>, field: &str) -> Result<T, SqlUowError> {
            value.ok_or_else(|| SqlUowError::ConfigError(format!("{field} is required")))
        }
        Endpoint::new(
            required(self.host, "host")?,
            required(self.port, "port")?,
            required(self.database, "database")?,
            required(self.user, "user")?,
            required(self.password, "password")?,
        )
    }
}

/// Session-level settings applied right after the backend session opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// How long the backend waits on a locked database before failing the call.
    pub busy_timeout: Duration,
    /// Put file databases in write-ahead-log mode so readers never block on a writer.
    pub wal: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_secs(5),
            wal: true,
        }
    }
}

impl SessionOptions {
    #[must_use]
    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    #[must_use]
    pub fn with_wal(mut self, wal: bool) -> Self {
        self.wal = wal;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keyword_connection_string() {
        let endpoint: Endpoint =
            "HOSTNAME=localhost;PORT=50000;DATABASE=SAMPLE;UID=DB2INST1;PWD=db2inst1"
                .parse()
                .unwrap();
        assert_eq!(endpoint.host, "localhost");
        assert_eq!(endpoint.port, 50000);
        assert_eq!(endpoint.database, "SAMPLE");
        assert_eq!(endpoint.user, "DB2INST1");
        assert_eq!(endpoint.password(), "db2inst1");
    }

    #[test]
    fn keyword_string_requires_every_field() {
        let err = "HOSTNAME=localhost;PORT=50000;DATABASE=SAMPLE;UID=DB2INST1"
            .parse::<Endpoint>()
            .unwrap_err();
        assert!(matches!(err, SqlUowError::ConfigError(msg) if msg.contains("password")));
    }

    #[test]
    fn rejects_bad_port_and_unknown_keys() {
        assert!("HOST=localhost;PORT=x".parse::<Endpoint>().is_err());
        assert!("HOST=localhost;COLOR=blue".parse::<Endpoint>().is_err());
        assert!("HOST=localhost;PORT".parse::<Endpoint>().is_err());
    }

    #[test]
    fn json_requires_every_field() {
        let ok = Endpoint::from_json(
            r#"{"host":"localhost","port":1,"database":":memory:","user":"u","password":""}"#,
        )
        .unwrap();
        assert_eq!(ok.database, ":memory:");

        let err = Endpoint::from_json(r#"{"host":"localhost","port":1,"database":"d","user":"u"}"#)
            .unwrap_err();
        assert!(format!("{err}").contains("password"));
    }

    #[test]
    fn validation_rejects_empty_fields() {
        assert!(Endpoint::new("", 1, "d", "u", "p").is_err());
        assert!(Endpoint::new("localhost", 0, "d", "u", "p").is_err());
        assert!(Endpoint::new("localhost", 1, " ", "u", "p").is_err());
    }

    #[test]
    fn debug_redacts_password() {
        let endpoint = Endpoint::new("localhost", 1, "d", "u", "hunter2").unwrap();
        let debug = format!("{endpoint:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn loopback_detection() {
        assert!(Endpoint::new("LOCALHOST", 1, "d", "u", "p").unwrap().is_loopback());
        assert!(!Endpoint::new("db.example.com", 1, "d", "u", "p").unwrap().is_loopback());
    }
}
