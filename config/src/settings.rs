//! Typed, validated settings built once at startup.
//!
//! Every component receives its slice of [`Settings`] at construction time; nothing reads the
//! process environment after [`Settings::from_env`] returns.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_ADDR: &str = "127.0.0.1:8000";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Which statements the executor lets through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SqlPolicy {
    /// Single read statement only (SELECT, WITH, SHOW, DESCRIBE, EXPLAIN).
    #[default]
    ReadOnly,
    /// Anything the model produces is executed as-is.
    Unrestricted,
}

impl FromStr for SqlPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "read_only" | "readonly" => Ok(Self::ReadOnly),
            "unrestricted" => Ok(Self::Unrestricted),
            other => Err(format!(
                "unknown policy {:?} (use read_only or unrestricted)",
                other
            )),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub port: u16,
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("port", &self.port)
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
    /// Scheme + host, without the `/v1beta/...` path.
    pub base_url: String,
}

impl fmt::Debug for GeminiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiSettings")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerSettings {
    pub addr: String,
}

/// Caps applied while inspecting the schema. `None` means unlimited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SchemaLimits {
    pub max_tables: Option<usize>,
    pub max_columns: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub gemini: GeminiSettings,
    pub server: ServerSettings,
    pub schema_limits: SchemaLimits,
    pub sql_policy: SqlPolicy,
}

impl Settings {
    /// Reads and validates the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup. Empty (or whitespace-only) values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let host = required("MYSQL_HOST")?;
        let user = required("MYSQL_USER")?;
        let password = required("MYSQL_PASSWORD")?;
        let database = required("MYSQL_DATABASE")?;
        let port = parse_value::<u16>("MYSQL_PORT", &required("MYSQL_PORT")?)?;
        let api_key = required("GEMINI_API_KEY")?;

        let sql_policy = match get("SQL_POLICY") {
            Some(v) => v.parse().map_err(|reason| ConfigError::Invalid {
                name: "SQL_POLICY",
                reason,
            })?,
            None => SqlPolicy::default(),
        };
        let schema_limits = SchemaLimits {
            max_tables: get("SCHEMA_MAX_TABLES")
                .map(|v| parse_value("SCHEMA_MAX_TABLES", &v))
                .transpose()?,
            max_columns: get("SCHEMA_MAX_COLUMNS")
                .map(|v| parse_value("SCHEMA_MAX_COLUMNS", &v))
                .transpose()?,
        };

        Ok(Self {
            database: DatabaseSettings {
                host,
                user,
                password,
                database,
                port,
            },
            gemini: GeminiSettings {
                api_key,
                model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                base_url: get("GEMINI_BASE_URL")
                    .map(|u| u.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            },
            server: ServerSettings {
                addr: get("NL2SQL_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string()),
            },
            schema_limits,
            sql_policy,
        })
    }
}

fn parse_value<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        reason: format!("{:?}: {}", raw, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("MYSQL_HOST", "localhost"),
            ("MYSQL_USER", "root"),
            ("MYSQL_PASSWORD", "secret"),
            ("MYSQL_DATABASE", "shop"),
            ("MYSQL_PORT", "3306"),
            ("GEMINI_API_KEY", "key-123"),
        ])
    }

    fn build(vars: &HashMap<&'static str, &'static str>) -> Result<Settings, ConfigError> {
        Settings::from_lookup(|k| vars.get(k).map(|v| v.to_string()))
    }

    #[test]
    fn required_variables_produce_settings_with_defaults() {
        let s = build(&full()).unwrap();
        assert_eq!(s.database.host, "localhost");
        assert_eq!(s.database.port, 3306);
        assert_eq!(s.database.database, "shop");
        assert_eq!(s.gemini.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(s.gemini.base_url, DEFAULT_GEMINI_BASE_URL);
        assert_eq!(s.server.addr, DEFAULT_ADDR);
        assert_eq!(s.sql_policy, SqlPolicy::ReadOnly);
        assert_eq!(s.schema_limits, SchemaLimits::default());
    }

    #[test]
    fn each_required_variable_is_reported_when_absent() {
        for key in [
            "MYSQL_HOST",
            "MYSQL_USER",
            "MYSQL_PASSWORD",
            "MYSQL_DATABASE",
            "MYSQL_PORT",
            "GEMINI_API_KEY",
        ] {
            let mut vars = full();
            vars.remove(key);
            assert_eq!(build(&vars).unwrap_err(), ConfigError::Missing(key));
        }
    }

    #[test]
    fn blank_value_counts_as_missing() {
        let mut vars = full();
        vars.insert("GEMINI_API_KEY", "   ");
        assert_eq!(
            build(&vars).unwrap_err(),
            ConfigError::Missing("GEMINI_API_KEY")
        );
    }

    #[test]
    fn non_numeric_port_is_invalid() {
        let mut vars = full();
        vars.insert("MYSQL_PORT", "33o6");
        match build(&vars).unwrap_err() {
            ConfigError::Invalid { name, .. } => assert_eq!(name, "MYSQL_PORT"),
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn optional_overrides_are_applied() {
        let mut vars = full();
        vars.insert("GEMINI_MODEL", "gemini-1.5-flash");
        vars.insert("GEMINI_BASE_URL", "http://127.0.0.1:9999/");
        vars.insert("NL2SQL_ADDR", "0.0.0.0:8080");
        vars.insert("SQL_POLICY", "unrestricted");
        vars.insert("SCHEMA_MAX_TABLES", "5");
        vars.insert("SCHEMA_MAX_COLUMNS", "7");
        let s = build(&vars).unwrap();
        assert_eq!(s.gemini.model, "gemini-1.5-flash");
        assert_eq!(s.gemini.base_url, "http://127.0.0.1:9999");
        assert_eq!(s.server.addr, "0.0.0.0:8080");
        assert_eq!(s.sql_policy, SqlPolicy::Unrestricted);
        assert_eq!(s.schema_limits.max_tables, Some(5));
        assert_eq!(s.schema_limits.max_columns, Some(7));
    }

    #[test]
    fn unknown_policy_is_invalid() {
        let mut vars = full();
        vars.insert("SQL_POLICY", "yolo");
        assert!(matches!(
            build(&vars),
            Err(ConfigError::Invalid { name: "SQL_POLICY", .. })
        ));
    }

    #[test]
    fn policy_parsing_accepts_spellings() {
        assert_eq!("read-only".parse::<SqlPolicy>().unwrap(), SqlPolicy::ReadOnly);
        assert_eq!("READONLY".parse::<SqlPolicy>().unwrap(), SqlPolicy::ReadOnly);
        assert_eq!(
            " Unrestricted ".parse::<SqlPolicy>().unwrap(),
            SqlPolicy::Unrestricted
        );
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let s = build(&full()).unwrap();
        let dbg = format!("{:?}", s);
        assert!(!dbg.contains("secret"), "password leaked: {}", dbg);
        assert!(!dbg.contains("key-123"), "api key leaked: {}", dbg);
        assert!(dbg.contains("localhost"));
    }
}
