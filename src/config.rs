//! Environment configuration.
use anyhow::{bail, Context, Result};
use std::net::SocketAddr;

pub const DEFAULT_PORT: u16 = 3030;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_ms: u64,
}

/// Bearer tokens accepted by the service, as `(subject, token)` pairs.
#[derive(Debug, Clone, Default)]
pub struct AccessTokens {
    pub admin: Vec<(String, String)>,
    pub user: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub storage: StorageBackend,
    pub postgres: Option<PostgresConfig>,
    pub tokens: AccessTokens,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = match lookup("SURVEY_BIND") {
            Some(value) => value.parse().with_context(|| "parse SURVEY_BIND")?,
            None => {
                let port = match lookup("PORT") {
                    Some(value) => value
                        .parse::<u16>()
                        .with_context(|| "PORT must be a valid number")?,
                    None => DEFAULT_PORT,
                };
                SocketAddr::from(([0, 0, 0, 0], port))
            }
        };

        let database_url = lookup("DATABASE_URL").filter(|value| !value.trim().is_empty());
        let storage = match lookup("SURVEY_STORAGE").as_deref() {
            Some("memory") => StorageBackend::Memory,
            Some("postgres") => StorageBackend::Postgres,
            Some(other) => bail!("unknown SURVEY_STORAGE backend: {other}"),
            None if database_url.is_some() => StorageBackend::Postgres,
            None => StorageBackend::Memory,
        };

        let postgres = match database_url {
            Some(url) => Some(PostgresConfig {
                url,
                max_connections: match lookup("DATABASE_MAX_CONNECTIONS") {
                    Some(value) => value
                        .parse()
                        .with_context(|| "parse DATABASE_MAX_CONNECTIONS")?,
                    None => DEFAULT_MAX_CONNECTIONS,
                },
                connect_timeout_ms: match lookup("DATABASE_CONNECT_TIMEOUT_MS") {
                    Some(value) => value
                        .parse()
                        .with_context(|| "parse DATABASE_CONNECT_TIMEOUT_MS")?,
                    None => DEFAULT_CONNECT_TIMEOUT_MS,
                },
            }),
            None => None,
        };
        if storage == StorageBackend::Postgres && postgres.is_none() {
            bail!("DATABASE_URL must be set for the postgres backend");
        }

        let tokens = AccessTokens {
            admin: parse_tokens(lookup("SURVEY_ADMIN_TOKENS").as_deref(), "admin"),
            user: parse_tokens(lookup("SURVEY_USER_TOKENS").as_deref(), "user"),
        };

        Ok(Self {
            bind_addr,
            storage,
            postgres,
            tokens,
            cors_origins: split_list(lookup("SURVEY_CORS_ORIGINS").as_deref()),
        })
    }
}

// Entries are either `subject:token` or a bare token, which gets a numbered
// subject derived from the role.
fn parse_tokens(raw: Option<&str>, role: &str) -> Vec<(String, String)> {
    split_list(raw)
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| {
            if let Some((subject, token)) = entry.split_once(':') {
                if !subject.is_empty() && !token.is_empty() {
                    return (subject.to_string(), token.to_string());
                }
            }
            (format!("{role}-{}", idx + 1), entry)
        })
        .collect()
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
