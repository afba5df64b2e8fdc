use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;

// Service configuration sourced from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub metrics_bind: SocketAddr,
    pub storage: StorageBackend,
    pub postgres: Option<PostgresConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
struct ServiceConfigOverride {
    bind_addr: Option<String>,
    metrics_bind: Option<String>,
    storage: Option<String>,
    database_url: Option<String>,
}

fn parse_storage(value: &str) -> Result<StorageBackend> {
    match value {
        "memory" => Ok(StorageBackend::Memory),
        "postgres" => Ok(StorageBackend::Postgres),
        other => bail!("unknown storage backend: {other} (expected memory or postgres)"),
    }
}

fn postgres_from_url(url: String) -> PostgresConfig {
    PostgresConfig {
        url,
        max_connections: 10,
        acquire_timeout_ms: 5_000,
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = std::env::var("PAWHAVEN_BIND")
            .unwrap_or_else(|_| "0.0.0.0:8000".to_string())
            .parse()
            .with_context(|| "parse PAWHAVEN_BIND")?;
        let metrics_bind = std::env::var("PAWHAVEN_METRICS_BIND")
            .unwrap_or_else(|_| "0.0.0.0:9100".to_string())
            .parse()
            .with_context(|| "parse PAWHAVEN_METRICS_BIND")?;
        let storage = parse_storage(
            &std::env::var("PAWHAVEN_STORAGE").unwrap_or_else(|_| "memory".to_string()),
        )?;
        let postgres = std::env::var("PAWHAVEN_DATABASE_URL").ok().map(postgres_from_url);
        Ok(Self { bind_addr, metrics_bind, storage, postgres })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("PAWHAVEN_CONFIG") {
            let contents =
                fs::read_to_string(&path).with_context(|| format!("read PAWHAVEN_CONFIG: {path}"))?;
            let override_cfg: ServiceConfigOverride =
                serde_yaml::from_str(&contents).with_context(|| "parse service config yaml")?;
            if let Some(value) = override_cfg.bind_addr {
                config.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
            }
            if let Some(value) = override_cfg.metrics_bind {
                config.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
            }
            if let Some(value) = override_cfg.storage {
                config.storage = parse_storage(&value)?;
            }
            if let Some(value) = override_cfg.database_url {
                config.postgres = Some(postgres_from_url(value));
            }
        }
        Ok(config)
    }
}
