// src/config.rs

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, net::SocketAddr, sync::Arc, time::Duration};

use crate::{db::PgManagerStore, services::ManagerService};

const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 3;

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_addr: SocketAddr,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        Self::from_vars(database_url, |key| env::var(key).ok())
    }

    // Separado de `from_env` para poder testar sem mexer no ambiente do processo.
    fn from_vars(
        database_url: String,
        var: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let server_addr: SocketAddr = var("SERVER_ADDR")
            .unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("SERVER_ADDR inválido")?;

        let max_connections: u32 = match var("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v.parse::<u32>().context("DATABASE_MAX_CONNECTIONS inválido")?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let acquire_timeout_secs: u64 = match var("DATABASE_ACQUIRE_TIMEOUT_SECS") {
            Some(v) => v.parse::<u64>().context("DATABASE_ACQUIRE_TIMEOUT_SECS inválido")?,
            None => DEFAULT_ACQUIRE_TIMEOUT_SECS,
        };

        Ok(Self {
            database_url,
            server_addr,
            max_connections,
            acquire_timeout: Duration::from_secs(acquire_timeout_secs),
        })
    }

    pub async fn connect(&self) -> anyhow::Result<PgPool> {
        let pool = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
            .connect(&self.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
        Ok(pool)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub manager_service: ManagerService,
}

impl AppState {
    // Monta o grafo de dependências em cima da pool
    pub fn new(db_pool: PgPool) -> Self {
        let manager_store = PgManagerStore::new(db_pool);
        Self::with_service(ManagerService::new(Arc::new(manager_store)))
    }

    pub fn with_service(manager_service: ManagerService) -> Self {
        Self { manager_service }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars("postgres://localhost/crm".into(), |key| vars.get(key).cloned())
    }

    #[test]
    fn uses_defaults_when_unset() {
        let config = config_with(&[]).unwrap();

        assert_eq!(config.server_addr, DEFAULT_SERVER_ADDR.parse::<SocketAddr>().unwrap());
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.acquire_timeout, Duration::from_secs(3));
    }

    #[test]
    fn reads_overrides() {
        let config = config_with(&[
            ("SERVER_ADDR", "127.0.0.1:8080"),
            ("DATABASE_MAX_CONNECTIONS", "20"),
            ("DATABASE_ACQUIRE_TIMEOUT_SECS", "10"),
        ])
        .unwrap();

        assert_eq!(config.server_addr.port(), 8080);
        assert_eq!(config.max_connections, 20);
        assert_eq!(config.acquire_timeout, Duration::from_secs(10));
    }

    #[test]
    fn rejects_garbage() {
        assert!(config_with(&[("SERVER_ADDR", "not-an-addr")]).is_err());
        assert!(config_with(&[("DATABASE_MAX_CONNECTIONS", "many")]).is_err());
    }
}
