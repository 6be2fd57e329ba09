use arcade_shared::clients::ClickHouseSettings;
use serde::Deserialize;

/// Which event store backend the collector writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Clickhouse,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_store")]
    pub store: StoreKind,
    #[serde(default = "default_clickhouse_url")]
    pub clickhouse_url: String,
    #[serde(default = "default_clickhouse_user")]
    pub clickhouse_user: String,
    #[serde(default)]
    pub clickhouse_password: String,
    #[serde(default = "default_clickhouse_database")]
    pub clickhouse_database: String,
    #[serde(default = "default_track_body_limit")]
    pub track_body_limit: usize,
}

fn default_port() -> u16 { 3005 }
fn default_store() -> StoreKind { StoreKind::Clickhouse }
fn default_clickhouse_url() -> String { "http://localhost:8123".into() }
fn default_clickhouse_user() -> String { "default".into() }
fn default_clickhouse_database() -> String { "default".into() }
fn default_track_body_limit() -> usize { crate::DEFAULT_TRACK_BODY_LIMIT }

impl AppConfig {
    /// Read `ARCADE_ANALYTICS__*` environment variables, e.g.
    /// `ARCADE_ANALYTICS__CLICKHOUSE_URL`.
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("ARCADE_ANALYTICS").separator("__"))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    pub fn clickhouse(&self) -> ClickHouseSettings {
        ClickHouseSettings {
            url: self.clickhouse_url.clone(),
            user: self.clickhouse_user.clone(),
            password: self.clickhouse_password.clone(),
            database: self.clickhouse_database.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source_uses_defaults() {
        let config: AppConfig = config::Config::builder()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.port, 3005);
        assert_eq!(config.store, StoreKind::Clickhouse);
        assert_eq!(config.clickhouse_url, "http://localhost:8123");
        assert_eq!(config.clickhouse_password, "");
        assert_eq!(config.track_body_limit, crate::DEFAULT_TRACK_BODY_LIMIT);
    }

    #[test]
    fn overrides_apply() {
        let config: AppConfig = config::Config::builder()
            .set_override("store", "memory")
            .unwrap()
            .set_override("port", 4000)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.store, StoreKind::Memory);
        assert_eq!(config.port, 4000);
        assert_eq!(config.clickhouse().database, "default");
    }
}
