use ::clickhouse::Client;

/// Connection settings for the ClickHouse HTTP interface.
#[derive(Debug, Clone)]
pub struct ClickHouseSettings {
    pub url: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

pub fn create_client(settings: &ClickHouseSettings) -> Client {
    let mut client = Client::default()
        .with_url(&settings.url)
        .with_user(&settings.user)
        .with_database(&settings.database);

    if !settings.password.is_empty() {
        client = client.with_password(&settings.password);
    }

    tracing::info!(url = %settings.url, database = %settings.database, "clickhouse client created");
    client
}
