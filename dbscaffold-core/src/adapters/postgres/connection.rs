//! PostgreSQL pool creation.

use super::{PostgresSource, postgres_type_mapper};
use crate::Result;
use crate::adapters::ConnectionConfig;
use crate::error::ScaffoldError;
use sqlx::PgPool;

/// Default PostgreSQL port
pub const DEFAULT_POSTGRES_PORT: u16 = 5432;

impl PostgresSource {
    /// Connects to PostgreSQL with a single pooled connection.
    ///
    /// # Errors
    /// Returns error if:
    /// - The connection string is not a `postgres://` or `postgresql://` URL
    /// - The database cannot be reached
    pub async fn connect(connection_string: &str) -> Result<Self> {
        let config = ConnectionConfig::from_url(
            connection_string,
            &["postgres", "postgresql"],
            DEFAULT_POSTGRES_PORT,
        )?;

        tracing::info!("Connecting to PostgreSQL at {}", config);
        let pool = create_connection_pool(connection_string, &config).await?;

        Ok(Self {
            pool,
            config,
            type_mapper: postgres_type_mapper(),
        })
    }
}

/// Creates a PostgreSQL pool and opens its connection eagerly.
///
/// Every connection is put into read-only mode and tagged with the
/// application name.
async fn create_connection_pool(connection_string: &str, config: &ConnectionConfig) -> Result<PgPool> {
    use sqlx::Executor;

    sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.connect_timeout)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                let app_name = format!("dbscaffold-{}", env!("CARGO_PKG_VERSION"));
                conn.execute(format!("SET application_name = '{}'", app_name).as_str())
                    .await?;
                conn.execute("SET default_transaction_read_only = on").await?;
                Ok(())
            })
        })
        .connect(connection_string)
        .await
        .map_err(|e| ScaffoldError::connection_failed(connection_string, e))
}
