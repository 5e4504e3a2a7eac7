use sea_orm::{Database, DatabaseConnection, DbErr};
use tracing::info;

use super::PostgresConfig;
use crate::common::{DatabaseError, DatabaseResult, RetryConfig, retry_with_backoff};

/// Open a pool using `config`, failing on the first error.
pub async fn connect(config: PostgresConfig) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(config.into_connect_options()).await?;
    info!("Connected to PostgreSQL");
    Ok(db)
}

/// Open a pool, retrying with exponential backoff while the server is unreachable.
///
/// ```ignore
/// use database::common::RetryConfig;
/// use database::postgres::{PostgresConfig, connect_with_retry};
///
/// let config = PostgresConfig::from_env()?;
/// let db = connect_with_retry(config, RetryConfig::new().with_max_retries(5)).await?;
/// ```
pub async fn connect_with_retry(
    config: PostgresConfig,
    retry: RetryConfig,
) -> DatabaseResult<DatabaseConnection> {
    let attempts = retry.max_retries + 1;

    retry_with_backoff(|| connect(config.clone()), retry)
        .await
        .map_err(|e| DatabaseError::ConnectionFailed {
            attempts,
            reason: e.to_string(),
        })
}
