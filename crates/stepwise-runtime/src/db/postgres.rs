use std::time::Duration;

use async_trait::async_trait;
use sqlx::Connection as SqlxConnection;
use sqlx::PgConnection;
use tracing::debug;

use stepwise_core::config::DatabaseConfig;
use stepwise_core::{Result, StepwiseError};

use super::Connection;

/// PostgreSQL implementation of [`Connection`] over a single session.
///
/// A single `PgConnection` rather than a pool: the batch transaction must
/// stay on one session, and this tool runs one invocation at a time.
pub struct PgConn {
    conn: PgConnection,
}

impl PgConn {
    /// Connect using the resolved URL from configuration.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let url = config.resolve_url()?;
        let timeout = Duration::from_secs(config.connect_timeout_secs);

        let conn = tokio::time::timeout(timeout, PgConnection::connect(&url))
            .await
            .map_err(|_| {
                StepwiseError::Database(format!(
                    "Timed out connecting to database after {}s",
                    config.connect_timeout_secs
                ))
            })?
            .map_err(|e| StepwiseError::Database(format!("Failed to connect: {}", e)))?;

        debug!("Connected to database");
        Ok(Self { conn })
    }
}

#[async_trait]
impl Connection for PgConn {
    async fn execute(&mut self, statement: &str) -> Result<()> {
        sqlx::query(statement)
            .execute(&mut self.conn)
            .await
            .map_err(|e| StepwiseError::Database(format!("Failed to execute statement: {}", e)))?;
        Ok(())
    }

    async fn begin(&mut self) -> Result<()> {
        debug!("BEGIN");
        self.execute("BEGIN").await
    }

    async fn commit(&mut self) -> Result<()> {
        debug!("COMMIT");
        self.execute("COMMIT").await
    }

    async fn rollback(&mut self) -> Result<()> {
        debug!("ROLLBACK");
        self.execute("ROLLBACK").await
    }
}
