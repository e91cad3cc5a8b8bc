mod postgres;

pub use postgres::PgConn;

use async_trait::async_trait;

use stepwise_core::Result;

/// Database collaborator interface.
///
/// The migrator drives the whole batch through one of these: plain statement
/// execution plus explicit transaction control. Everything in one invocation
/// happens on a single session, so `begin`/`commit`/`rollback` scope the
/// entire batch.
#[async_trait]
pub trait Connection: Send {
    /// Execute a single SQL statement.
    async fn execute(&mut self, statement: &str) -> Result<()>;

    /// Open a transaction.
    async fn begin(&mut self) -> Result<()>;

    /// Commit the open transaction.
    async fn commit(&mut self) -> Result<()>;

    /// Roll back the open transaction.
    async fn rollback(&mut self) -> Result<()>;
}
