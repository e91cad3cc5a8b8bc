use chrono::{DateTime, Utc};
use tracing::{info, warn};

use stepwise_core::config::MigrationsConfig;
use stepwise_core::{Result, StepwiseError};

use super::catalog::{CatalogEntry, MigrationCatalog};
use super::unit::{MigrationUnit, SqlMigration};
use super::version::VersionStore;
use crate::db::Connection;

/// One successfully executed step.
#[derive(Debug, Clone)]
pub struct StepReport {
    pub index: u32,
    pub file_name: String,
}

/// Result of an `up`/`down` invocation that did not fail.
#[derive(Debug, Clone)]
pub enum MigrateOutcome {
    /// The catalog is empty; nothing to do.
    NoMigrations,
    /// Current version already equals the target; nothing to do.
    AlreadyAtTarget { version: u32 },
    /// The batch ran to completion and was committed.
    Applied {
        from: u32,
        to: u32,
        steps: Vec<StepReport>,
        finished_at: DateTime<Utc>,
    },
}

/// Applied/pending split of the catalog against the version marker.
#[derive(Debug, Clone)]
pub struct Status {
    pub version: u32,
    pub applied: Vec<CatalogEntry>,
    pub pending: Vec<CatalogEntry>,
}

/// Orchestrates sequential migration batches.
///
/// Each invocation runs inside a single transaction: any step failure rolls
/// back every step of the batch. The version marker advances after each
/// successful step and is restored to its pre-batch value whenever the
/// transaction rolls back, so the marker never ends up ahead of the
/// database.
pub struct Migrator {
    catalog: MigrationCatalog,
    store: VersionStore,
}

impl Migrator {
    pub fn new(catalog: MigrationCatalog, store: VersionStore) -> Self {
        Self { catalog, store }
    }

    pub fn from_config(config: &MigrationsConfig) -> Self {
        Self::new(
            MigrationCatalog::from_config(config),
            VersionStore::new(&config.version_file),
        )
    }

    /// Current version from the marker.
    pub fn version(&self) -> u32 {
        self.store.current()
    }

    /// Applied/pending split of the catalog. Read-only; needs no database.
    pub fn status(&self) -> Result<Status> {
        let version = self.store.current();
        let (applied, pending): (Vec<_>, Vec<_>) = self
            .catalog
            .list()?
            .into_iter()
            .partition(|entry| entry.index < version);

        Ok(Status {
            version,
            applied,
            pending,
        })
    }

    /// Apply migrations from the current version up to `target`
    /// (default: all of them).
    pub async fn up(
        &self,
        conn: &mut dyn Connection,
        target: Option<u32>,
    ) -> Result<MigrateOutcome> {
        let entries = self.catalog.list()?;
        if entries.is_empty() {
            return Ok(MigrateOutcome::NoMigrations);
        }

        let current = self.store.current();
        let available = entries.len();
        let target = target.map(i64::from).unwrap_or(available as i64);

        if target == i64::from(current) {
            return Ok(MigrateOutcome::AlreadyAtTarget { version: current });
        }
        if target < i64::from(current) || target > available as i64 {
            return Err(StepwiseError::OutOfRange {
                target,
                current,
                available,
            });
        }
        let target = target as u32;

        conn.begin().await?;

        let mut steps = Vec::new();
        for index in current..target {
            match self.run_step(conn, &entries, index, Direction::Up).await {
                Ok(step) => steps.push(step),
                Err(e) => {
                    self.abort(conn, current).await;
                    return Err(e);
                }
            }
        }

        if let Err(e) = conn.commit().await {
            self.abort(conn, current).await;
            return Err(e);
        }

        Ok(MigrateOutcome::Applied {
            from: current,
            to: target,
            steps,
            finished_at: Utc::now(),
        })
    }

    /// Revert migrations from the current version down to `target`
    /// (default: one step back).
    pub async fn down(
        &self,
        conn: &mut dyn Connection,
        target: Option<u32>,
    ) -> Result<MigrateOutcome> {
        let entries = self.catalog.list()?;
        if entries.is_empty() {
            return Ok(MigrateOutcome::NoMigrations);
        }

        let current = self.store.current();
        let target = target.map(i64::from).unwrap_or(i64::from(current) - 1);

        if target == i64::from(current) {
            return Ok(MigrateOutcome::AlreadyAtTarget { version: current });
        }
        if target < 0 || target > i64::from(current) {
            return Err(StepwiseError::OutOfRange {
                target,
                current,
                available: entries.len(),
            });
        }
        let target = target as u32;

        conn.begin().await?;

        let mut steps = Vec::new();
        for index in (target..current).rev() {
            match self.run_step(conn, &entries, index, Direction::Down).await {
                Ok(step) => steps.push(step),
                Err(e) => {
                    self.abort(conn, current).await;
                    return Err(e);
                }
            }
        }

        if let Err(e) = conn.commit().await {
            self.abort(conn, current).await;
            return Err(e);
        }

        Ok(MigrateOutcome::Applied {
            from: current,
            to: target,
            steps,
            finished_at: Utc::now(),
        })
    }

    /// Load the unit at `index`, run it in the given direction, and advance
    /// the marker.
    async fn run_step(
        &self,
        conn: &mut dyn Connection,
        entries: &[CatalogEntry],
        index: u32,
        direction: Direction,
    ) -> Result<StepReport> {
        let entry = entries
            .iter()
            .find(|entry| entry.index == index)
            .ok_or(StepwiseError::MissingMigration(index))?;

        let unit = SqlMigration::load(&entry.path)?;

        let result = match direction {
            Direction::Up => unit.up(conn).await,
            Direction::Down => unit.down(conn).await,
        };
        result.map_err(|e| StepwiseError::StepFailed {
            name: unit.name().to_string(),
            detail: e.to_string(),
        })?;

        let new_version = match direction {
            Direction::Up => index + 1,
            Direction::Down => index,
        };
        self.store.set(new_version)?;

        info!(
            "{} {} (version {})",
            direction.past_tense(),
            entry.file_name,
            new_version
        );

        Ok(StepReport {
            index,
            file_name: entry.file_name.clone(),
        })
    }

    /// Best-effort rollback and marker restore after a failed batch.
    async fn abort(&self, conn: &mut dyn Connection, restore_to: u32) {
        if let Err(e) = conn.rollback().await {
            warn!("Failed to roll back transaction: {}", e);
        }
        if let Err(e) = self.store.set(restore_to) {
            warn!("Failed to restore version marker: {}", e);
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Up,
    Down,
}

impl Direction {
    fn past_tense(self) -> &'static str {
        match self {
            Direction::Up => "Applied",
            Direction::Down => "Reverted",
        }
    }
}
