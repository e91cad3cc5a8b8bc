pub mod db;
pub mod migrations;

pub use db::{Connection, PgConn};
pub use migrations::{
    CatalogEntry, MigrateOutcome, MigrationCatalog, MigrationGenerator, MigrationUnit, Migrator,
    SqlMigration, Status, StepReport, VersionStore,
};
