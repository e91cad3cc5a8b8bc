mod catalog;
mod generator;
mod migrator;
mod unit;
mod version;

pub use catalog::{CatalogEntry, MigrationCatalog};
pub use generator::MigrationGenerator;
pub use migrator::{MigrateOutcome, Migrator, Status, StepReport};
pub use unit::{MigrationUnit, SqlMigration};
pub use version::VersionStore;
