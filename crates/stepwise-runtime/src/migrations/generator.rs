use std::path::PathBuf;

use chrono::Utc;
use tracing::info;

use stepwise_core::{Result, StepwiseError};

use super::catalog::MigrationCatalog;

/// Scaffolds new migration files.
pub struct MigrationGenerator {
    catalog: MigrationCatalog,
}

impl MigrationGenerator {
    pub fn new(catalog: MigrationCatalog) -> Self {
        Self { catalog }
    }

    /// Create the next migration file for `name`.
    ///
    /// Ensures the migrations directory exists, computes the next index from
    /// the catalog, and writes a boilerplate unit whose up/down sections are
    /// empty no-ops. Fails if the target file already exists.
    pub fn create(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() {
            return Err(StepwiseError::InvalidArgument(
                "migration name must not be empty".to_string(),
            ));
        }
        if name.contains('/') || name.contains('\\') {
            return Err(StepwiseError::InvalidArgument(format!(
                "migration name must not contain path separators: {}",
                name
            )));
        }

        std::fs::create_dir_all(self.catalog.dir()).map_err(|e| {
            StepwiseError::Config(format!(
                "Failed to create migrations directory {:?}: {}",
                self.catalog.dir(),
                e
            ))
        })?;

        let index = self.catalog.last_index()?.map_or(0, |last| last + 1);
        let file_name = format!(
            "{}{}-{}{}",
            self.catalog.prefix(),
            index,
            name,
            self.catalog.suffix()
        );
        let path = self.catalog.dir().join(&file_name);

        if path.exists() {
            return Err(StepwiseError::InvalidArgument(format!(
                "migration file already exists: {}",
                path.display()
            )));
        }

        let content = format!(
            "-- Migration: {}\n-- Created at: {}\n\n-- migrate:up\n\n\n-- migrate:down\n\n",
            name,
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        );
        std::fs::write(&path, content)?;

        info!("Created migration {}", file_name);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::SqlMigration;
    use std::fs;
    use tempfile::TempDir;

    fn generator(dir: &TempDir) -> MigrationGenerator {
        MigrationGenerator::new(MigrationCatalog::new(dir.path(), "migration-", ".sql"))
    }

    #[test]
    fn test_create_on_empty_catalog_is_index_zero() {
        let dir = TempDir::new().unwrap();

        let path = generator(&dir).create("foo").unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "migration-0-foo.sql"
        );
        assert!(path.exists());
    }

    #[test]
    fn test_create_increments_index() {
        let dir = TempDir::new().unwrap();
        let generator = generator(&dir);

        let first = generator.create("foo").unwrap();
        let second = generator.create("bar").unwrap();

        assert_eq!(
            second.file_name().unwrap().to_str().unwrap(),
            "migration-1-bar.sql"
        );
        assert_ne!(first, second);
    }

    #[test]
    fn test_create_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("db").join("steps");
        let generator =
            MigrationGenerator::new(MigrationCatalog::new(&nested, "migration-", ".sql"));

        let path = generator.create("init").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_create_refuses_existing_file() {
        // Unpadded indices sort lexicographically: with 9 and 10 on disk the
        // highest-sorted file is index 9, so the computed next index (10)
        // collides with the existing file.
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("migration-9-old.sql"), "").unwrap();
        fs::write(dir.path().join("migration-10-new.sql"), "").unwrap();

        let err = generator(&dir).create("new").unwrap_err();
        assert!(matches!(err, StepwiseError::InvalidArgument(_)));
    }

    #[test]
    fn test_create_rejects_bad_names() {
        let dir = TempDir::new().unwrap();
        let generator = generator(&dir);

        assert!(generator.create("").is_err());
        assert!(generator.create("a/b").is_err());
    }

    #[test]
    fn test_template_is_a_valid_noop_unit() {
        let dir = TempDir::new().unwrap();
        let path = generator(&dir).create("foo").unwrap();

        let unit = SqlMigration::load(&path).unwrap();
        assert!(unit.up_statements.is_empty());
        assert!(unit.down_statements.is_empty());
    }
}
