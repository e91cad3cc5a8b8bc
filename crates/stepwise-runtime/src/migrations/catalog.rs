use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use stepwise_core::config::MigrationsConfig;
use stepwise_core::Result;

/// One migration file known to the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Numeric index parsed from the filename.
    pub index: u32,
    /// Free-text name portion of the filename.
    pub name: String,
    /// Full filename, e.g. `migration-0-create-users.sql`.
    pub file_name: String,
    /// Absolute or config-relative path to the file.
    pub path: PathBuf,
}

/// Ordered listing of migration files in a directory.
///
/// Files are matched by prefix and suffix and sorted ascending by filename
/// string. Indices are not required to be zero-padded, so unpadded
/// double-digit indices sort before single-digit ones (`migration-10-...`
/// sorts before `migration-2-...`); pad indices consistently if that
/// matters.
pub struct MigrationCatalog {
    dir: PathBuf,
    prefix: String,
    suffix: String,
}

impl MigrationCatalog {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    pub fn from_config(config: &MigrationsConfig) -> Self {
        Self::new(&config.dir, &config.file_prefix, &config.file_suffix)
    }

    /// Directory this catalog scans.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Filename prefix this catalog matches.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Filename suffix this catalog matches.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// List migration files, sorted ascending by filename.
    ///
    /// A missing directory yields an empty catalog. Files matching the
    /// naming convention whose index does not parse are skipped with a
    /// warning.
    pub fn list(&self) -> Result<Vec<CatalogEntry>> {
        if !self.dir.exists() {
            debug!("Migrations directory does not exist: {:?}", self.dir);
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();

        for dir_entry in std::fs::read_dir(&self.dir)? {
            let dir_entry = dir_entry?;
            let path = dir_entry.path();

            if !path.is_file() {
                continue;
            }

            let Some(file_name) = path.file_name().and_then(|s| s.to_str()) else {
                continue;
            };

            if file_name.len() < self.prefix.len() + self.suffix.len()
                || !file_name.starts_with(&self.prefix)
                || !file_name.ends_with(&self.suffix)
            {
                continue;
            }

            match self.parse_file_name(file_name) {
                Some((index, name)) => entries.push(CatalogEntry {
                    index,
                    name,
                    file_name: file_name.to_string(),
                    path,
                }),
                None => {
                    warn!("Skipping {}: no numeric index in filename", file_name);
                }
            }
        }

        // Sort by filename string, the order migrations are applied in
        entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));

        debug!("Catalog lists {} migration(s)", entries.len());
        Ok(entries)
    }

    /// Index parsed from the highest-sorted filename, or `None` if the
    /// catalog is empty.
    pub fn last_index(&self) -> Result<Option<u32>> {
        Ok(self.list()?.last().map(|entry| entry.index))
    }

    /// Extract `(index, name)` from the stem between prefix and suffix.
    fn parse_file_name(&self, file_name: &str) -> Option<(u32, String)> {
        let stem = &file_name[self.prefix.len()..file_name.len() - self.suffix.len()];

        match stem.split_once('-') {
            Some((index, name)) => Some((index.parse().ok()?, name.to_string())),
            None => Some((stem.parse().ok()?, String::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn catalog(dir: &TempDir) -> MigrationCatalog {
        MigrationCatalog::new(dir.path(), "migration-", ".sql")
    }

    #[test]
    fn test_list_empty_dir() {
        let dir = TempDir::new().unwrap();
        let entries = catalog(&dir).list().unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_list_nonexistent_dir() {
        let catalog = MigrationCatalog::new("/nonexistent/path", "migration-", ".sql");
        assert!(catalog.list().unwrap().is_empty());
        assert_eq!(catalog.last_index().unwrap(), None);
    }

    #[test]
    fn test_list_sorted() {
        let dir = TempDir::new().unwrap();

        // Create migrations out of order
        fs::write(dir.path().join("migration-1-second.sql"), "").unwrap();
        fs::write(dir.path().join("migration-0-first.sql"), "").unwrap();
        fs::write(dir.path().join("migration-2-third.sql"), "").unwrap();

        let entries = catalog(&dir).list().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].index, 0);
        assert_eq!(entries[0].name, "first");
        assert_eq!(entries[1].index, 1);
        assert_eq!(entries[2].index, 2);
        assert_eq!(entries[2].file_name, "migration-2-third.sql");
    }

    #[test]
    fn test_list_ignores_non_matching() {
        let dir = TempDir::new().unwrap();

        fs::write(dir.path().join("migration-0-real.sql"), "").unwrap();
        fs::write(dir.path().join("readme.txt"), "").unwrap();
        fs::write(dir.path().join("migration-1-backup.sql.bak"), "").unwrap();
        fs::write(dir.path().join("seed-0-data.sql"), "").unwrap();

        let entries = catalog(&dir).list().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].file_name, "migration-0-real.sql");
    }

    #[test]
    fn test_skips_unparsable_index() {
        let dir = TempDir::new().unwrap();

        fs::write(dir.path().join("migration-0-ok.sql"), "").unwrap();
        fs::write(dir.path().join("migration-abc-bad.sql"), "").unwrap();

        let entries = catalog(&dir).list().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].index, 0);
    }

    #[test]
    fn test_name_without_dash() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("migration-7.sql"), "").unwrap();

        let entries = catalog(&dir).list().unwrap();
        assert_eq!(entries[0].index, 7);
        assert_eq!(entries[0].name, "");
    }

    #[test]
    fn test_last_index() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("migration-0-a.sql"), "").unwrap();
        fs::write(dir.path().join("migration-1-b.sql"), "").unwrap();

        assert_eq!(catalog(&dir).last_index().unwrap(), Some(1));
    }

    #[test]
    fn test_unpadded_indices_sort_lexicographically() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("migration-2-old.sql"), "").unwrap();
        fs::write(dir.path().join("migration-10-new.sql"), "").unwrap();

        // Filename ordering, not numeric: "10" sorts before "2"
        let entries = catalog(&dir).list().unwrap();
        assert_eq!(entries[0].index, 10);
        assert_eq!(entries[1].index, 2);
        assert_eq!(catalog(&dir).last_index().unwrap(), Some(2));
    }
}
