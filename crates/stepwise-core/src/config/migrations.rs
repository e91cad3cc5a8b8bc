use serde::{Deserialize, Serialize};

/// Migration catalog configuration.
///
/// Filenames follow `<file_prefix><index>-<name><file_suffix>`, e.g.
/// `migration-0-create-users.sql`. Indices are plain non-negative integers
/// and are not required to be zero-padded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationsConfig {
    /// Directory containing migration files.
    #[serde(default = "default_dir")]
    pub dir: String,

    /// Path of the version marker file.
    #[serde(default = "default_version_file")]
    pub version_file: String,

    /// Filename prefix for migration files.
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// Filename suffix for migration files.
    #[serde(default = "default_file_suffix")]
    pub file_suffix: String,
}

impl Default for MigrationsConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            version_file: default_version_file(),
            file_prefix: default_file_prefix(),
            file_suffix: default_file_suffix(),
        }
    }
}

fn default_dir() -> String {
    "migrations".to_string()
}

fn default_version_file() -> String {
    ".migration-version".to_string()
}

fn default_file_prefix() -> String {
    "migration-".to_string()
}

fn default_file_suffix() -> String {
    ".sql".to_string()
}
