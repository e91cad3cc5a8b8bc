use anyhow::Result;
use clap::Parser;
use console::style;

use stepwise_runtime::{MigrationCatalog, MigrationGenerator};

/// Create the next migration file.
#[derive(Parser)]
pub struct CreateCommand {
    /// Migration name, e.g. "add-users".
    pub name: String,

    /// Configuration file path.
    #[arg(short, long, default_value = "stepwise.toml")]
    pub config: String,

    /// Migrations directory path (overrides the config).
    #[arg(short, long)]
    pub migrations_dir: Option<String>,
}

impl CreateCommand {
    pub async fn execute(self) -> Result<()> {
        let config = super::load_config(&self.config, self.migrations_dir.as_deref())?;

        let generator =
            MigrationGenerator::new(MigrationCatalog::from_config(&config.migrations));
        let path = generator.create(&self.name)?;

        println!(
            "  {} Created {}",
            style("✓").green(),
            style(path.display()).cyan()
        );
        Ok(())
    }
}
