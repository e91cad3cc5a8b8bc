use anyhow::Result;
use clap::Parser;
use console::style;

use stepwise_runtime::Migrator;

/// Print the current version.
#[derive(Parser)]
pub struct VersionCommand {
    /// Configuration file path.
    #[arg(short, long, default_value = "stepwise.toml")]
    pub config: String,

    /// Migrations directory path (overrides the config).
    #[arg(short, long)]
    pub migrations_dir: Option<String>,
}

impl VersionCommand {
    pub async fn execute(self) -> Result<()> {
        let config = super::load_config(&self.config, self.migrations_dir.as_deref())?;
        let migrator = Migrator::from_config(&config.migrations);

        println!("Current version: {}", migrator.version());
        Ok(())
    }
}

/// Show applied and pending migrations.
#[derive(Parser)]
pub struct StatusCommand {
    /// Configuration file path.
    #[arg(short, long, default_value = "stepwise.toml")]
    pub config: String,

    /// Migrations directory path (overrides the config).
    #[arg(short, long)]
    pub migrations_dir: Option<String>,
}

impl StatusCommand {
    pub async fn execute(self) -> Result<()> {
        let config = super::load_config(&self.config, self.migrations_dir.as_deref())?;
        let migrator = Migrator::from_config(&config.migrations);

        let status = migrator.status()?;

        println!();
        println!("  {} Migration Status", style("stepwise").bold().cyan());
        println!();

        if status.applied.is_empty() && status.pending.is_empty() {
            println!(
                "  {} No migrations found in {}",
                style("ℹ").blue(),
                config.migrations.dir
            );
            println!();
            return Ok(());
        }

        if !status.applied.is_empty() {
            println!("  {} Applied:", style("✓").green());
            for entry in &status.applied {
                println!("    {} {}", style("✓").green(), style(&entry.file_name).cyan());
            }
        }

        if !status.pending.is_empty() {
            if !status.applied.is_empty() {
                println!();
            }
            println!("  {} Pending:", style("○").yellow());
            for entry in &status.pending {
                println!("    {} {}", style("→").dim(), style(&entry.file_name).yellow());
            }
        }

        println!();
        println!(
            "  {} version {}: {} applied, {} pending",
            style("ℹ").blue(),
            status.version,
            status.applied.len(),
            status.pending.len()
        );
        println!();

        Ok(())
    }
}
