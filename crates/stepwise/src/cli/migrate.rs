use anyhow::Result;
use clap::Parser;
use console::style;

use stepwise_runtime::{MigrateOutcome, Migrator, PgConn};

/// Apply pending migrations.
#[derive(Parser)]
pub struct UpCommand {
    /// Target version to migrate up to (default: all migrations).
    pub target: Option<u32>,

    /// Configuration file path.
    #[arg(short, long, default_value = "stepwise.toml")]
    pub config: String,

    /// Migrations directory path (overrides the config).
    #[arg(short, long)]
    pub migrations_dir: Option<String>,
}

impl UpCommand {
    pub async fn execute(self) -> Result<()> {
        // Load .env if present
        dotenvy::dotenv().ok();

        let config = super::load_config(&self.config, self.migrations_dir.as_deref())?;
        let migrator = Migrator::from_config(&config.migrations);

        println!();
        println!("  {} Migrations", style("stepwise").bold().cyan());
        println!();

        let mut conn = PgConn::connect(&config.database).await?;
        let outcome = migrator.up(&mut conn, self.target).await?;
        print_outcome(&outcome, &config.migrations.dir, "apply");
        Ok(())
    }
}

/// Revert applied migrations.
#[derive(Parser)]
pub struct DownCommand {
    /// Target version to migrate down to (default: one step back).
    pub target: Option<u32>,

    /// Configuration file path.
    #[arg(short, long, default_value = "stepwise.toml")]
    pub config: String,

    /// Migrations directory path (overrides the config).
    #[arg(short, long)]
    pub migrations_dir: Option<String>,
}

impl DownCommand {
    pub async fn execute(self) -> Result<()> {
        dotenvy::dotenv().ok();

        let config = super::load_config(&self.config, self.migrations_dir.as_deref())?;
        let migrator = Migrator::from_config(&config.migrations);

        println!();
        println!("  {} Migrations", style("stepwise").bold().cyan());
        println!();

        let mut conn = PgConn::connect(&config.database).await?;
        let outcome = migrator.down(&mut conn, self.target).await?;
        print_outcome(&outcome, &config.migrations.dir, "revert");
        Ok(())
    }
}

fn print_outcome(outcome: &MigrateOutcome, dir: &str, verb: &str) {
    match outcome {
        MigrateOutcome::NoMigrations => {
            println!("  {} No migrations found in {}", style("ℹ").blue(), dir);
        }
        MigrateOutcome::AlreadyAtTarget { version } => {
            println!(
                "  {} Already at version {}, nothing to {}",
                style("ℹ").blue(),
                version,
                verb
            );
        }
        MigrateOutcome::Applied {
            from,
            to,
            steps,
            finished_at,
        } => {
            for step in steps {
                println!("  {} {}", style("✓").green(), style(&step.file_name).cyan());
            }
            println!();
            println!(
                "  {} Version {} -> {} ({} step(s)) at {}",
                style("✓").green(),
                from,
                to,
                steps.len(),
                finished_at.format("%Y-%m-%d %H:%M:%S")
            );
        }
    }
    println!();
}
