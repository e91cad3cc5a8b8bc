mod create;
mod migrate;
mod status;

pub use create::CreateCommand;
pub use migrate::{DownCommand, UpCommand};
pub use status::{StatusCommand, VersionCommand};

use anyhow::Result;
use clap::{Parser, Subcommand};

use stepwise_core::StepwiseConfig;

/// stepwise - sequential database schema migrations
#[derive(Parser)]
#[command(name = "stepwise")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Apply pending migrations up to a target version (default: all).
    Up(UpCommand),

    /// Revert migrations down to a target version (default: one step).
    Down(DownCommand),

    /// Create the next migration file.
    Create(CreateCommand),

    /// Print the current version.
    Version(VersionCommand),

    /// Show applied and pending migrations.
    Status(StatusCommand),
}

impl Cli {
    /// Execute the CLI command.
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Up(cmd) => cmd.execute().await,
            Commands::Down(cmd) => cmd.execute().await,
            Commands::Create(cmd) => cmd.execute().await,
            Commands::Version(cmd) => cmd.execute().await,
            Commands::Status(cmd) => cmd.execute().await,
        }
    }
}

/// Load configuration, applying the migrations-dir override.
fn load_config(config_path: &str, migrations_dir: Option<&str>) -> Result<StepwiseConfig> {
    let mut config = StepwiseConfig::load_or_default(config_path)?;
    if let Some(dir) = migrations_dir {
        config.migrations.dir = dir.to_string();
    }
    Ok(config)
}
