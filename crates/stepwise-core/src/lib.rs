pub mod config;
pub mod error;

pub use config::{DatabaseConfig, MigrationsConfig, StepwiseConfig};
pub use error::{Result, StepwiseError};
