//! Init command - write a default configuration file.

use std::path::Path;

use clap::Args;
use demtiler::config::ConfigFile;

use crate::error::CliError;

/// Arguments for `demtiler init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Run the init command against `path`.
pub fn run(args: InitArgs, path: &Path) -> Result<(), CliError> {
    if path.exists() && !args.force {
        println!("Configuration file already exists: {}", path.display());
        println!("Use --force to replace it with the defaults.");
        return Ok(());
    }

    ConfigFile::default().save_to(path)?;

    println!("Configuration file: {}", path.display());
    println!();
    println!("Edit this file to customize tiling defaults.");
    println!("CLI arguments override config file values when specified.");
    Ok(())
}
