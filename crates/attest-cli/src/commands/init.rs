//! `attest init` — Write a default configuration file.

use clap::Args;
use std::path::Path;

use crate::config::AttestConfig;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing configuration file.
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: &InitArgs, config_path: &Path) -> anyhow::Result<()> {
    if config_path.exists() && !args.force {
        anyhow::bail!(
            "configuration file already exists at {}",
            config_path.display()
        );
    }

    AttestConfig::default().save(config_path)?;
    tracing::info!(path = %config_path.display(), "wrote default configuration");

    println!("Initialized Attest configuration at {}", config_path.display());
    println!();
    println!("Next steps:");
    println!("  1. Set [requirements] to the attributes your application needs");
    println!("  2. Run `attest verify --submission <file>`");

    Ok(())
}
