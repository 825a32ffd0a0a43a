use std::path::Path;

use crate::cli::context::CliContext;
use crate::cli::output::print_structured;
use crate::config::TraceviewConfig;
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use tokio::fs;

#[derive(Args, Clone, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Clone, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration (file, defaults and environment)
    Show,

    /// Print the configuration file location
    Path,

    /// Validate the configuration file
    Validate,
}

pub async fn cmd_config(args: ConfigArgs, ctx: &CliContext) -> Result<()> {
    let path = ctx.config_path();
    match args.action {
        ConfigAction::Show => {
            if print_structured(ctx.output(), ctx.config())? {
                return Ok(());
            }
            println!("Current configuration ({}):", path.display());
            print!("{}", serde_yaml::to_string(ctx.config())?);
        }
        ConfigAction::Path => {
            println!("{}", path.display());
        }
        ConfigAction::Validate => match validate_config_file(path).await? {
            true => println!("Configuration file {} is valid", path.display()),
            false => println!(
                "No configuration file at {}; defaults are valid",
                path.display()
            ),
        },
    }

    Ok(())
}

/// `Ok(false)` when there is no file to validate.
async fn validate_config_file(path: &Path) -> Result<bool> {
    if !fs::try_exists(path).await? {
        return Ok(false);
    }
    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    serde_yaml::from_str::<TraceviewConfig>(&raw)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(true)
}
