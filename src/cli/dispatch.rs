use super::actions::cmd_actions;
use super::config::cmd_config;
use super::env::CliArgs;
use super::inspect::cmd_inspect;
use super::timeline::{cmd_frame, cmd_hit, cmd_timeline};
use crate::cli::commands::Commands;
use crate::cli::context::CliContext;
use anyhow::Result;

pub async fn dispatch(cli: &CliArgs, ctx: &CliContext) -> Result<()> {
    match cli.command.clone() {
        Commands::Actions(args) => cmd_actions(args, ctx).await,
        Commands::Inspect(args) => cmd_inspect(args, ctx).await,
        Commands::Timeline(args) => cmd_timeline(args, ctx).await,
        Commands::Hit(args) => cmd_hit(args, ctx).await,
        Commands::Frame(args) => cmd_frame(args, ctx).await,
        Commands::Config(args) => cmd_config(args, ctx).await,
    }
}
