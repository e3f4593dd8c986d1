mod cli;
mod commands;
mod mcp;

use anyhow::Result;
use bilby::config::Config;
use bilby::logging::init_logging;
use bilby::pdf::{AdvancePolicy, SplitOptions};
use clap::Parser;
use cli::{ChunkArgs, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = Config::resolve(cli.config.as_deref())?;
    init_logging(&cfg.logging, cli.log_level.as_deref())?;

    match cli.command {
        Commands::Mcp => {
            mcp::run_server(cfg).await?;
        }
        Commands::Split {
            path,
            output_dir,
            chunks,
        } => {
            commands::split::run(&path, &output_dir, &split_options(&cfg, chunks))?;
        }
        Commands::Plan { path, chunks } => {
            commands::plan::run(&path, &split_options(&cfg, chunks))?;
        }
        Commands::ExtractText {
            path,
            local,
            output,
        } => {
            commands::extract_text::run(&cfg, &path, local, output.as_deref()).await?;
        }
        Commands::Translate {
            path,
            target,
            local,
            output,
        } => {
            commands::translate::run(&cfg, &path, target.as_deref(), local, output.as_deref())
                .await?;
        }
        Commands::Summarize {
            path,
            model,
            local,
            output,
        } => {
            commands::summarize::run(&cfg, &path, model.as_deref(), local, output.as_deref())
                .await?;
        }
    }

    Ok(())
}

fn split_options(cfg: &Config, args: ChunkArgs) -> SplitOptions {
    let mut options = cfg.split_options();
    if let Some(max) = args.max_pages {
        options.max_pages_per_chunk = max;
    }
    if args.legacy_advance {
        options.policy = AdvancePolicy::Legacy;
    }
    options
}
