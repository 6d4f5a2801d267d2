//! cimatrix CLI entrypoint.

use clap::Parser;

mod commands;
mod handlers;
mod logging;

use commands::Commands;

#[derive(Parser)]
#[command(name = "cimatrix")]
#[command(author, version, about = "CI build-job matrix generator for recipe repositories", long_about = None)]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_json);

    match cli.command {
        Commands::Generate {
            platform,
            recipe_type,
            split_by_build_types,
            repo,
            output,
            deny_duplicate_names,
        } => handlers::generate(handlers::GenerateArgs {
            platform,
            recipe_type,
            split_by_build_types,
            repo,
            output,
            deny_duplicate_names,
        })?,
        Commands::Detect { repo, json } => handlers::detect(&repo, json)?,
        Commands::Validate { path } => handlers::validate(&path)?,
        Commands::Schema => handlers::schema()?,
    }

    Ok(())
}
