use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use saas_pricing_calculator::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let command = args.get_command();

    // The server initializes tracing from its own configuration
    if !matches!(command, cli::Commands::Start) {
        init_tracing();
    }

    match command {
        cli::Commands::Start => {
            commands::start::execute(&args.config).await?;
        }
        cli::Commands::Calculate { input } => {
            commands::calculate::execute(&input)?;
        }
        cli::Commands::Test => {
            commands::test::execute(&args.config)?;
        }
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show(&args.config)?,
            cli::ConfigCommands::Validate => commands::config::validate(&args.config)?,
        },
        cli::Commands::Version => {
            println!("SaaS Pricing Calculator v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
