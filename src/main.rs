use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use stellarview_site::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let command = args.get_command();

    // The server configures its own subscriber from the loaded config
    if !matches!(command, cli::Commands::Start) {
        init_tracing("warn", "text");
    }

    match command {
        cli::Commands::Start => {
            commands::start::execute(args.config).await?;
        }
        cli::Commands::Reload { pid } => {
            commands::reload::execute(pid)?;
        }
        cli::Commands::Test => {
            commands::test::execute(&args.config)?;
        }
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show(&args.config)?,
            cli::ConfigCommands::Validate => commands::config::validate(&args.config)?,
        },
        cli::Commands::Quote(quote_args) => {
            commands::quote::execute(&args.config, &quote_args)?;
        }
        cli::Commands::Contact(contact_args) => {
            commands::contact::execute(contact_args).await?;
        }
        cli::Commands::Version => {
            println!("Stellar View site v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
