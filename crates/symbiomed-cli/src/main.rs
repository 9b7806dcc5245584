mod cli;
mod commands;
mod config;
mod observability;
mod output;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use cli::{BundleCommands, Cli, Commands, ConditionCommands, ConfigArgs, ConfigCommands};
use config::Resolved;
use output::print_error;
use symbiomed_client::{ClientConfig, TerminologyClient};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    observability::init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    if let Commands::Config(args) = &cli.command {
        return run_config(args, &cli.profile);
    }

    let settings = config::resolve(
        cli.server.as_deref(),
        cli.format,
        cli.timeout,
        &config::load_profile(&cli.profile)?,
    )?;
    let client = make_client(&settings)?;
    let format = settings.format;

    match &cli.command {
        Commands::Search(args) => {
            commands::search::search(&client, &args.term, args.system, args.limit, format).await?;
        }
        Commands::Suggest(args) => {
            commands::suggest::suggest(&client, args.system, args.debounce_ms, format).await?;
        }
        Commands::Mapping(args) => {
            commands::mapping::mapping(&client, args, format).await?;
        }
        Commands::Lookup(args) => {
            commands::playground::lookup(&client, args, format).await?;
        }
        Commands::Translate(args) => {
            commands::playground::translate(&client, args, format).await?;
        }
        Commands::ValidateCode(args) => {
            commands::playground::validate_code(&client, args, format).await?;
        }
        Commands::Bundle(args) => match &args.command {
            BundleCommands::Get => commands::bundle::get(&client, format).await?,
            BundleCommands::Upload(upload) => {
                commands::bundle::upload(&client, &upload.file, format).await?
            }
        },
        Commands::Condition(args) => match &args.command {
            ConditionCommands::Create(create) => {
                commands::condition::create(&client, create, format).await?
            }
            ConditionCommands::Validate(dual) => {
                commands::condition::validate(&client, dual, format).await?
            }
        },
        Commands::Health => {
            commands::server::health(&client, format).await?;
        }
        Commands::Config(args) => run_config(args, &cli.profile)?,
    }

    Ok(())
}

fn run_config(args: &ConfigArgs, profile: &str) -> Result<()> {
    match &args.command {
        ConfigCommands::Show => {
            let cfg = config::load_profile(profile)?;
            println!("{}: {}", "Profile".cyan(), profile);
            println!(
                "{}: {}",
                "Server".cyan(),
                cfg.server.as_deref().unwrap_or("(not set)")
            );
            println!(
                "{}: {}",
                "Format".cyan(),
                cfg.format.as_deref().unwrap_or("text")
            );
            let timeout = cfg
                .timeout_secs
                .map(|s| format!("{s}s"))
                .unwrap_or_else(|| "(none)".to_string());
            println!("{}: {}", "Timeout".cyan(), timeout);
        }
        ConfigCommands::Set(set_args) => {
            let mut cfg = config::load_profile(profile)?;
            cfg.set(&set_args.key, &set_args.value)?;
            config::save_profile(profile, &cfg)?;
            output::print_success(&format!("Set {} = {}", set_args.key, set_args.value));
        }
    }
    Ok(())
}

fn make_client(settings: &Resolved) -> Result<TerminologyClient> {
    tracing::debug!(server = %settings.server, timeout = ?settings.timeout, "connecting");
    let mut client_config = ClientConfig::new(&settings.server);
    if let Some(timeout) = settings.timeout {
        client_config = client_config.with_timeout(timeout);
    }
    Ok(TerminologyClient::new(client_config)?)
}
