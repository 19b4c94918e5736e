use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;

use daryl_bot::application::commands;
use daryl_bot::application::errors::BotError;
use daryl_bot::application::services::MessageService;
use daryl_bot::domain::entities::CommandRegistry;
use daryl_bot::infrastructure::adapters::SlackAdapter;
use daryl_bot::infrastructure::config::Config;

#[derive(Parser)]
#[command(name = "daryl")]
#[command(about = "d.a.r.y.l. - a Slack bot that answers commands", long_about = None)]
struct Cli {
    /// Slack bot token
    token: String,

    /// Config file path
    #[arg(short, long, default_value = "daryl.yaml")]
    config: String,
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match run_bot(&cli.config, &cli.token) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Bot stopped: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Load the config file if present. A file that exists but does not parse
/// or validate is an error; only a missing file falls back to defaults.
fn load_config(config_path: &str) -> Result<Config, BotError> {
    let config = if std::path::Path::new(config_path).exists() {
        Config::load(config_path)?.with_env()
    } else {
        tracing::info!("No config at {}, using defaults", config_path);
        Config::load_env()
    };
    config.validate()?;
    Ok(config)
}

fn run_bot(config_path: &str, token: &str) -> Result<(), BotError> {
    let config = load_config(config_path)?;

    tracing::info!("Starting {}", config.bot.name);

    let mut registry = CommandRegistry::new();
    commands::register_defaults(&mut registry, &config.handlers);
    tracing::info!("Registered {} commands", registry.len());
    let registry = Arc::new(registry);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| BotError::Internal(e.to_string()))?;

    rt.block_on(async {
        let transport = SlackAdapter::connect(token, &config.slack).await?;
        let mut service = MessageService::new(transport, registry);

        println!("d.a.r.y.l. ready, ^C exits");
        service.run().await
    })
}
