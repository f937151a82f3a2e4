use anyhow::Result;
use chatwidget::{commands, config::Config, conversation::producer_from_config, logging, ui};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "chatwidget")]
#[command(version = "0.1.0")]
#[command(about = "AI chat widget with human handoff, in your terminal", long_about = None)]
struct Cli {
    /// Config file to use instead of ~/.chatwidget/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the app at a page path (/, /login, /register, /dashboard)
    Open { path: String },
    /// Print the dashboard summary
    Dashboard,
    /// Print the embed snippet for the configured widget
    Embed,
    /// Show the configuration file
    Config {
        /// Write the default configuration
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    // Installed first so warnings raised while loading the config are recorded
    let log_path = logging::init(&Config::log_dir_for(&config_path))?;
    info!(log = %log_path.display(), config = %config_path.display(), "chatwidget starting");
    let config = Config::load_from(&config_path)?;

    match cli.command {
        None => run_app(config, "/").await,
        Some(Commands::Open { path }) => run_app(config, &path).await,
        Some(Commands::Dashboard) => {
            commands::show_dashboard(&config);
            Ok(())
        }
        Some(Commands::Embed) => {
            commands::print_embed_code(&config);
            Ok(())
        }
        Some(Commands::Config { init }) => {
            if init {
                commands::init_config(&config_path)
            } else {
                commands::show_config(&config_path, &config)
            }
        }
    }
}

async fn run_app(config: Config, path: &str) -> Result<()> {
    let route = ui::Route::from_path(path)
        .ok_or_else(|| anyhow::anyhow!("No page at '{}'. Try /, /login, /register or /dashboard", path))?;

    info!(route = %route.path(), "Opening app");

    let producer = producer_from_config(&config.assistant)?;
    ui::app::run(config, producer, route).await
}
