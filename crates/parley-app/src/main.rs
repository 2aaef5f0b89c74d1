mod app;
mod cli;
mod commands;
mod terminal;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use parley_ai::{OpenRouterClient, OpenRouterConfig, Session, Settings};
use parley_config::ParleyConfig;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app::{App, Flow};
use crate::terminal::TerminalSurface;

#[tokio::main]
async fn main() {
    let args = cli::parse();

    // Logging depends on the config, so load first and report afterwards.
    let config_path = match &args.config {
        Some(path) => Ok(path.clone()),
        None => parley_config::toml_loader::default_config_path(),
    };
    let loaded = config_path
        .as_ref()
        .map_err(|e| e.to_string())
        .and_then(|path| parley_config::load_config_from(path).map_err(|e| e.to_string()));

    let default_directive = loaded
        .as_ref()
        .map(|c| c.logging.level.directive())
        .unwrap_or("parley=info");
    let log_directive = match args.log_level.as_deref() {
        Some(level) if level.contains('=') => level.to_string(),
        Some(level) => format!("parley={level}"),
        None => default_directive.to_string(),
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| "parley=info".parse().unwrap()),
            ),
        )
        .init();

    info!("parley v{} starting", env!("CARGO_PKG_VERSION"));

    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            warn!("failed to load config: {e}, using defaults");
            ParleyConfig::default()
        }
    };
    if let Some(model) = args.model {
        config.provider.model = model;
    }
    let config_path = config_path.unwrap_or_else(|_| PathBuf::from("parley.toml"));

    let client = match OpenRouterClient::new(
        OpenRouterConfig::new()
            .with_endpoint(&config.provider.endpoint)
            .with_model(&config.provider.model)
            .with_referer(&config.provider.referer)
            .with_title(&config.provider.title),
    ) {
        Ok(client) => client,
        Err(e) => {
            error!("failed to create HTTP client: {e}");
            std::process::exit(1);
        }
    };
    info!(model = %config.provider.model, "using OpenRouter");

    let color = std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
    let session = Arc::new(Session::new(
        Arc::new(client),
        Arc::new(TerminalSurface::new(color)),
        Settings::new(&config.openrouter_api_key, &config.system_prompt),
    ));
    session.greet();

    let mut app = App::new(session, config, config_path);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if app.handle_line(&line).await == Flow::Quit {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                error!("failed to read input: {e}");
                break;
            }
        }
    }

    app.finish().await;
    info!("parley shut down");
}
