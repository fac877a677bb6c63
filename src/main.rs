use clap::Parser;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod app;
mod cli;
mod commands;
mod config;
mod core;
mod display;
mod input;
mod providers;

use crate::app::Application;
use crate::cli::Args;
use crate::commands::create_command_registry;
use crate::config::Config;
use crate::core::connectivity::ConnectivityMonitor;
use crate::core::consent::{ConsentGate, FileConsentStore};
use crate::core::session::ChatSession;
use crate::providers::gemini::GeminiProvider;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::load()?;

    let api_key = config.resolve_api_key()?;
    let model = args.model.clone().unwrap_or_else(|| config.model());
    let provider =
        GeminiProvider::with_endpoint(config.base_url(), api_key, model, config.generation);

    let consent = ConsentGate::new(Box::new(FileConsentStore::new(Config::consent_path())));
    let mut session = ChatSession::new(Box::new(provider), consent);

    let mut renderer = display::Renderer::new();
    session.log_mut().subscribe(move |event| renderer.handle(event));

    let connectivity = ConnectivityMonitor::spawn(
        config.base_url(),
        Duration::from_secs(config.probe_interval_secs),
    );

    let command_dispatcher = create_command_registry();

    let mut application = Application::new(args, config, session, command_dispatcher, connectivity);
    application.run().await?;

    Ok(())
}
