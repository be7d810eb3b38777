use actix_web::{web, HttpServer};

use server::build_app;
use server::config::ServerConfig;
use server::session::SessionRegistry;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (for development)
    // Try loading from current directory first, then from server/ directory
    if dotenvy::dotenv().is_err() {
        dotenvy::from_filename("server/.env").ok();
    }

    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    log::info!("Starting todo challenge server...");
    log::info!("Protocol version: {}", protocol::protocol_version());

    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| "server/config/server.toml".to_string());

    let mut config = if std::path::Path::new(&config_path).exists() {
        ServerConfig::load_from_file(&config_path)?
    } else {
        log::warn!(
            "Config file '{}' not found, using defaults. Set CONFIG_PATH to override.",
            config_path
        );
        ServerConfig::default()
    };
    config.apply_env_overrides()?;

    log::info!(
        "Limits: {} bytes per body, {} todos per challenger",
        config.max_body_bytes,
        config.max_todos
    );

    let sessions = web::Data::new(SessionRegistry::from_config(&config)?);
    let host = config.host.clone();
    let port = config.port;
    let config = web::Data::new(config);

    log::info!("Starting HTTP server at {}:{}...", host, port);

    HttpServer::new(move || build_app(sessions.clone(), config.clone()))
        .bind((host, port))?
        .run()
        .await?;

    Ok(())
}
