//! Lattice API server binary

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lattice_api::ApiServer;
use lattice_auth::AuthManager;
use lattice_common::Config;

#[derive(Parser)]
#[command(name = "lattice-api-server")]
#[command(author, version, about = "Lattice API server", long_about = None)]
struct Cli {
    /// Configuration file path (TOML or JSON)
    #[arg(short, long, env = "LATTICE_CONFIG")]
    config: Option<PathBuf>,

    /// Port to bind to
    #[arg(long, env = "LATTICE_PORT")]
    port: Option<u16>,

    /// If supplied, the required value of the API_KEY header
    #[arg(long, env = "LATTICE_API_AUTH_KEY", hide_env_values = true)]
    api_auth_key: Option<String>,

    /// File of `token,username` lines accepted as bearer tokens
    #[arg(long, env = "LATTICE_TOKEN_FILE")]
    token_file: Option<PathBuf>,

    /// Let requests without credentials through as anonymous
    #[arg(long)]
    allow_anonymous: bool,
}

impl Cli {
    async fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path).await?,
            None => Config::default(),
        };

        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(key) = self.api_auth_key {
            config.auth.api_key = Some(key);
        }
        if let Some(path) = self.token_file {
            config.auth.token_file = Some(path);
        }
        if self.allow_anonymous {
            config.auth.allow_anonymous = true;
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "lattice_api=info,lattice_auth=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Cli::parse().into_config().await?;

    let auth = Arc::new(AuthManager::from_config(&config.auth)?);
    info!(port = config.server.port, "Starting Lattice API server");

    ApiServer::new(config.server, auth).run().await
}
