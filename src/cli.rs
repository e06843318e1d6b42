use clap::{Parser, Subcommand};

use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "certily-api")]
#[command(about = "Certily API - Role-gated audit tracking for airport shops")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Port to listen on (overrides CERTILY_API_PORT / PORT)")]
    pub port: Option<u16>,

    #[arg(long, global = true, help = "Address to bind (overrides API_BIND_HOST)")]
    pub bind: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve,

    #[command(about = "Print the effective configuration as JSON, secrets omitted")]
    Config,

    #[command(about = "Check that the hosted backend is reachable")]
    Check,
}

impl Cli {
    /// Command-line flags win over the environment.
    pub fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(port) = self.port {
            config.api.port = port;
        }
        if let Some(bind) = &self.bind {
            config.api.bind_host = bind.clone();
        }
        config
    }

    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Serve)
    }
}
