use crate::config::RelayConfig;
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "shipquote-relay")]
#[command(about = "Relays shipment quote requests to Melhor Envio")]
pub struct ServerArgs {
    /// Path to a TOML configuration file; environment variables are used when omitted
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override server.bind_address
    #[arg(long)]
    pub bind: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

impl ServerArgs {
    /// Loads the configuration source selected on the command line and applies overrides.
    pub fn load_config(&self) -> Result<RelayConfig> {
        let mut config = match &self.config {
            Some(path) => RelayConfig::from_file(path)?,
            None => RelayConfig::from_env()?,
        };

        if let Some(bind) = &self.bind {
            config.server.bind_address = bind.clone();
        }

        Ok(config)
    }
}
