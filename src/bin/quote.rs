use clap::Parser;
use shipquote_relay::config::RelayConfig;
use shipquote_relay::utils::{logger, validation::Validate};
use shipquote_relay::{MelhorEnvioClient, QuoteService, RawQuoteRequest};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "quote")]
#[command(about = "Runs a single shipment quote against Melhor Envio and prints the result")]
struct Args {
    /// Destination postal code (CEP), separators allowed
    #[arg(long)]
    cep: String,

    /// Total weight in kg
    #[arg(long, default_value = "0")]
    peso: f64,

    /// Length in cm
    #[arg(long, default_value = "0")]
    comprimento: f64,

    /// Width in cm
    #[arg(long, default_value = "0")]
    largura: f64,

    /// Height in cm
    #[arg(long, default_value = "0")]
    altura: f64,

    /// Path to TOML configuration file; environment variables are used when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// Abort if the provider has not answered after this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let config = match &args.config {
        Some(path) => RelayConfig::from_file(path)?,
        None => RelayConfig::from_env()?,
    };

    if let Err(e) = config.validate() {
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let service = QuoteService::new(MelhorEnvioClient::new(&config.provider), config.shipment);
    let request = RawQuoteRequest {
        cep_destino: Some(args.cep),
        peso_total: args.peso,
        comprimento: args.comprimento,
        largura: args.largura,
        altura: args.altura,
    };

    let outcome = match args.timeout_secs {
        Some(secs) => {
            service
                .quote_until(&request, tokio::time::sleep(Duration::from_secs(secs)))
                .await
        }
        None => service.quote(&request).await,
    };

    match outcome {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            if !result.has_carrier_rates() {
                eprintln!("⚠️ Only in-store pickup is available for this destination");
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("❌ Quote failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(if e.is_client_error() { 2 } else { 1 });
        }
    }
}
