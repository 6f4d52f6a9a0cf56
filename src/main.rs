use clap::Parser;
use shipquote_relay::utils::{logger, validation::Validate};
use shipquote_relay::{router, MelhorEnvioClient, QuoteService, ServerArgs};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServerArgs::parse();

    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting shipquote-relay");

    let config = match args.load_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Failed to load configuration: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if args.verbose {
        tracing::debug!("Relay config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let bind_address = config.bind_address()?;

    let provider = MelhorEnvioClient::new(&config.provider);
    tracing::info!("Provider endpoint: {}", provider.calculate_url());

    let service = Arc::new(QuoteService::new(provider, config.shipment.clone()));
    let app = router(service, &config.server.allowed_origins);

    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    tracing::info!("✅ Listening on {}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
