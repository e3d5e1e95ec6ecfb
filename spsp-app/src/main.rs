//! # SPSP Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Build the connector admin client
//! - Create the provisioning service
//! - Start the HTTP server

mod config;

use opentelemetry::global;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use connector_client::ConnectorClient;
use spsp_hex::{NewAccountService, inbound::HttpServer};

fn init_tracer() -> anyhow::Result<(sdktrace::Tracer, sdktrace::SdkTracerProvider)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // gRPC exporter with batch processing
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok((provider.tracer("spsp-service"), provider))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let (otel_tracer, otel_provider) = init_tracer()?;
    let telemetry = tracing_opentelemetry::layer().with_tracer(otel_tracer);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,spsp_app=debug,spsp_hex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry)
        .init();

    let config = config::Config::from_env()?;

    tracing::info!("Starting SPSP provisioning server on port {}", config.port);
    tracing::info!("Using connector: {}", config.connector_url);

    let client = ConnectorClient::with_timeout(
        &config.connector_url,
        &config.connector_username,
        &config.connector_password,
        config.connector_timeout,
    )?;

    let service = NewAccountService::new(client.clone(), client.clone(), config.provisioning);

    let server = HttpServer::with_rate_limit(service, client, config.rate_limit_per_minute);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    // Flush traces before exit
    if let Err(e) = otel_provider.shutdown() {
        tracing::warn!("Failed to flush traces on shutdown: {}", e);
    }
    Ok(())
}
