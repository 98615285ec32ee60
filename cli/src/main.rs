//! BMI Calculator
//!
//! Reads form commands from stdin and writes rendered views to stdout.
//! Logs go to stderr so they never mix with rendered output.

use anyhow::Result;
use bmi_calculator_cli::{config, session::run_session};
use tokio::io::BufReader;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    let config = config::AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if config::AppConfig::is_production() { "production" } else { "development" },
        debounce_ms = config.form.debounce_ms,
        "Starting BMI calculator"
    );

    let input = BufReader::new(tokio::io::stdin());
    let mut output = tokio::io::stdout();

    tokio::select! {
        summary = run_session(input, &mut output, &config) => {
            let summary = summary?;
            info!(commands = summary.commands, errors = summary.errors, "Shutdown complete");
        }
        _ = shutdown_signal() => {}
    }

    Ok(())
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config::AppConfig::is_production() {
            "bmi_calculator_cli=info,bmi_calculator_shared=info".into()
        } else {
            "bmi_calculator_cli=debug,bmi_calculator_shared=debug".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config::AppConfig::is_production() {
        // JSON logging for production (better for log aggregation)
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    }
}

/// Ctrl+C / SIGTERM handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, stopping session");
        }
        _ = terminate => {
            info!("Received SIGTERM, stopping session");
        }
    }
}
