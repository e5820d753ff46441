//! # Password Quiz Server
//!
//! ```bash
//! # Defaults: 0.0.0.0:8080, extended rule catalog
//! password-quiz
//!
//! # Environment, as on most PaaS hosts
//! PORT=3000 password-quiz
//!
//! # Older catalog, with attempted passwords in the log
//! password-quiz --rule-catalog standard --audit-attempts
//! ```
//!
//! Exit codes:
//! - 0: clean shutdown
//! - 1: configuration or logging setup error
//! - 2: the listening port could not be bound

use password_quiz::error::QuizError;
use password_quiz::server::{QuizServer, ServerConfig};
use std::process;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let config = ServerConfig::from_args();

    if let Err(e) = setup_logging(&config) {
        eprintln!("Failed to initialize logging: {e}");
        process::exit(1);
    }

    info!("Starting password quiz v{}", password_quiz::VERSION);
    info!("Configuration: {:?}", config);

    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let server = match QuizServer::bind(config).await {
        Ok(server) => server,
        Err(e) => exit_with(&e),
    };

    let shutdown = CancellationToken::new();
    tokio::spawn(cancel_on_signal(shutdown.clone()));

    match server.serve(shutdown).await {
        Ok(()) => info!("Server shut down cleanly"),
        Err(e) => exit_with(&e),
    }
}

fn exit_with(e: &QuizError) -> ! {
    error!("{}", e.internal_message());
    process::exit(e.exit_code());
}

/// Structured logging: JSON when `ENVIRONMENT=production`, pretty otherwise.
fn setup_logging(config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let is_production = std::env::var("ENVIRONMENT")
        .map(|env| env.to_lowercase() == "production")
        .unwrap_or(false);

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(config.log_level.inner()).into())
        .from_env()?
        .add_directive("hyper=info".parse()?);

    if is_production {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_target(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }

    Ok(())
}

/// Cancels `shutdown` on SIGINT or SIGTERM.
async fn cancel_on_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
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
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT (Ctrl+C)"),
        () = terminate => info!("Received SIGTERM"),
    }

    shutdown.cancel();
}
