use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use caldera_relay::caldera::CalderaClient;
use caldera_relay::config::Config;
use caldera_relay::relay::StatusRelay;
use caldera_relay::session::SessionDescriptor;
use caldera_relay::tracker::OperationTracker;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::from_default_env()
        .add_directive("caldera_relay=info".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);
    fmt().with_env_filter(env_filter).init();

    info!("Starting Caldera relay agent");

    // Configuration problems are fatal before the loop starts, but the
    // process still exits cleanly.
    let config = match Config::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!("{}", e);
            return Ok(());
        }
    };

    let session = match SessionDescriptor::load(&config.session_xml_path).await {
        Ok(session) => session,
        Err(e) => {
            error!("{}", e);
            return Ok(());
        }
    };
    info!(
        "Loaded session {} with {} fields",
        session.id,
        session.fields.len()
    );

    let caldera = Arc::new(CalderaClient::new(
        config.caldera_base_url(),
        config.caldera_api_token.clone(),
    ));
    let tracker = OperationTracker::new(caldera.clone(), config.artifact_dir.clone());
    let relay = StatusRelay::new(config, session, caldera, tracker);

    tokio::select! {
        _ = relay.run() => {}
        _ = shutdown_signal() => {}
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Graceful shutdown initiated");
}
