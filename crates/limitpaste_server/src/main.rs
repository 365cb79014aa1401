//! Headless API server entrypoint.

use limitpaste_server::sweeper::{spawn_sweeper, sweep_once};
use limitpaste_server::{
    config::env_flag_enabled, serve_router, AppState, Config, Database, SystemClock, DEFAULT_PORT,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct CliFlags {
    help: bool,
    purge: bool,
}

fn parse_cli_flags(args: &[String]) -> anyhow::Result<CliFlags> {
    let mut flags = CliFlags::default();
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => flags.help = true,
            "--purge" => flags.purge = true,
            value if value.starts_with('-') => {
                anyhow::bail!(
                    "Unknown option: '{}'. Use --help to see supported options.",
                    value
                );
            }
            value => {
                anyhow::bail!(
                    "Unexpected positional argument: '{}'. Use --help to see supported options.",
                    value
                );
            }
        }
    }
    Ok(flags)
}

fn ensure_purge_allowed(config: &Config) -> anyhow::Result<()> {
    if config.test_mode {
        anyhow::bail!(
            "--purge is disabled while TEST_MODE is enabled; purging on the real clock \
            would hide pastes that simulated-clock reads can still see."
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "limitpaste=info,limitpaste_server=info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let cli_flags = parse_cli_flags(&args)?;

    if cli_flags.help {
        print_help();
        return Ok(());
    }

    let config = Config::from_env();
    let database = Database::new(&config.db_path)?;

    if cli_flags.purge {
        ensure_purge_allowed(&config)?;
        let purged = sweep_once(&database, &SystemClock)?;
        tracing::info!("Purged {} unavailable paste(s)", purged);
        return Ok(());
    }

    let state = AppState::new(config.clone(), database);
    if state.expiry_clock.test_mode() {
        tracing::warn!("TEST_MODE enabled - x-test-now-ms overrides expiry checks");
    }

    let allow_public = env_flag_enabled("ALLOW_PUBLIC_ACCESS");
    if allow_public {
        tracing::warn!("Public access enabled - server will accept requests from any origin");
    }

    let bind_addr = limitpaste_server::resolve_bind_address(&config, allow_public);
    if !bind_addr.ip().is_loopback() {
        tracing::warn!(
            "Binding to non-localhost address: {} - ensure proper security measures are in place",
            bind_addr
        );
    }

    let (sweep_stop, sweep_stop_rx) = tokio::sync::watch::channel(false);
    let sweeper = config.sweep_interval().map(|interval| {
        tracing::info!("Sweeping unavailable pastes every {}s", interval.as_secs());
        spawn_sweeper(
            state.db.clone(),
            Arc::new(SystemClock),
            interval,
            sweep_stop_rx,
        )
    });

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let actual_addr = listener.local_addr().unwrap_or(bind_addr);
    tracing::info!("LimitPaste running at http://{}", actual_addr);

    let serve_result = serve_router(listener, state, allow_public, shutdown_signal()).await;

    let _ = sweep_stop.send(true);
    if let Some(handle) = sweeper {
        if let Err(err) = handle.await {
            tracing::error!("Sweeper did not shut down cleanly: {}", err);
        }
    }

    serve_result?;
    tracing::info!("LimitPaste stopped");
    Ok(())
}

fn print_help() {
    println!("LimitPaste Server\n");
    println!("Usage: limitpaste [OPTIONS]\n");
    println!("Options:");
    println!("  --purge           Delete expired and exhausted pastes, then exit");
    println!("  --help            Show this help message");
    println!("\nEnvironment variables:");
    println!("  DB_PATH              Database directory (default: ~/.cache/limitpaste/db)");
    println!("  PORT                 Server port (default: {})", DEFAULT_PORT);
    println!(
        "  BIND                 Override bind address (e.g. 0.0.0.0:{})",
        DEFAULT_PORT
    );
    println!("  PUBLIC_URL           Base URL used in share links");
    println!("  MAX_PASTE_SIZE       Maximum request body in bytes (default: 10MB)");
    println!("  SWEEP_INTERVAL_SECS  Seconds between purge passes, 0 disables (default: 300, off in TEST_MODE)");
    println!("  TEST_MODE            Honor the x-test-now-ms header for expiry checks");
    println!("  ALLOW_PUBLIC_ACCESS  Allow CORS from any origin and non-loopback binds");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
