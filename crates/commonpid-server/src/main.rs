use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use commonpid_core::WorkStore;
use commonpid_server::{app_router, AppState, DEFAULT_DOCS_HOST};
use tokio::net::TcpListener;

/// Persistent-identifier resolver for scholarly works.
#[derive(Debug, Parser)]
#[command(name = "commonpid", version, about)]
struct Cli {
    /// Listen address.
    #[arg(long, default_value = "127.0.0.1:8017", env = "COMMONPID_ADDR")]
    addr: String,

    /// SQLite database path (":memory:" for an ephemeral store).
    #[arg(long, default_value = "works.db", env = "COMMONPID_DB")]
    database: String,

    /// Documentation host for legacy redirects.
    #[arg(long, default_value = DEFAULT_DOCS_HOST, env = "COMMONPID_DOCS_HOST")]
    docs_host: String,

    /// Contact email for the Crossref polite pool.
    #[arg(long, env = "COMMONPID_POLITE_EMAIL")]
    polite_email: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let store = if cli.database == ":memory:" {
        WorkStore::open_in_memory()?
    } else {
        WorkStore::open(&PathBuf::from(&cli.database))?
    };

    let state = Arc::new(AppState::new(
        store,
        cli.docs_host.clone(),
        cli.polite_email.as_deref(),
    )?);
    let app = app_router(state);

    let listener = TcpListener::bind(&cli.addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install ctrl-c handler");
    }
}
