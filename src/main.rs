use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use docs_presenter::config::loader::{load_config, load_routing_tables};
use docs_presenter::config::watcher::ControlWatcher;
use docs_presenter::config::DomainConfigStore;
use docs_presenter::http::HttpServer;
use docs_presenter::lifecycle::Shutdown;
use docs_presenter::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "docs-presenter", about = "Documentation presentation gateway")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "presenter.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_config(&args.config)?;
    logging::init(&config.observability.log_level);

    tracing::info!(config = %args.config.display(), "Configuration loaded");

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init(addr);
    }

    let tables = load_routing_tables(&config.control.path);
    let store = Arc::new(DomainConfigStore::new(tables));

    // Hot reload: the watcher recompiles the tables on any change under
    // the control directory and the task swaps them in atomically.
    let (watcher, mut reloads) = ControlWatcher::new(&config.control.path);
    let _watcher_handle = watcher.run()?;
    let reload_store = Arc::clone(&store);
    tokio::spawn(async move {
        while let Some(tables) = reloads.recv().await {
            tracing::info!(domains = tables.domain_count(), "Routing tables reloaded");
            reload_store.replace(tables);
        }
    });

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, store)?;
    server.run(listener, shutdown.subscribe()).await?;

    Ok(())
}
