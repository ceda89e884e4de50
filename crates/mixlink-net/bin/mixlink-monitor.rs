//! Console monitor
//!
//! Connects to a console and logs every state change until the connection drops.
//!
//! Usage: `mixlink-monitor <host> [model] [port]`

use mixlink_core::{Catalog, Session, SessionConfig, StoreEvent};
use mixlink_net::{connect, ConnectionConfig, Result, DEFAULT_PORT};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let Some(host) = args.next() else {
        eprintln!("usage: mixlink-monitor <host> [model] [port]");
        std::process::exit(2);
    };
    let model = args.next().unwrap_or_else(|| "CL/QL".to_string());
    let port = match args.next() {
        Some(p) => p
            .parse()
            .map_err(|_| mixlink_core::Error::InvalidConfig(format!("invalid port '{p}'")))?,
        None => DEFAULT_PORT,
    };

    let catalog = Arc::new(Catalog::load(&model)?);
    tracing::info!("Loaded {} controls for {}", catalog.len(), catalog.model());
    let session = Session::new(catalog, SessionConfig::with_model(&model))?;

    let config = ConnectionConfig {
        host,
        port,
        ..Default::default()
    };
    let (console, task) = connect(config, session).await?;
    let events = console.store_events().await?;

    // crossbeam receivers block; the loop ends when the session drops its sender
    let printer = tokio::task::spawn_blocking(move || {
        for event in events.iter() {
            match event {
                StoreEvent::Changed {
                    address,
                    x,
                    y,
                    value,
                } => tracing::info!("{address} [{x}, {y}] = {value}"),
                StoreEvent::Cleared => tracing::info!("Console state cleared"),
            }
        }
    });

    let result = task.join().await;
    drop(console);
    let _ = printer.await;

    if let Err(e) = &result {
        tracing::error!("Monitor stopped: {e}");
    }
    result
}
