mod cli;

use airjuke::{
    catalog::MediaSource,
    config,
    library::FsLibrary,
    net,
    server::{AppContext, MediaServer},
};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG if set, otherwise pick defaults from the verbose flag.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "airjuke=trace,tower_http=debug".to_string()
        } else {
            "airjuke=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Serve { host, port, roots } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(serve(host, port, roots, cli.config.as_deref()))
        }
        Commands::Scan { roots, json } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(scan(roots, json, cli.config.as_deref()))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("airjuke {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn serve(
    host: Option<String>,
    port: Option<u16>,
    roots: Vec<PathBuf>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    // CLI overrides beat the config file.
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    if !roots.is_empty() {
        config.library.roots = roots;
    }
    if config.library.roots.is_empty() {
        tracing::warn!("no library roots configured; the catalog will be empty");
    }

    let source = Arc::new(FsLibrary::new(config.library.clone()));
    let ctx = AppContext::new(source);

    // Initial catalog build. A failing source is logged here and degrades
    // to an empty but usable catalog.
    let (catalog, scan_error) = ctx.catalog.rebuild(ctx.source.as_ref()).await;
    if let Some(err) = scan_error {
        tracing::error!(error = %err, "initial library scan failed; starting with an empty catalog");
    }
    tracing::info!(tracks = catalog.len(), "catalog ready");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let server = MediaServer::new(ctx)
        .with_grace(Duration::from_secs(config.server.shutdown_grace_secs));
    let bound = server.start(addr).await?;

    match net::local_ipv4() {
        Some(ip) => tracing::info!("jukebox reachable at http://{}:{}", ip, bound.port()),
        None => tracing::warn!("no non-loopback IPv4 interface; remote clients cannot connect"),
    }

    shutdown_signal().await;
    server.stop().await;
    Ok(())
}

async fn scan(roots: Vec<PathBuf>, json: bool, config_path: Option<&Path>) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;
    if !roots.is_empty() {
        config.library.roots = roots;
    }

    let library = FsLibrary::new(config.library);
    let tracks = library.list_tracks().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tracks)?);
    } else {
        for track in &tracks {
            println!(
                "{:>20}  {}  —  {}",
                track.id,
                track.display_title(),
                track.artist.as_deref().unwrap_or("Unknown Artist"),
            );
        }
        println!("\n{} track(s)", tracks.len());
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Library roots: {}", config.library.roots.len());
            println!("  Extensions: {}", config.library.extensions.join(", "));
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
