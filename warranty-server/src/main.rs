use clap::Parser;
use tokio::sync::broadcast;
use tracing_subscriber::{fmt, EnvFilter};
use warranty_core::WarrantyConfig;

use warranty_server::context;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "warranty.toml")]
    config: String,

    /// Check Postgres and exit.
    #[arg(long)]
    health: bool,

    /// Rebuild the knowledge index from the seed corpus and exit.
    #[arg(long)]
    rebuild_index: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env for local development; production uses real env vars
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let config = match WarrantyConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", args.config, e);
            std::process::exit(1);
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.service.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    if args.health {
        let pool = match warranty_core::db::create_pool(&config.database).await {
            Ok(p) => p,
            Err(e) => {
                println!("❌ PostgreSQL connection failed: {}", e);
                std::process::exit(1);
            }
        };
        match warranty_core::db::health_check(&pool).await {
            Ok(v) => println!("✅ PostgreSQL connected: {}", v),
            Err(e) => {
                println!("❌ PostgreSQL health check failed: {}", e);
                std::process::exit(1);
            }
        }
        println!("✅ Warranty DB health check passed");
        return Ok(());
    }

    if args.rebuild_index {
        let embeddings = context::embedding_backend_from_config(&config)?;
        let index = context::knowledge_index_from_config(&config, embeddings);
        let count = index.rebuild().await?;
        println!(
            "✅ Rebuilt knowledge index with {} snippets at {}",
            count,
            index.path().display()
        );
        return Ok(());
    }

    let startup = context::build_from_config(&config).await?;

    // Load or bootstrap the index now rather than on the first query.
    match startup.knowledge.ensure_loaded().await {
        Ok(snippets) => tracing::info!(snippets = snippets.len(), "Knowledge index ready"),
        Err(e) => tracing::warn!(
            error = %e,
            "Knowledge index not ready, will retry on first query"
        ),
    }

    let (tx, _rx) = broadcast::channel(1);
    let shutdown_tx = tx.clone();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(());
    });

    if !config.http.enabled {
        tracing::warn!("HTTP API disabled in config, nothing to serve");
        return Ok(());
    }

    warranty_server::http::start_http_server(startup.context, config.http.clone(), tx.subscribe())
        .await?;

    Ok(())
}
