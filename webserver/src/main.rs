//! Survey webserver entry point
//!
//! Loads the item dataset, rebuilds the used-name ledger from stored results,
//! and serves the study until interrupted.

use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

use webserver::{
    RealResultStore, RealStaticFileServer, ServerState, SurveyServer, WebServerError,
    WebServerResult,
    core::{ItemPool, StudyRegistry},
    traits::ResultStore,
};

/// Command line arguments for the survey server
#[derive(Parser, Debug)]
#[command(name = "webserver")]
#[command(about = "Paired-annotation survey server")]
struct Args {
    /// Address to bind the HTTP server to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port for the HTTP server
    #[arg(long, default_value = "3000")]
    port: u16,

    /// Item dataset (JSON array of posts with paired notes)
    #[arg(long, default_value = "./data/posts.json")]
    data_file: String,

    /// Directory served under /data (post images, dataset assets)
    #[arg(long, default_value = "./data")]
    data_dir: String,

    /// Frontend assets directory
    #[arg(long, default_value = "./frontend")]
    static_dir: String,

    /// Directory for completed-session result records
    #[arg(long, default_value = "./results")]
    results_dir: String,

    /// Number of items assigned to each participant
    #[arg(long, default_value = "20")]
    items_per_session: usize,

    /// Seconds a submitted session stays in memory for late retries
    #[arg(long, default_value = "60")]
    cleanup_grace_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> WebServerResult<()> {
    let args = Args::parse();

    shared::logging::init_tracing_with_level(Some(&args.log_level));
    shared::logging::log_startup("survey webserver");

    // Load the item dataset; a broken dataset is fatal at startup
    let raw = tokio::fs::read_to_string(&args.data_file).await.map_err(|e| {
        WebServerError::DataLoad {
            message: format!("cannot read {}: {e}", args.data_file),
        }
    })?;
    let pool = ItemPool::from_json(&raw)?;
    tracing::info!("📚 Loaded {} items from {}", pool.len(), args.data_file);

    // Rebuild the used-name ledger from stored results
    let result_store = RealResultStore::new(&args.results_dir);
    let used_names = result_store.load_used_names().await?;
    if !used_names.is_empty() {
        tracing::info!("🔒 {} participant names already used", used_names.len());
    }

    let registry = StudyRegistry::new(pool, used_names, args.items_per_session);
    let static_files = RealStaticFileServer::new(&args.static_dir, &args.data_dir);

    let bind_address: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|e| WebServerError::ServerStartup(format!("Invalid bind address: {e}")))?;
    let state = ServerState::new(bind_address, Duration::from_secs(args.cleanup_grace_secs));

    let server = SurveyServer::new(state, registry, result_store, static_files);
    server.run().await?;

    shared::logging::log_success("Survey webserver stopped gracefully");
    Ok(())
}
