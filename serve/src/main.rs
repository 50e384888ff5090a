//! devmentor-serve: process entry point.
//!
//! Loads `.env`, initializes tracing, builds the gateway once from settings,
//! and serves the API plus the static client.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use devmentor::{Gateway, OpenAiModel, OpenAiOptions, ShapeLimits};

/// Serve the devmentor API and the prebuilt web client.
#[derive(Parser, Debug)]
#[command(name = "devmentor-serve")]
struct Args {
    /// Listen address override; defaults to 0.0.0.0:<PORT>.
    #[arg(long)]
    addr: Option<String>,
    /// Directory with the prebuilt single-page app (overrides STATIC_DIR).
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    config::load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut settings = config::Settings::from_env();
    if let Some(dir) = args.static_dir {
        settings.static_dir = dir;
    }
    let api_key = settings.require_api_key()?.to_string();

    let model = OpenAiModel::new(
        api_key,
        OpenAiOptions {
            base_url: settings.base_url.clone(),
            model: settings.model.clone(),
            timeout: settings.timeout,
        },
    );
    let gateway = Arc::new(Gateway::new(
        Arc::new(model),
        ShapeLimits {
            max_output_chars: settings.max_output_chars,
        },
    ));

    let router = serve::build_router(
        serve::AppState { gateway },
        Some(settings.static_dir.as_path()),
    );
    let addr = args
        .addr
        .unwrap_or_else(|| format!("0.0.0.0:{}", settings.port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve::run_serve_on_listener(listener, router).await
}
