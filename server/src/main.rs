use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use clap::Parser;
use tower_http::services::ServeDir;
use tracing_subscriber::EnvFilter;

mod drawing;
mod error;
mod handlers;
mod middleware;
mod rate_limit;
mod state;
mod storage;

use crate::handlers::{favicon, image_png, image_quarter, list_images, pick_image, store_image};
use crate::middleware::{limit_requests, log_requests};
use crate::state::AppState;
use crate::storage::{FileStorage, ImageStore, S3Storage, S3StorageConfig};

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    #[arg(long, env = "LILYBOARD_ADDR", default_value = "0.0.0.0:8080")]
    addr: SocketAddr,
    #[arg(long, env = "LILYBOARD_PUBLIC_DIR")]
    public_dir: Option<PathBuf>,
    /// Where images are kept when no S3 bucket is configured.
    #[arg(long, env = "LILYBOARD_IMAGE_DIR")]
    image_dir: Option<PathBuf>,
    #[arg(long, env = "LILYBOARD_S3_BUCKET")]
    s3_bucket: Option<String>,
    #[arg(long, env = "LILYBOARD_S3_PREFIX")]
    s3_prefix: Option<String>,
    #[arg(long, env = "LILYBOARD_S3_REGION")]
    s3_region: Option<String>,
    #[arg(long, env = "LILYBOARD_S3_ENDPOINT_URL")]
    s3_endpoint_url: Option<String>,
    #[arg(long, env = "LILYBOARD_S3_FORCE_PATH_STYLE")]
    s3_force_path_style: bool,
    #[arg(long, env = "LILYBOARD_S3_ACCESS_KEY_ID")]
    s3_access_key_id: Option<String>,
    #[arg(long, env = "LILYBOARD_S3_SECRET_ACCESS_KEY", hide_env_values = true)]
    s3_secret_access_key: Option<String>,
}

pub fn router(state: AppState, public_dir: PathBuf) -> Router {
    Router::new()
        .route("/image", get(pick_image).post(store_image))
        .route("/image/:id/:index", get(image_quarter))
        .route("/images", get(list_images))
        .route("/images/:id", get(image_png))
        .route("/favicon.svg", get(favicon))
        .fallback_service(ServeDir::new(public_dir).append_index_html_on_directories(true))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            limit_requests,
        ))
        .layer(axum::middleware::from_fn(log_requests))
        .with_state(state)
}

async fn open_storage(args: &Args) -> Result<Arc<dyn ImageStore>, storage::StorageError> {
    if let Some(bucket) = args.s3_bucket.clone() {
        let config = S3StorageConfig {
            prefix: args.s3_prefix.clone(),
            region: args.s3_region.clone(),
            endpoint_url: args.s3_endpoint_url.clone(),
            force_path_style: args.s3_force_path_style,
            access_key_id: args.s3_access_key_id.clone(),
            secret_access_key: args.s3_secret_access_key.clone(),
            ..S3StorageConfig::new(bucket)
        };
        tracing::info!(bucket = %config.bucket, prefix = ?config.prefix, "storing images in s3");
        return Ok(Arc::new(S3Storage::new(config).await));
    }
    let image_dir = args
        .image_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../images"));
    tracing::info!(dir = %image_dir.display(), "storing images on disk");
    Ok(Arc::new(FileStorage::open(image_dir).await?))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let images = match open_storage(&args).await {
        Ok(images) => images,
        Err(error) => {
            tracing::error!(%error, "failed to open image storage");
            std::process::exit(1);
        }
    };
    let state = AppState::new(images);

    let public_dir = args
        .public_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../public"));
    let app = router(state, public_dir);

    let listener = match tokio::net::TcpListener::bind(args.addr).await {
        Ok(listener) => listener,
        Err(error) => {
            tracing::error!(addr = %args.addr, %error, "failed to bind");
            std::process::exit(1);
        }
    };
    tracing::info!(addr = %args.addr, "drawing board listening");

    if let Err(error) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    {
        tracing::error!(%error, "server failed");
        std::process::exit(1);
    }
}
