/// Picstash - Image Gallery Server
///
/// A minimal web gallery backed by cloud object storage. Uploads land in a
/// single public-read container; the gallery view is derived live from the
/// container listing on every request.

mod api;
mod config;
mod context;
mod error;
mod gallery;
mod server;
mod storage;

use config::GalleryConfig;
use context::AppContext;
use error::GalleryResult;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> GalleryResult<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "picstash=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Print banner
    print_banner();

    // Load configuration
    let config = GalleryConfig::from_env()?;

    // Create application context
    let ctx = AppContext::new(config).await?;

    // Start server
    server::serve(ctx).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
    ____  _________________________   _____ __  __
   / __ \/  _/ ____/ ___/_  __/   |  / ___// / / /
  / /_/ // // /    \__ \ / / / /| |  \__ \/ /_/ /
 / ____// // /___ ___/ // / / ___ | ___/ / __  /
/_/   /___/\____//____//_/ /_/  |_|/____/_/ /_/

        Image Gallery Server v{}
        "#,
        env!("CARGO_PKG_VERSION")
    );
}
