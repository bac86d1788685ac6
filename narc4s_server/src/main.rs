mod docs;
mod error;
mod health;
mod middlewares;
mod raffle;
mod router;
mod state;

use std::env;

use anyhow::Context;
use dotenvy::dotenv;
use router::router;

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let server_domain = env::var("SERVER_DOMAIN").unwrap_or("0.0.0.0:3001".to_string());

    let app = router().await?;

    let listener = tokio::net::TcpListener::bind(&server_domain)
        .await
        .with_context(|| format!("Failed to bind {}", server_domain))?;

    log::info!("NARC4S backend listening on {}", server_domain);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
