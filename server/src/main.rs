use anyhow::Result;
use axum::Router;
use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};
use server::build_app;
use tokio::net::TcpListener;

#[derive(Parser)]
struct Args {
    /// Knowledge base JSON file
    #[arg(long, default_value = engine::persist::DEFAULT_KB_PATH)]
    kb: String,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Forget chat sessions idle for this many seconds
    #[arg(long, default_value_t = 3600)]
    session_ttl_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let app: Router = build_app(args.kb.clone(), Duration::from_secs(args.session_ttl_secs))?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, kb = %args.kb, session_ttl_secs = args.session_ttl_secs, "server listening");
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}
