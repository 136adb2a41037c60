use rmcp::{ServiceExt, transport::stdio};
use techfest_mind::{config::Config, router::Router, server::TechfestMindServer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging (respect RUST_LOG, default warn)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .with_ansi(false)
        .init();

    let cfg = Config::load()?;
    let server = TechfestMindServer::new(cfg.clone()).await?;
    let router = Router(server);

    let svc = router.serve(stdio()).await?;
    svc.waiting().await?;
    Ok(())
}
