use admin_dashboard::cli::Cli;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DASHBOARD_API_URL and friends apply to cargo run
    let _ = dotenvy::dotenv();

    let default_filter = if admin_dashboard::is_production!() { "error" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with_writer(std::io::stderr)
        .init();

    let config = admin_dashboard::config::config();
    tracing::debug!("Using {} in {:?} mode", config.api.base_url, config.environment);

    let cli = Cli::parse();

    if let Err(e) = admin_dashboard::cli::run(cli).await {
        match std::env::var("CLI_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }

    Ok(())
}
