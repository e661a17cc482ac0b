use clap::Parser;
use orgdash::http::server::DEFAULT_GEOJSON_URL;
use orgdash::{HttpServer, ServerConfig};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "orgdash", version, about = "Company hierarchy dashboard")]
struct Args {
    /// Bind address
    #[arg(long, default_value = "127.0.0.1", env = "ORGDASH_ADDRESS")]
    address: String,

    /// Port
    #[arg(long, default_value_t = 8000, env = "ORGDASH_PORT")]
    port: u16,

    /// Directory holding per-company report CSV files
    #[arg(long, default_value = "dashboard/data", env = "ORGDASH_DATA_DIR")]
    data_dir: PathBuf,

    /// URL of the district boundary GeoJSON used by the analytics map
    #[arg(long, default_value = DEFAULT_GEOJSON_URL, env = "ORGDASH_GEOJSON_URL")]
    geojson_url: String,

    /// Timeout in seconds for the boundary download
    #[arg(long, default_value_t = 30, env = "ORGDASH_FETCH_TIMEOUT")]
    fetch_timeout: u64,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        ServerConfig {
            address: args.address,
            port: args.port,
            data_dir: args.data_dir,
            geojson_url: args.geojson_url,
            fetch_timeout: Duration::from_secs(args.fetch_timeout),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from(Args::parse());
    info!("Orgdash v{}", orgdash::version());

    let server = HttpServer::new(config)?;
    if let Err(e) = server.start().await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
