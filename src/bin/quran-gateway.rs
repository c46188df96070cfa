use clap::arg;
use clap::command;
use clap::Parser;
use reqwest::Client;
use quran_gateway::server;
use quran_gateway::utils::config_loader;
use quran_gateway::utils::logging;
use anyhow::Result;
use quran_gateway::utils::logging::LogLevel;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "quran-gateway.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL" , value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // -------------------------------
    // 1. Load YAML config
    // -------------------------------

    let service_config = config_loader::run(&args.config).await?;
    logging::run(&service_config, args.log_level.to_owned());

    // -------------------------------
    // 2. Create request client
    //
    // shared by the token source and the content client
    // -------------------------------

    let client = Client::builder().build()?;

    // -------------------------------
    // 3. Start http server
    // -------------------------------

    info!("Service starting...");
    server::server::start(&service_config, client).await
}
