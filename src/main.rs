use anyhow::Result;
use api_finder::function::config::Config;
use api_finder::function::logging;
use api_finder::function::scanner::run_scan;
use structopt::StructOpt;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("[-] {:#}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // 1. parse arguments
    let config = Config::from_args();
    logging::init(logging::level_from_verbosity(config.verbose))?;

    // 2. scan; configuration problems stop us here before any request
    let _report = run_scan(config).await?;

    Ok(())
}
