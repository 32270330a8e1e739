use clap::Parser;
use std::process::ExitCode;
use yield_records::Harvest;

mod args;
use args::{Args, build_config};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging, diagnostics go to stderr
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let start_time = std::time::Instant::now();
    let records = match Harvest::new(config).run().await {
        Ok(records) => records,
        Err(e) => {
            ::log::error!("Crawl aborted: {}", e);
            return ExitCode::FAILURE;
        }
    };
    ::log::info!(
        "Extracted {} records in {:.2} seconds",
        records.len(),
        start_time.elapsed().as_secs_f64()
    );

    let output = if args.compact {
        serde_json::to_string(&records)
    } else {
        serde_json::to_string_pretty(&records)
    };

    match output {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            ::log::error!("Failed to serialize records: {}", e);
            ExitCode::FAILURE
        }
    }
}
