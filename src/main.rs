mod application;
mod domain;
mod infrastructure;
mod presentation;

use crate::application::services::{RequestService, TimingStore};
use crate::infrastructure::config::Config;
use crate::infrastructure::curl_runner::CurlRunner;
use crate::presentation::cli::Cli;
use clap::Parser;
use colored::Colorize;

/// qurl: run curl request files and keep the answers
///
/// Interprets request files (JSON request objects, curl command lines,
/// or `##`-sectioned multi-request documents), executes them through
/// the curl binary, and writes the reconstructed responses alongside
/// the requests.
#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let config = Config {
        timeout_secs: cli.timeout.unwrap_or_else(|| Config::default().timeout_secs),
        save_to_file: !cli.no_save,
    };
    let service = RequestService::new(Box::new(CurlRunner::new()), config, TimingStore::new());

    if let Err(err) = cli.run(&service).await {
        eprintln!("{}", err.to_string().red());
        std::process::exit(1);
    }
}
