//! OpenLCA connectivity probe.
//!
//! Run after starting the IPC server in OpenLCA.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use metalca_common::Config;
use openlca_client::OpenLcaClient;
use openlca_probe::{get_database_info, list_processes, probe, report};

#[derive(Parser)]
#[command(name = "openlca-probe")]
#[command(about = "Check that the OpenLCA IPC server is reachable")]
#[command(version)]
struct Cli {
    /// IPC server base URL (defaults to OPENLCA_API_URL, then http://localhost:8080)
    #[arg(long)]
    url: Option<String>,

    /// List process names after a successful probe
    #[arg(long, num_args = 0..=1, default_missing_value = "10", value_name = "LIMIT")]
    processes: Option<usize>,

    /// Show metadata for one database after a successful probe
    #[arg(long, value_name = "NAME")]
    database: Option<String>,
}

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

#[tokio::main]
async fn run() -> Result<bool> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("openlca_probe=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let base_url = cli.url.unwrap_or_else(Config::openlca_url_from_env);
    let client = OpenLcaClient::new(&base_url);

    report::print_banner("OpenLCA REST API Test");
    println!("Testing OpenLCA API connection...");
    println!("API URL: {}", client.base_url());
    println!();

    let outcome = probe(&client).await;
    report::print_outcome(client.base_url(), &outcome);

    if outcome.is_connected() {
        if let Some(limit) = cli.processes {
            list_processes(&client, limit).await;
        }
        if let Some(name) = cli.database.as_deref() {
            let info = get_database_info(&client, name).await;
            report::print_database_info(name, info.as_ref());
        }
    }

    report::print_next_steps(&outcome);

    Ok(outcome.is_connected())
}
