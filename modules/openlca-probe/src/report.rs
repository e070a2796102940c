use console::style;

use openlca_client::ProcessDescriptor;

use crate::ProbeOutcome;

const RULE_WIDTH: usize = 60;

pub fn print_banner(title: &str) {
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("{}", style(title).bold());
    println!("{}", "=".repeat(RULE_WIDTH));
}

pub fn print_outcome(base_url: &str, outcome: &ProbeOutcome) {
    match outcome {
        ProbeOutcome::Connected => {
            println!("{} Successfully connected to OpenLCA API!", style("✔").green());
            println!();
            println!("OpenLCA IPC Server is running at {base_url}");
        }
        ProbeOutcome::BadStatus(status) => {
            println!("{} API returned status code: {status}", style("✘").red());
        }
        ProbeOutcome::Unreachable(detail) => {
            println!("{} Connection failed: {detail}", style("✘").red());
            println!();
            println!("Please ensure:");
            println!("1. OpenLCA application is running");
            println!("2. IPC Server is started (Window → Developer Tools → IPC Server)");
            println!("3. Server is listening on {base_url}");
        }
        ProbeOutcome::Failed(detail) => {
            println!("{} Error: {detail}", style("✘").red());
        }
    }
}

pub fn print_next_steps(outcome: &ProbeOutcome) {
    println!();
    println!("{}", "=".repeat(RULE_WIDTH));
    if outcome.is_connected() {
        println!("Next steps:");
        println!("1. Select OpenLCA as the dataset source in MetaLCA");
        println!("2. Use the databases available in OpenLCA");
        println!("3. Fetch processes, flows, and impact methods as needed");
    } else {
        println!("Setup instructions:");
        println!("1. Open OpenLCA application");
        println!("2. Go to: Window → Developer Tools → IPC Server");
        println!("3. Click 'Start' to start the server");
        println!("4. Run this probe again");
    }
    println!("{}", "=".repeat(RULE_WIDTH));
}

pub fn print_process_list(processes: &[ProcessDescriptor], limit: usize) {
    println!();
    println!(
        "Found {} processes (showing first {limit}):",
        style(processes.len()).cyan()
    );
    for process in processes.iter().take(limit) {
        println!("  - {}", process.name().unwrap_or("Unknown"));
    }
}

pub fn print_database_info(name: &str, info: Option<&serde_json::Value>) {
    println!();
    match info {
        Some(info) => {
            let pretty = serde_json::to_string_pretty(info).unwrap_or_else(|_| info.to_string());
            println!("Database {}:", style(name).cyan());
            println!("{pretty}");
        }
        None => println!("No information available for database {}", style(name).cyan()),
    }
}
