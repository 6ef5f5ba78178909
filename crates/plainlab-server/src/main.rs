//! PlainLab server binary
//!
//! Starts the HTTP server for the report-simplification pipeline.

use anyhow::Context;
use plainlab_server::{config::ServerConfig, start_server};
use std::env;
use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        let config_path = &args[2];
        ServerConfig::from_file(config_path)
            .with_context(|| format!("loading config from {}", config_path))?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0)
    } else {
        eprintln!("Warning: No config file specified, using default test configuration");
        eprintln!("Usage: plainlab-server --config <path-to-config.toml>");
        eprintln!();
        ServerConfig::default_test_config()
    };

    start_server(config).await?;

    Ok(())
}

fn print_help() {
    println!("PlainLab Server - Medical Report Simplification");
    println!();
    println!("USAGE:");
    println!("    plainlab-server --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file should contain:");
    println!("    - bind_address: IP address to bind (e.g., '127.0.0.1')");
    println!("    - bind_port: Port number (e.g., 8080)");
    println!("    - [engine]: Ollama endpoint, text model, vision model, timeout_secs");
    println!("    - [pipeline]: min_text_confidence, max_text_length");
    println!();
    println!("ENDPOINTS:");
    println!("    POST /process/report   Upload a report file (text, image, or PDF)");
    println!("    POST /process/text     Process raw report text");
    println!("    GET  /health           Liveness check");
    println!();
}
