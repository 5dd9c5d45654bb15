//! watop - interactive dashboard for a WhatsApp-automation fleet.
//!
//! Connects to the admin REST API and shows customers, device
//! sessions, servers, and logs as sortable, filterable, paged tables.
//!
//! Usage:
//!   watop                                   # default API at 127.0.0.1:8080
//!   watop --api-url https://wa.example/api  # remote API
//!   watop --demo                            # built-in demo data, no API
//!   watop --interval 10 --page-size 50

use std::fs::File;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use watop::api::{Api, HttpApi, MemoryTokenStore, MockApi};
use watop::engine::PAGE_SIZES;
use watop::fetch::Fetcher;
use watop::tui::{App, EventHandler};

/// Interactive fleet dashboard.
#[derive(Parser)]
#[command(name = "watop", about = "WhatsApp fleet dashboard", version)]
struct Args {
    /// Base URL of the admin API.
    #[arg(long, value_name = "URL", default_value = "http://127.0.0.1:8080/api")]
    api_url: String,

    /// Bearer token for the API.
    #[arg(long, env = "WATOP_TOKEN", value_name = "TOKEN")]
    token: Option<String>,

    /// Background refresh interval in seconds.
    #[arg(short, long, default_value = "30")]
    interval: u64,

    /// Initial rows per page (10, 25, 50 or 100).
    #[arg(long, default_value = "25")]
    page_size: usize,

    /// Run against built-in demo data instead of a live API.
    #[arg(long)]
    demo: bool,

    /// Write debug logs to this file (the terminal is taken over by
    /// the UI, so there is no console logging).
    #[arg(long, value_name = "PATH")]
    log_file: Option<String>,
}

fn init_logging(path: &str) -> std::io::Result<()> {
    let file = File::create(path)?;
    let filter = EnvFilter::from_default_env()
        .add_directive("watop=debug".parse().expect("static directive"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

fn main() {
    let args = Args::parse();

    // Validate arguments
    if args.interval == 0 {
        eprintln!("Error: interval must be at least 1 second");
        std::process::exit(1);
    }
    if !PAGE_SIZES.contains(&args.page_size) {
        eprintln!("Error: page size must be one of 10, 25, 50, 100");
        std::process::exit(1);
    }

    if let Some(ref path) = args.log_file
        && let Err(e) = init_logging(path)
    {
        eprintln!("Error opening log file '{}': {}", path, e);
        std::process::exit(1);
    }

    // Pick the API backend
    let api: Arc<dyn Api> = if args.demo {
        Arc::new(MockApi::typical_fleet())
    } else {
        let tokens = Arc::new(MemoryTokenStore::new(args.token.clone()));
        match HttpApi::new(&args.api_url, tokens) {
            Ok(api) => Arc::new(api),
            Err(e) => {
                eprintln!("Error: invalid API configuration: {}", e);
                std::process::exit(1);
            }
        }
    };

    // Wire events -> fetch workers -> app
    let events = EventHandler::new(Duration::from_millis(250));
    let fetcher = Fetcher::new(api, events.sender());
    let app = App::new(
        fetcher,
        Duration::from_secs(args.interval),
        args.page_size,
        args.demo,
    );

    if let Err(e) = app.run(events) {
        eprintln!("Error running TUI: {}", e);
        std::process::exit(1);
    }
}
