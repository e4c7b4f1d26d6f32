//! command-guard demo CLI.
//!
//! Creates an order through a protected command against a simulated
//! downstream service whose latency and failure are set from the command line.
//!
//! ```text
//! command-guard --delay-ms 3000 --timeout-ms 2000 --fallback "Playstation 4" "TV Phillips"
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use command_guard::config::loader::load_config;
use command_guard::observability::logging::init_logging;
use command_guard::orders::{self, SimulatedOrderService, CREATE_ORDER_COMMAND};
use command_guard::{GuardConfig, WorkerPool};

#[derive(Parser)]
#[command(name = "command-guard")]
#[command(about = "Create an order through a protected command", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the command's time budget.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Simulated downstream latency.
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,

    /// Make the downstream fail with this message.
    #[arg(long)]
    fail: Option<String>,

    /// Serve a locally built order when the downstream fails.
    #[arg(long)]
    fallback: bool,

    /// Use the non-blocking entry point and wait on its handle.
    #[arg(long)]
    observe: bool,

    /// Products to order.
    #[arg(required = true)]
    products: Vec<String>,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GuardConfig::default(),
    };
    init_logging(&config.observability)?;

    let mut execution = config.execution_for(CREATE_ORDER_COMMAND);
    if let Some(timeout_ms) = cli.timeout_ms {
        execution.timeout = Duration::from_millis(timeout_ms);
    }

    tracing::info!(
        timeout_ms = execution.timeout.as_millis() as u64,
        delay_ms = cli.delay_ms,
        fallback = cli.fallback,
        observe = cli.observe,
        "Creating order"
    );

    let pool = WorkerPool::new(&config.pool)?;
    let service = Arc::new(SimulatedOrderService::new(
        Duration::from_millis(cli.delay_ms),
        cli.fail.clone(),
    ));

    let builder = if cli.fallback {
        orders::create_order_with_fallback(service, cli.products)
    } else {
        orders::create_order(service, cli.products)
    };
    let command = builder.config(execution).pool(pool).build();

    let result = if cli.observe {
        command.observe().blocking_first()
    } else {
        command.execute()
    };

    match result {
        Ok(order) => {
            println!("{}", serde_json::to_string_pretty(&order)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Kind: {}", e.kind());
            eprintln!("Root cause: {}", e.root_cause());
            Ok(ExitCode::FAILURE)
        }
    }
}
