use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::Commands;

#[derive(Parser, Debug, PartialEq)]
#[command(name = "folio")]
#[command(about = "Personal portfolio site server", long_about = None)]
struct Cli {
    /// Enable debug output
    #[arg(long = "debug", default_value_t = false, global = true)]
    debug: bool,

    /// Path to the folio config file (defaults to ~/.folio/folio.toml)
    #[arg(long = "config", global = true, env = "FOLIO_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn init_tracing(debug: bool) {
    let default_filter = if debug {
        format!("info,{}=debug,folio_server=debug,folio_store=debug", env!("CARGO_CRATE_NAME"))
    } else {
        "info".to_string()
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(e) = cli.command.run(cli.config.as_deref()).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
