use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hbnb::config::{Config, StorageKind};
use hbnb::console::Console;

#[derive(Parser)]
#[command(name = "hbnb")]
#[command(about = "Command console for creating, inspecting and destroying HBNB instances")]
struct Cli {
    /// Storage backend (overrides HBNB_TYPE_STORAGE)
    #[arg(long, value_enum)]
    storage: Option<StorageKind>,

    /// JSON file for the file backend (overrides HBNB_FILE_PATH)
    #[arg(long)]
    file: Option<PathBuf>,

    /// SQLite database for the db backend (overrides HBNB_DB_PATH)
    #[arg(long)]
    db: Option<PathBuf>,
}

/// Initialize tracing on stderr so stdout carries only command output
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "hbnb=warn,hbnb_core=warn".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = Config::from_env()?;
    config.apply_overrides(cli.storage, cli.file, cli.db);

    let storage = config.open_storage()?;

    let stdin = std::io::stdin();
    let interactive = stdin.is_terminal();
    let mut console = Console::new(storage).interactive(interactive);

    console.run(stdin.lock(), &mut std::io::stdout().lock())?;

    Ok(())
}
