//! scratchsql - A terminal SQL scratchpad with a file explorer.

use scratchsql::cli::Cli;
use scratchsql::config::Config;
use scratchsql::db::{SqlEngine, SqliteEngine};
use scratchsql::error::{ScratchError, Result};
use scratchsql::tui::headless;
use scratchsql::tui::App;
use scratchsql::{logging, oneshot, tui};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    if cli.is_interactive() {
        logging::init_file_logging();
    } else {
        logging::init_stderr_logging();
    }

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("{}: {}", e.category(), e);
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<i32> {
    cli.validate().map_err(ScratchError::config)?;

    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let engine: Arc<dyn SqlEngine> = Arc::new(SqliteEngine::new());

    if let Some(sql) = &cli.execute {
        let format = cli.parse_output_format().map_err(ScratchError::config)?;
        return oneshot::run_execute(sql, format, engine.as_ref()).await;
    }

    let query = cli.initial_query(&config)?;
    let start_dir = cli.start_dir(&config);
    info!("Explorer starts in {}", start_dir.display());
    let app = App::new(&query, start_dir, engine.name());

    if cli.headless {
        return headless::run_headless(&cli, app, engine).await;
    }

    tui::run(app, engine).await?;
    Ok(0)
}
