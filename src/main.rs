use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use ratatui::DefaultTerminal;
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use csvseek::controller::Controller;
use csvseek::domain::{AppConfig, Error};
use csvseek::loader::DirectoryAccess;
use csvseek::model::{Model, Status};
use csvseek::pagination::DEFAULT_PAGE_SIZE;
use csvseek::ui::TableUI;

/// Search through CSV files in the terminal.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Directory holding the CSV files
    #[arg(short, long, default_value = "csv-data")]
    data_dir: String,

    /// File inside the data directory to offer, can be repeated. Without it every CSV file is offered
    #[arg(short, long = "file")]
    files: Vec<String>,

    /// Rows per page (5, 10, 25 or 50)
    #[arg(short, long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Directory search-results.csv is exported to
    #[arg(short, long, default_value = ".")]
    export_dir: String,

    /// Log file, defaults to csvseek.log in the temp directory. Level is set with RUST_LOG
    #[arg(long)]
    log_file: Option<String>,

    /// Event poll interval in milliseconds
    #[arg(long, default_value_t = 100)]
    poll_ms: u64,
}

fn main() -> ExitCode {
    match run() {
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn expand(path: &str) -> Result<PathBuf, Error> {
    shellexpand::full(path)
        .map(|p| PathBuf::from(p.as_ref()))
        .map_err(|e| Error::InvalidPath(format!("{path}: {e}")))
}

fn init_logging(log_file: Option<&str>) -> Result<(), Error> {
    let path = match log_file {
        Some(p) => expand(p)?,
        None => std::env::temp_dir().join("csvseek.log"),
    };
    let file = File::create(&path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(ErrorLayer::default())
        .init();
    Ok(())
}

fn run() -> Result<(), Error> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let cfg = AppConfig::default()
        .with_data_dir(expand(&args.data_dir)?)
        .with_files(args.files)
        .with_export_dir(expand(&args.export_dir)?)
        .with_page_size(args.page_size)
        .with_event_poll_time(args.poll_ms);
    info!("Starting csvseek with {:?}", cfg);

    let access = DirectoryAccess::new(cfg.data_dir.clone());
    let mut model = Model::init(&cfg, Box::new(access));
    let ui = TableUI::new(&cfg);
    let controller = Controller::new(&cfg);

    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut model, &ui, &controller);
    ratatui::restore();

    info!("Exiting csvseek");
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    model: &mut Model,
    ui: &TableUI,
    controller: &Controller,
) -> Result<(), Error> {
    while model.status != Status::Quitting {
        // Render the current view
        terminal.draw(|f| ui.draw(model, f))?;

        // Handle events and map to a Message
        let message = controller.handle_event(model)?;
        model.update(message)?;
    }
    Ok(())
}
