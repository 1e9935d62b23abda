use clap::Parser;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use studex::{
    clean, Args, LoadOptions, PngBackend, Session, StartupAction, StdConsole, StudentTable,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    // diagnostics go to stderr so they never interleave with the prompts
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_early_exit_flags(args: &Args) -> Result<Option<()>> {
    if args.init_config {
        let manager = studex::ConfigManager::new(studex::APP_NAME)?;
        let path = manager.write_default_config(args.force)?;
        println!("Wrote default config to {}", path.display());
        return Ok(Some(()));
    }
    Ok(None)
}

fn run(args: &Args) -> Result<()> {
    let action = args
        .action
        .ok_or_else(|| eyre!("an action is required: sample, description, analytics, tour or exit"))?;

    // graceful exit before the dataset is even loaded
    if action == StartupAction::Exit {
        println!("You are leaving this application.");
        return Ok(());
    }

    let config = studex::AppConfig::load(studex::APP_NAME)?;

    let mut load_options: LoadOptions = args.into();
    if load_options.delimiter.is_none() {
        load_options.delimiter = config.data.delimiter;
    }
    if load_options.has_header.is_none() {
        load_options.has_header = config.data.has_header;
    }

    let mut table = StudentTable::read_csv(&args.data, &load_options)?;
    table.validate_required_columns()?;
    let report = clean::clean(&mut table)?;
    tracing::info!(
        rows = table.height(),
        rows_dropped = report.rows_dropped,
        cells_filled = report.cells_filled,
        "dataset loaded and cleaned"
    );

    let backend = PngBackend::from_config(&config);
    let mut session = Session::new(&table, &config, StdConsole::new(), backend);
    session.run_startup(action)
}

fn main() -> Result<()> {
    let args = Args::parse();
    color_eyre::install()?;
    init_tracing();

    if let Some(()) = handle_early_exit_flags(&args)? {
        return Ok(());
    }

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
