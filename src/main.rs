//! postmgn CLI entry point.

use clap::Parser;
use postmgn::cli::commands;
use postmgn::cli::{Cli, Commands};
use postmgn::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    init_tracing(cli.verbosity(), cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                eprintln!("{}", e.to_structured_json());
            } else if !cli.quiet {
                if let Some(hint) = e.hint() {
                    eprintln!("Error: {e}\n  Hint: {hint}");
                } else {
                    eprintln!("Error: {e}");
                }
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    if quiet {
        return;
    }

    // Honor RUST_LOG if set, otherwise use verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug,hyper=info,reqwest=info,rustls=info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: &Cli) -> Result<(), Error> {
    let dir = cli.project_dir.as_path();
    let url = cli.api_url.as_str();

    match &cli.command {
        None => commands::check::execute(dir, url, cli.json),
        Some(Commands::Init) => commands::init::execute(dir, url, cli.json),
        Some(Commands::Import { yes }) => commands::import::execute(dir, url, *yes, cli.json),
        Some(Commands::Export) => commands::export::execute(dir, url, cli.json),

        // Offline
        Some(Commands::Status) => commands::status::execute(dir, cli.json),
        Some(Commands::Completions { shell }) => commands::completions::execute(*shell),
    }
}
