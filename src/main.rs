use std::io::{self, Write};

use bintree::cli::args::{Cli, Commands, ConfigCommands};
use bintree::cli::{execute_command, CliError, Console};
use bintree::config::Settings;
use bintree::infrastructure::di::ServiceContainer;
use clap::Parser;
use colored::Colorize;
use peak_alloc::PeakAlloc;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

// Feeds the peak memory line of the action timings
#[global_allocator]
static PEAK_ALLOC: PeakAlloc = PeakAlloc;

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.debug);

    if let Err(e) = run(&cli) {
        eprintln!("{}", format!("Error: {}", e).red());
        std::process::exit(e.exit_code());
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    // init must work before any config file exists
    let settings = match &cli.command {
        Some(Commands::Config {
            command: ConfigCommands::Init { .. },
        }) => Settings::default(),
        _ => Settings::load(cli.config.as_deref())?,
    };
    tracing::debug!(?settings, "settings loaded");
    let ctx = ServiceContainer::new(settings);

    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();
    let mut console = Console::new(&mut input, &mut output);

    let result = execute_command(cli, &ctx, &mut console);
    output.flush()?;
    result
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        3 => LevelFilter::TRACE,
        _ => {
            eprintln!("Don't be crazy, max is -d -d -d");
            LevelFilter::TRACE
        }
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();

    match filter {
        LevelFilter::INFO => tracing::info!("Debug mode: info"),
        LevelFilter::DEBUG => tracing::debug!("Debug mode: debug"),
        LevelFilter::TRACE => tracing::debug!("Debug mode: trace"),
        _ => {}
    }
}
