// algoviz: step-by-step algorithm visualizer

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::{Parser, ValueEnum};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, Level};

use algoviz::catalog::{self, Algorithm};
use algoviz::config::{RunConfig, DEFAULT_SPEED_MS};
use algoviz::runtime::sink::{RecordingSink, Signal};
use algoviz::runtime::Scheduler;
use algoviz::ui::App;

#[derive(Debug, Parser)]
#[command(name = "algoviz", version, about = "Watch classic algorithms run one step at a time")]
struct Cli {
    /// Algorithm to run first
    #[arg(value_enum, default_value_t = Algorithm::QuickSort)]
    algorithm: Algorithm,

    /// Delay after each step in milliseconds (defaults to 0 when headless)
    #[arg(long)]
    speed_ms: Option<u64>,

    /// Input size (elements, nodes, queens or grid side)
    #[arg(long)]
    size: Option<usize>,

    /// Seed for reproducible input
    #[arg(long)]
    seed: Option<u64>,

    /// Run once without the TUI and print a summary
    #[arg(long)]
    headless: bool,

    /// Snapshot history budget in MiB
    #[arg(long, default_value_t = 256)]
    history_limit_mb: usize,

    /// Write logs to this file while the TUI is active
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// List available algorithms and exit
    #[arg(long)]
    list: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.list {
        for algorithm in Algorithm::ALL {
            let name = algorithm
                .to_possible_value()
                .map(|v| v.get_name().to_string())
                .unwrap_or_default();
            println!("{:<16} {}", name, algorithm.title());
        }
        return Ok(());
    }

    let default_speed = if cli.headless { 0 } else { DEFAULT_SPEED_MS };
    let config = RunConfig {
        speed_ms: cli.speed_ms.unwrap_or(default_speed),
        size: cli.size,
        seed: cli.seed,
        history_limit: cli.history_limit_mb.saturating_mul(1024 * 1024),
    };

    if let Err(e) = config.validate(cli.algorithm) {
        eprintln!("Error: {}", e);
        std::process::exit(2);
    }

    if cli.headless {
        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_max_level(Level::INFO)
            .init();
        return run_headless(cli.algorithm, &config);
    }

    // Logging to the terminal would corrupt the alternate screen
    if let Some(path) = &cli.log_file {
        let file = File::create(path)?;
        tracing_subscriber::fmt()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_max_level(Level::DEBUG)
            .init();
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(cli.algorithm, config);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn run_headless(algorithm: Algorithm, config: &RunConfig) -> Result<(), Box<dyn std::error::Error>> {
    let job = catalog::prepare(algorithm, config)?;
    let mut sink = RecordingSink::with_limit(config.history_limit);
    let mut scheduler = Scheduler::new();

    let result = scheduler.run_blocking(config.speed_ms, &mut sink, job);

    println!("{}", algorithm.title());
    println!("  steps:       {}", sink.history.len());
    if sink.dropped > 0 {
        println!("  dropped:     {} (history limit)", sink.dropped);
    }
    for (name, kind) in [
        ("comparisons", Signal::comparisons as fn(&Signal) -> Option<usize>),
        ("swaps", Signal::swaps),
        ("paths found", Signal::paths_found),
        ("visited", Signal::visited),
    ] {
        if let Some(count) = sink.last_count(kind) {
            println!("  {:<12} {}", format!("{}:", name), count);
        }
    }

    match result {
        Ok(summary) => {
            info!(%algorithm, "headless run finished");
            println!("  result:      {}", summary);
            Ok(())
        }
        // Infeasible input is a legitimate outcome, not a failure
        Err(e) if e.is_infeasible() => {
            println!("  result:      {}", e);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
