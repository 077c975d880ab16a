use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tokio::runtime::Runtime;
use tracing::info;
use tracing_subscriber::EnvFilter;

use collectwatch::config::Overrides;
use collectwatch::data::duration::format_duration;
use collectwatch::{
    events, run_cycle_task, ui, App, DashboardConfig, DashboardState, OverlapPolicy, Scheduler,
    SourceKind, Trigger,
};

#[derive(Parser, Debug)]
#[command(name = "collectwatch")]
#[command(about = "Terminal dashboard for a data collection pipeline backend")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL (e.g., "http://localhost:8000")
    #[arg(short, long, conflicts_with_all = ["file", "sample"])]
    url: Option<String>,

    /// Read all four payloads from a JSON document instead of the backend
    #[arg(short, long, conflicts_with_all = ["url", "sample"])]
    file: Option<PathBuf>,

    /// Show built-in sample data
    #[arg(long, conflicts_with_all = ["url", "file"])]
    sample: bool,

    /// Refresh interval (e.g., "30s", "500ms")
    #[arg(short, long)]
    refresh: Option<String>,

    /// Per-request timeout (e.g., "10s")
    #[arg(long)]
    timeout: Option<String>,

    /// What to do with a refresh trigger while a cycle is still running
    #[arg(long, value_enum)]
    overlap: Option<OverlapPolicy>,

    /// Overall score at or above which health is nominal
    #[arg(long)]
    health_nominal: Option<f64>,

    /// Overall score at or above which health is a warning
    #[arg(long)]
    health_warning: Option<f64>,

    /// Resource usage percent at which a warning starts
    #[arg(long)]
    usage_warning: Option<f64>,

    /// Resource usage percent at which usage is critical
    #[arg(long)]
    usage_critical: Option<f64>,

    /// Run one refresh cycle, write the dashboard state to a JSON file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Log file used while the dashboard owns the terminal
    #[arg(long, default_value = "collectwatch.log")]
    log_file: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(&args)?;

    let mut config = DashboardConfig::load(args.config.as_deref())?;
    config.apply_overrides(&overrides(&args));
    config.validate()?;

    // Handle export mode (non-interactive)
    if let Some(ref export_path) = args.export {
        return export_to_file(&config, export_path);
    }

    run_tui(&config)
}

/// Log to stderr in export mode and to a file while the TUI is up.
fn init_tracing(args: &Args) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if args.export.is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
        return Ok(());
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&args.log_file)
        .with_context(|| format!("failed to open log file {}", args.log_file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

/// Command line flags win over file and environment settings.
fn overrides(args: &Args) -> Overrides {
    Overrides {
        url: args.url.clone(),
        file: args.file.clone(),
        sample: args.sample,
        refresh: args.refresh.clone(),
        timeout: args.timeout.clone(),
        overlap: args.overlap,
        health_nominal: args.health_nominal,
        health_warning: args.health_warning,
        usage_warning: args.usage_warning,
        usage_critical: args.usage_critical,
    }
}

/// Run the TUI against the configured source
fn run_tui(config: &DashboardConfig) -> Result<()> {
    // Fetches run on the runtime while the UI loop owns the main thread
    let rt = Runtime::new()?;
    let source = {
        let _guard = rt.enter();
        config.open_source()?
    };
    let refresh_interval = config.refresh_interval()?;
    info!(
        source = source.description(),
        interval = %format_duration(refresh_interval),
        overlap = ?config.refresh.overlap,
        "starting dashboard"
    );

    let scheduler = Scheduler::new(source, rt.handle().clone(), config.refresh.overlap);
    let mut app = App::new(
        scheduler,
        config.thresholds.clone(),
        refresh_interval,
        ui::Theme::auto_detect(),
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    app.initialize();

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Don't wait on fetches that are still in flight
    rt.shutdown_background();
    info!("dashboard closed");

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let mut area = Rect::default();

    while app.running {
        terminal.draw(|frame| {
            area = frame.area();
            ui::render(frame, app);
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse, area),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Apply finished cycles, fire the timer when due
        app.tick(Instant::now());
    }

    Ok(())
}

/// Run one refresh cycle and export the resulting state to a JSON file
fn export_to_file(config: &DashboardConfig, export_path: &Path) -> Result<()> {
    let rt = Runtime::new()?;
    let source = {
        let _guard = rt.enter();
        config.open_source()?
    };

    // A panicking fetch becomes an aborted outcome instead of taking the process down
    let outcome = rt.block_on(run_cycle_task(Arc::clone(&source), Trigger::Manual));

    let mut state = DashboardState::new();
    let summary = state.apply(outcome, &config.thresholds);
    if summary.failed.len() == SourceKind::ALL.len() {
        anyhow::bail!("no source could be fetched from {}", source.description());
    }

    state.write_export(export_path)?;

    println!("Exported dashboard state to: {}", export_path.display());
    Ok(())
}
