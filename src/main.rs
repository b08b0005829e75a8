mod app;
mod domain;
mod input;
mod logging;
mod persistence;
mod report;
mod ticker;
mod ui;

use anyhow::{Context, Result};
use app::AppState;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::{date_key, CalendarState, YearMonth};
use persistence::{
    config_file, ensure_planner_dir, init_local_planner, load_config, load_metadata, log_file,
    meta_file, storage_file, FileStore, PlannerConfig, TaskStore,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dayplanner")]
#[command(about = "A terminal day planner: a month calendar with per-day task lists", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Open the planner on this date (YYYY-MM-DD format)
    #[arg(long)]
    date: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .dayplanner directory in the current directory
    Init,
    /// Write a Markdown report for one month
    Report {
        /// Month to report on (YYYY-MM format). Defaults to the current month.
        #[arg(short, long)]
        month: Option<String>,
        /// Output file path. Defaults to ~/.dayplanner/report-YYYY-MM.md
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Print the task list of one day
    Tasks {
        /// Date (YYYY-MM-DD format). Defaults to today.
        #[arg(short, long)]
        date: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init) => {
            let planner_dir = init_local_planner()?;
            println!("Initialized planner directory: {}", planner_dir.display());
            println!();
            println!("The planner will now use this local directory for task storage.");
            println!("Run 'dayplanner' to start planning.");
            Ok(())
        }
        Some(Commands::Report { month, output }) => {
            let config = setup()?;
            let report_month = match month {
                Some(month_str) => month_str
                    .parse::<YearMonth>()
                    .map_err(|e| anyhow::anyhow!("Invalid month format. Use YYYY-MM: {}", e))?,
                None => YearMonth::of(ticker::local_today()),
            };

            let store = open_task_store(&config)?;
            println!("Generating report for {}...", report_month.label());
            let report_path = report::generate_report(&store, report_month, output.map(PathBuf::from))?;
            println!("Report generated: {}", report_path.display());
            Ok(())
        }
        Some(Commands::Tasks { date }) => {
            let config = setup()?;
            let day = match date {
                Some(date_str) => parse_date_arg(&date_str)?,
                None => ticker::local_today(),
            };

            let store = open_task_store(&config)?;
            let key = date_key(day);
            let tasks = store.get_tasks(&key);

            println!("{}", key);
            if tasks.is_empty() {
                println!("  (no tasks)");
            }
            for task in &tasks {
                let check = if task.done { "x" } else { " " };
                println!("  [{}] {}", check, task.display_line());
            }
            Ok(())
        }
        None => {
            let start_date = cli.date.as_deref().map(parse_date_arg).transpose()?;
            run_tui(start_date)
        }
    }
}

fn parse_date_arg(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("Invalid date format. Use YYYY-MM-DD: {}", e))
}

/// Create the planner directory, read config.json and start logging
fn setup() -> Result<PlannerConfig> {
    ensure_planner_dir()?;
    let config = load_config(config_file()?)?;
    logging::init_logging(&config.log_level, &log_file()?)?;
    Ok(config)
}

fn open_task_store(config: &PlannerConfig) -> Result<TaskStore<FileStore>> {
    let path = storage_file(&config.storage_file)?;
    let store = FileStore::open(&path)
        .with_context(|| format!("Could not open task storage: {}", path.display()))?;
    Ok(TaskStore::new(store))
}

fn run_tui(start_date: Option<NaiveDate>) -> Result<()> {
    let config = setup()?;

    let planner_dir = ensure_planner_dir()?;
    eprintln!("Using planner directory: {}", planner_dir.display());
    log::info!("Starting day planner in {}", planner_dir.display());

    // Reopen on the last selected date, if any
    let today = ticker::local_today();
    let metadata = load_metadata(meta_file()?).unwrap_or_else(|e| {
        log::warn!("Ignoring unreadable meta.json: {}", e);
        Default::default()
    });
    let calendar = match metadata.last_selected_date() {
        Some(selected) => CalendarState::with_selection(today, selected),
        None => CalendarState::new(today),
    };

    let store = open_task_store(&config)?.into_inner();
    let mut app = AppState::new(Box::new(store), calendar);
    if let Some(date) = start_date {
        app.select_date(date);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = app.save() {
        eprintln!("Error saving state: {}", e);
    }

    if let Err(err) = result {
        log::error!("Exited with error: {:#}", err);
        eprintln!("Error: {}", err);
    }

    log::info!("Day planner closed");
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    let tick_rate = ticker::tick_duration();

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Handle events with timeout for ticking
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press {
                    let should_quit = input::handle_key(app, key)?;
                    if should_quit {
                        return Ok(());
                    }
                }
            }
        }

        app.tick(ticker::local_today());

        // Remember the selection as it changes
        if app.needs_save {
            if let Err(e) = app.save() {
                log::warn!("Could not save meta.json: {:#}", e);
            }
        }
    }
}
