//! ts2mp4 TUI
//!
//! Terminal window for running a conversion batch with a live log view.
//! The batch runs on a worker task; this loop only drains the event
//! channel and repaints, so the window stays responsive throughout.

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::{
    collections::VecDeque,
    io::{self, Stdout},
    path::PathBuf,
    time::Duration,
};
use ts2mp4_supervisor::{
    check_encoder_available, find_source_files, BatchSequencer, Config, ConversionEvent,
    ConversionJob, EventReceiver,
};

const MAX_LOG_ENTRIES: usize = 1000;

/// ts2mp4-tui - Batch-convert transport-stream files to MP4 with a live log view
#[derive(Parser, Debug)]
#[command(name = "ts2mp4-tui")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input .ts files; directories are scanned for .ts files recursively
    inputs: Vec<PathBuf>,

    /// Directory for converted files (outputs land beside their inputs if omitted)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip the encoder availability check. For testing only.
    #[arg(long, default_value = "false")]
    skip_checks: bool,
}

// ============================================================================
// App State
// ============================================================================

/// Main application state for the conversion window
struct App {
    /// Log lines rendered in the main view
    log: VecDeque<String>,
    /// Receiving half of the event channel from the worker task
    receiver: EventReceiver,
    /// Outcome counters, updated as events arrive
    converted: u64,
    skipped: u64,
    failed: u64,
    /// Set once the terminal batch event has arrived
    done: bool,
}

impl App {
    fn new(receiver: EventReceiver) -> Self {
        Self {
            log: VecDeque::with_capacity(MAX_LOG_ENTRIES),
            receiver,
            converted: 0,
            skipped: 0,
            failed: 0,
            done: false,
        }
    }

    /// Append a line to the log view
    fn log_line(&mut self, line: String) {
        if self.log.len() >= MAX_LOG_ENTRIES {
            self.log.pop_front();
        }
        self.log.push_back(line);
    }

    /// Drain every event currently queued on the channel.
    ///
    /// Non-blocking; called once per repaint tick.
    fn drain_events(&mut self) {
        while let Ok(event) = self.receiver.try_recv() {
            match &event {
                ConversionEvent::FileCompleted { .. } => self.converted += 1,
                ConversionEvent::Skipped { .. } => self.skipped += 1,
                ConversionEvent::FileFailed { .. } => self.failed += 1,
                ConversionEvent::BatchCompleted { .. } => self.done = true,
                _ => {}
            }
            self.log_line(event.to_string());
        }
    }
}

// ============================================================================
// Terminal Setup/Teardown
// ============================================================================

/// Initialize the terminal for TUI rendering
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

// ============================================================================
// Widget Rendering
// ============================================================================

/// Render the conversion log, newest lines on top
fn render_log(f: &mut Frame, area: Rect, app: &App) {
    let lines: Vec<Line> = app
        .log
        .iter()
        .rev()
        .take(area.height.saturating_sub(2) as usize)
        .map(|l| Line::from(l.as_str()))
        .collect();

    let title = if app.done {
        " Conversion Log (finished) "
    } else {
        " Conversion Log "
    };

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}

/// Render status bar with outcome counters
fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let state = if app.done { "Done" } else { "Converting..." };
    let status = format!(
        " {} | Converted: {} | Skipped: {} | Failed: {} | Press 'q' to quit ",
        state, app.converted, app.skipped, app.failed
    );

    let paragraph =
        Paragraph::new(status).style(Style::default().fg(Color::White).bg(Color::DarkGray));

    f.render_widget(paragraph, area);
}

/// Render the complete UI layout
fn ui(f: &mut Frame, app: &App) {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(size);

    render_log(f, chunks[0], app);
    render_status_bar(f, chunks[1], app);
}

// ============================================================================
// Main Entry Point
// ============================================================================

/// Expand directory arguments into their eligible source files.
fn collect_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut collected = Vec::new();
    for input in inputs {
        if input.is_dir() {
            collected.extend(find_source_files(input));
        } else {
            collected.push(input.clone());
        }
    }
    collected
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config: {}", e);
                std::process::exit(1);
            }
        },
        None => {
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    if !args.skip_checks {
        if let Err(e) = check_encoder_available(&config.encoder.binary) {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }

    let output_dir = args.output_dir.clone().or(config.batch.output_dir.clone());
    let job = ConversionJob::new(collect_inputs(&args.inputs), output_dir);

    // one worker task per run; the start action is this process's launch
    let sequencer = BatchSequencer::new(&config);
    let (receiver, _handle) = sequencer.spawn(job);

    let mut terminal = setup_terminal()?;
    let mut app = App::new(receiver);
    app.log_line("ts2mp4 started".to_string());

    let result = run_app(&mut terminal, &mut app).await;

    restore_terminal(&mut terminal)?;

    result
}

/// Main application loop
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        // Pull queued events off the channel before each repaint
        app.drain_events();

        // Draw UI
        terminal.draw(|f| ui(f, app))?;

        // Handle input with a short timeout to allow frequent redraws
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Char('Q') => {
                            return Ok(());
                        }
                        KeyCode::Esc => {
                            return Ok(());
                        }
                        _ => {}
                    }
                }
            }
        }
    }
}
