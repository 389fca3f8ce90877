//! docscroll: a scroll-synchronised terminal pager for single-page markdown docs.
#![allow(clippy::multiple_crate_versions)]

use anyhow::{Context, Result};
use clap::Parser;
use docscroll::clipboard::SystemClipboard;
use docscroll::document::Document;
use docscroll::{app_state, config, formats, highlight, ui};
use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing_subscriber::{fmt, EnvFilter};

/// Rows scrolled per mouse wheel notch.
const WHEEL_STEP: isize = 3;
/// Longest the loop sleeps when no timer is pending.
const IDLE_WAIT: Duration = Duration::from_secs(1);

#[derive(Parser)]
#[command(name = "docscroll")]
#[command(about = "Scroll-synchronised terminal pager for single-page markdown docs", long_about = None)]
#[command(version)]
struct Args {
    /// Markdown page to open
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Open scrolled to this anchor (with or without the leading '#')
    #[arg(long, short = 's', value_name = "ID")]
    section: Option<String>,

    /// Print the parsed sections and snippets as JSON and exit
    #[arg(long)]
    outline: bool,

    /// Rows below the top at which a heading becomes the active section
    #[arg(long, value_name = "ROWS")]
    threshold: Option<i64>,

    /// Write logs here instead of the default file in the temp directory
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn init_logging(path: Option<PathBuf>) -> Result<()> {
    // The TUI owns stdout, so logs go to a file
    let path = path.unwrap_or_else(|| std::env::temp_dir().join("docscroll.log"));
    let file = File::create(&path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file)?;

    let mut cfg = config::Config::load();

    // Override config with command line args
    if let Some(threshold) = args.threshold {
        cfg.threshold = threshold;
    }

    let format = formats::markdown::MarkdownFormat;
    let document = Document::load(&args.file, &format)?;

    if args.outline {
        let json = serde_json::to_string_pretty(&document)?;
        println!("{json}");
        return Ok(());
    }

    if document.sections.is_empty() {
        eprintln!("No sections found in {}", args.file.display());
        return Ok(());
    }

    let highlights = highlight::highlight_snippets(&document, &cfg.theme);
    let mut state = app_state::AppState::new(document, &cfg).with_context(|| {
        format!(
            "no headings at nav depth {} or shallower in {}",
            cfg.nav_depth,
            args.file.display()
        )
    })?;

    if let Some(id) = args.section {
        if !state.jump_to_section(&id) {
            state.message = Some(format!("Unknown section: {id}"));
        }
    }

    tracing::info!(file = %args.file.display(), "opening page");
    run_tui(state, &cfg, &highlights)
}

fn run_tui(
    mut app: app_state::AppState,
    cfg: &config::Config,
    highlights: &highlight::Highlights,
) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut clipboard = SystemClipboard;
    let result = run_app(&mut terminal, &mut app, cfg, highlights, &mut clipboard);
    app.shutdown();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "viewer exited with an error");
    }
    result.map_err(Into::into)
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut app_state::AppState,
    cfg: &config::Config,
    highlights: &highlight::Highlights,
    clipboard: &mut SystemClipboard,
) -> io::Result<()> {
    let frame = cfg.frame_interval();
    let mut needs_draw = true;

    loop {
        if app.tick(Instant::now()) {
            needs_draw = true;
        }
        if app.tracker.is_dirty() {
            app.flush_scroll();
            needs_draw = true;
        }
        if needs_draw {
            terminal.draw(|f| ui::draw(f, app, highlights))?;
            needs_draw = false;
            // Drawing may resize the viewport and clamp the scroll
            if app.tracker.is_dirty() {
                continue;
            }
        }

        let wait = app.next_deadline().map_or(IDLE_WAIT, |deadline| {
            deadline.saturating_duration_since(Instant::now()).min(IDLE_WAIT)
        });
        if !event::poll(wait)? {
            continue;
        }

        // Batch everything that arrives within one frame into a single evaluation and draw
        let frame_end = Instant::now() + frame;
        loop {
            if handle_event(event::read()?, app, clipboard) {
                return Ok(());
            }
            let left = frame_end.saturating_duration_since(Instant::now());
            if left.is_zero() || !event::poll(left)? {
                break;
            }
        }
        needs_draw = true;
    }
}

/// Applies one terminal event. Returns `true` when the viewer should quit.
fn handle_event(
    event: Event,
    app: &mut app_state::AppState,
    clipboard: &mut SystemClipboard,
) -> bool {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(key, app, clipboard),
        Event::Mouse(mouse) => {
            match mouse.kind {
                MouseEventKind::ScrollDown => app.scroll_by(WHEEL_STEP),
                MouseEventKind::ScrollUp => app.scroll_by(-WHEEL_STEP),
                _ => {}
            }
            false
        }
        _ => false,
    }
}

fn handle_key(
    key: KeyEvent,
    app: &mut app_state::AppState,
    clipboard: &mut SystemClipboard,
) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    match key.code {
        KeyCode::Esc if app.nav_open => app.toggle_nav(),
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Down | KeyCode::Char('j') => app.scroll_by(1),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_by(-1),
        KeyCode::PageDown | KeyCode::Char(' ') => app.page_down(),
        KeyCode::PageUp => app.page_up(),
        KeyCode::Home | KeyCode::Char('g') => app.scroll_to(0),
        KeyCode::End | KeyCode::Char('G') => app.scroll_to(app.max_scroll()),
        KeyCode::Tab => {
            app.next_nav();
        }
        KeyCode::BackTab => {
            app.prev_nav();
        }
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(digit) = c.to_digit(10) {
                let index = usize::try_from(digit).unwrap_or(1) - 1;
                app.jump_to_nav(index);
            }
        }
        KeyCode::Char(']') => app.select_next_snippet(),
        KeyCode::Char('[') => app.select_prev_snippet(),
        KeyCode::Char('c' | 'y') => {
            // Failures are logged by the clipboard action and shown in the help bar
            let _ = app.copy_selected(clipboard, Instant::now());
        }
        KeyCode::Char('m') => app.toggle_nav(),
        _ => {}
    }
    false
}
