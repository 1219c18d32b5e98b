mod bars;
mod help;
mod state;

use crate::cli::Cli;
use crate::dataset;
use crate::model::{Algorithm, RunResult, SortEvent, Value};
use crate::orchestrator::{self, Session, UiCommand};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Terminal,
};
use state::{apply_event, push_wrapped_status_kv, UiState};
use std::{io, time::Duration, time::Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::debug;

/// Elements added or removed per `[`/`]` press.
const RESIZE_STEP: usize = 8;

pub async fn run(args: Cli) -> Result<()> {
    // Unbounded channels avoid backpressure on the sorting worker, which blocks on every step.
    let (event_tx, event_rx) = mpsc::unbounded_channel::<SortEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<UiCommand>();

    let session = Session::from_args(&args)?;
    let max_value = session.max_value();

    // TUI runs in a dedicated thread to keep all blocking I/O out of the Tokio runtime.
    let ui_args = args.clone();
    let ui_handle =
        std::thread::spawn(move || run_threaded(ui_args, max_value, event_rx, cmd_tx));

    let res = orchestrator::run_controller(&args, session, event_tx, cmd_rx).await;

    let join_res = tokio::task::spawn_blocking(move || ui_handle.join()).await;
    if let Ok(joined) = join_res {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(anyhow::anyhow!("TUI thread panicked")),
        }
    }

    res
}

/// Run the TUI loop on a dedicated thread.
fn run_threaded(
    args: Cli,
    max_value: Value,
    mut event_rx: UnboundedReceiver<SortEvent>,
    cmd_tx: UnboundedSender<UiCommand>,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    // UiState is owned by the UI thread only; no cross-thread mutation.
    let mut state = UiState::new(args.algorithm, args.auto_save, args.step_delay(), max_value);

    // ~30 fps keeps short step delays visible without redrawing on every event.
    let tick_rate = Duration::from_millis(33);
    let mut last_tick = Instant::now();

    let res = loop {
        // Drain events without blocking to keep UI responsive.
        while let Ok(ev) = event_rx.try_recv() {
            match ev {
                SortEvent::RunCompleted { result } => {
                    handle_run_completed(&args, &mut state, *result);
                }
                other => apply_event(&mut state, other),
            }
        }

        if last_tick.elapsed() >= tick_rate {
            terminal.draw(|f| draw(f.area(), f, &state)).ok();
            last_tick = Instant::now();
        }

        // Poll input with a short timeout to avoid blocking the render loop.
        if event::poll(Duration::from_millis(10)).unwrap_or(false) {
            if let Ok(Event::Key(k)) = event::read() {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                match (k.modifiers, k.code) {
                    (_, KeyCode::Char('q')) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
                        let _ = cmd_tx.send(UiCommand::Quit);
                        break Ok(());
                    }
                    (_, KeyCode::Char(' ')) => {
                        if state.running {
                            state.info = "Stopping…".into();
                            let _ = cmd_tx.send(UiCommand::Stop);
                        } else {
                            state.info = "Starting…".into();
                            let _ = cmd_tx.send(UiCommand::Start);
                        }
                    }
                    (_, KeyCode::Char('p')) => {
                        if state.running {
                            let _ = cmd_tx.send(UiCommand::Pause(!state.paused));
                        }
                    }
                    (_, KeyCode::Char(c @ '1'..='3')) => {
                        let idx = (c as u8 - b'1') as usize;
                        let algorithm = Algorithm::ALL[idx];
                        state.algorithm = algorithm;
                        state.info = format!("Selected {}", algorithm.label());
                        let _ = cmd_tx.send(UiCommand::SelectAlgorithm(algorithm));
                    }
                    (_, KeyCode::Char('+')) | (_, KeyCode::Char('=')) => {
                        let _ = cmd_tx.send(UiCommand::SetDelay(state.next_delay(true)));
                    }
                    (_, KeyCode::Char('-')) => {
                        let _ = cmd_tx.send(UiCommand::SetDelay(state.next_delay(false)));
                    }
                    (_, KeyCode::Char(']')) => {
                        let size = (state.values.len() + RESIZE_STEP).min(dataset::MAX_SIZE);
                        let _ = cmd_tx.send(UiCommand::Resize(size));
                    }
                    (_, KeyCode::Char('[')) => {
                        let size = state
                            .values
                            .len()
                            .saturating_sub(RESIZE_STEP)
                            .max(dataset::MIN_SIZE);
                        let _ = cmd_tx.send(UiCommand::Resize(size));
                    }
                    (_, KeyCode::Char('n')) => {
                        let _ = cmd_tx.send(UiCommand::Shuffle);
                    }
                    (_, KeyCode::Char('s')) => {
                        if let Some(r) = state.last_result.clone() {
                            save_and_show_path(&r, &mut state);
                        } else {
                            state.info = "No finished run to save yet.".into();
                        }
                    }
                    (_, KeyCode::Char('a')) => {
                        state.auto_save = !state.auto_save;
                        state.info = if state.auto_save {
                            "Auto-save enabled".into()
                        } else {
                            "Auto-save disabled".into()
                        };
                    }
                    (_, KeyCode::Tab) => {
                        state.tab = (state.tab + 1) % 3;
                    }
                    (_, KeyCode::Char('?')) => {
                        state.tab = 2;
                    }
                    _ => {}
                }
            }
        }
    };

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen).ok();
    res
}

fn handle_run_completed(args: &Cli, state: &mut UiState, r: RunResult) {
    debug!(algorithm = %r.algorithm, cancelled = r.cancelled, "run finished");
    let processed = orchestrator::process_run_completion(args, state.auto_save, &r);
    if let Some(path) = processed.auto_saved_path.as_ref() {
        debug!(path = %path.display(), "auto-saved run");
    }

    state.running = false;
    state.paused = false;
    if !processed.messages.is_empty() {
        state.info = processed.messages.join("; ");
    } else if !r.cancelled {
        state.info = format!(
            "{} completed: {} steps in {} ms",
            r.algorithm.label(),
            r.counts.total(),
            r.elapsed_ms
        );
    }
    state.last_result = Some(r);
}

/// Save result and update state.info with the saved path message.
fn save_and_show_path(r: &RunResult, state: &mut UiState) {
    match crate::storage::save_run(r) {
        Ok(path) => {
            state.info = format!("Saved: {}", path.display());
        }
        Err(e) => {
            state.info = format!("Save failed: {e:#}");
        }
    }
}

fn draw(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
        .split(area);

    let tabs = Tabs::new(vec![
        Line::from("Visualizer"),
        Line::from("Result"),
        Line::from("Help"),
    ])
    .select(state.tab)
    .block(Block::default().borders(Borders::ALL).title("sortviz"))
    .highlight_style(Style::default().fg(Color::Yellow));
    f.render_widget(tabs, chunks[0]);

    match state.tab {
        0 => draw_visualizer(chunks[1], f, state),
        1 => draw_result(chunks[1], f, state),
        _ => help::draw_help(chunks[1], f),
    }
}

fn draw_visualizer(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    // Narrow terminals stack the status panel under the bars.
    let compact = area.width < 80;
    let chunks = if compact {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(8), Constraint::Length(9)].as_ref())
            .split(area)
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(36)].as_ref())
            .split(area)
    };

    let title = Line::from(vec![
        Span::styled(
            state.algorithm.label(),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw(format!(" · {} values · {}", state.values.len(), state.status_label())),
    ]);
    bars::render_bars(
        f,
        chunks[0],
        &state.values,
        &state.bars,
        state.max_value,
        title,
    );

    let status_width = chunks[1].width;
    let mut lines: Vec<Line<'static>> = Vec::new();
    let elapsed_ms = if state.running {
        state.run_start.elapsed().as_millis() as u64
    } else {
        state.last_result.as_ref().map(|r| r.elapsed_ms).unwrap_or(0)
    };
    let c = &state.counts;
    let kv = [
        ("Status", state.status_label().to_string()),
        (
            "Delay",
            humantime::format_duration(state.delay).to_string(),
        ),
        ("Elapsed", format!("{:.1} s", elapsed_ms as f64 / 1000.0)),
        ("Compares", c.compares.to_string()),
        ("Swaps", c.swaps.to_string()),
        ("Merge writes", c.merges.to_string()),
        ("Marks", c.marks.to_string()),
        (
            "Sortedness",
            format!("{:.0}%", crate::metrics::sortedness(&state.values) * 100.0),
        ),
        (
            "Tone",
            state
                .last_tone_hz
                .map(|hz| format!("{hz:.0} Hz"))
                .unwrap_or_else(|| "-".into()),
        ),
        (
            "Auto-save",
            if state.auto_save { "on" } else { "off" }.to_string(),
        ),
    ];
    for (label, value) in kv {
        push_wrapped_status_kv(&mut lines, label, &value, status_width);
    }
    if !state.info.is_empty() {
        lines.push(Line::from(""));
        push_wrapped_status_kv(&mut lines, "Info", &state.info, status_width);
    }

    let status = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, chunks[1]);
}

fn draw_result(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let lines: Vec<Line> = match state.last_result.as_ref() {
        Some(r) => crate::text_summary::build_text_summary(r)
            .lines
            .into_iter()
            .map(Line::from)
            .collect(),
        None => vec![Line::from("No finished run yet. Press space to start one.")],
    };
    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Last run"));
    f.render_widget(p, area);
}
