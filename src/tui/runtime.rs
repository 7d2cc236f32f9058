//! Dashboard runtime: terminal, event loop and effect execution.
//!
//! The loop is single-threaded. Fetches run on detached worker threads and
//! report back through a crossbeam channel as ordinary [`DashboardMsg`]s, so
//! the model only ever changes inside [`update`].

#![allow(missing_docs)]

use std::io::{self, Write};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use crossterm::cursor::MoveTo;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::queue;
use crossterm::style::{Attribute, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};

use crate::api::source::DataSource;
use crate::api::types::Page;
use crate::core::config::Config;
use crate::core::errors::{DeckError, Result};
use crate::logger::jsonl::{ActivityEvent, JsonlConfig, JsonlWriter};
use crate::tui::browser::{BrowserCmd, BrowserMsg};
use crate::tui::model::{
    DashboardCmd, DashboardModel, DashboardMsg, ModelOptions, NotificationLevel, View,
};
use crate::tui::preferences::{self, DebouncedWriter, ResolvedPreferences, SessionOverrides};
use crate::tui::render::{RenderContext, render};
use crate::tui::screen::{CellStyle, ScreenBuffer};
use crate::tui::terminal_guard::TerminalGuard;
use crate::tui::theme::{AccessibilityProfile, Theme};
use crate::tui::update::{shutdown, startup, update};

/// Everything `ideck dashboard` needs to run.
#[derive(Clone)]
pub struct DashboardRuntimeConfig {
    pub config: Config,
    pub source: Arc<dyn DataSource>,
    pub overrides: SessionOverrides,
    /// `--no-color` was passed; `NO_COLOR` is honored regardless.
    pub no_color: bool,
}

/// Run the dashboard until the operator quits.
///
/// # Errors
/// Returns terminal setup and I/O failures. Fetch failures never end the
/// session; they are shown in the panes.
pub fn run_dashboard(cfg: DashboardRuntimeConfig) -> Result<()> {
    let prefs_path = cfg.config.paths.preferences_file.clone();
    let outcome = preferences::load(&prefs_path);
    let prefs_problem = outcome.problem();
    let mut persisted = outcome.into_prefs();
    let session = preferences::merge(&persisted, &cfg.overrides);

    let profile = if cfg.no_color {
        AccessibilityProfile::from_no_color_flag(true)
    } else {
        AccessibilityProfile::from_environment()
    };
    let resolved = ResolvedPreferences::resolve(&session, profile.contrast);
    let ctx = RenderContext::new(Theme::new(profile.with_contrast(resolved.contrast)));

    let tick = Duration::from_millis(cfg.config.dashboard.tick_ms);
    let mut model = DashboardModel::new(ModelOptions {
        start_view: resolved.start_view,
        list_width_pct: cfg.config.dashboard.list_width_pct,
        hint_verbosity: resolved.hint_verbosity,
        notification_timeout: resolved.notification_timeout,
        tick_interval: tick,
        source_label: cfg.source.describe(),
        ..ModelOptions::default()
    });

    let (tx, rx) = crossbeam_channel::unbounded();
    let mut effects = Effects {
        source: Arc::clone(&cfg.source),
        tx,
        log: JsonlWriter::open(JsonlConfig::for_path(cfg.config.paths.activity_log.clone())),
    };
    let mut prefs_writer = DebouncedWriter::new(prefs_path);

    let guard = TerminalGuard::new().map_err(terminal_error)?;
    let (cols, rows) = TerminalGuard::terminal_size();
    update(&mut model, DashboardMsg::Resize { cols, rows });
    if let Some(problem) = prefs_problem {
        model.push_notification(NotificationLevel::Warning, problem);
    }
    let first = startup(&mut model);
    effects.run(first);

    let result = event_loop(
        &mut model,
        &mut effects,
        &rx,
        &ctx,
        tick,
        &mut |model: &mut DashboardModel| {
            if persisted.last_view != Some(model.view) {
                persisted.last_view = Some(model.view);
                prefs_writer.request_save();
            }
            prefs_writer
                .try_flush(&persisted)
                .map(|res| preference_event(prefs_writer.path(), res))
        },
    );
    drop(guard);

    let end = shutdown(&mut model);
    effects.run(end);
    persisted.last_view = Some(model.view);
    prefs_writer.request_save();
    if let Some(res) = prefs_writer.force_flush(&persisted) {
        let cmd = model.record(preference_event(prefs_writer.path(), res));
        effects.run(cmd);
    }
    effects.log.flush();
    result
}

type PrefsHook<'a> = dyn FnMut(&mut DashboardModel) -> Option<ActivityEvent> + 'a;

fn event_loop(
    model: &mut DashboardModel,
    effects: &mut Effects,
    rx: &Receiver<DashboardMsg>,
    ctx: &RenderContext,
    tick: Duration,
    prefs: &mut PrefsHook<'_>,
) -> Result<()> {
    let mut stdout = io::stdout();
    let mut last_frame: Option<ScreenBuffer> = None;
    let mut last_tick = Instant::now();

    while !model.quit {
        while let Ok(msg) = rx.try_recv() {
            let cmd = update(model, msg);
            effects.run(cmd);
        }
        if let Some(event) = prefs(model) {
            let cmd = model.record(event);
            effects.run(cmd);
        }

        let frame = render(model, ctx);
        if last_frame.as_ref() != Some(&frame) {
            paint(&mut stdout, &frame, ctx, last_frame.as_ref()).map_err(terminal_error)?;
            last_frame = Some(frame);
        }

        let timeout = tick.saturating_sub(last_tick.elapsed());
        if event::poll(timeout).map_err(terminal_error)? {
            match event::read().map_err(terminal_error)? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    let cmd = update(model, DashboardMsg::Key(key));
                    effects.run(cmd);
                }
                Event::Resize(cols, rows) => {
                    update(model, DashboardMsg::Resize { cols, rows });
                    last_frame = None;
                }
                _ => {}
            }
        }
        if last_tick.elapsed() >= tick {
            update(model, DashboardMsg::Tick);
            last_tick = Instant::now();
        }
    }
    Ok(())
}

fn preference_event(path: &std::path::Path, res: io::Result<std::path::PathBuf>) -> ActivityEvent {
    ActivityEvent::PreferenceSave {
        path: path.display().to_string(),
        ok: res.is_ok(),
        error: res.err().map(|e| e.to_string()),
    }
}

fn terminal_error(e: io::Error) -> DeckError {
    DeckError::Runtime {
        details: format!("terminal: {e}"),
    }
}

// ──────────────────── effects ────────────────────

struct Effects {
    source: Arc<dyn DataSource>,
    tx: Sender<DashboardMsg>,
    log: JsonlWriter,
}

impl Effects {
    fn run(&mut self, cmd: DashboardCmd) {
        for cmd in cmd.flatten() {
            match cmd {
                DashboardCmd::Fetch { view, cmd } => self.spawn_fetch(view, cmd),
                DashboardCmd::Record(entry) => self.log.write_entry(&entry),
                DashboardCmd::None | DashboardCmd::Quit | DashboardCmd::Batch(_) => {}
            }
        }
    }

    fn spawn_fetch(&self, view: View, cmd: BrowserCmd) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let fallback = cmd.clone();
        let spawned = thread::Builder::new()
            .name("deck-fetch".to_string())
            .spawn(move || {
                if let Some(msg) = perform_fetch(source.as_ref(), view, cmd) {
                    let _ = tx.send(msg);
                }
            });
        if let Err(e) = spawned
            && let Some(msg) = failure_msg(view, fallback, &format!("could not start fetch: {e}"))
        {
            let _ = self.tx.send(msg);
        }
    }
}

/// Run one browser request against `source` and wrap the outcome as the
/// message the browser expects. Blocking; the runtime calls it on a worker
/// thread and tests call it inline.
pub fn perform_fetch(source: &dyn DataSource, view: View, cmd: BrowserCmd) -> Option<DashboardMsg> {
    match (view, cmd) {
        (_, BrowserCmd::None) => None,
        (View::Incidents, BrowserCmd::FetchPage { seq, page, sort }) => Some(
            DashboardMsg::Incidents(page_msg(seq, source.fetch_incidents(page, sort.as_ref()))),
        ),
        (View::Alerts, BrowserCmd::FetchPage { seq, page, sort }) => Some(DashboardMsg::Alerts(
            page_msg(seq, source.fetch_alerts(page, sort.as_ref())),
        )),
        (View::Incidents, BrowserCmd::FetchDetail { id }) => {
            let result = source.fetch_incident(&id);
            Some(DashboardMsg::Incidents(detail_msg(id, result)))
        }
        (View::Alerts, BrowserCmd::FetchDetail { id }) => {
            let result = source.fetch_alert(&id);
            Some(DashboardMsg::Alerts(detail_msg(id, result)))
        }
    }
}

fn page_msg<T>(seq: u64, result: Result<Page<T>>) -> BrowserMsg<T> {
    match result {
        Ok(page) => BrowserMsg::PageLoaded { seq, page },
        Err(e) => BrowserMsg::PageFailed {
            seq,
            error: e.to_string(),
            retryable: e.is_retryable(),
        },
    }
}

fn detail_msg<T>(id: String, result: Result<T>) -> BrowserMsg<T> {
    match result {
        Ok(item) => BrowserMsg::DetailLoaded { id, item },
        Err(e) => BrowserMsg::DetailFailed {
            id,
            error: e.to_string(),
        },
    }
}

/// Failure for a request that never reached the data source; always worth
/// another try.
fn failure_msg(view: View, cmd: BrowserCmd, error: &str) -> Option<DashboardMsg> {
    let error = error.to_string();
    match (view, cmd) {
        (_, BrowserCmd::None) => None,
        (View::Incidents, BrowserCmd::FetchPage { seq, .. }) => {
            Some(DashboardMsg::Incidents(BrowserMsg::PageFailed {
                seq,
                error,
                retryable: true,
            }))
        }
        (View::Alerts, BrowserCmd::FetchPage { seq, .. }) => {
            Some(DashboardMsg::Alerts(BrowserMsg::PageFailed {
                seq,
                error,
                retryable: true,
            }))
        }
        (View::Incidents, BrowserCmd::FetchDetail { id }) => {
            Some(DashboardMsg::Incidents(BrowserMsg::DetailFailed { id, error }))
        }
        (View::Alerts, BrowserCmd::FetchDetail { id }) => {
            Some(DashboardMsg::Alerts(BrowserMsg::DetailFailed { id, error }))
        }
    }
}

// ──────────────────── painting ────────────────────

/// Write `frame` to the terminal, skipping rows identical to `previous`.
fn paint(
    out: &mut impl Write,
    frame: &ScreenBuffer,
    ctx: &RenderContext,
    previous: Option<&ScreenBuffer>,
) -> io::Result<()> {
    let previous = previous.filter(|p| p.size() == frame.size());
    if previous.is_none() {
        queue!(out, Clear(ClearType::All))?;
    }
    let (_, rows) = frame.size();
    for row in 0..rows {
        let cells = frame.row(row);
        if previous.is_some_and(|p| p.row(row) == cells) {
            continue;
        }
        queue!(out, MoveTo(0, row))?;
        let mut current: Option<CellStyle> = None;
        for cell in cells.iter().filter(|c| !c.continuation) {
            if current != Some(cell.style) {
                apply_style(out, cell.style, ctx)?;
                current = Some(cell.style);
            }
            queue!(out, Print(cell.ch))?;
        }
        queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
    }
    out.flush()
}

fn apply_style(out: &mut impl Write, style: CellStyle, ctx: &RenderContext) -> io::Result<()> {
    queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
    if let Some(color) = ctx.theme.color(style.token) {
        queue!(out, SetForegroundColor(color))?;
    }
    if style.bold {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if style.reverse {
        queue!(out, SetAttribute(Attribute::Reverse))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fixtures::StaticDataSource;
    use crate::api::types::Incident;
    use crate::tui::theme::SemanticToken;

    #[test]
    fn perform_fetch_wraps_pages_and_details() {
        let source = StaticDataSource::demo(10);
        let msg = perform_fetch(
            &source,
            View::Alerts,
            BrowserCmd::FetchPage {
                seq: 7,
                page: 2,
                sort: None,
            },
        );
        let Some(DashboardMsg::Alerts(BrowserMsg::PageLoaded { seq, page })) = msg else {
            panic!("expected an alerts page");
        };
        assert_eq!(seq, 7);
        assert_eq!(page.meta.current_page, 2);
        assert_eq!(page.items.len(), 10);

        let msg = perform_fetch(
            &source,
            View::Incidents,
            BrowserCmd::FetchDetail {
                id: "INC1003".into(),
            },
        );
        assert!(matches!(
            msg,
            Some(DashboardMsg::Incidents(BrowserMsg::DetailLoaded { ref id, .. })) if id == "INC1003"
        ));
        assert!(perform_fetch(&source, View::Incidents, BrowserCmd::None).is_none());
    }

    #[test]
    fn perform_fetch_reports_errors_as_strings() {
        let source = StaticDataSource::demo(10).with_failing_page(1);
        let msg = perform_fetch(
            &source,
            View::Incidents,
            BrowserCmd::FetchPage {
                seq: 1,
                page: 1,
                sort: None,
            },
        );
        let Some(DashboardMsg::Incidents(BrowserMsg::PageFailed {
            error, retryable, ..
        })) = msg
        else {
            panic!("expected a page failure");
        };
        assert!(error.contains("503"));
        assert!(retryable);

        let msg = perform_fetch(
            &source,
            View::Alerts,
            BrowserCmd::FetchDetail { id: "nope".into() },
        );
        assert!(matches!(
            msg,
            Some(DashboardMsg::Alerts(BrowserMsg::DetailFailed { .. }))
        ));
    }

    #[test]
    fn rejected_credentials_are_not_retryable() {
        let msg = page_msg::<Incident>(
            3,
            Err(DeckError::Unauthorized {
                endpoint: "https://ops.example/api".into(),
            }),
        );
        assert!(matches!(
            msg,
            BrowserMsg::PageFailed {
                seq: 3,
                retryable: false,
                ..
            }
        ));
    }

    #[test]
    fn failure_msg_matches_request_kind() {
        let msg = failure_msg(
            View::Alerts,
            BrowserCmd::FetchPage {
                seq: 4,
                page: 1,
                sort: None,
            },
            "boom",
        );
        assert!(matches!(
            msg,
            Some(DashboardMsg::Alerts(BrowserMsg::PageFailed {
                seq: 4,
                retryable: true,
                ..
            }))
        ));
    }

    #[test]
    fn paint_skips_unchanged_rows() {
        let ctx = RenderContext::default();
        let mut frame = ScreenBuffer::new(10, 3);
        frame.put_str(0, 0, "hello", CellStyle::token(SemanticToken::Accent), 10);

        let mut first = Vec::new();
        paint(&mut first, &frame, &ctx, None).unwrap();
        let first = String::from_utf8_lossy(&first).into_owned();
        assert!(first.contains("hello"));

        let mut next = frame.clone();
        next.put_str(0, 2, "bye", CellStyle::plain(), 10);
        let mut second = Vec::new();
        paint(&mut second, &next, &ctx, Some(&frame)).unwrap();
        let second = String::from_utf8_lossy(&second).into_owned();
        assert!(second.contains("bye"));
        assert!(!second.contains("hello"));
    }
}
