//! Update function for the dashboard.
//!
//! `update()` takes the model and a message, mutates the model, and returns a
//! command describing the side-effects the runtime should execute. No I/O
//! happens here; fetches and log writes leave as [`DashboardCmd`] values.

#![allow(clippy::too_many_lines)]

use crate::api::types::SortSpec;
use crate::logger::jsonl::ActivityEvent;
use crate::tui::browser::{Browser, BrowserCmd, BrowserMsg};
use crate::tui::input::{self, InputAction};
use crate::tui::item::BrowsableItem;
use crate::tui::model::{DashboardCmd, DashboardModel, DashboardMsg, NotificationLevel, View};

/// Apply a message to the model and return the next command for the runtime.
pub fn update(model: &mut DashboardModel, msg: DashboardMsg) -> DashboardCmd {
    match msg {
        DashboardMsg::Tick => {
            model.tick = model.tick.saturating_add(1);
            model.expire_notifications();
            DashboardCmd::None
        }
        DashboardMsg::Key(key) => {
            let resolution = input::resolve_key_event(&key, model.input_context());
            match resolution.action {
                Some(action) => apply_input_action(model, action),
                None => DashboardCmd::None,
            }
        }
        DashboardMsg::Resize { cols, rows } => {
            model.terminal_size = (cols, rows);
            model.incidents.update(BrowserMsg::Resize { cols, rows });
            model.alerts.update(BrowserMsg::Resize { cols, rows });
            DashboardCmd::None
        }
        DashboardMsg::Incidents(msg) => step(model, View::Incidents, incidents_of, msg),
        DashboardMsg::Alerts(msg) => step(model, View::Alerts, alerts_of, msg),
        DashboardMsg::SwitchView(view) => switch_view(model, view),
    }
}

/// Commands to run once before the first event: log the session and load
/// the starting view.
pub fn startup(model: &mut DashboardModel) -> DashboardCmd {
    let start = model.record(ActivityEvent::SessionStart {
        source: model.source_label.clone(),
        view: model.view.as_str().to_string(),
    });
    let load = match model.view {
        View::Incidents => {
            let cmd = model.incidents.ensure_loaded();
            wrap(model, View::Incidents, cmd)
        }
        View::Alerts => {
            let cmd = model.alerts.ensure_loaded();
            wrap(model, View::Alerts, cmd)
        }
    };
    DashboardCmd::batch(vec![start, load])
}

/// Final log entry for the session.
pub fn shutdown(model: &mut DashboardModel) -> DashboardCmd {
    model.record(ActivityEvent::SessionEnd {
        view: model.view.as_str().to_string(),
    })
}

fn apply_input_action(model: &mut DashboardModel, action: InputAction) -> DashboardCmd {
    match action {
        InputAction::Quit => {
            model.quit = true;
            DashboardCmd::Quit
        }
        InputAction::CloseOverlay => {
            model.active_overlay = None;
            DashboardCmd::None
        }
        InputAction::ToggleOverlay(overlay) => {
            model.active_overlay = if model.active_overlay == Some(overlay) {
                None
            } else {
                Some(overlay)
            };
            DashboardCmd::None
        }
        InputAction::SwitchView(view) => switch_view(model, view),
        InputAction::NextView => switch_view(model, model.view.next()),
        InputAction::Refresh => match model.view {
            View::Incidents => {
                let cmd = model.incidents.refresh();
                wrap(model, View::Incidents, cmd)
            }
            View::Alerts => {
                let cmd = model.alerts.refresh();
                wrap(model, View::Alerts, cmd)
            }
        },
        InputAction::Browser(key) => match model.view {
            View::Incidents => step(model, View::Incidents, incidents_of, BrowserMsg::Key(key)),
            View::Alerts => step(model, View::Alerts, alerts_of, BrowserMsg::Key(key)),
        },
    }
}

/// Leave the current view and enter `view`. The leaving browser forgets its
/// in-flight detail; the entering one loads page 1 if it never has.
fn switch_view(model: &mut DashboardModel, view: View) -> DashboardCmd {
    if model.view == view {
        return DashboardCmd::None;
    }
    match model.view {
        View::Incidents => model.incidents.clear_detail_loads(),
        View::Alerts => model.alerts.clear_detail_loads(),
    }
    model.view = view;
    match view {
        View::Incidents => {
            let cmd = model.incidents.ensure_loaded();
            wrap(model, view, cmd)
        }
        View::Alerts => {
            let cmd = model.alerts.ensure_loaded();
            wrap(model, view, cmd)
        }
    }
}

// ──────────────────── browser plumbing ────────────────────

fn incidents_of(model: &mut DashboardModel) -> &mut Browser<crate::api::types::Incident> {
    &mut model.incidents
}

fn alerts_of(model: &mut DashboardModel) -> &mut Browser<crate::api::types::Alert> {
    &mut model.alerts
}

/// Feed `msg` to one browser, logging what the browser itself stays silent
/// about (stale discards and failures).
fn step<T: BrowsableItem>(
    model: &mut DashboardModel,
    view: View,
    browser_of: fn(&mut DashboardModel) -> &mut Browser<T>,
    msg: BrowserMsg<T>,
) -> DashboardCmd {
    let observed = observe(browser_of(model), view, &msg);
    let cmd = browser_of(model).update(msg);

    let mut cmds = Vec::new();
    if let Some(Observation { event, notify }) = observed {
        cmds.push(model.record(event));
        if let Some(message) = notify {
            model.push_notification(NotificationLevel::Warning, message);
        }
    }
    cmds.push(wrap(model, view, cmd));
    DashboardCmd::batch(cmds)
}

struct Observation {
    event: ActivityEvent,
    notify: Option<String>,
}

fn observe<T: BrowsableItem>(
    browser: &Browser<T>,
    view: View,
    msg: &BrowserMsg<T>,
) -> Option<Observation> {
    let view_name = view.as_str().to_string();
    match msg {
        BrowserMsg::PageLoaded { seq, .. } | BrowserMsg::PageFailed { seq, .. }
            if browser.is_stale(*seq) =>
        {
            Some(Observation {
                event: ActivityEvent::StaleDiscard {
                    view: view_name,
                    seq: *seq,
                    latest: browser.latest_seq(),
                },
                notify: None,
            })
        }
        BrowserMsg::PageFailed { error, .. } => Some(Observation {
            event: ActivityEvent::FetchError {
                view: view_name,
                id: None,
                error: error.clone(),
            },
            notify: None,
        }),
        BrowserMsg::DetailFailed { id, error } => Some(Observation {
            event: ActivityEvent::FetchError {
                view: view_name,
                id: Some(id.clone()),
                error: error.clone(),
            },
            notify: Some(format!("Could not load {} {id}: {error}", T::NOUN)),
        }),
        _ => None,
    }
}

/// Tag a browser command with its view and log the request.
fn wrap(model: &mut DashboardModel, view: View, cmd: BrowserCmd) -> DashboardCmd {
    let event = match &cmd {
        BrowserCmd::None => return DashboardCmd::None,
        BrowserCmd::FetchPage { seq, page, sort } => ActivityEvent::PageFetch {
            view: view.as_str().to_string(),
            seq: *seq,
            page: *page,
            sort: sort.as_ref().map(describe_sort),
        },
        BrowserCmd::FetchDetail { id } => ActivityEvent::DetailFetch {
            view: view.as_str().to_string(),
            id: id.clone(),
        },
    };
    DashboardCmd::batch(vec![model.record(event), DashboardCmd::Fetch { view, cmd }])
}

fn describe_sort(sort: &SortSpec) -> String {
    format!("{}:{}", sort.field, sort.direction.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fixtures::demo_incidents;
    use crate::api::types::{Page, PageMeta};
    use crate::logger::jsonl::ActivityEntry;
    use crate::tui::focus::Focus;
    use crate::tui::model::{ModelOptions, Overlay};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn model() -> DashboardModel {
        DashboardModel::new(ModelOptions::default())
    }

    fn key(code: KeyCode) -> DashboardMsg {
        DashboardMsg::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn fetches(cmd: DashboardCmd) -> Vec<(View, BrowserCmd)> {
        cmd.flatten()
            .into_iter()
            .filter_map(|c| match c {
                DashboardCmd::Fetch { view, cmd } => Some((view, cmd)),
                _ => None,
            })
            .collect()
    }

    fn records(cmd: &DashboardCmd) -> Vec<ActivityEntry> {
        cmd.clone()
            .flatten()
            .into_iter()
            .filter_map(|c| match c {
                DashboardCmd::Record(entry) => Some(entry),
                _ => None,
            })
            .collect()
    }

    fn loaded_page(n: usize) -> Page<crate::api::types::Incident> {
        let items = demo_incidents(n)
            .into_iter()
            .map(|mut i| {
                i.detail_loaded = false;
                i
            })
            .collect();
        Page {
            items,
            meta: PageMeta {
                current_page: 1,
                has_next: true,
                has_prev: false,
                total_pages: Some(3),
                total_count: None,
            },
        }
    }

    fn started() -> DashboardModel {
        let mut m = model();
        let cmd = startup(&mut m);
        let seq = match fetches(cmd).as_slice() {
            [(View::Incidents, BrowserCmd::FetchPage { seq, .. })] => *seq,
            other => panic!("unexpected startup fetches: {other:?}"),
        };
        update(
            &mut m,
            DashboardMsg::Incidents(BrowserMsg::PageLoaded {
                seq,
                page: loaded_page(5),
            }),
        );
        m
    }

    #[test]
    fn startup_logs_session_and_loads_start_view() {
        let mut m = model();
        let cmd = startup(&mut m);
        let entries = records(&cmd);
        assert!(matches!(entries[0].event, ActivityEvent::SessionStart { .. }));
        assert!(matches!(entries[1].event, ActivityEvent::PageFetch { page: 1, .. }));
        assert_eq!(fetches(cmd).len(), 1);
        assert_eq!(m.activity.len(), 2);
    }

    #[test]
    fn q_quits_from_list_but_not_detail() {
        let mut m = started();
        m.incidents.update(BrowserMsg::DetailLoaded {
            id: "INC1000".into(),
            item: demo_incidents(1).remove(0),
        });
        update(&mut m, key(KeyCode::Enter));
        assert_eq!(m.incidents.focus(), Focus::Detail);

        assert_eq!(update(&mut m, key(KeyCode::Char('q'))), DashboardCmd::None);
        assert!(!m.quit);

        update(&mut m, key(KeyCode::Esc));
        assert_eq!(m.incidents.focus(), Focus::List);
        assert_eq!(update(&mut m, key(KeyCode::Char('q'))), DashboardCmd::Quit);
        assert!(m.quit);
    }

    #[test]
    fn ctrl_c_quits_with_sort_menu_open() {
        let mut m = started();
        update(&mut m, key(KeyCode::Char('s')));
        assert!(m.incidents.sort_menu().is_open());
        let cmd = update(
            &mut m,
            DashboardMsg::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
        );
        assert_eq!(cmd, DashboardCmd::Quit);
    }

    #[test]
    fn switching_view_loads_once_and_clears_leaving_tracker() {
        let mut m = started();
        update(&mut m, key(KeyCode::Enter));
        assert!(m.incidents.detail_loads().is_busy());

        let cmd = update(&mut m, key(KeyCode::Tab));
        assert_eq!(m.view, View::Alerts);
        assert!(!m.incidents.detail_loads().is_busy());
        let f = fetches(cmd);
        assert!(matches!(f.as_slice(), [(View::Alerts, BrowserCmd::FetchPage { page: 1, .. })]));

        // back and forth again: alerts still in flight, incidents loaded
        assert!(fetches(update(&mut m, key(KeyCode::Char('1')))).is_empty());
        assert!(fetches(update(&mut m, key(KeyCode::Char('2')))).is_empty());
    }

    #[test]
    fn same_view_switch_is_noop() {
        let mut m = started();
        assert_eq!(update(&mut m, DashboardMsg::SwitchView(View::Incidents)), DashboardCmd::None);
    }

    #[test]
    fn refresh_requests_current_page() {
        let mut m = started();
        let f = fetches(update(&mut m, key(KeyCode::Char('r'))));
        assert!(matches!(f.as_slice(), [(View::Incidents, BrowserCmd::FetchPage { page: 1, .. })]));
    }

    #[test]
    fn stale_page_is_logged_and_dropped() {
        let mut m = started();
        let f = fetches(update(&mut m, key(KeyCode::Char('n'))));
        let [(_, BrowserCmd::FetchPage { seq: first, .. })] = f.as_slice() else {
            panic!("expected one fetch");
        };
        let first = *first;
        update(&mut m, key(KeyCode::Char('r')));

        let cmd = update(
            &mut m,
            DashboardMsg::Incidents(BrowserMsg::PageLoaded {
                seq: first,
                page: loaded_page(2),
            }),
        );
        let entries = records(&cmd);
        assert!(matches!(entries.as_slice(), [e] if matches!(e.event, ActivityEvent::StaleDiscard { .. })));
        assert_eq!(m.incidents.items().len(), 5);
    }

    #[test]
    fn detail_failure_notifies_until_ticks_expire_it() {
        let mut m = started();
        update(&mut m, key(KeyCode::Enter));
        update(
            &mut m,
            DashboardMsg::Incidents(BrowserMsg::DetailFailed {
                id: "INC1000".into(),
                error: "timeout".into(),
            }),
        );
        assert_eq!(m.notifications.len(), 1);
        assert!(m.notifications[0].message.contains("INC1000"));
        assert!(!m.incidents.detail_loads().is_busy());

        // 5s at the default 100ms tick
        for _ in 0..49 {
            update(&mut m, DashboardMsg::Tick);
        }
        assert_eq!(m.notifications.len(), 1);
        update(&mut m, DashboardMsg::Tick);
        assert!(m.notifications.is_empty());
    }

    #[test]
    fn overlays_toggle_and_swallow_browser_keys() {
        let mut m = started();
        update(&mut m, key(KeyCode::Char('?')));
        assert_eq!(m.active_overlay, Some(Overlay::Help));
        update(&mut m, key(KeyCode::Char('j')));
        assert_eq!(m.incidents.selection().cursor(), 0);
        update(&mut m, key(KeyCode::Esc));
        assert_eq!(m.active_overlay, None);

        update(&mut m, key(KeyCode::Char('L')));
        assert_eq!(m.active_overlay, Some(Overlay::Log));
        update(&mut m, key(KeyCode::Char('L')));
        assert_eq!(m.active_overlay, None);
    }

    #[test]
    fn browser_keys_reach_active_browser() {
        let mut m = started();
        update(&mut m, key(KeyCode::Char('j')));
        update(&mut m, key(KeyCode::Down));
        assert_eq!(m.incidents.selection().cursor(), 2);
        assert_eq!(m.incidents.selected_id(), Some("INC1002"));
        assert_eq!(m.alerts.selection().cursor(), 0);
    }

    #[test]
    fn resize_reaches_both_browsers() {
        let mut m = started();
        update(&mut m, DashboardMsg::Resize { cols: 120, rows: 40 });
        assert_eq!(m.terminal_size, (120, 40));
        assert_eq!(m.incidents.layout(), m.alerts.layout());
        assert_eq!(m.incidents.viewport().visible_lines(), m.incidents.layout().detail_rows());
    }

    #[test]
    fn sort_confirm_logs_sorted_fetch() {
        let mut m = started();
        update(&mut m, key(KeyCode::Char('s')));
        let cmd = update(&mut m, key(KeyCode::Enter));
        let entries = records(&cmd);
        assert!(matches!(
            &entries[0].event,
            ActivityEvent::PageFetch { sort: Some(s), page: 1, .. } if s == "created_at:desc"
        ));
    }

    #[test]
    fn shutdown_records_session_end() {
        let mut m = started();
        let cmd = shutdown(&mut m);
        assert!(matches!(
            cmd,
            DashboardCmd::Record(ActivityEntry { event: ActivityEvent::SessionEnd { .. }, .. })
        ));
    }
}
