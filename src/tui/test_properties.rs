//! Property-based tests for browser and dashboard reducer invariants.
//!
//! Arbitrary interleavings of key presses, resizes and fetch results (in any
//! order, including stale and duplicate ones) must keep the selection in
//! range, the viewport clamped and showing the selected record, and at most
//! one detail load in flight.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use proptest::prelude::*;

use super::browser::{Browser, BrowserCmd, BrowserMsg};
use super::focus::{BrowserKey, Focus};
use super::item::{BrowsableItem, ENGLISH, detail_content};
use super::model::{DashboardModel, DashboardMsg, MAX_NOTIFICATIONS, ModelOptions, View};
use super::update::update;
use crate::api::fixtures::demo_incidents;
use crate::api::types::{Incident, Page, PageMeta};

// ──────────────────── strategies ────────────────────

fn arb_browser_key() -> impl Strategy<Value = BrowserKey> {
    prop_oneof![
        Just(BrowserKey::Up),
        Just(BrowserKey::Down),
        Just(BrowserKey::Top),
        Just(BrowserKey::Bottom),
        Just(BrowserKey::NextPage),
        Just(BrowserKey::PrevPage),
        Just(BrowserKey::HalfPageUp),
        Just(BrowserKey::HalfPageDown),
        Just(BrowserKey::Open),
        Just(BrowserKey::Close),
        Just(BrowserKey::Sort),
    ]
}

#[derive(Debug, Clone)]
enum Op {
    Key(BrowserKey),
    Resize(u16, u16),
    DeliverPage {
        pick: usize,
        len: usize,
        more_pages: u32,
        loaded_mask: u32,
    },
    FailPage {
        pick: usize,
    },
    DeliverDetail {
        pick: usize,
    },
    FailDetail {
        pick: usize,
    },
    /// Detail for some listed record that was never requested.
    StrayDetail {
        pick: usize,
    },
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => arb_browser_key().prop_map(Op::Key),
        1 => (0u16..200, 0u16..80).prop_map(|(c, r)| Op::Resize(c, r)),
        3 => (any::<usize>(), 0usize..30, 0u32..4, any::<u32>()).prop_map(
            |(pick, len, more_pages, loaded_mask)| Op::DeliverPage {
                pick,
                len,
                more_pages,
                loaded_mask,
            }
        ),
        1 => any::<usize>().prop_map(|pick| Op::FailPage { pick }),
        2 => any::<usize>().prop_map(|pick| Op::DeliverDetail { pick }),
        1 => any::<usize>().prop_map(|pick| Op::FailDetail { pick }),
        1 => any::<usize>().prop_map(|pick| Op::StrayDetail { pick }),
    ]
}

// ──────────────────── harness ────────────────────

/// Drives a browser and remembers every request it issued so results can be
/// delivered late, out of order or twice.
struct Harness {
    browser: Browser<Incident>,
    pages: Vec<(u64, u32)>,
    details: Vec<String>,
}

impl Harness {
    fn new() -> Self {
        let mut browser: Browser<Incident> = Browser::new(&ENGLISH, 40);
        let mut pages = Vec::new();
        if let BrowserCmd::FetchPage { seq, page, .. } = browser.ensure_loaded() {
            pages.push((seq, page));
        }
        Self {
            browser,
            pages,
            details: Vec::new(),
        }
    }

    fn track(&mut self, cmd: BrowserCmd) {
        match cmd {
            BrowserCmd::FetchPage { seq, page, .. } => self.pages.push((seq, page)),
            BrowserCmd::FetchDetail { id } => self.details.push(id),
            BrowserCmd::None => {}
        }
    }

    fn record(id: &str, loaded: bool) -> Incident {
        let mut item = demo_incidents(1).remove(0);
        item.id = id.to_string();
        if !loaded {
            item.description = None;
            item.timeline.clear();
        }
        item.detail_loaded = loaded;
        item
    }

    fn apply(&mut self, op: Op) {
        let cmd = match op {
            Op::Key(key) => self.browser.update(BrowserMsg::Key(key)),
            Op::Resize(cols, rows) => self.browser.update(BrowserMsg::Resize { cols, rows }),
            Op::DeliverPage {
                pick,
                len,
                more_pages,
                loaded_mask,
            } => {
                if self.pages.is_empty() {
                    return;
                }
                let (seq, page) = self.pages[pick % self.pages.len()];
                let items = (0..len)
                    .map(|i| {
                        let id = format!("INC{}", u64::from(page) * 100 + i as u64);
                        Self::record(&id, loaded_mask & (1 << (i % 32)) != 0)
                    })
                    .collect();
                let total = page + more_pages;
                self.browser.update(BrowserMsg::PageLoaded {
                    seq,
                    page: Page {
                        items,
                        meta: PageMeta {
                            current_page: page,
                            has_next: more_pages > 0,
                            has_prev: page > 1,
                            total_pages: Some(total),
                            total_count: None,
                        },
                    },
                })
            }
            Op::FailPage { pick } => {
                if self.pages.is_empty() {
                    return;
                }
                let (seq, _) = self.pages[pick % self.pages.len()];
                self.browser.update(BrowserMsg::PageFailed {
                    seq,
                    error: "HTTP 503".into(),
                    retryable: pick % 2 == 0,
                })
            }
            Op::DeliverDetail { pick } => {
                if self.details.is_empty() {
                    return;
                }
                let id = self.details[pick % self.details.len()].clone();
                let item = Self::record(&id, true);
                self.browser.update(BrowserMsg::DetailLoaded { id, item })
            }
            Op::FailDetail { pick } => {
                if self.details.is_empty() {
                    return;
                }
                let id = self.details[pick % self.details.len()].clone();
                self.browser.update(BrowserMsg::DetailFailed {
                    id,
                    error: "timeout".into(),
                })
            }
            Op::StrayDetail { pick } => {
                let items = self.browser.items();
                if items.is_empty() {
                    return;
                }
                let id = items[pick % items.len()].id.clone();
                let item = Self::record(&id, true);
                self.browser.update(BrowserMsg::DetailLoaded { id, item })
            }
        };
        self.track(cmd);
    }

    fn check(&self) -> Result<(), TestCaseError> {
        let b = &self.browser;
        let sel = b.selection();

        prop_assert_eq!(sel.len(), b.items().len());
        if sel.is_empty() {
            prop_assert_eq!(sel.cursor(), 0);
            prop_assert!(sel.selected().is_none());
        } else {
            prop_assert!(sel.cursor() < sel.len());
        }

        let vp = b.viewport();
        prop_assert!(vp.scroll_offset() <= vp.max_scroll());
        prop_assert_eq!(vp.identity(), b.selected_id());
        if let Some(item) = b.selected_item() {
            let expected = detail_content(item, b.detail_loads().is_loading(item.id()), &ENGLISH);
            prop_assert_eq!(vp.content(), expected.as_str());
        }

        prop_assert!(b.pagination().current_page() >= 1);
        if b.focus() == Focus::Detail {
            prop_assert!(b.selected_item().is_some_and(BrowsableItem::detail_loaded));
        }
        if b.sort_menu().is_open() {
            prop_assert_eq!(b.focus(), Focus::List);
        }
        Ok(())
    }
}

fn arb_dashboard_key() -> impl Strategy<Value = KeyEvent> {
    prop_oneof![
        Just(KeyCode::Char('j')),
        Just(KeyCode::Char('k')),
        Just(KeyCode::Char('n')),
        Just(KeyCode::Char('p')),
        Just(KeyCode::Char('s')),
        Just(KeyCode::Char('r')),
        Just(KeyCode::Char('q')),
        Just(KeyCode::Char('?')),
        Just(KeyCode::Char('L')),
        Just(KeyCode::Char('1')),
        Just(KeyCode::Char('2')),
        Just(KeyCode::Tab),
        Just(KeyCode::Esc),
        Just(KeyCode::Enter),
    ]
    .prop_map(|code| KeyEvent::new(code, KeyModifiers::NONE))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn browser_invariants_hold_for_any_sequence(ops in prop::collection::vec(arb_op(), 1..80)) {
        let mut h = Harness::new();
        h.check()?;
        for op in ops {
            h.apply(op);
            h.check()?;
        }
    }

    #[test]
    fn stale_pages_never_change_items(ops in prop::collection::vec(arb_op(), 1..40), len in 1usize..10) {
        let mut h = Harness::new();
        for op in ops {
            h.apply(op);
        }
        let stale: Vec<u64> = h
            .pages
            .iter()
            .map(|(seq, _)| *seq)
            .filter(|seq| h.browser.is_stale(*seq))
            .collect();
        let before: Vec<String> = h.browser.items().iter().map(|i| i.id.clone()).collect();
        for seq in stale {
            let items = (0..len).map(|i| Harness::record(&format!("STALE{i}"), false)).collect();
            h.browser.update(BrowserMsg::PageLoaded { seq, page: Page { items, meta: PageMeta::default() } });
        }
        let after: Vec<String> = h.browser.items().iter().map(|i| i.id.clone()).collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn page_keys_reset_cursor(len in 2usize..30, downs in 1usize..30) {
        let mut h = Harness::new();
        h.apply(Op::DeliverPage { pick: 0, len, more_pages: 2, loaded_mask: 0 });
        for _ in 0..downs {
            h.apply(Op::Key(BrowserKey::Down));
        }
        h.apply(Op::Key(BrowserKey::NextPage));
        prop_assert_eq!(h.browser.selection().cursor(), 0);
        prop_assert_eq!(h.browser.viewport().scroll_offset(), 0);
        prop_assert_eq!(h.browser.pagination().current_page(), 2);
    }

    #[test]
    fn dashboard_state_stays_bounded(keys in prop::collection::vec(arb_dashboard_key(), 1..60)) {
        let mut model = DashboardModel::new(ModelOptions::default());
        update(&mut model, DashboardMsg::Resize { cols: 100, rows: 30 });
        for key in keys {
            if model.quit {
                break;
            }
            update(&mut model, DashboardMsg::Key(key));
            prop_assert!(model.notifications.len() <= MAX_NOTIFICATIONS);
            prop_assert!(View::ALL.contains(&model.view));
            prop_assert!(model.incidents.detail_loads().in_flight().is_none()
                || model.view == View::Incidents);
            prop_assert!(model.alerts.detail_loads().in_flight().is_none()
                || model.view == View::Alerts);
        }
    }
}
