//! Elm-style state model for the dashboard.
//!
//! All display state lives in [`DashboardModel`]. Input and fetch results
//! arrive as [`DashboardMsg`] values; side-effects leave as [`DashboardCmd`]
//! values returned from [`super::update::update`]. No I/O happens here.

use std::time::Duration;

use crossterm::event::KeyEvent;
use serde::{Deserialize, Serialize};

use crate::api::types::{Alert, Incident};
use crate::logger::jsonl::{ActivityEntry, ActivityEvent};
use crate::logger::ring::LogRing;
use crate::tui::browser::{Browser, BrowserCmd, BrowserMsg};
use crate::tui::input::InputContext;
use crate::tui::item::Labels;
use crate::tui::preferences::HintVerbosity;

// ──────────────────── views ────────────────────

/// Top-level collections, one browser each.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Incidents,
    Alerts,
}

const VIEW_COUNT: u8 = 2;

impl View {
    pub const ALL: [Self; 2] = [Self::Incidents, Self::Alerts];

    /// 1-based number used by the `1`/`2` hotkeys.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Incidents => 1,
            Self::Alerts => 2,
        }
    }

    #[must_use]
    pub const fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Incidents),
            2 => Some(Self::Alerts),
            _ => None,
        }
    }

    /// Next view, wrapping.
    #[must_use]
    pub const fn next(self) -> Self {
        match Self::from_number(self.number() % VIEW_COUNT + 1) {
            Some(v) => v,
            None => Self::Incidents,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Incidents => "Incidents",
            Self::Alerts => "Alerts",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Incidents => "incidents",
            Self::Alerts => "alerts",
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "incidents" | "incident" | "1" => Ok(Self::Incidents),
            "alerts" | "alert" | "2" => Ok(Self::Alerts),
            other => Err(format!("unknown view '{other}' (expected incidents or alerts)")),
        }
    }
}

// ──────────────────── overlays ────────────────────

/// Application-level overlays. At most one is open, and it takes input
/// precedence over the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Help,
    Log,
}

// ──────────────────── notifications ────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Monotonic ID for expiry tracking.
    pub id: u64,
    pub level: NotificationLevel,
    pub message: String,
    /// Tick at which the notification is dropped; `None` keeps it.
    pub expires_at: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// Oldest notifications are evicted past this count.
pub const MAX_NOTIFICATIONS: usize = 3;

// ──────────────────── model ────────────────────

/// Construction-time settings for [`DashboardModel`].
#[derive(Debug, Clone)]
pub struct ModelOptions {
    pub start_view: View,
    pub list_width_pct: u16,
    pub hint_verbosity: HintVerbosity,
    pub notification_timeout: Duration,
    /// Period of [`DashboardMsg::Tick`]; converts the timeout into ticks.
    pub tick_interval: Duration,
    /// Shown in the header, e.g. the API endpoint or `demo`.
    pub source_label: String,
    pub labels: &'static Labels,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            start_view: View::Incidents,
            list_width_pct: 40,
            hint_verbosity: HintVerbosity::Full,
            notification_timeout: Duration::from_secs(5),
            tick_interval: Duration::from_millis(100),
            source_label: String::new(),
            labels: &crate::tui::item::ENGLISH,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardModel {
    pub view: View,
    pub incidents: Browser<Incident>,
    pub alerts: Browser<Alert>,
    pub active_overlay: Option<Overlay>,
    pub terminal_size: (u16, u16),
    pub quit: bool,
    pub notifications: Vec<Notification>,
    pub next_notification_id: u64,
    pub hint_verbosity: HintVerbosity,
    /// Notification lifetime in ticks; 0 disables expiry.
    pub notification_ttl: u64,
    pub source_label: String,
    pub activity: LogRing,
    pub tick: u64,
}

impl DashboardModel {
    #[must_use]
    pub fn new(options: ModelOptions) -> Self {
        Self {
            view: options.start_view,
            incidents: Browser::new(options.labels, options.list_width_pct),
            alerts: Browser::new(options.labels, options.list_width_pct),
            active_overlay: None,
            terminal_size: (80, 24),
            quit: false,
            notifications: Vec::new(),
            next_notification_id: 0,
            hint_verbosity: options.hint_verbosity,
            notification_ttl: ticks_for(options.notification_timeout, options.tick_interval),
            source_label: options.source_label,
            activity: LogRing::default(),
            tick: 0,
        }
    }

    /// Queue a notification, evicting the oldest past [`MAX_NOTIFICATIONS`].
    pub fn push_notification(&mut self, level: NotificationLevel, message: String) -> u64 {
        let id = self.next_notification_id;
        self.next_notification_id += 1;
        let expires_at = (self.notification_ttl > 0)
            .then(|| self.tick.saturating_add(self.notification_ttl));
        self.notifications.push(Notification {
            id,
            level,
            message,
            expires_at,
        });
        while self.notifications.len() > MAX_NOTIFICATIONS {
            self.notifications.remove(0);
        }
        id
    }

    /// Drop notifications whose deadline is at or before the current tick.
    pub fn expire_notifications(&mut self) {
        let now = self.tick;
        self.notifications
            .retain(|n| n.expires_at.is_none_or(|deadline| deadline > now));
    }

    /// Keep `event` in the ring and hand it to the runtime for the log file.
    pub fn record(&mut self, event: ActivityEvent) -> DashboardCmd {
        let entry = ActivityEntry::new(event);
        self.activity.push(entry.clone());
        DashboardCmd::Record(entry)
    }

    /// Whether the active browser owns keys such as `q`.
    #[must_use]
    pub const fn browser_captures_input(&self) -> bool {
        match self.view {
            View::Incidents => self.incidents.captures_input(),
            View::Alerts => self.alerts.captures_input(),
        }
    }

    #[must_use]
    pub const fn sort_menu_open(&self) -> bool {
        match self.view {
            View::Incidents => self.incidents.sort_menu().is_open(),
            View::Alerts => self.alerts.sort_menu().is_open(),
        }
    }

    #[must_use]
    pub const fn input_context(&self) -> InputContext {
        InputContext {
            view: self.view,
            overlay: self.active_overlay,
            sort_open: self.sort_menu_open(),
            browser_captures: self.browser_captures_input(),
        }
    }
}

/// Whole ticks covering `timeout`, at least one unless `timeout` is zero.
fn ticks_for(timeout: Duration, tick: Duration) -> u64 {
    if timeout.is_zero() {
        return 0;
    }
    let ticks = timeout.as_millis().div_ceil(tick.as_millis().max(1));
    u64::try_from(ticks).unwrap_or(u64::MAX).max(1)
}

// ──────────────────── messages ────────────────────

#[derive(Debug, Clone)]
pub enum DashboardMsg {
    /// Periodic timer tick; also expires notifications.
    Tick,
    Key(KeyEvent),
    Resize { cols: u16, rows: u16 },
    Incidents(BrowserMsg<Incident>),
    Alerts(BrowserMsg<Alert>),
    SwitchView(View),
}

// ──────────────────── commands ────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardCmd {
    None,
    /// Run a browser request against the data source for `view`.
    Fetch { view: View, cmd: BrowserCmd },
    /// Append an entry to the activity log file.
    Record(ActivityEntry),
    Quit,
    Batch(Vec<Self>),
}

impl DashboardCmd {
    /// Collapse `cmds` dropping `None`s; a single command is returned bare.
    #[must_use]
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds.into_iter().filter(|c| *c != Self::None).collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or(Self::None),
            _ => Self::Batch(cmds),
        }
    }

    /// Flatten nested batches into execution order.
    #[must_use]
    pub fn flatten(self) -> Vec<Self> {
        match self {
            Self::None => Vec::new(),
            Self::Batch(cmds) => cmds.into_iter().flat_map(Self::flatten).collect(),
            other => vec![other],
        }
    }
}
