//! JSONL activity log: append-only line-delimited JSON.
//!
//! Each line is a self-contained JSON object assembled in memory and written
//! with a single `write_all`, so a concurrent `tail -f` never sees a partial
//! line.
//!
//! Three-level fallback chain:
//! 1. Primary file path
//! 2. Fallback path (e.g. under the system temp dir)
//! 3. Silent discard (the dashboard owns the terminal, so stderr is off limits)

#![allow(missing_docs)]

use std::fs::{self, File, OpenOptions, rename};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::core::errors::{DeckError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Warning,
}

/// What happened. Serialized with an `event` tag next to the entry fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ActivityEvent {
    SessionStart {
        source: String,
        view: String,
    },
    SessionEnd {
        view: String,
    },
    /// A page request was issued.
    PageFetch {
        view: String,
        seq: u64,
        page: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        sort: Option<String>,
    },
    /// A detail request was issued.
    DetailFetch {
        view: String,
        id: String,
    },
    FetchError {
        view: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        error: String,
    },
    /// A page result arrived after a newer request and was dropped.
    StaleDiscard {
        view: String,
        seq: u64,
        latest: u64,
    },
    PreferenceSave {
        path: String,
        ok: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl ActivityEvent {
    #[must_use]
    pub const fn level(&self) -> Level {
        match self {
            Self::FetchError { .. } | Self::PreferenceSave { ok: false, .. } => Level::Warning,
            _ => Level::Info,
        }
    }

    /// One-line description for the in-app log overlay.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::SessionStart { source, view } => format!("session started on {view} ({source})"),
            Self::SessionEnd { view } => format!("session ended on {view}"),
            Self::PageFetch {
                view,
                seq,
                page,
                sort,
            } => match sort {
                Some(sort) => format!("{view}: fetch page {page} sorted by {sort} (#{seq})"),
                None => format!("{view}: fetch page {page} (#{seq})"),
            },
            Self::DetailFetch { view, id } => format!("{view}: fetch detail {id}"),
            Self::FetchError {
                view,
                id: Some(id),
                error,
            } => format!("{view}: detail {id} failed: {error}"),
            Self::FetchError {
                view,
                id: None,
                error,
            } => format!("{view}: page failed: {error}"),
            Self::StaleDiscard { view, seq, latest } => {
                format!("{view}: dropped stale page #{seq} (latest #{latest})")
            }
            Self::PreferenceSave {
                path,
                ok: true,
                ..
            } => format!("preferences saved to {path}"),
            Self::PreferenceSave {
                path, error, ..
            } => format!(
                "preferences not saved to {path}: {}",
                error.as_deref().unwrap_or("unknown error")
            ),
        }
    }
}

/// One JSONL line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// ISO 8601 UTC timestamp.
    pub ts: String,
    pub level: Level,
    #[serde(flatten)]
    pub event: ActivityEvent,
}

impl ActivityEntry {
    /// Stamp `event` with the current UTC time.
    #[must_use]
    pub fn new(event: ActivityEvent) -> Self {
        Self {
            ts: format_utc_now(),
            level: event.level(),
            event,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    Normal,
    Fallback,
    Discard,
}

#[derive(Debug, Clone)]
pub struct JsonlConfig {
    pub path: PathBuf,
    pub fallback_path: Option<PathBuf>,
    /// Maximum file size before rotation (bytes). Default: 10 MiB.
    pub max_size_bytes: u64,
    /// Number of rotated files to keep. Default: 3.
    pub max_rotated_files: u32,
    /// Seconds between forced fsync calls. Default: 10.
    pub fsync_interval_secs: u64,
}

impl JsonlConfig {
    /// Defaults for `path`, falling back to the temp dir.
    #[must_use]
    pub fn for_path(path: PathBuf) -> Self {
        Self {
            path,
            fallback_path: Some(std::env::temp_dir().join("incident-deck-activity.jsonl")),
            max_size_bytes: 10 * 1024 * 1024,
            max_rotated_files: 3,
            fsync_interval_secs: 10,
        }
    }
}

/// Append-only JSONL writer with rotation and fallback.
pub struct JsonlWriter {
    config: JsonlConfig,
    writer: Option<BufWriter<File>>,
    state: WriterState,
    bytes_written: u64,
    last_fsync: SystemTime,
}

impl JsonlWriter {
    /// Open the log file. Falls through the degradation chain on failure.
    #[must_use]
    pub fn open(config: JsonlConfig) -> Self {
        let mut w = Self {
            config,
            writer: None,
            state: WriterState::Discard,
            bytes_written: 0,
            last_fsync: SystemTime::now(),
        };
        w.try_open_primary();
        w
    }

    pub fn write_entry(&mut self, entry: &ActivityEntry) {
        let Ok(json) = serde_json::to_string(entry) else {
            return;
        };
        self.write_line(&format!("{json}\n"));
    }

    pub fn flush(&mut self) {
        if let Some(w) = self.writer.as_mut() {
            let _ = w.flush();
        }
    }

    pub fn fsync(&mut self) {
        if let Some(w) = self.writer.as_mut() {
            let _ = w.flush();
            let _ = w.get_ref().sync_data();
            self.last_fsync = SystemTime::now();
        }
    }

    /// Current degradation state.
    #[must_use]
    pub const fn state(&self) -> &'static str {
        match self.state {
            WriterState::Normal => "normal",
            WriterState::Fallback => "fallback",
            WriterState::Discard => "discard",
        }
    }

    #[must_use]
    pub const fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    // ──────────────────────── internals ────────────────────────

    fn write_line(&mut self, line: &str) {
        if self.bytes_written + line.len() as u64 > self.config.max_size_bytes
            && matches!(self.state, WriterState::Normal | WriterState::Fallback)
        {
            self.rotate();
        }

        match self.state {
            WriterState::Normal | WriterState::Fallback => {
                if let Some(w) = self.writer.as_mut() {
                    if w.write_all(line.as_bytes()).is_err() {
                        self.degrade();
                        self.write_line(line);
                        return;
                    }
                    self.bytes_written += line.len() as u64;
                    self.maybe_fsync();
                } else {
                    self.degrade();
                    self.write_line(line);
                }
            }
            WriterState::Discard => {}
        }
    }

    fn maybe_fsync(&mut self) {
        let elapsed = SystemTime::now()
            .duration_since(self.last_fsync)
            .unwrap_or(Duration::ZERO);
        if elapsed.as_secs() >= self.config.fsync_interval_secs {
            self.fsync();
        }
    }

    fn try_open_primary(&mut self) {
        match open_append(&self.config.path) {
            Ok((file, size)) => {
                self.writer = Some(BufWriter::with_capacity(16 * 1024, file));
                self.state = WriterState::Normal;
                self.bytes_written = size;
            }
            Err(_) => self.try_open_fallback(),
        }
    }

    fn try_open_fallback(&mut self) {
        let opened = self
            .config
            .fallback_path
            .as_deref()
            .map(open_append)
            .and_then(std::result::Result::ok);
        match opened {
            Some((file, size)) => {
                self.writer = Some(BufWriter::with_capacity(16 * 1024, file));
                self.state = WriterState::Fallback;
                self.bytes_written = size;
            }
            None => {
                self.writer = None;
                self.state = WriterState::Discard;
            }
        }
    }

    fn degrade(&mut self) {
        self.writer = None;
        match self.state {
            WriterState::Normal => self.try_open_fallback(),
            WriterState::Fallback | WriterState::Discard => self.state = WriterState::Discard,
        }
    }

    fn rotate(&mut self) {
        if let Some(w) = self.writer.as_mut() {
            let _ = w.flush();
        }
        self.writer = None;

        let base = match self.state {
            WriterState::Normal => self.config.path.clone(),
            WriterState::Fallback => match &self.config.fallback_path {
                Some(p) => p.clone(),
                None => return,
            },
            WriterState::Discard => return,
        };

        // .2→.3, .1→.2, current→.1; the oldest falls off the end
        let _ = fs::remove_file(rotated_name(&base, self.config.max_rotated_files));
        for i in (1..self.config.max_rotated_files).rev() {
            let _ = rename(rotated_name(&base, i), rotated_name(&base, i + 1));
        }
        let _ = rename(&base, rotated_name(&base, 1));

        match open_append(&base) {
            Ok((file, _)) => {
                self.writer = Some(BufWriter::with_capacity(16 * 1024, file));
                self.bytes_written = 0;
            }
            Err(_) => self.degrade(),
        }
    }
}

impl Drop for JsonlWriter {
    fn drop(&mut self) {
        self.flush();
    }
}

// ──────────────────────── helpers ────────────────────────

/// Open or create a file for appending. Returns `(File, current_size)`.
fn open_append(path: &Path) -> Result<(File, u64)> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| DeckError::io(parent, source))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| DeckError::io(path, source))?;
    let size = file.metadata().map(|m| m.len()).unwrap_or(0);
    Ok((file, size))
}

/// `foo.jsonl` → `foo.jsonl.3`.
fn rotated_name(base: &Path, index: u32) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(format!(".{index}"));
    PathBuf::from(name)
}

fn format_utc_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

// ──────────────────────── tests ────────────────────────
