//! Dashboard display preferences with safe atomic persistence.
//!
//! Operators pick a start view, contrast and hint verbosity once and have
//! them survive across sessions. Persistence failures never block dashboard
//! startup or rendering.
//!
//! # Merge Order
//!
//! ```text
//! compiled defaults → persisted preferences → CLI/session overrides
//! ```
//!
//! # Persistence Strategy
//!
//! Atomic write: serialize → temp file → fsync → rename over target. A
//! debounce keeps rapid changes from thrashing disk.

use std::fmt;
use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::model::View;
use super::theme::ContrastMode;

/// Current schema version. `#[serde(default)]` covers additive changes.
const SCHEMA_VERSION: u32 = 1;

/// Minimum debounce interval between persisted writes.
const WRITE_DEBOUNCE: Duration = Duration::from_secs(2);

const MAX_NOTIFICATION_TIMEOUT_SECS: u32 = 300;

// ──────────────────── core preferences ────────────────────

/// Persisted dashboard preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    pub schema_version: u32,
    /// View to show on startup.
    pub start_view: StartView,
    /// View active when the previous session ended.
    pub last_view: Option<View>,
    pub contrast: ContrastPreference,
    pub hint_verbosity: HintVerbosity,
    /// How long info notifications stay visible. 0 = until replaced.
    pub notification_timeout_secs: u32,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            start_view: StartView::default(),
            last_view: None,
            contrast: ContrastPreference::default(),
            hint_verbosity: HintVerbosity::default(),
            notification_timeout_secs: 5,
        }
    }
}

// ──────────────────── preference enums ────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartView {
    #[default]
    Incidents,
    Alerts,
    /// Last-used view from the previous session.
    Remember,
}

impl StartView {
    #[must_use]
    pub fn resolve(self, last_view: Option<View>) -> View {
        match self {
            Self::Incidents => View::Incidents,
            Self::Alerts => View::Alerts,
            Self::Remember => last_view.unwrap_or_default(),
        }
    }
}

/// `Auto` defers to environment detection; `Force*` overrides it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContrastPreference {
    #[default]
    Auto,
    ForceStandard,
    ForceHigh,
}

impl ContrastPreference {
    #[must_use]
    pub const fn resolve(self, env_detected: ContrastMode) -> ContrastMode {
        match self {
            Self::Auto => env_detected,
            Self::ForceStandard => ContrastMode::Standard,
            Self::ForceHigh => ContrastMode::High,
        }
    }
}

/// How much of the footer key-hint bar to show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintVerbosity {
    #[default]
    Full,
    Minimal,
    Off,
}

impl fmt::Display for StartView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incidents => write!(f, "incidents"),
            Self::Alerts => write!(f, "alerts"),
            Self::Remember => write!(f, "remember"),
        }
    }
}

impl fmt::Display for HintVerbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Minimal => write!(f, "minimal"),
            Self::Off => write!(f, "off"),
        }
    }
}

impl fmt::Display for ContrastPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::ForceStandard => write!(f, "standard"),
            Self::ForceHigh => write!(f, "high"),
        }
    }
}

// ──────────────────── validation ────────────────────

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub warnings: Vec<String>,
}

impl ValidationReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Normalize loaded preferences, reporting anything that was patched.
#[must_use]
pub fn validate(mut prefs: UserPreferences) -> (UserPreferences, ValidationReport) {
    let mut report = ValidationReport::default();

    if prefs.schema_version > SCHEMA_VERSION {
        report.warnings.push(format!(
            "preferences schema version {} is newer than supported {}; \
             unknown fields will be ignored",
            prefs.schema_version, SCHEMA_VERSION,
        ));
    }

    if prefs.notification_timeout_secs > MAX_NOTIFICATION_TIMEOUT_SECS {
        report.warnings.push(format!(
            "notification_timeout_secs={} exceeds {MAX_NOTIFICATION_TIMEOUT_SECS}s max; clamped",
            prefs.notification_timeout_secs,
        ));
        prefs.notification_timeout_secs = MAX_NOTIFICATION_TIMEOUT_SECS;
    }

    (prefs, report)
}

// ──────────────────── persistence ────────────────────

/// Load outcome from the persistence layer. Every variant yields usable
/// preferences.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded {
        prefs: UserPreferences,
        report: ValidationReport,
    },
    /// File not found (normal on first launch).
    Missing,
    Corrupt {
        details: String,
    },
    IoError {
        details: String,
    },
}

impl LoadOutcome {
    #[must_use]
    pub fn into_prefs(self) -> UserPreferences {
        match self {
            Self::Loaded { prefs, .. } => prefs,
            Self::Missing | Self::Corrupt { .. } | Self::IoError { .. } => {
                UserPreferences::default()
            }
        }
    }

    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Loaded { .. } | Self::Missing)
    }

    /// One-line description for the activity log, if anything went wrong.
    #[must_use]
    pub fn problem(&self) -> Option<String> {
        match self {
            Self::Loaded { report, .. } if !report.is_clean() => Some(report.warnings.join("; ")),
            Self::Corrupt { details } => Some(format!("corrupt preferences: {details}")),
            Self::IoError { details } => Some(format!("unreadable preferences: {details}")),
            _ => None,
        }
    }
}

/// Load preferences. Never panics; failures fall back to defaults.
#[must_use]
pub fn load(path: &Path) -> LoadOutcome {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return LoadOutcome::Missing,
        // invalid UTF-8 is corrupt content, not an I/O failure
        Err(e) if e.kind() == io::ErrorKind::InvalidData => {
            return LoadOutcome::Corrupt {
                details: e.to_string(),
            };
        }
        Err(e) => {
            return LoadOutcome::IoError {
                details: e.to_string(),
            };
        }
    };

    match serde_json::from_str::<UserPreferences>(&content) {
        Ok(prefs) => {
            let (prefs, report) = validate(prefs);
            LoadOutcome::Loaded { prefs, report }
        }
        Err(e) => LoadOutcome::Corrupt {
            details: e.to_string(),
        },
    }
}

/// Atomic save: serialize → temp file → fsync → rename.
pub fn save(prefs: &UserPreferences, path: &Path) -> io::Result<PathBuf> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(prefs)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    let tmp_path = path.with_extension("json.tmp");
    {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(&tmp_path, path)?;

    Ok(path.to_path_buf())
}

// ──────────────────── debounced writer ────────────────────

/// Coalesces rapid preference changes into one write.
#[derive(Debug)]
pub struct DebouncedWriter {
    path: PathBuf,
    debounce: Duration,
    last_write: Option<Instant>,
    pending: bool,
}

impl DebouncedWriter {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self {
            path,
            debounce: WRITE_DEBOUNCE,
            last_write: None,
            pending: false,
        }
    }

    #[must_use]
    pub const fn with_debounce(mut self, d: Duration) -> Self {
        self.debounce = d;
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn request_save(&mut self) {
        self.pending = true;
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    /// Write if pending and the debounce interval has elapsed.
    pub fn try_flush(&mut self, prefs: &UserPreferences) -> Option<io::Result<PathBuf>> {
        if !self.pending {
            return None;
        }

        let now = Instant::now();
        if let Some(last) = self.last_write
            && now.duration_since(last) < self.debounce
        {
            return None;
        }

        self.pending = false;
        self.last_write = Some(now);
        Some(save(prefs, &self.path))
    }

    /// Write now if pending, ignoring the debounce. Used on shutdown.
    pub fn force_flush(&mut self, prefs: &UserPreferences) -> Option<io::Result<PathBuf>> {
        if !self.pending {
            return None;
        }

        self.pending = false;
        self.last_write = Some(Instant::now());
        Some(save(prefs, &self.path))
    }
}

// ──────────────────── merge ────────────────────

/// CLI flags that win over persisted values for this session only.
#[derive(Debug, Clone, Default)]
pub struct SessionOverrides {
    pub start_view: Option<StartView>,
    pub contrast: Option<ContrastPreference>,
    pub hint_verbosity: Option<HintVerbosity>,
}

#[must_use]
pub fn merge(persisted: &UserPreferences, overrides: &SessionOverrides) -> UserPreferences {
    UserPreferences {
        schema_version: persisted.schema_version,
        start_view: overrides.start_view.unwrap_or(persisted.start_view),
        last_view: persisted.last_view,
        contrast: overrides.contrast.unwrap_or(persisted.contrast),
        hint_verbosity: overrides.hint_verbosity.unwrap_or(persisted.hint_verbosity),
        notification_timeout_secs: persisted.notification_timeout_secs,
    }
}

// ──────────────────── resolved preferences ────────────────────

/// Preferences with every `Auto`/`Remember` resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPreferences {
    pub start_view: View,
    pub contrast: ContrastMode,
    pub hint_verbosity: HintVerbosity,
    pub notification_timeout: Duration,
}

impl Default for ResolvedPreferences {
    fn default() -> Self {
        Self::resolve(&UserPreferences::default(), ContrastMode::Standard)
    }
}

impl ResolvedPreferences {
    #[must_use]
    pub fn resolve(prefs: &UserPreferences, env_contrast: ContrastMode) -> Self {
        Self {
            start_view: prefs.start_view.resolve(prefs.last_view),
            contrast: prefs.contrast.resolve(env_contrast),
            hint_verbosity: prefs.hint_verbosity,
            notification_timeout: Duration::from_secs(u64::from(prefs.notification_timeout_secs)),
        }
    }
}
