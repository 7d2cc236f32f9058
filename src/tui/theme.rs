//! Semantic theme tokens and accessibility profile for dashboard rendering.

#![allow(missing_docs)]

use std::env;

use crossterm::style::Color;
use serde::{Deserialize, Serialize};

use crate::api::types::{AlertStatus, IncidentStatus, Severity, Urgency};

/// Contrast profile used by theme token selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContrastMode {
    #[default]
    Standard,
    High,
}

/// Color output mode for compatibility with `NO_COLOR` and terminal policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Enabled,
    Disabled,
}

/// Accessibility knobs consumed by the theme and the painter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessibilityProfile {
    pub contrast: ContrastMode,
    pub color: ColorMode,
}

impl Default for AccessibilityProfile {
    fn default() -> Self {
        Self {
            contrast: ContrastMode::Standard,
            color: ColorMode::Enabled,
        }
    }
}

impl AccessibilityProfile {
    #[must_use]
    pub const fn from_no_color_flag(no_color: bool) -> Self {
        Self {
            contrast: ContrastMode::Standard,
            color: if no_color {
                ColorMode::Disabled
            } else {
                ColorMode::Enabled
            },
        }
    }

    /// Honors `NO_COLOR` (any value, including empty).
    #[must_use]
    pub fn from_environment() -> Self {
        let no_color = env::var_os("NO_COLOR").is_some();
        Self::from_no_color_flag(no_color)
    }

    #[must_use]
    pub const fn with_contrast(self, contrast: ContrastMode) -> Self {
        Self { contrast, ..self }
    }

    #[must_use]
    pub const fn no_color(self) -> bool {
        matches!(self.color, ColorMode::Disabled)
    }
}

/// Semantic token category independent of concrete colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticToken {
    Accent,
    Success,
    Warning,
    Danger,
    Critical,
    Muted,
    Neutral,
}

/// Render-facing palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteEntry {
    pub token: SemanticToken,
    pub color: Color,
    /// Plain-text marker used when color is disabled.
    pub text_tag: &'static str,
}

impl PaletteEntry {
    const fn new(token: SemanticToken, color: Color, text_tag: &'static str) -> Self {
        Self {
            token,
            color,
            text_tag,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePalette {
    pub accent: PaletteEntry,
    pub success: PaletteEntry,
    pub warning: PaletteEntry,
    pub danger: PaletteEntry,
    pub critical: PaletteEntry,
    pub muted: PaletteEntry,
    pub neutral: PaletteEntry,
}

impl ThemePalette {
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            accent: PaletteEntry::new(SemanticToken::Accent, Color::DarkCyan, "accent"),
            success: PaletteEntry::new(SemanticToken::Success, Color::DarkGreen, "ok"),
            warning: PaletteEntry::new(SemanticToken::Warning, Color::DarkYellow, "warn"),
            danger: PaletteEntry::new(SemanticToken::Danger, Color::DarkRed, "danger"),
            critical: PaletteEntry::new(SemanticToken::Critical, Color::DarkMagenta, "critical"),
            muted: PaletteEntry::new(SemanticToken::Muted, Color::DarkGrey, "muted"),
            neutral: PaletteEntry::new(SemanticToken::Neutral, Color::Reset, "normal"),
        }
    }

    #[must_use]
    pub const fn high_contrast() -> Self {
        Self {
            accent: PaletteEntry::new(SemanticToken::Accent, Color::Cyan, "accent"),
            success: PaletteEntry::new(SemanticToken::Success, Color::Green, "ok"),
            warning: PaletteEntry::new(SemanticToken::Warning, Color::Yellow, "warn"),
            danger: PaletteEntry::new(SemanticToken::Danger, Color::Red, "danger"),
            critical: PaletteEntry::new(SemanticToken::Critical, Color::Red, "critical"),
            muted: PaletteEntry::new(SemanticToken::Muted, Color::Grey, "muted"),
            neutral: PaletteEntry::new(SemanticToken::Neutral, Color::White, "normal"),
        }
    }

    #[must_use]
    pub const fn from_contrast(mode: ContrastMode) -> Self {
        match mode {
            ContrastMode::Standard => Self::standard(),
            ContrastMode::High => Self::high_contrast(),
        }
    }

    #[must_use]
    pub const fn entry(self, token: SemanticToken) -> PaletteEntry {
        match token {
            SemanticToken::Accent => self.accent,
            SemanticToken::Success => self.success,
            SemanticToken::Warning => self.warning,
            SemanticToken::Danger => self.danger,
            SemanticToken::Critical => self.critical,
            SemanticToken::Muted => self.muted,
            SemanticToken::Neutral => self.neutral,
        }
    }
}

// ──────────────────── record status → token ────────────────────

#[must_use]
pub const fn incident_status_token(status: IncidentStatus) -> SemanticToken {
    match status {
        IncidentStatus::Triggered => SemanticToken::Danger,
        IncidentStatus::Acknowledged => SemanticToken::Warning,
        IncidentStatus::Resolved => SemanticToken::Success,
        IncidentStatus::Unknown => SemanticToken::Muted,
    }
}

#[must_use]
pub const fn urgency_token(urgency: Urgency) -> SemanticToken {
    match urgency {
        Urgency::High => SemanticToken::Critical,
        Urgency::Low => SemanticToken::Muted,
    }
}

#[must_use]
pub const fn severity_token(severity: Severity) -> SemanticToken {
    match severity {
        Severity::Critical => SemanticToken::Critical,
        Severity::Error => SemanticToken::Danger,
        Severity::Warning => SemanticToken::Warning,
        Severity::Info => SemanticToken::Accent,
    }
}

#[must_use]
pub const fn alert_status_token(status: AlertStatus) -> SemanticToken {
    match status {
        AlertStatus::Triggered => SemanticToken::Danger,
        AlertStatus::Resolved => SemanticToken::Success,
        AlertStatus::Suppressed | AlertStatus::Unknown => SemanticToken::Muted,
    }
}

/// Full render theme (palette + accessibility profile).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub accessibility: AccessibilityProfile,
    pub palette: ThemePalette,
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(AccessibilityProfile::default())
    }
}

impl Theme {
    #[must_use]
    pub const fn new(accessibility: AccessibilityProfile) -> Self {
        Self {
            palette: ThemePalette::from_contrast(accessibility.contrast),
            accessibility,
        }
    }

    /// Foreground color for `token`, or `None` when color is disabled.
    #[must_use]
    pub const fn color(&self, token: SemanticToken) -> Option<Color> {
        if self.accessibility.no_color() {
            None
        } else {
            Some(self.palette.entry(token).color)
        }
    }
}
