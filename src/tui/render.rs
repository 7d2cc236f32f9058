//! Pure rendering: model in, [`ScreenBuffer`] out.
//!
//! Nothing here touches the terminal. The runtime paints the buffer, and
//! tests read it back as text.

#![allow(missing_docs)]

use crate::tui::browser::{Browser, PageError};
use crate::tui::focus::Focus;
use crate::tui::input::contextual_help;
use crate::tui::item::BrowsableItem;
use crate::tui::layout::{PaneRect, centered_window, is_terminal_too_small};
use crate::tui::model::{DashboardModel, NotificationLevel, Overlay, View};
use crate::tui::preferences::HintVerbosity;
use crate::tui::screen::{CellStyle, ScreenBuffer};
use crate::tui::text::{self, display_width, truncate};
use crate::tui::theme::{SemanticToken, Theme};

const STATUS_COLUMN: usize = 13;

/// Read-only inputs to rendering besides the model.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderContext {
    pub theme: Theme,
}

impl RenderContext {
    #[must_use]
    pub const fn new(theme: Theme) -> Self {
        Self { theme }
    }

    const fn no_color(&self) -> bool {
        self.theme.accessibility.no_color()
    }
}

/// Render the whole dashboard.
#[must_use]
pub fn render(model: &DashboardModel, ctx: &RenderContext) -> ScreenBuffer {
    let (cols, rows) = model.terminal_size;
    let mut buf = ScreenBuffer::new(cols, rows);

    if is_terminal_too_small(cols, rows) {
        render_too_small(&mut buf, cols, rows);
        return buf;
    }

    render_header(model, &mut buf);
    match model.view {
        View::Incidents => browser_view(&model.incidents, View::Incidents.label(), ctx, &mut buf),
        View::Alerts => browser_view(&model.alerts, View::Alerts.label(), ctx, &mut buf),
    }
    render_footer(model, &mut buf);

    match model.active_overlay {
        Some(Overlay::Help) => render_help(model, &mut buf),
        Some(Overlay::Log) => render_log(model, &mut buf),
        None => {}
    }
    buf
}

/// Draw one browser's list and detail panes (or its error view) into the
/// body rectangles of its layout.
pub fn browser_view<T: BrowsableItem>(
    browser: &Browser<T>,
    title: &str,
    ctx: &RenderContext,
    buf: &mut ScreenBuffer,
) {
    let layout = browser.layout();
    if let Some(error) = browser.page_error() {
        render_error(browser, error, buf);
        return;
    }

    let mut list_title = format!("{title} · page {}", browser.pagination().indicator());
    if let Some(sort) = browser.sort().describe(T::sort_options()) {
        list_title.push_str(" · ");
        list_title.push_str(&sort);
    }
    if browser.is_page_loading() && browser.has_loaded() {
        list_title.push_str(" · …");
    }
    let list_focused = browser.focus() == Focus::List && !browser.sort_menu().is_open();
    buf.draw_box(layout.list, &list_title, border_style(list_focused));
    render_list(browser, layout.list.inner(), ctx, buf);

    let detail_title = browser.selected_id().unwrap_or_default().to_string();
    buf.draw_box(
        layout.detail,
        &detail_title,
        border_style(browser.focus() == Focus::Detail),
    );
    render_detail(browser, layout.detail, buf);

    if browser.sort_menu().is_open() {
        render_sort_menu(browser, layout.list.inner(), buf);
    }
}

const fn border_style(focused: bool) -> CellStyle {
    if focused {
        CellStyle::token(SemanticToken::Accent)
    } else {
        CellStyle::token(SemanticToken::Muted)
    }
}

fn render_list<T: BrowsableItem>(
    browser: &Browser<T>,
    area: PaneRect,
    ctx: &RenderContext,
    buf: &mut ScreenBuffer,
) {
    if area.is_empty() {
        return;
    }
    let labels = browser.labels();
    let width = usize::from(area.width);
    let items = browser.items();
    if items.is_empty() {
        let message = if browser.has_loaded() {
            labels.empty_page
        } else {
            labels.loading_page
        };
        buf.put_str(
            area.col + 1,
            area.row,
            message,
            CellStyle::token(SemanticToken::Muted),
            width.saturating_sub(1),
        );
        return;
    }

    let cursor = browser.selection().cursor();
    let (start, end) = centered_window(cursor, items.len(), usize::from(area.height));
    for (offset, index) in (start..end).enumerate() {
        let Some(item) = items.get(index) else {
            break;
        };
        let row = area.row + u16::try_from(offset).unwrap_or(u16::MAX);
        let selected = index == cursor;
        let base = if selected {
            let style = CellStyle::plain().reversed();
            buf.fill(area.col, row, area.width, style);
            style
        } else {
            CellStyle::plain()
        };

        let marker = if selected && ctx.no_color() { ">" } else { " " };
        let mut col = area.col;
        col += width_u16(buf.put_str(col, row, marker, base, width));

        let status = text::pad_to(&item.status_label(), STATUS_COLUMN.min(width.saturating_sub(1)));
        let status_style = CellStyle {
            token: item.status_token(),
            ..base
        };
        col += width_u16(buf.put_str(col, row, &status, status_style, width.saturating_sub(1)));

        let remaining = width.saturating_sub(usize::from(col - area.col));
        let label = truncate(&item.list_label(), remaining);
        buf.put_str(col, row, &label, base, remaining);
    }
}

fn render_detail<T: BrowsableItem>(browser: &Browser<T>, pane: PaneRect, buf: &mut ScreenBuffer) {
    let area = pane.inner();
    if area.is_empty() {
        return;
    }
    let width = usize::from(area.width);
    let viewport = browser.viewport();
    if browser.selected_item().is_none() {
        buf.put_str(
            area.col,
            area.row,
            browser.labels().no_selection,
            CellStyle::token(SemanticToken::Muted),
            width,
        );
        return;
    }

    for (offset, line) in viewport.visible().iter().enumerate() {
        let row = area.row + u16::try_from(offset).unwrap_or(u16::MAX);
        if row >= area.row + area.height {
            break;
        }
        buf.put_str(area.col, row, line, CellStyle::plain(), width);
    }

    if viewport.max_scroll() > 0 {
        let percent = format!(" {}% ", viewport.percent());
        let pct_width = width_u16(display_width(&percent));
        let bottom = pane.row + pane.height.saturating_sub(1);
        let col = (pane.col + pane.width).saturating_sub(pct_width + 1);
        buf.put_str(col, bottom, &percent, border_style(false), usize::from(pct_width));
    }
}

fn render_error<T: BrowsableItem>(
    browser: &Browser<T>,
    error: &PageError,
    buf: &mut ScreenBuffer,
) {
    let layout = browser.layout();
    let right = (layout.detail.col + layout.detail.width).max(layout.list.col + layout.list.width);
    let bottom =
        (layout.detail.row + layout.detail.height).max(layout.list.row + layout.list.height);
    let body = PaneRect::new(
        layout.list.col,
        layout.list.row,
        right - layout.list.col,
        bottom - layout.list.row,
    );
    let labels = browser.labels();
    buf.draw_box(body, labels.fetch_failed, CellStyle::token(SemanticToken::Danger));
    let area = body.inner();
    let width = usize::from(area.width);
    let mut lines = text::wrap(&error.message, width.max(1));
    lines.push(String::new());
    let hint = if error.retryable {
        labels.retry_hint
    } else {
        labels.check_config_hint
    };
    lines.push(hint.to_string());
    for (offset, line) in lines.iter().take(usize::from(area.height)).enumerate() {
        let row = area.row + u16::try_from(offset).unwrap_or(u16::MAX);
        buf.put_str(area.col, row, line, CellStyle::token(SemanticToken::Danger), width);
    }
}

fn render_sort_menu<T: BrowsableItem>(browser: &Browser<T>, list: PaneRect, buf: &mut ScreenBuffer) {
    let menu = browser.sort_menu();
    let options = menu.options();
    let widest = options
        .iter()
        .map(|o| display_width(o.label))
        .max()
        .unwrap_or(0);
    let width = width_u16(widest + 6)
        .max(width_u16(display_width(browser.labels().sort_title) + 6))
        .min(list.width);
    let height = width_u16(options.len() + 2).min(list.height);
    let rect = PaneRect::new(list.col + 1, list.row, width.saturating_sub(1), height);
    if rect.is_empty() {
        return;
    }
    clear(buf, rect);
    buf.draw_box(rect, browser.labels().sort_title, CellStyle::token(SemanticToken::Accent));

    let inner = rect.inner();
    let active = browser.sort().field.filter(|_| browser.sort().enabled);
    for (i, option) in options.iter().take(usize::from(inner.height)).enumerate() {
        let row = inner.row + u16::try_from(i).unwrap_or(u16::MAX);
        let style = if i == menu.highlight() {
            buf.fill(inner.col, row, inner.width, CellStyle::plain().reversed());
            CellStyle::plain().reversed()
        } else {
            CellStyle::plain()
        };
        let mark = if active == Some(option.key) { '•' } else { ' ' };
        buf.put_str(
            inner.col,
            row,
            &format!("{mark} {}", option.label),
            style,
            usize::from(inner.width),
        );
    }
}

fn render_header(model: &DashboardModel, buf: &mut ScreenBuffer) {
    let (cols, _) = model.terminal_size;
    let mut col = 0_u16;
    for view in View::ALL {
        let tab = format!(" {} {} ", view.number(), view.label());
        let style = if view == model.view {
            CellStyle::token(SemanticToken::Accent).bold().reversed()
        } else {
            CellStyle::token(SemanticToken::Muted)
        };
        col += width_u16(buf.put_str(col, 0, &tab, style, usize::from(cols)));
        col += 1;
    }

    if !model.source_label.is_empty() {
        let available = usize::from(cols.saturating_sub(col + 1));
        let label = truncate(&model.source_label, available);
        let start = cols.saturating_sub(width_u16(display_width(&label)) + 1);
        buf.put_str(start, 0, &label, CellStyle::token(SemanticToken::Muted), available);
    }
}

fn render_footer(model: &DashboardModel, buf: &mut ScreenBuffer) {
    let (cols, rows) = model.terminal_size;
    let row = rows.saturating_sub(1);
    let width = usize::from(cols);

    if let Some(note) = model.notifications.last() {
        let token = match note.level {
            NotificationLevel::Info => SemanticToken::Accent,
            NotificationLevel::Warning => SemanticToken::Warning,
            NotificationLevel::Error => SemanticToken::Danger,
        };
        buf.put_str(0, row, &truncate(&note.message, width), CellStyle::token(token), width);
        return;
    }

    let hint = match model.hint_verbosity {
        HintVerbosity::Full => contextual_help(model.input_context()).hint,
        HintVerbosity::Minimal => "? help · q quit",
        HintVerbosity::Off => return,
    };
    buf.put_str(
        0,
        row,
        &truncate(hint, width),
        CellStyle::token(SemanticToken::Muted),
        width,
    );
}

fn render_help(model: &DashboardModel, buf: &mut ScreenBuffer) {
    let help = contextual_help(model.input_context());
    let (cols, rows) = model.terminal_size;
    let keys_width = help
        .bindings
        .iter()
        .map(|b| display_width(b.keys))
        .max()
        .unwrap_or(0);
    let rect = centered_rect(cols, rows, 64, width_u16(help.bindings.len() + 2));
    clear(buf, rect);
    buf.draw_box(rect, help.title, CellStyle::token(SemanticToken::Accent));
    let inner = rect.inner();
    for (i, binding) in help
        .bindings
        .iter()
        .take(usize::from(inner.height))
        .enumerate()
    {
        let row = inner.row + u16::try_from(i).unwrap_or(u16::MAX);
        let line = format!(
            " {}  {}",
            text::pad_to(binding.keys, keys_width),
            binding.description
        );
        buf.put_str(inner.col, row, &line, CellStyle::plain(), usize::from(inner.width));
    }
}

fn render_log(model: &DashboardModel, buf: &mut ScreenBuffer) {
    let (cols, rows) = model.terminal_size;
    let rect = centered_rect(cols, rows, cols.saturating_sub(8), rows.saturating_sub(4));
    clear(buf, rect);
    buf.draw_box(rect, "Activity", CellStyle::token(SemanticToken::Accent));
    let inner = rect.inner();
    let width = usize::from(inner.width);
    for (i, entry) in model
        .activity
        .tail(usize::from(inner.height))
        .enumerate()
    {
        let row = inner.row + u16::try_from(i).unwrap_or(u16::MAX);
        let time = entry.ts.get(11..19).unwrap_or(&entry.ts);
        let token = match entry.level {
            crate::logger::jsonl::Level::Info => SemanticToken::Neutral,
            crate::logger::jsonl::Level::Warning => SemanticToken::Warning,
        };
        let line = truncate(&format!("{time}  {}", entry.event.summary()), width);
        buf.put_str(inner.col, row, &line, CellStyle::token(token), width);
    }
}

fn render_too_small(buf: &mut ScreenBuffer, cols: u16, rows: u16) {
    let message = format!(
        "Terminal too small ({cols}x{rows}); need {}x{}",
        crate::tui::layout::MIN_USABLE_COLS,
        crate::tui::layout::MIN_USABLE_ROWS,
    );
    let row = rows / 2;
    let width = display_width(&message);
    let col = cols.saturating_sub(width_u16(width)) / 2;
    buf.put_str(
        col,
        row,
        &message,
        CellStyle::token(SemanticToken::Warning),
        usize::from(cols),
    );
}

// ──────────────────── helpers ────────────────────

fn width_u16(width: usize) -> u16 {
    u16::try_from(width).unwrap_or(u16::MAX)
}

fn centered_rect(cols: u16, rows: u16, width: u16, height: u16) -> PaneRect {
    let width = width.min(cols.saturating_sub(2)).max(1);
    let height = height.min(rows.saturating_sub(2)).max(1);
    PaneRect::new(
        cols.saturating_sub(width) / 2,
        rows.saturating_sub(height) / 2,
        width,
        height,
    )
}

fn clear(buf: &mut ScreenBuffer, rect: PaneRect) {
    for row in rect.row..rect.row.saturating_add(rect.height) {
        buf.fill(rect.col, row, rect.width, CellStyle::plain());
    }
}
