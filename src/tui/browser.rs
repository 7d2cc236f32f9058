//! Generic list/detail browser over one paginated collection.
//!
//! [`Browser::update`] is the single entry point: every key press, resize
//! and fetch result goes through it, mutates exactly one sub-component and
//! yields at most one outbound request. Fetches themselves never touch the
//! browser; their results come back as ordinary [`BrowserMsg`]s.

use crate::api::types::{Page, SortSpec};
use crate::tui::detail_loads::DetailLoads;
use crate::tui::focus::{BrowserKey, Focus, ListOp, Route, ScrollOp, route_key};
use crate::tui::item::{BrowsableItem, Labels, detail_content};
use crate::tui::layout::{DashboardLayout, build_dashboard_layout};
use crate::tui::pagination::Pagination;
use crate::tui::selection::Selection;
use crate::tui::sort::{SortMenuOutcome, SortOverlay, SortState};
use crate::tui::viewport::Viewport;

/// Events consumed by a browser.
#[derive(Debug, Clone, PartialEq)]
pub enum BrowserMsg<T> {
    Key(BrowserKey),
    Resize { cols: u16, rows: u16 },
    PageLoaded { seq: u64, page: Page<T> },
    /// `retryable` is false when repeating the request cannot help, e.g. a
    /// rejected token.
    PageFailed {
        seq: u64,
        error: String,
        retryable: bool,
    },
    DetailLoaded { id: String, item: T },
    DetailFailed { id: String, error: String },
}

/// Outbound request for the data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserCmd {
    None,
    FetchPage {
        seq: u64,
        page: u32,
        sort: Option<SortSpec>,
    },
    FetchDetail {
        id: String,
    },
}

/// Failure of the latest page request, shown in place of the panes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageError {
    pub message: String,
    pub retryable: bool,
    /// Page that failed; `refresh` asks for it again.
    pub page: u32,
}

#[derive(Debug, Clone)]
pub struct Browser<T: BrowsableItem> {
    items: Vec<T>,
    pagination: Pagination,
    selection: Selection,
    loads: DetailLoads,
    viewport: Viewport,
    focus: Focus,
    sort: SortState,
    sort_menu: SortOverlay,
    layout: DashboardLayout,
    list_width_pct: u16,
    latest_seq: u64,
    requested_page: u32,
    page_in_flight: bool,
    loaded_once: bool,
    error: Option<PageError>,
    labels: &'static Labels,
}

impl<T: BrowsableItem> Browser<T> {
    #[must_use]
    pub fn new(labels: &'static Labels, list_width_pct: u16) -> Self {
        let layout = DashboardLayout::default();
        Self {
            items: Vec::new(),
            pagination: Pagination::new(),
            selection: Selection::new(0),
            loads: DetailLoads::new(),
            viewport: Viewport::new(layout.detail_width(), layout.detail_rows()),
            focus: Focus::List,
            sort: SortState::default(),
            sort_menu: SortOverlay::new(T::sort_options()),
            layout,
            list_width_pct,
            latest_seq: 0,
            requested_page: 1,
            page_in_flight: false,
            loaded_once: false,
            error: None,
            labels,
        }
    }

    // ──────────────────── read access ────────────────────

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub const fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub const fn detail_loads(&self) -> &DetailLoads {
        &self.loads
    }

    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[must_use]
    pub const fn focus(&self) -> Focus {
        self.focus
    }

    #[must_use]
    pub const fn sort(&self) -> &SortState {
        &self.sort
    }

    #[must_use]
    pub const fn sort_menu(&self) -> &SortOverlay {
        &self.sort_menu
    }

    #[must_use]
    pub const fn layout(&self) -> &DashboardLayout {
        &self.layout
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }

    #[must_use]
    pub const fn page_error(&self) -> Option<&PageError> {
        self.error.as_ref()
    }

    #[must_use]
    pub const fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    #[must_use]
    pub const fn is_page_loading(&self) -> bool {
        self.page_in_flight
    }

    #[must_use]
    pub const fn has_loaded(&self) -> bool {
        self.loaded_once
    }

    #[must_use]
    pub const fn labels(&self) -> &'static Labels {
        self.labels
    }

    #[must_use]
    pub fn selected_item(&self) -> Option<&T> {
        self.selection.selected().and_then(|i| self.items.get(i))
    }

    #[must_use]
    pub fn selected_id(&self) -> Option<&str> {
        self.selected_item().map(BrowsableItem::id)
    }

    /// Whether a page result with `seq` would be discarded.
    #[must_use]
    pub const fn is_stale(&self, seq: u64) -> bool {
        seq != self.latest_seq
    }

    /// Whether keys like `q` should be left to the browser.
    #[must_use]
    pub const fn captures_input(&self) -> bool {
        self.sort_menu.is_open() || matches!(self.focus, Focus::Detail)
    }

    // ──────────────────── commands from the shell ────────────────────

    /// Re-request the current page, or the page whose fetch last failed.
    pub fn refresh(&mut self) -> BrowserCmd {
        let page = self
            .error
            .as_ref()
            .map_or_else(|| self.pagination.current_page(), |e| e.page);
        self.request_page(page)
    }

    /// Request page 1 if nothing has been requested yet.
    pub fn ensure_loaded(&mut self) -> BrowserCmd {
        if self.loaded_once || self.page_in_flight {
            BrowserCmd::None
        } else {
            self.request_page(1)
        }
    }

    /// Forget the in-flight detail, e.g. when the view is left.
    pub fn clear_detail_loads(&mut self) {
        self.loads.clear();
        self.refresh_selected_content();
    }

    // ──────────────────── reducer ────────────────────

    pub fn update(&mut self, msg: BrowserMsg<T>) -> BrowserCmd {
        match msg {
            BrowserMsg::Key(key) => self.handle_key(key),
            BrowserMsg::Resize { cols, rows } => {
                self.resize(cols, rows);
                BrowserCmd::None
            }
            BrowserMsg::PageLoaded { seq, page } => {
                self.apply_page(seq, page);
                BrowserCmd::None
            }
            BrowserMsg::PageFailed {
                seq,
                error,
                retryable,
            } => {
                if !self.is_stale(seq) {
                    self.page_in_flight = false;
                    self.pagination.restore();
                    self.error = Some(PageError {
                        message: error,
                        retryable,
                        page: self.requested_page,
                    });
                }
                BrowserCmd::None
            }
            BrowserMsg::DetailLoaded { id, item } => {
                if let Some(existing) = self.items.iter_mut().find(|i| i.id() == id) {
                    existing.merge_detail(item);
                }
                self.finish_detail(&id);
                BrowserCmd::None
            }
            BrowserMsg::DetailFailed { id, .. } => {
                self.finish_detail(&id);
                BrowserCmd::None
            }
        }
    }

    fn handle_key(&mut self, key: BrowserKey) -> BrowserCmd {
        match route_key(self.focus, self.sort_menu.is_open(), key) {
            Route::SortMenu(key) => match self.sort_menu.handle_key(key) {
                SortMenuOutcome::Confirmed(field) => {
                    self.sort.toggle(field);
                    self.pagination.reset_to_first();
                    self.select(Selection::reset);
                    self.request_page(1)
                }
                SortMenuOutcome::Pending | SortMenuOutcome::Cancelled => BrowserCmd::None,
            },
            Route::Scroll(op) => {
                self.scroll(op);
                BrowserCmd::None
            }
            Route::List(op) => self.list_op(op),
            Route::OpenDetail => self.open_detail(),
            Route::OpenSort => {
                self.sort_menu.open();
                BrowserCmd::None
            }
            Route::FocusList => {
                self.focus = Focus::List;
                BrowserCmd::None
            }
            Route::Ignore => BrowserCmd::None,
        }
    }

    fn scroll(&mut self, op: ScrollOp) {
        match op {
            ScrollOp::By(delta) => self.viewport.scroll_by(delta),
            ScrollOp::PageUp => self.viewport.page_up(),
            ScrollOp::PageDown => self.viewport.page_down(),
            ScrollOp::Top => self.viewport.goto_top(),
            ScrollOp::Bottom => self.viewport.goto_bottom(),
        };
    }

    fn list_op(&mut self, op: ListOp) -> BrowserCmd {
        match op {
            ListOp::Up => self.select(Selection::move_up),
            ListOp::Down => self.select(Selection::move_down),
            ListOp::Top => self.select(Selection::first),
            ListOp::Bottom => self.select(Selection::last),
            ListOp::NextPage => {
                if self.pagination.advance() {
                    self.select(Selection::reset);
                    return self.request_page(self.pagination.current_page());
                }
            }
            ListOp::PrevPage => {
                // back out of a failed forward move to the page still in memory
                if self
                    .error
                    .as_ref()
                    .is_some_and(|e| e.page > self.pagination.current_page())
                {
                    self.select(Selection::reset);
                    return self.request_page(self.pagination.current_page());
                }
                if self.pagination.retreat() {
                    self.select(Selection::reset);
                    return self.request_page(self.pagination.current_page());
                }
            }
        }
        BrowserCmd::None
    }

    fn open_detail(&mut self) -> BrowserCmd {
        let Some(item) = self.selected_item() else {
            return BrowserCmd::None;
        };
        if item.detail_loaded() {
            self.focus = Focus::Detail;
            return BrowserCmd::None;
        }
        if self.loads.is_busy() {
            return BrowserCmd::None;
        }
        let id = item.id().to_string();
        self.loads.begin_load(id.clone());
        self.refresh_selected_content();
        BrowserCmd::FetchDetail { id }
    }

    fn apply_page(&mut self, seq: u64, page: Page<T>) {
        if self.is_stale(seq) {
            return;
        }
        self.items = page.items;
        self.pagination.apply(page.meta);
        self.selection.reconcile(self.items.len());
        self.page_in_flight = false;
        self.loaded_once = true;
        self.error = None;
        if !self.selected_item().is_some_and(BrowsableItem::detail_loaded) {
            self.focus = Focus::List;
        }
        self.show_selected();
    }

    fn finish_detail(&mut self, id: &str) {
        if self.loads.is_loading(id) {
            self.loads.complete();
        }
        if self.selected_id() == Some(id) {
            self.refresh_selected_content();
        }
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        self.layout = build_dashboard_layout(cols, rows, self.list_width_pct);
        self.viewport
            .resize(self.layout.detail_width(), self.layout.detail_rows());
    }

    fn request_page(&mut self, page: u32) -> BrowserCmd {
        self.latest_seq += 1;
        self.requested_page = page;
        self.page_in_flight = true;
        BrowserCmd::FetchPage {
            seq: self.latest_seq,
            page,
            sort: self.sort.spec(),
        }
    }

    /// Apply a cursor operation; a changed selection resets the viewport.
    fn select(&mut self, op: fn(&mut Selection) -> bool) {
        if op(&mut self.selection) {
            self.show_selected();
        }
    }

    fn selected_content(&self) -> Option<(String, String)> {
        let item = self.selected_item()?;
        let loading = self.loads.is_loading(item.id());
        Some((
            item.id().to_string(),
            detail_content(item, loading, self.labels),
        ))
    }

    /// New identity: content regenerated and scrolled to the top.
    fn show_selected(&mut self) {
        match self.selected_content() {
            Some((id, text)) => self.viewport.reset_to(&text, Some(id)),
            None => self.viewport.clear(),
        }
    }

    /// Same identity: content regenerated, scroll kept.
    fn refresh_selected_content(&mut self) {
        if let Some((id, text)) = self.selected_content() {
            if self.viewport.identity() == Some(id.as_str()) {
                self.viewport.set_content(&text);
            } else {
                self.viewport.reset_to(&text, Some(id));
            }
        }
    }
}
