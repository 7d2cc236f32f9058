//! List/detail focus and the key re-mapping between the two modes.
//!
//! The same physical keys move the selection while the list has focus and
//! scroll the detail viewport once the detail pane has focus.

/// Normalized browser keys, produced from terminal events by `tui::input`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrowserKey {
    Up,
    Down,
    Top,
    Bottom,
    NextPage,
    PrevPage,
    HalfPageUp,
    HalfPageDown,
    /// Enter: load detail, focus detail, or confirm the sort menu.
    Open,
    /// Esc: leave detail focus or cancel the sort menu.
    Close,
    Sort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    List,
    Detail,
}

/// Viewport operations reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOp {
    By(isize),
    PageUp,
    PageDown,
    Top,
    Bottom,
}

/// Selection/pagination operations reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOp {
    Up,
    Down,
    Top,
    Bottom,
    NextPage,
    PrevPage,
}

/// Where a key ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    SortMenu(BrowserKey),
    Scroll(ScrollOp),
    List(ListOp),
    OpenDetail,
    OpenSort,
    FocusList,
    Ignore,
}

/// Route `key` by sort-menu visibility first, then focus.
#[must_use]
pub const fn route_key(focus: Focus, sort_open: bool, key: BrowserKey) -> Route {
    if sort_open {
        return Route::SortMenu(key);
    }
    match focus {
        Focus::List => route_list(key),
        Focus::Detail => route_detail(key),
    }
}

const fn route_list(key: BrowserKey) -> Route {
    match key {
        BrowserKey::Up => Route::List(ListOp::Up),
        BrowserKey::Down => Route::List(ListOp::Down),
        BrowserKey::Top => Route::List(ListOp::Top),
        BrowserKey::Bottom => Route::List(ListOp::Bottom),
        BrowserKey::NextPage => Route::List(ListOp::NextPage),
        BrowserKey::PrevPage => Route::List(ListOp::PrevPage),
        // peek at the detail without leaving the list
        BrowserKey::HalfPageUp => Route::Scroll(ScrollOp::PageUp),
        BrowserKey::HalfPageDown => Route::Scroll(ScrollOp::PageDown),
        BrowserKey::Open => Route::OpenDetail,
        BrowserKey::Sort => Route::OpenSort,
        BrowserKey::Close => Route::Ignore,
    }
}

const fn route_detail(key: BrowserKey) -> Route {
    match key {
        BrowserKey::Up => Route::Scroll(ScrollOp::By(-1)),
        BrowserKey::Down => Route::Scroll(ScrollOp::By(1)),
        BrowserKey::Top => Route::Scroll(ScrollOp::Top),
        BrowserKey::Bottom => Route::Scroll(ScrollOp::Bottom),
        BrowserKey::NextPage | BrowserKey::HalfPageDown => Route::Scroll(ScrollOp::PageDown),
        BrowserKey::PrevPage | BrowserKey::HalfPageUp => Route::Scroll(ScrollOp::PageUp),
        BrowserKey::Close => Route::FocusList,
        BrowserKey::Open | BrowserKey::Sort => Route::Ignore,
    }
}
