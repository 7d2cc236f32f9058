//! Browser-level flows against the in-memory data source: paging, detail
//! fetches, sorting and out-of-order results, without a terminal.

use incident_deck::api::source::DataSource;
use incident_deck::api::types::{Alert, Incident, SortDirection};
use incident_deck::api::{StaticDataSource, fixtures::demo_incidents};
use incident_deck::tui::browser::{Browser, BrowserCmd, BrowserMsg};
use incident_deck::tui::focus::{BrowserKey, Focus};
use incident_deck::tui::item::ENGLISH;

fn page_msg(source: &StaticDataSource, cmd: &BrowserCmd) -> BrowserMsg<Incident> {
    let BrowserCmd::FetchPage { seq, page, sort } = cmd else {
        panic!("expected a page fetch, got {cmd:?}");
    };
    match source.fetch_incidents(*page, sort.as_ref()) {
        Ok(page) => BrowserMsg::PageLoaded { seq: *seq, page },
        Err(e) => BrowserMsg::PageFailed {
            seq: *seq,
            error: e.to_string(),
            retryable: e.is_retryable(),
        },
    }
}

fn detail_msg(source: &StaticDataSource, cmd: &BrowserCmd) -> BrowserMsg<Incident> {
    let BrowserCmd::FetchDetail { id } = cmd else {
        panic!("expected a detail fetch, got {cmd:?}");
    };
    match source.fetch_incident(id) {
        Ok(item) => BrowserMsg::DetailLoaded {
            id: id.clone(),
            item,
        },
        Err(e) => BrowserMsg::DetailFailed {
            id: id.clone(),
            error: e.to_string(),
        },
    }
}

fn loaded_browser(source: &StaticDataSource) -> Browser<Incident> {
    let mut browser = Browser::new(&ENGLISH, 40);
    browser.update(BrowserMsg::Resize { cols: 100, rows: 30 });
    let cmd = browser.ensure_loaded();
    let msg = page_msg(source, &cmd);
    browser.update(msg);
    browser
}

#[test]
fn first_page_loads_with_cursor_at_top() {
    let source = StaticDataSource::demo(25);
    let browser = loaded_browser(&source);

    assert_eq!(browser.items().len(), 25);
    assert_eq!(browser.selection().cursor(), 0);
    assert_eq!(browser.pagination().current_page(), 1);
    assert_eq!(browser.pagination().indicator(), "1/3");
    assert_eq!(browser.selected_id(), Some("INC1000"));
    assert_eq!(browser.viewport().identity(), Some("INC1000"));
    assert!(browser.viewport().content().contains(ENGLISH.press_enter));
}

#[test]
fn walking_every_page_forward_and_back() {
    let source = StaticDataSource::demo(25);
    let mut browser = loaded_browser(&source);

    for expected in [2, 3] {
        let cmd = browser.update(BrowserMsg::Key(BrowserKey::NextPage));
        assert_eq!(browser.pagination().current_page(), expected);
        let msg = page_msg(&source, &cmd);
        browser.update(msg);
    }
    assert_eq!(browser.items().len(), 7);
    assert!(!browser.pagination().can_advance());
    assert_eq!(
        browser.update(BrowserMsg::Key(BrowserKey::NextPage)),
        BrowserCmd::None
    );

    let cmd = browser.update(BrowserMsg::Key(BrowserKey::PrevPage));
    let msg = page_msg(&source, &cmd);
    browser.update(msg);
    assert_eq!(browser.pagination().current_page(), 2);
    assert_eq!(browser.selected_id(), Some("INC1025"));
}

#[test]
fn open_detail_fetches_then_focuses() {
    let source = StaticDataSource::demo(25);
    let mut browser = loaded_browser(&source);
    browser.update(BrowserMsg::Key(BrowserKey::Down));

    let cmd = browser.update(BrowserMsg::Key(BrowserKey::Open));
    assert_eq!(
        cmd,
        BrowserCmd::FetchDetail {
            id: "INC1001".into()
        }
    );
    assert!(browser.detail_loads().is_loading("INC1001"));
    assert!(browser.viewport().content().contains(ENGLISH.loading_detail));
    assert_eq!(browser.focus(), Focus::List);

    let msg = detail_msg(&source, &cmd);
    browser.update(msg);
    assert!(!browser.detail_loads().is_busy());
    assert!(browser.viewport().content().contains(ENGLISH.description));

    assert_eq!(
        browser.update(BrowserMsg::Key(BrowserKey::Open)),
        BrowserCmd::None
    );
    assert_eq!(browser.focus(), Focus::Detail);
    assert!(browser.captures_input());

    browser.update(BrowserMsg::Key(BrowserKey::Close));
    assert_eq!(browser.focus(), Focus::List);
}

#[test]
fn failing_detail_leaves_record_unloaded() {
    let source = StaticDataSource::demo(25).with_failing_detail("INC1000");
    let mut browser = loaded_browser(&source);

    let cmd = browser.update(BrowserMsg::Key(BrowserKey::Open));
    let msg = detail_msg(&source, &cmd);
    assert!(matches!(msg, BrowserMsg::DetailFailed { .. }));
    browser.update(msg);

    assert!(!browser.detail_loads().is_busy());
    assert!(browser.viewport().content().contains(ENGLISH.press_enter));
    // retry is allowed once the tracker is idle
    assert_eq!(
        browser.update(BrowserMsg::Key(BrowserKey::Open)),
        BrowserCmd::FetchDetail {
            id: "INC1000".into()
        }
    );
}

#[test]
fn failing_page_keeps_previous_items_until_retry() {
    let source = StaticDataSource::demo(25).with_failing_page(2);
    let mut browser = loaded_browser(&source);

    let cmd = browser.update(BrowserMsg::Key(BrowserKey::NextPage));
    let msg = page_msg(&source, &cmd);
    browser.update(msg);

    assert!(browser.error().is_some_and(|e| e.contains("503")));
    assert!(browser.page_error().is_some_and(|e| e.retryable));
    assert_eq!(browser.items()[0].id, "INC1000");
    assert_eq!(browser.pagination().current_page(), 1);

    let healthy = StaticDataSource::demo(25);
    let cmd = browser.refresh();
    let msg = page_msg(&healthy, &cmd);
    browser.update(msg);
    assert!(browser.error().is_none());
    assert_eq!(browser.items()[0].id, "INC1025");
    assert_eq!(browser.pagination().current_page(), 2);
}

#[test]
fn out_of_order_pages_keep_the_latest() {
    let source = StaticDataSource::demo(25);
    let mut browser = loaded_browser(&source);

    let to_two = browser.update(BrowserMsg::Key(BrowserKey::NextPage));
    // a second next waits for page 2 to land
    assert_eq!(
        browser.update(BrowserMsg::Key(BrowserKey::NextPage)),
        BrowserCmd::None
    );
    let back = browser.update(BrowserMsg::Key(BrowserKey::PrevPage));
    let late = page_msg(&source, &to_two);
    let fresh = page_msg(&source, &back);

    browser.update(fresh);
    assert_eq!(browser.items()[0].id, "INC1000");
    browser.update(late);
    assert_eq!(browser.items()[0].id, "INC1000");
    assert_eq!(browser.pagination().current_page(), 1);
}

#[test]
fn sort_menu_requests_sorted_first_page() {
    let source = StaticDataSource::demo(25);
    let mut browser = loaded_browser(&source);
    browser.update(BrowserMsg::Key(BrowserKey::NextPage));

    browser.update(BrowserMsg::Key(BrowserKey::Sort));
    assert!(browser.sort_menu().is_open());
    assert!(browser.captures_input());
    let cmd = browser.update(BrowserMsg::Key(BrowserKey::Open));
    assert!(!browser.sort_menu().is_open());

    let BrowserCmd::FetchPage { page, sort, .. } = &cmd else {
        panic!("expected a page fetch, got {cmd:?}");
    };
    assert_eq!(*page, 1);
    let sort = sort.as_ref().expect("sort applied");
    assert_eq!(sort.field, "created_at");
    let first_direction = sort.direction;

    let msg = page_msg(&source, &cmd);
    browser.update(msg);
    assert_eq!(browser.pagination().current_page(), 1);
    assert_eq!(browser.selection().cursor(), 0);

    // same field again flips direction
    browser.update(BrowserMsg::Key(BrowserKey::Sort));
    let cmd = browser.update(BrowserMsg::Key(BrowserKey::Open));
    let BrowserCmd::FetchPage { sort: Some(sort), .. } = cmd else {
        panic!("expected a sorted page fetch");
    };
    assert_eq!(sort.direction, first_direction.flipped());
    assert_ne!(sort.direction, first_direction);
    assert!(matches!(
        sort.direction,
        SortDirection::Asc | SortDirection::Desc
    ));
}

#[test]
fn late_detail_for_another_record_keeps_current_load() {
    let source = StaticDataSource::demo(25);
    let mut browser = loaded_browser(&source);

    let cmd = browser.update(BrowserMsg::Key(BrowserKey::Open));
    assert!(browser.detail_loads().is_loading("INC1000"));

    let mut stray = demo_incidents(3).remove(2);
    stray.detail_loaded = true;
    browser.update(BrowserMsg::DetailLoaded {
        id: stray.id.clone(),
        item: stray,
    });
    assert!(browser.detail_loads().is_loading("INC1000"));
    assert!(browser.items()[2].detail_loaded);

    let msg = detail_msg(&source, &cmd);
    browser.update(msg);
    assert!(!browser.detail_loads().is_busy());
}

#[test]
fn alerts_browse_the_same_way() {
    let source = StaticDataSource::demo(25);
    let mut browser: Browser<Alert> = Browser::new(&ENGLISH, 40);
    let BrowserCmd::FetchPage { seq, page, .. } = browser.ensure_loaded() else {
        panic!("expected initial fetch");
    };
    let page = source.fetch_alerts(page, None).expect("demo alerts");
    browser.update(BrowserMsg::PageLoaded { seq, page });

    assert_eq!(browser.items().len(), 25);
    assert_eq!(browser.pagination().indicator(), "1/4");
    browser.update(BrowserMsg::Key(BrowserKey::Bottom));
    assert_eq!(browser.selection().cursor(), 24);
    assert_eq!(browser.selected_id(), Some("ALR50024"));
}
