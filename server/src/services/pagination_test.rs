use super::*;

#[test]
fn window_defaults_when_unset() {
    let w = window(PageQuery { page: None, limit: None });
    assert_eq!(w, Window { page: 1, limit: 50, offset: 0 });
}

#[test]
fn window_computes_offset() {
    let w = window(PageQuery { page: Some(3), limit: Some(20) });
    assert_eq!(w, Window { page: 3, limit: 20, offset: 40 });
}

#[test]
fn window_floors_page_at_one() {
    let w = window(PageQuery { page: Some(0), limit: None });
    assert_eq!(w.page, 1);
    assert_eq!(w.offset, 0);

    let w = window(PageQuery { page: Some(-5), limit: None });
    assert_eq!(w.page, 1);
}

#[test]
fn window_clamps_limit() {
    assert_eq!(window(PageQuery { page: None, limit: Some(0) }).limit, 1);
    assert_eq!(window(PageQuery { page: None, limit: Some(10_000) }).limit, 200);
}

#[test]
fn page_count_rounds_up() {
    assert_eq!(page_count(0, 50), 1);
    assert_eq!(page_count(1, 50), 1);
    assert_eq!(page_count(50, 50), 1);
    assert_eq!(page_count(51, 50), 2);
    assert_eq!(page_count(101, 50), 3);
}

#[test]
fn page_new_fills_totals() {
    let w = window(PageQuery { page: Some(2), limit: Some(10) });
    let page = Page::new(vec![1, 2, 3], 23, w);
    assert_eq!(page.total, 23);
    assert_eq!(page.page, 2);
    assert_eq!(page.pages, 3);
    assert_eq!(page.items.len(), 3);
}
