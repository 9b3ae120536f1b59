// tests/resolve_fallback.rs
//
// Fallback resolver against the in-memory stub:
// - id lookup degrades to the owned-corpus scan on 404 only
// - the owned scan stops at the page holding the match
// - an exact public title match beats a case-insensitive owned match

mod common;

use common::{article, draft, page_of, Call, StubApi};
use devto_mcp::model::ItemId;
use devto_mcp::paging::PageQuery;
use devto_mcp::remote::Listing;
use devto_mcp::resolve::Resolver;

fn bounds() -> (PageQuery, PageQuery) {
    (PageQuery::new(1, 10, 5), PageQuery::new(1, 10, 5))
}

#[tokio::test]
async fn id_fallback_finds_item_seven_after_one_owned_page() {
    let mut owned = page_of(1, 10, "Owned");
    owned[6] = draft(7, "Hidden draft");
    let api = StubApi::new(true).with_pages(Listing::MineAll, vec![owned, page_of(11, 10, "More")]);

    let (owned_q, search_q) = bounds();
    let found = Resolver::new(&api, owned_q, search_q)
        .by_id("7")
        .await
        .expect("draft should resolve through the owned scan");

    assert_eq!(found.id, Some(ItemId::Number(7)));
    assert_eq!(found.title.as_deref(), Some("Hidden draft"));
    assert_eq!(api.list_calls(&Listing::MineAll), vec![1]);
    assert_eq!(api.calls()[0], Call::Article("7".into()));
}

#[tokio::test]
async fn id_found_directly_never_scans() {
    let api = StubApi::new(true).with_public(article(42, "Public"));
    let (o, s) = bounds();
    let a = Resolver::new(&api, o, s).by_id(" 42 ").await.unwrap();
    assert_eq!(a.id_string().as_deref(), Some("42"));
    assert!(api.list_calls(&Listing::MineAll).is_empty());
}

#[tokio::test]
async fn upstream_failure_propagates_without_fallback() {
    let api = StubApi::new(true)
        .direct_fails_with(500)
        .with_pages(Listing::MineAll, vec![page_of(1, 3, "Owned")]);
    let (o, s) = bounds();
    let err = Resolver::new(&api, o, s).by_id("2").await.unwrap_err();
    assert_eq!(err.status(), 500);
    assert!(api.list_calls(&Listing::MineAll).is_empty());
}

#[tokio::test]
async fn unauthenticated_miss_is_not_found() {
    let api = StubApi::new(false);
    let (o, s) = bounds();
    let err = Resolver::new(&api, o, s).by_id("7").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(api.calls(), vec![Call::Article("7".into())]);
}

#[tokio::test]
async fn exhausted_owned_scan_is_not_found() {
    let api = StubApi::new(true).with_pages(
        Listing::MineAll,
        vec![page_of(1, 10, "A"), page_of(11, 10, "B")],
    );
    let (o, s) = bounds();
    let err = Resolver::new(&api, o, s).by_id("99").await.unwrap_err();
    assert!(err.is_not_found());
    // Two full pages, then the empty third page ends the walk.
    assert_eq!(api.list_calls(&Listing::MineAll), vec![1, 2, 3]);
}

#[tokio::test]
async fn exact_public_title_beats_case_insensitive_owned_match() {
    let api = StubApi::new(true)
        .with_pages(Listing::Popular, vec![vec![article(100, "Hello World")]])
        .with_pages(Listing::MineAll, vec![vec![draft(200, "hello world")]]);
    let (o, s) = bounds();
    let a = Resolver::new(&api, o, s).by_title("Hello World").await.unwrap();
    assert_eq!(a.id, Some(ItemId::Number(100)));
    assert!(api.list_calls(&Listing::MineAll).is_empty());
}

#[tokio::test]
async fn partial_public_hits_fall_through_to_owned_scan() {
    let api = StubApi::new(true)
        .with_pages(
            Listing::Popular,
            vec![vec![article(100, "Hello World Part 2")]],
        )
        .with_pages(Listing::MineAll, vec![vec![draft(200, "HELLO world")]]);
    let (o, s) = bounds();
    let a = Resolver::new(&api, o, s).by_title("Hello World").await.unwrap();
    assert_eq!(a.id, Some(ItemId::Number(200)));
    assert_eq!(api.list_calls(&Listing::MineAll), vec![1]);
}

#[tokio::test]
async fn blank_title_is_invalid_input() {
    let api = StubApi::new(true);
    let (o, s) = bounds();
    let err = Resolver::new(&api, o, s).by_title("   ").await.unwrap_err();
    assert_eq!(err.status(), 400);
    assert!(api.calls().is_empty());
}
