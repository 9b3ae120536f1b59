// tests/metrics.rs
//
// Installs the process-wide Prometheus recorder, so this file keeps a single test.

mod common;

use shuttle_axum::axum::body::{self, Body};
use shuttle_axum::axum::http::{Request, StatusCode};
use tower::ServiceExt;

use common::{draft, page_of, StubApi};
use devto_mcp::metrics::Metrics;
use devto_mcp::remote::Listing;
use devto_mcp::service::PageParams;

#[tokio::test]
async fn metrics_endpoint_contains_expected_series() {
    let metrics = Metrics::init().expect("install recorder");

    let api = StubApi::new(true)
        .with_pages(Listing::Latest, vec![vec![], page_of(1, 2, "A")])
        .failing_page(Listing::Latest, 1)
        .with_pages(Listing::MineAll, vec![vec![draft(3, "Hidden")]]);
    let (_api, svc) = api.into_service();
    svc.browse_latest(PageParams::default()).await.unwrap();
    svc.get_article("3").await.unwrap();

    let app = devto_mcp::router(svc).merge(metrics.router());
    let resp = app
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body::to_bytes(resp.into_body(), 1_048_576).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();

    for needle in [
        "devto_page_failures_total",
        "devto_fallback_scans_total{kind=\"id\"}",
    ] {
        assert!(text.contains(needle), "missing {needle} in:\n{text}");
    }
}
