use axum::{body::Body, http::StatusCode, response::Response};
use scraper::{ElementRef, Html, Selector};

/// Check that `response` is a successful HTML page and parse its body.
pub(crate) async fn must_parse_html_page(response: Response<Body>) -> Html {
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get("content-type")
        .expect("content-type header missing");
    assert_eq!(content_type, "text/html; charset=utf-8");

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not get response body");
    let html = Html::parse_document(&String::from_utf8_lossy(&body));

    assert!(
        html.errors.is_empty(),
        "Got HTML parsing errors: {:?}",
        html.errors
    );

    html
}

#[track_caller]
pub(crate) fn select_all<'a>(html: &'a Html, selector: &str) -> Vec<ElementRef<'a>> {
    html.select(&Selector::parse(selector).unwrap()).collect()
}

#[track_caller]
pub(crate) fn must_select_text(html: &Html, selector: &str) -> String {
    html.select(&Selector::parse(selector).unwrap())
        .next()
        .unwrap_or_else(|| panic!("No element matches {selector:?}"))
        .text()
        .collect::<String>()
}
