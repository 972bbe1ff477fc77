//! Dashboard page.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../../assets/index.html");

/// GET / - Static dashboard that renders the rule table live over `/ws`.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
