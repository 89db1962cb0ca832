//! Static pages served by both router variants

use axum::http::StatusCode;
use axum::response::Html;

/// Landing page
const INDEX_HTML: &str = include_str!("static/index.html");

/// Upload form
const UPLOAD_HTML: &str = include_str!("static/upload.html");

/// Shown when an upload batch was rejected or could not be written
const UPLOAD_FAILED_HTML: &str = include_str!("static/upload_failed.html");

const UPLOAD_SUCCESS_HTML: &str = include_str!("static/upload_success.html");

/// Static HTML content for the 404 page
const NOT_FOUND_HTML: &str = include_str!("static/404.html");

pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn upload_form_handler() -> Html<&'static str> {
    Html(UPLOAD_HTML)
}

/// Handler for invalid routes - serves 404 page
pub async fn not_found_handler() -> (StatusCode, Html<&'static str>) {
    (StatusCode::NOT_FOUND, Html(NOT_FOUND_HTML))
}

pub fn upload_success_page() -> Html<&'static str> {
    Html(UPLOAD_SUCCESS_HTML)
}

pub fn upload_failed_page() -> Html<&'static str> {
    Html(UPLOAD_FAILED_HTML)
}
