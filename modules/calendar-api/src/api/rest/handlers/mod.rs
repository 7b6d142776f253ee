use axum::Json;
use axum::response::{IntoResponse, Response};
use http::{HeaderMap, HeaderValue, StatusCode, header};
use serde::Serialize;

use crate::api::rest::problem::Problem;
use crate::domain::pagination::Page;

pub(crate) mod calendar_images;
pub(crate) mod calendars;
pub(crate) mod events;
pub(crate) mod images;
pub(crate) mod users;

pub(crate) type ApiResult<T = Response> = Result<T, Problem>;

pub(crate) const X_TOTAL_COUNT: &str = "x-total-count";
pub(crate) const X_PAGE: &str = "x-page";
pub(crate) const X_PER_PAGE: &str = "x-per-page";
pub(crate) const X_TOTAL_PAGES: &str = "x-total-pages";

pub(crate) async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Collection body with the page position in headers.
pub(crate) fn paged<T: Serialize>(page: Page<T>) -> Response {
    let info = page.info;
    let mut headers = HeaderMap::new();
    headers.insert(X_TOTAL_COUNT, HeaderValue::from(info.total));
    headers.insert(X_PAGE, HeaderValue::from(info.page));
    headers.insert(X_PER_PAGE, HeaderValue::from(info.per_page));
    headers.insert(X_TOTAL_PAGES, HeaderValue::from(info.total_pages));
    (headers, Json(page.items)).into_response()
}

/// `201 Created` with a `Location` pointing at the new resource.
pub(crate) fn created<T: Serialize>(location: String, body: T) -> ApiResult {
    let location = HeaderValue::try_from(location).map_err(|e| {
        tracing::error!(error = %e, "invalid location header");
        Problem::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
            "An internal error occurred",
        )
    })?;
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(body)).into_response())
}
