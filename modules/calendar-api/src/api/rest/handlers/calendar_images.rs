use std::sync::Arc;

use axum::extract::{Path, Query};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use calendar_security::SecurityContext;
use http::StatusCode;

use super::{ApiResult, created, paged};
use crate::api::rest::dto::{CalendarImageDto, CalendarImageListQuery, CreateCalendarImageReq};
use crate::domain::pagination::PageRequest;
use crate::domain::service::AppServices;

#[tracing::instrument(skip(svc, ctx), fields(principal_id = ?ctx.principal_id()))]
pub(crate) async fn list_calendar_images(
    Extension(ctx): Extension<SecurityContext>,
    Extension(svc): Extension<Arc<AppServices>>,
    Query(query): Query<CalendarImageListQuery>,
) -> ApiResult {
    let page = PageRequest::new(query.page, query.per_page, svc.config());
    let page = svc
        .calendar_images
        .list(&ctx, query.calendar_id, page)
        .await?;
    Ok(paged(page.map(CalendarImageDto::from)))
}

#[tracing::instrument(skip(svc, ctx), fields(principal_id = ?ctx.principal_id()))]
pub(crate) async fn get_calendar_image(
    Extension(ctx): Extension<SecurityContext>,
    Extension(svc): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<CalendarImageDto>> {
    let placement = svc.calendar_images.get(&ctx, id).await?;
    Ok(Json(placement.into()))
}

#[tracing::instrument(skip(svc, ctx), fields(principal_id = ?ctx.principal_id()))]
pub(crate) async fn create_calendar_image(
    Extension(ctx): Extension<SecurityContext>,
    Extension(svc): Extension<Arc<AppServices>>,
    Json(req): Json<CreateCalendarImageReq>,
) -> ApiResult {
    let placement = svc.calendar_images.create(&ctx, req.into()).await?;
    created(
        format!("/api/v1/calendar-images/{}", placement.id),
        CalendarImageDto::from(placement),
    )
}

#[tracing::instrument(skip(svc, ctx), fields(principal_id = ?ctx.principal_id()))]
pub(crate) async fn delete_calendar_image(
    Extension(ctx): Extension<SecurityContext>,
    Extension(svc): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
) -> ApiResult {
    svc.calendar_images.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
