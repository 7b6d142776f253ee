use std::sync::Arc;

use axum::extract::{Path, Query};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use calendar_security::SecurityContext;
use http::StatusCode;

use super::{ApiResult, created, paged};
use crate::api::rest::dto::{CalendarDto, CreateCalendarReq, PageQuery, UpdateCalendarReq};
use crate::domain::pagination::PageRequest;
use crate::domain::service::AppServices;

#[tracing::instrument(skip(svc, ctx), fields(principal_id = ?ctx.principal_id()))]
pub(crate) async fn list_calendars(
    Extension(ctx): Extension<SecurityContext>,
    Extension(svc): Extension<Arc<AppServices>>,
    Query(query): Query<PageQuery>,
) -> ApiResult {
    let page = PageRequest::new(query.page, query.per_page, svc.config());
    let page = svc.calendars.list(&ctx, page).await?;
    Ok(paged(page.map(CalendarDto::from)))
}

#[tracing::instrument(skip(svc, ctx), fields(principal_id = ?ctx.principal_id()))]
pub(crate) async fn get_calendar(
    Extension(ctx): Extension<SecurityContext>,
    Extension(svc): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<CalendarDto>> {
    let calendar = svc.calendars.get(&ctx, id).await?;
    Ok(Json(calendar.into()))
}

#[tracing::instrument(skip(svc, ctx, req), fields(principal_id = ?ctx.principal_id()))]
pub(crate) async fn create_calendar(
    Extension(ctx): Extension<SecurityContext>,
    Extension(svc): Extension<Arc<AppServices>>,
    Json(req): Json<CreateCalendarReq>,
) -> ApiResult {
    let calendar = svc.calendars.create(&ctx, req.into()).await?;
    created(
        format!("/api/v1/calendars/{}", calendar.id),
        CalendarDto::from(calendar),
    )
}

#[tracing::instrument(skip(svc, ctx, req), fields(principal_id = ?ctx.principal_id()))]
pub(crate) async fn update_calendar(
    Extension(ctx): Extension<SecurityContext>,
    Extension(svc): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateCalendarReq>,
) -> ApiResult<Json<CalendarDto>> {
    let calendar = svc.calendars.update(&ctx, id, req.into()).await?;
    Ok(Json(calendar.into()))
}

#[tracing::instrument(skip(svc, ctx), fields(principal_id = ?ctx.principal_id()))]
pub(crate) async fn delete_calendar(
    Extension(ctx): Extension<SecurityContext>,
    Extension(svc): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
) -> ApiResult {
    svc.calendars.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
