use std::sync::Arc;

use axum::extract::{Path, Query};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use calendar_security::SecurityContext;
use http::StatusCode;

use super::{ApiResult, created, paged};
use crate::api::rest::dto::{CreateEventReq, EventDto, EventListQuery, UpdateEventReq};
use crate::domain::pagination::PageRequest;
use crate::domain::service::AppServices;

/// List events, optionally by calendar and time window (`from`/`to`, RFC 3339).
#[tracing::instrument(skip(svc, ctx), fields(principal_id = ?ctx.principal_id()))]
pub(crate) async fn list_events(
    Extension(ctx): Extension<SecurityContext>,
    Extension(svc): Extension<Arc<AppServices>>,
    Query(query): Query<EventListQuery>,
) -> ApiResult {
    let page = PageRequest::new(query.page, query.per_page, svc.config());
    let page = svc.events.list(&ctx, query.filters(), page).await?;
    Ok(paged(page.map(EventDto::from)))
}

#[tracing::instrument(skip(svc, ctx), fields(principal_id = ?ctx.principal_id()))]
pub(crate) async fn get_event(
    Extension(ctx): Extension<SecurityContext>,
    Extension(svc): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<EventDto>> {
    let event = svc.events.get(&ctx, id).await?;
    Ok(Json(event.into()))
}

#[tracing::instrument(skip(svc, ctx, req), fields(principal_id = ?ctx.principal_id()))]
pub(crate) async fn create_event(
    Extension(ctx): Extension<SecurityContext>,
    Extension(svc): Extension<Arc<AppServices>>,
    Json(req): Json<CreateEventReq>,
) -> ApiResult {
    let event = svc.events.create(&ctx, req.into()).await?;
    created(format!("/api/v1/events/{}", event.id), EventDto::from(event))
}

#[tracing::instrument(skip(svc, ctx, req), fields(principal_id = ?ctx.principal_id()))]
pub(crate) async fn update_event(
    Extension(ctx): Extension<SecurityContext>,
    Extension(svc): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateEventReq>,
) -> ApiResult<Json<EventDto>> {
    let event = svc.events.update(&ctx, id, req.into()).await?;
    Ok(Json(event.into()))
}

#[tracing::instrument(skip(svc, ctx), fields(principal_id = ?ctx.principal_id()))]
pub(crate) async fn delete_event(
    Extension(ctx): Extension<SecurityContext>,
    Extension(svc): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
) -> ApiResult {
    svc.events.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
