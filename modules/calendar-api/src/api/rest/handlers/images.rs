use std::sync::Arc;

use axum::extract::{Path, Query};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use calendar_security::SecurityContext;
use http::StatusCode;

use super::{ApiResult, created, paged};
use crate::api::rest::dto::{CreateImageReq, ImageDto, PageQuery};
use crate::domain::pagination::PageRequest;
use crate::domain::service::AppServices;

#[tracing::instrument(skip(svc, ctx), fields(principal_id = ?ctx.principal_id()))]
pub(crate) async fn list_images(
    Extension(ctx): Extension<SecurityContext>,
    Extension(svc): Extension<Arc<AppServices>>,
    Query(query): Query<PageQuery>,
) -> ApiResult {
    let page = PageRequest::new(query.page, query.per_page, svc.config());
    let page = svc.images.list(&ctx, page).await?;
    Ok(paged(page.map(ImageDto::from)))
}

#[tracing::instrument(skip(svc, ctx), fields(principal_id = ?ctx.principal_id()))]
pub(crate) async fn get_image(
    Extension(ctx): Extension<SecurityContext>,
    Extension(svc): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ImageDto>> {
    let image = svc.images.get(&ctx, id).await?;
    Ok(Json(image.into()))
}

#[tracing::instrument(skip(svc, ctx, req), fields(principal_id = ?ctx.principal_id()))]
pub(crate) async fn create_image(
    Extension(ctx): Extension<SecurityContext>,
    Extension(svc): Extension<Arc<AppServices>>,
    Json(req): Json<CreateImageReq>,
) -> ApiResult {
    let image = svc.images.create(&ctx, req.into()).await?;
    created(format!("/api/v1/images/{}", image.id), ImageDto::from(image))
}

#[tracing::instrument(skip(svc, ctx), fields(principal_id = ?ctx.principal_id()))]
pub(crate) async fn delete_image(
    Extension(ctx): Extension<SecurityContext>,
    Extension(svc): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
) -> ApiResult {
    svc.images.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
