use std::sync::Arc;

use axum::extract::{Path, Query};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use calendar_security::SecurityContext;
use http::StatusCode;

use super::{ApiResult, paged};
use crate::api::rest::dto::{PageQuery, UpdateUserReq, UserDto};
use crate::domain::pagination::PageRequest;
use crate::domain::service::AppServices;

#[tracing::instrument(skip(svc, ctx), fields(principal_id = ?ctx.principal_id()))]
pub(crate) async fn list_users(
    Extension(ctx): Extension<SecurityContext>,
    Extension(svc): Extension<Arc<AppServices>>,
    Query(query): Query<PageQuery>,
) -> ApiResult {
    let page = PageRequest::new(query.page, query.per_page, svc.config());
    let page = svc.users.list(&ctx, page).await?;
    Ok(paged(page.map(UserDto::from)))
}

#[tracing::instrument(skip(svc, ctx), fields(principal_id = ?ctx.principal_id()))]
pub(crate) async fn get_user(
    Extension(ctx): Extension<SecurityContext>,
    Extension(svc): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<UserDto>> {
    let user = svc.users.get(&ctx, id).await?;
    Ok(Json(user.into()))
}

#[tracing::instrument(skip(svc, ctx, req), fields(principal_id = ?ctx.principal_id()))]
pub(crate) async fn update_user(
    Extension(ctx): Extension<SecurityContext>,
    Extension(svc): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserReq>,
) -> ApiResult<Json<UserDto>> {
    let user = svc.users.update(&ctx, id, req.into()).await?;
    Ok(Json(user.into()))
}

#[tracing::instrument(skip(svc, ctx), fields(principal_id = ?ctx.principal_id()))]
pub(crate) async fn delete_user(
    Extension(ctx): Extension<SecurityContext>,
    Extension(svc): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
) -> ApiResult {
    svc.users.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// The authenticated caller's own account.
#[tracing::instrument(skip(svc, ctx), fields(principal_id = ?ctx.principal_id()))]
pub(crate) async fn me(
    Extension(ctx): Extension<SecurityContext>,
    Extension(svc): Extension<Arc<AppServices>>,
) -> ApiResult<Json<UserDto>> {
    let user = svc.users.me(&ctx).await?;
    Ok(Json(user.into()))
}
