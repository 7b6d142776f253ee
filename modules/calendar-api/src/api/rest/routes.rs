//! Route table.

use std::sync::Arc;

use axum::routing::get;
use axum::{Extension, Router, middleware};
use tower_http::trace::TraceLayer;

use crate::api::rest::auth::authn_middleware;
use crate::api::rest::handlers;
use crate::authn::PrincipalResolver;
use crate::domain::service::AppServices;

/// Everything the router needs from the outside.
#[derive(Clone)]
pub struct ApiState {
    pub services: Arc<AppServices>,
    pub resolver: Arc<dyn PrincipalResolver>,
}

/// Build the full application router.
///
/// `/health` is public; everything under `/api/v1` passes the authentication
/// middleware first.
#[must_use]
pub fn router(state: ApiState) -> Router {
    let api = Router::new()
        .route(
            "/calendars",
            get(handlers::calendars::list_calendars).post(handlers::calendars::create_calendar),
        )
        .route(
            "/calendars/{id}",
            get(handlers::calendars::get_calendar)
                .patch(handlers::calendars::update_calendar)
                .delete(handlers::calendars::delete_calendar),
        )
        .route(
            "/calendar-images",
            get(handlers::calendar_images::list_calendar_images)
                .post(handlers::calendar_images::create_calendar_image),
        )
        .route(
            "/calendar-images/{id}",
            get(handlers::calendar_images::get_calendar_image)
                .delete(handlers::calendar_images::delete_calendar_image),
        )
        .route(
            "/events",
            get(handlers::events::list_events).post(handlers::events::create_event),
        )
        .route(
            "/events/{id}",
            get(handlers::events::get_event)
                .patch(handlers::events::update_event)
                .delete(handlers::events::delete_event),
        )
        .route(
            "/images",
            get(handlers::images::list_images).post(handlers::images::create_image),
        )
        .route(
            "/images/{id}",
            get(handlers::images::get_image).delete(handlers::images::delete_image),
        )
        .route("/users", get(handlers::users::list_users))
        .route(
            "/users/{id}",
            get(handlers::users::get_user)
                .patch(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        .route("/me", get(handlers::users::me))
        .layer(middleware::from_fn_with_state(
            state.resolver,
            authn_middleware,
        ))
        .layer(Extension(state.services));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
}
