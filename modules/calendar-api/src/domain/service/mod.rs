//! Domain service layer, one service per resource.
//!
//! Every read goes through [`RowScopingFilter::apply`] so callers only see
//! rows they own (unless they are administrators or the policy is in
//! public-access mode). Rows outside the caller's scope are reported as
//! [`DomainError::NotFound`]. Actions on user accounts are additionally
//! decided by the [`AccessDecisionManager`].

use std::sync::Arc;

use calendar_authz::{AccessDecisionManager, AccessPolicyConfig, RowScopingFilter};
use calendar_security::SecurityContext;
use sea_orm::DatabaseConnection;

use crate::config::ServiceConfig;
use crate::domain::error::DomainError;

mod calendar_images;
mod calendars;
mod events;
mod images;
mod users;

pub use calendar_images::CalendarImageService;
pub use calendars::CalendarService;
pub use events::EventService;
pub use images::ImageService;
pub use users::UserService;

/// Identifier of the acting principal, required for writes.
fn require_principal(ctx: &SecurityContext) -> Result<i64, DomainError> {
    ctx.principal_id().ok_or(DomainError::Unauthorized)
}

/// Aggregates all domain services; shared across requests.
pub struct AppServices {
    pub calendars: Arc<CalendarService>,
    pub calendar_images: CalendarImageService,
    pub events: EventService,
    pub images: Arc<ImageService>,
    pub users: UserService,
    config: Arc<ServiceConfig>,
}

impl AppServices {
    #[must_use]
    pub fn new(
        db: DatabaseConnection,
        policy: Arc<AccessPolicyConfig>,
        config: ServiceConfig,
    ) -> Self {
        let config = Arc::new(config);
        let decisions = Arc::new(AccessDecisionManager::with_default_voters(&policy));
        let filter = RowScopingFilter::new(policy);

        let calendars = Arc::new(CalendarService::new(
            db.clone(),
            filter.clone(),
            Arc::clone(&config),
        ));
        let images = Arc::new(ImageService::new(
            db.clone(),
            filter.clone(),
            Arc::clone(&config),
        ));

        Self {
            calendar_images: CalendarImageService::new(
                db.clone(),
                filter.clone(),
                Arc::clone(&calendars),
                Arc::clone(&images),
            ),
            events: EventService::new(
                db.clone(),
                filter.clone(),
                Arc::clone(&config),
                Arc::clone(&calendars),
            ),
            users: UserService::new(db, filter, decisions),
            calendars,
            images,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests_scoping;
