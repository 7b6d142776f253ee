use std::sync::Arc;

use calendar_authz::{ResourceKind, RowScopingFilter};
use calendar_db::secure::{SecureDeleteExt, SecureEntityExt};
use calendar_security::SecurityContext;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, NotSet, Order, Set};
use time::OffsetDateTime;
use tracing::instrument;

use super::require_principal;
use crate::config::ServiceConfig;
use crate::domain::error::DomainError;
use crate::domain::model::{Calendar, CalendarPatch, NewCalendar};
use crate::domain::pagination::{Page, PageInfo, PageRequest};
use crate::domain::validation::{normalize_color, normalize_optional, validate_title};
use crate::infra::storage::entity::calendar;

pub struct CalendarService {
    db: DatabaseConnection,
    filter: RowScopingFilter,
    config: Arc<ServiceConfig>,
}

impl CalendarService {
    pub(super) fn new(
        db: DatabaseConnection,
        filter: RowScopingFilter,
        config: Arc<ServiceConfig>,
    ) -> Self {
        Self { db, filter, config }
    }

    /// # Errors
    /// `Unauthorized` for anonymous callers under enforced scoping.
    #[instrument(skip(self, ctx))]
    pub async fn list(
        &self,
        ctx: &SecurityContext,
        page: PageRequest,
    ) -> Result<Page<Calendar>, DomainError> {
        let query = self
            .filter
            .apply(calendar::Entity::find().secure(), ResourceKind::Calendar, ctx)?;
        let total = query.clone().count(&self.db).await?;
        let rows = query
            .order_by(calendar::Column::Id, Order::Asc)
            .limit(page.per_page)
            .offset(page.offset())
            .all(&self.db)
            .await?;

        tracing::debug!(count = rows.len(), total, "listed calendars");
        Ok(Page {
            items: rows.into_iter().map(Calendar::from).collect(),
            info: PageInfo::new(page, total),
        })
    }

    /// # Errors
    /// `NotFound` when the calendar does not exist or is outside the caller's scope.
    #[instrument(skip(self, ctx))]
    pub async fn get(&self, ctx: &SecurityContext, id: i64) -> Result<Calendar, DomainError> {
        self.find_visible(ctx, id).await.map(Calendar::from)
    }

    /// # Errors
    /// `Unauthorized` without a principal, `Validation` on bad input.
    #[instrument(skip(self, ctx, new), fields(title = %new.title))]
    pub async fn create(
        &self,
        ctx: &SecurityContext,
        new: NewCalendar,
    ) -> Result<Calendar, DomainError> {
        let owner_id = require_principal(ctx)?;
        let title = validate_title("title", &new.title, self.config.max_title_length)?;
        let color = normalize_color(&new.color)?;
        let now = OffsetDateTime::now_utc();

        let model = calendar::ActiveModel {
            id: NotSet,
            owner_id: Set(owner_id),
            title: Set(title),
            description: Set(normalize_optional(new.description)),
            color: Set(color),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(calendar_id = model.id, owner_id, "created calendar");
        Ok(model.into())
    }

    /// # Errors
    /// `Unauthorized` without a principal, `NotFound` outside the caller's scope,
    /// `Validation` on bad input.
    #[instrument(skip(self, ctx, patch))]
    pub async fn update(
        &self,
        ctx: &SecurityContext,
        id: i64,
        patch: CalendarPatch,
    ) -> Result<Calendar, DomainError> {
        require_principal(ctx)?;
        let existing = self.find_visible(ctx, id).await?;
        let mut active: calendar::ActiveModel = existing.into();

        if let Some(title) = patch.title {
            active.title = Set(validate_title(
                "title",
                &title,
                self.config.max_title_length,
            )?);
        }
        if let Some(description) = patch.description {
            active.description = Set(normalize_optional(description));
        }
        if let Some(color) = patch.color {
            active.color = Set(normalize_color(&color)?);
        }
        active.updated_at = Set(OffsetDateTime::now_utc());

        let model = active.update(&self.db).await?;
        tracing::info!(calendar_id = id, "updated calendar");
        Ok(model.into())
    }

    /// # Errors
    /// `Unauthorized` without a principal, `NotFound` when nothing visible to the
    /// caller was deleted.
    #[instrument(skip(self, ctx))]
    pub async fn delete(&self, ctx: &SecurityContext, id: i64) -> Result<(), DomainError> {
        require_principal(ctx)?;
        let scope = self.filter.scope(ResourceKind::Calendar, ctx)?;
        let res = calendar::Entity::delete_many()
            .secure()
            .scope_with(&scope)
            .and_id(id)
            .exec(&self.db)
            .await?;
        if res.rows_affected == 0 {
            return Err(DomainError::not_found("calendar", id));
        }
        tracing::info!(calendar_id = id, "deleted calendar");
        Ok(())
    }

    async fn find_visible(
        &self,
        ctx: &SecurityContext,
        id: i64,
    ) -> Result<calendar::Model, DomainError> {
        self.filter
            .apply(calendar::Entity::find().secure(), ResourceKind::Calendar, ctx)?
            .and_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("calendar", id))
    }
}
