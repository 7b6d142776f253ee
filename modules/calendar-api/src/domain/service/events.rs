use std::sync::Arc;

use calendar_authz::{ResourceKind, RowScopingFilter};
use calendar_db::secure::{SecureDeleteExt, SecureEntityExt};
use calendar_security::SecurityContext;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, NotSet, Order, Set,
};
use time::OffsetDateTime;
use tracing::instrument;

use super::{CalendarService, require_principal};
use crate::config::ServiceConfig;
use crate::domain::error::DomainError;
use crate::domain::model::{Event, EventPatch, EventQuery, NewEvent};
use crate::domain::pagination::{Page, PageInfo, PageRequest};
use crate::domain::validation::{normalize_optional, validate_time_range, validate_title};
use crate::infra::storage::entity::event;

pub struct EventService {
    db: DatabaseConnection,
    filter: RowScopingFilter,
    config: Arc<ServiceConfig>,
    calendars: Arc<CalendarService>,
}

impl EventService {
    pub(super) fn new(
        db: DatabaseConnection,
        filter: RowScopingFilter,
        config: Arc<ServiceConfig>,
        calendars: Arc<CalendarService>,
    ) -> Self {
        Self {
            db,
            filter,
            config,
            calendars,
        }
    }

    /// Events overlapping `[from, to)`, optionally restricted to one calendar,
    /// ordered by start time.
    ///
    /// # Errors
    /// `Unauthorized` for anonymous callers under enforced scoping.
    #[instrument(skip(self, ctx))]
    pub async fn list(
        &self,
        ctx: &SecurityContext,
        query: EventQuery,
        page: PageRequest,
    ) -> Result<Page<Event>, DomainError> {
        let mut cond = Condition::all();
        if let Some(calendar_id) = query.calendar_id {
            cond = cond.add(event::Column::CalendarId.eq(calendar_id));
        }
        if let Some(from) = query.from {
            cond = cond.add(event::Column::EndsAt.gt(from));
        }
        if let Some(to) = query.to {
            cond = cond.add(event::Column::StartsAt.lt(to));
        }

        let scoped = self
            .filter
            .apply(event::Entity::find().secure(), ResourceKind::Event, ctx)?
            .filter(cond);
        let total = scoped.clone().count(&self.db).await?;
        let rows = scoped
            .order_by(event::Column::StartsAt, Order::Asc)
            .order_by(event::Column::Id, Order::Asc)
            .limit(page.per_page)
            .offset(page.offset())
            .all(&self.db)
            .await?;

        tracing::debug!(count = rows.len(), total, "listed events");
        Ok(Page {
            items: rows.into_iter().map(Event::from).collect(),
            info: PageInfo::new(page, total),
        })
    }

    /// # Errors
    /// `NotFound` when the event does not exist or is outside the caller's scope.
    #[instrument(skip(self, ctx))]
    pub async fn get(&self, ctx: &SecurityContext, id: i64) -> Result<Event, DomainError> {
        self.find_visible(ctx, id).await.map(Event::from)
    }

    /// # Errors
    /// `Unauthorized` without a principal; `Validation` on bad input or a
    /// calendar the caller cannot see.
    #[instrument(skip(self, ctx, new), fields(calendar_id = new.calendar_id))]
    pub async fn create(&self, ctx: &SecurityContext, new: NewEvent) -> Result<Event, DomainError> {
        let owner_id = require_principal(ctx)?;
        let title = validate_title("title", &new.title, self.config.max_title_length)?;
        validate_time_range(new.starts_at, new.ends_at, new.all_day)?;
        self.ensure_calendar_visible(ctx, new.calendar_id).await?;
        let now = OffsetDateTime::now_utc();

        let model = event::ActiveModel {
            id: NotSet,
            owner_id: Set(owner_id),
            calendar_id: Set(new.calendar_id),
            title: Set(title),
            description: Set(normalize_optional(new.description)),
            location: Set(normalize_optional(new.location)),
            starts_at: Set(new.starts_at),
            ends_at: Set(new.ends_at),
            all_day: Set(new.all_day),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(event_id = model.id, owner_id, "created event");
        Ok(model.into())
    }

    /// The time range is validated against the merged result, so moving one
    /// end alone is checked against the stored other end.
    ///
    /// # Errors
    /// `Unauthorized` without a principal, `NotFound` outside the caller's scope,
    /// `Validation` on bad input.
    #[instrument(skip(self, ctx, patch))]
    pub async fn update(
        &self,
        ctx: &SecurityContext,
        id: i64,
        patch: EventPatch,
    ) -> Result<Event, DomainError> {
        require_principal(ctx)?;
        let existing = self.find_visible(ctx, id).await?;

        let starts_at = patch.starts_at.unwrap_or(existing.starts_at);
        let ends_at = patch.ends_at.unwrap_or(existing.ends_at);
        let all_day = patch.all_day.unwrap_or(existing.all_day);
        validate_time_range(starts_at, ends_at, all_day)?;

        if let Some(calendar_id) = patch.calendar_id
            && calendar_id != existing.calendar_id
        {
            self.ensure_calendar_visible(ctx, calendar_id).await?;
        }

        let mut active: event::ActiveModel = existing.into();
        if let Some(calendar_id) = patch.calendar_id {
            active.calendar_id = Set(calendar_id);
        }
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
        if let Some(location) = patch.location {
            active.location = Set(normalize_optional(location));
        }
        active.starts_at = Set(starts_at);
        active.ends_at = Set(ends_at);
        active.all_day = Set(all_day);
        active.updated_at = Set(OffsetDateTime::now_utc());

        let model = active.update(&self.db).await?;
        tracing::info!(event_id = id, "updated event");
        Ok(model.into())
    }

    /// # Errors
    /// `Unauthorized` without a principal, `NotFound` when nothing visible to the
    /// caller was deleted.
    #[instrument(skip(self, ctx))]
    pub async fn delete(&self, ctx: &SecurityContext, id: i64) -> Result<(), DomainError> {
        require_principal(ctx)?;
        let scope = self.filter.scope(ResourceKind::Event, ctx)?;
        let res = event::Entity::delete_many()
            .secure()
            .scope_with(&scope)
            .and_id(id)
            .exec(&self.db)
            .await?;
        if res.rows_affected == 0 {
            return Err(DomainError::not_found("event", id));
        }
        tracing::info!(event_id = id, "deleted event");
        Ok(())
    }

    async fn find_visible(
        &self,
        ctx: &SecurityContext,
        id: i64,
    ) -> Result<event::Model, DomainError> {
        self.filter
            .apply(event::Entity::find().secure(), ResourceKind::Event, ctx)?
            .and_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("event", id))
    }

    async fn ensure_calendar_visible(
        &self,
        ctx: &SecurityContext,
        calendar_id: i64,
    ) -> Result<(), DomainError> {
        match self.calendars.get(ctx, calendar_id).await {
            Ok(_) => Ok(()),
            Err(DomainError::NotFound { .. }) => Err(DomainError::validation(
                "calendar_id",
                format!("calendar {calendar_id} does not exist"),
            )),
            Err(e) => Err(e),
        }
    }
}
