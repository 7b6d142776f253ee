use std::sync::Arc;

use calendar_authz::{ResourceKind, RowScopingFilter};
use calendar_db::secure::{SecureDeleteExt, SecureEntityExt};
use calendar_security::SecurityContext;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, NotSet, Order, Set,
};
use time::OffsetDateTime;
use tracing::instrument;

use super::{CalendarService, ImageService, require_principal};
use crate::domain::error::DomainError;
use crate::domain::model::{CalendarImage, NewCalendarImage};
use crate::domain::pagination::{Page, PageInfo, PageRequest};
use crate::infra::storage::entity::calendar_image;

/// Placement of images on calendars.
pub struct CalendarImageService {
    db: DatabaseConnection,
    filter: RowScopingFilter,
    calendars: Arc<CalendarService>,
    images: Arc<ImageService>,
}

impl CalendarImageService {
    pub(super) fn new(
        db: DatabaseConnection,
        filter: RowScopingFilter,
        calendars: Arc<CalendarService>,
        images: Arc<ImageService>,
    ) -> Self {
        Self {
            db,
            filter,
            calendars,
            images,
        }
    }

    /// # Errors
    /// `Unauthorized` for anonymous callers under enforced scoping.
    #[instrument(skip(self, ctx))]
    pub async fn list(
        &self,
        ctx: &SecurityContext,
        calendar_id: Option<i64>,
        page: PageRequest,
    ) -> Result<Page<CalendarImage>, DomainError> {
        let mut scoped = self.filter.apply(
            calendar_image::Entity::find().secure(),
            ResourceKind::CalendarImage,
            ctx,
        )?;
        if let Some(calendar_id) = calendar_id {
            scoped = scoped.filter(
                Condition::all().add(calendar_image::Column::CalendarId.eq(calendar_id)),
            );
        }
        let total = scoped.clone().count(&self.db).await?;
        let rows = scoped
            .order_by(calendar_image::Column::CalendarId, Order::Asc)
            .order_by(calendar_image::Column::Position, Order::Asc)
            .order_by(calendar_image::Column::Id, Order::Asc)
            .limit(page.per_page)
            .offset(page.offset())
            .all(&self.db)
            .await?;

        Ok(Page {
            items: rows.into_iter().map(CalendarImage::from).collect(),
            info: PageInfo::new(page, total),
        })
    }

    /// # Errors
    /// `NotFound` when the placement does not exist or is outside the caller's scope.
    #[instrument(skip(self, ctx))]
    pub async fn get(&self, ctx: &SecurityContext, id: i64) -> Result<CalendarImage, DomainError> {
        self.filter
            .apply(
                calendar_image::Entity::find().secure(),
                ResourceKind::CalendarImage,
                ctx,
            )?
            .and_id(id)
            .one(&self.db)
            .await?
            .map(CalendarImage::from)
            .ok_or_else(|| DomainError::not_found("calendar_image", id))
    }

    /// Both the calendar and the image must be visible to the caller.
    ///
    /// # Errors
    /// `Unauthorized` without a principal, `Validation` on a negative position
    /// or an invisible calendar or image.
    #[instrument(skip(self, ctx))]
    pub async fn create(
        &self,
        ctx: &SecurityContext,
        new: NewCalendarImage,
    ) -> Result<CalendarImage, DomainError> {
        let owner_id = require_principal(ctx)?;
        if new.position < 0 {
            return Err(DomainError::validation("position", "must not be negative"));
        }
        if let Err(e) = self.calendars.get(ctx, new.calendar_id).await {
            return Err(missing_reference(e, "calendar_id", new.calendar_id));
        }
        if let Err(e) = self.images.get(ctx, new.image_id).await {
            return Err(missing_reference(e, "image_id", new.image_id));
        }

        let model = calendar_image::ActiveModel {
            id: NotSet,
            owner_id: Set(owner_id),
            calendar_id: Set(new.calendar_id),
            image_id: Set(new.image_id),
            position: Set(new.position),
            created_at: Set(OffsetDateTime::now_utc()),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(calendar_image_id = model.id, owner_id, "placed image on calendar");
        Ok(model.into())
    }

    /// # Errors
    /// `Unauthorized` without a principal, `NotFound` when nothing visible to the
    /// caller was deleted.
    #[instrument(skip(self, ctx))]
    pub async fn delete(&self, ctx: &SecurityContext, id: i64) -> Result<(), DomainError> {
        require_principal(ctx)?;
        let scope = self.filter.scope(ResourceKind::CalendarImage, ctx)?;
        let res = calendar_image::Entity::delete_many()
            .secure()
            .scope_with(&scope)
            .and_id(id)
            .exec(&self.db)
            .await?;
        if res.rows_affected == 0 {
            return Err(DomainError::not_found("calendar_image", id));
        }
        tracing::info!(calendar_image_id = id, "removed image from calendar");
        Ok(())
    }
}

fn missing_reference(err: DomainError, field: &'static str, id: i64) -> DomainError {
    match err {
        DomainError::NotFound { entity_type, .. } => {
            DomainError::validation(field, format!("{entity_type} {id} does not exist"))
        }
        other => other,
    }
}
