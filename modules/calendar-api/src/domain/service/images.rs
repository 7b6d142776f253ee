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
use crate::domain::model::{Image, NewImage};
use crate::domain::pagination::{Page, PageInfo, PageRequest};
use crate::domain::validation::{validate_image_mime, validate_title};
use crate::infra::storage::entity::image;

/// Image metadata. Binary content is stored elsewhere.
pub struct ImageService {
    db: DatabaseConnection,
    filter: RowScopingFilter,
    config: Arc<ServiceConfig>,
}

impl ImageService {
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
    ) -> Result<Page<Image>, DomainError> {
        let query = self
            .filter
            .apply(image::Entity::find().secure(), ResourceKind::Image, ctx)?;
        let total = query.clone().count(&self.db).await?;
        let rows = query
            .order_by(image::Column::Id, Order::Asc)
            .limit(page.per_page)
            .offset(page.offset())
            .all(&self.db)
            .await?;

        Ok(Page {
            items: rows.into_iter().map(Image::from).collect(),
            info: PageInfo::new(page, total),
        })
    }

    /// # Errors
    /// `NotFound` when the image does not exist or is outside the caller's scope.
    #[instrument(skip(self, ctx))]
    pub async fn get(&self, ctx: &SecurityContext, id: i64) -> Result<Image, DomainError> {
        self.filter
            .apply(image::Entity::find().secure(), ResourceKind::Image, ctx)?
            .and_id(id)
            .one(&self.db)
            .await?
            .map(Image::from)
            .ok_or_else(|| DomainError::not_found("image", id))
    }

    /// # Errors
    /// `Unauthorized` without a principal, `Validation` on bad metadata.
    #[instrument(skip(self, ctx, new), fields(file_name = %new.file_name))]
    pub async fn create(&self, ctx: &SecurityContext, new: NewImage) -> Result<Image, DomainError> {
        let owner_id = require_principal(ctx)?;
        let file_name = validate_title("file_name", &new.file_name, self.config.max_title_length)?;
        let mime_type = validate_image_mime(&new.mime_type)?;
        if new.size_bytes < 0 {
            return Err(DomainError::validation("size_bytes", "must not be negative"));
        }

        let model = image::ActiveModel {
            id: NotSet,
            owner_id: Set(owner_id),
            file_name: Set(file_name),
            mime_type: Set(mime_type),
            size_bytes: Set(new.size_bytes),
            created_at: Set(OffsetDateTime::now_utc()),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(image_id = model.id, owner_id, "stored image metadata");
        Ok(model.into())
    }

    /// # Errors
    /// `Unauthorized` without a principal, `NotFound` when nothing visible to the
    /// caller was deleted.
    #[instrument(skip(self, ctx))]
    pub async fn delete(&self, ctx: &SecurityContext, id: i64) -> Result<(), DomainError> {
        require_principal(ctx)?;
        let scope = self.filter.scope(ResourceKind::Image, ctx)?;
        let res = image::Entity::delete_many()
            .secure()
            .scope_with(&scope)
            .and_id(id)
            .exec(&self.db)
            .await?;
        if res.rows_affected == 0 {
            return Err(DomainError::not_found("image", id));
        }
        tracing::info!(image_id = id, "deleted image");
        Ok(())
    }
}
