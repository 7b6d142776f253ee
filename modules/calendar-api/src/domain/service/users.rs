use std::sync::Arc;

use calendar_authz::{
    AccessDecisionManager, Attribute, ResourceKind, ResourceRef, RowScopingFilter,
};
use calendar_db::secure::{SecureDeleteExt, SecureEntityExt};
use calendar_security::{AccessScope, SecurityContext};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, NotSet, Order, Set,
};
use time::OffsetDateTime;
use tracing::instrument;

use super::require_principal;
use crate::domain::error::DomainError;
use crate::domain::model::{NewUser, User, UserPatch};
use crate::domain::pagination::{Page, PageInfo, PageRequest};
use crate::domain::validation::{validate_email, validate_title};
use crate::infra::storage::entity::user;

const MAX_USERNAME_LENGTH: usize = 180;

/// User accounts.
///
/// Reads are row-scoped like every other resource; single-account actions
/// are also put to the decision manager, which only lets a user act on
/// their own account.
pub struct UserService {
    db: DatabaseConnection,
    filter: RowScopingFilter,
    decisions: Arc<AccessDecisionManager>,
}

impl UserService {
    pub(super) fn new(
        db: DatabaseConnection,
        filter: RowScopingFilter,
        decisions: Arc<AccessDecisionManager>,
    ) -> Self {
        Self {
            db,
            filter,
            decisions,
        }
    }

    /// # Errors
    /// `Unauthorized` for anonymous callers under enforced scoping.
    #[instrument(skip(self, ctx))]
    pub async fn list(
        &self,
        ctx: &SecurityContext,
        page: PageRequest,
    ) -> Result<Page<User>, DomainError> {
        let query = self
            .filter
            .apply(user::Entity::find().secure(), ResourceKind::User, ctx)?;
        let total = query.clone().count(&self.db).await?;
        let rows = query
            .order_by(user::Column::Id, Order::Asc)
            .limit(page.per_page)
            .offset(page.offset())
            .all(&self.db)
            .await?;

        Ok(Page {
            items: rows.into_iter().map(User::from).collect(),
            info: PageInfo::new(page, total),
        })
    }

    /// # Errors
    /// `NotFound` outside the caller's scope, `Forbidden` when the voters deny.
    #[instrument(skip(self, ctx))]
    pub async fn get(&self, ctx: &SecurityContext, id: i64) -> Result<User, DomainError> {
        let row = self.find_visible(ctx, id).await?;
        self.decisions
            .deny_unless_granted(ctx, Attribute::USER_READ, &ResourceRef::user(id))?;
        Ok(row.into())
    }

    /// The caller's own account.
    ///
    /// # Errors
    /// `Unauthorized` for anonymous callers, `NotFound` if the principal has
    /// no stored account.
    #[instrument(skip(self, ctx))]
    pub async fn me(&self, ctx: &SecurityContext) -> Result<User, DomainError> {
        let id = require_principal(ctx)?;
        self.find_visible(ctx, id).await.map(User::from)
    }

    /// # Errors
    /// `NotFound` outside the caller's scope, `Forbidden` when the voters deny,
    /// `Validation` on bad input, `Conflict` on a taken email.
    #[instrument(skip(self, ctx, patch))]
    pub async fn update(
        &self,
        ctx: &SecurityContext,
        id: i64,
        patch: UserPatch,
    ) -> Result<User, DomainError> {
        let existing = self.find_visible(ctx, id).await?;
        self.decisions
            .deny_unless_granted(ctx, Attribute::USER_UPDATE, &ResourceRef::user(id))?;

        let mut active: user::ActiveModel = existing.into();
        if let Some(email) = patch.email {
            let email = validate_email(&email)?;
            self.ensure_email_free(&email, Some(id)).await?;
            active.email = Set(email);
        }
        if let Some(username) = patch.username {
            active.username = Set(validate_title("username", &username, MAX_USERNAME_LENGTH)?);
        }
        active.updated_at = Set(OffsetDateTime::now_utc());

        let model = active.update(&self.db).await?;
        tracing::info!(user_id = id, "updated user");
        Ok(model.into())
    }

    /// Deleting an account cascades to everything it owns.
    ///
    /// # Errors
    /// `NotFound` outside the caller's scope, `Forbidden` when the voters deny.
    #[instrument(skip(self, ctx))]
    pub async fn delete(&self, ctx: &SecurityContext, id: i64) -> Result<(), DomainError> {
        self.find_visible(ctx, id).await?;
        self.decisions
            .deny_unless_granted(ctx, Attribute::USER_DELETE, &ResourceRef::user(id))?;

        let scope = self.filter.scope(ResourceKind::User, ctx)?;
        let res = user::Entity::delete_many()
            .secure()
            .scope_with(&scope)
            .and_id(id)
            .exec(&self.db)
            .await?;
        if res.rows_affected == 0 {
            return Err(DomainError::not_found("user", id));
        }
        tracing::info!(user_id = id, "deleted user");
        Ok(())
    }

    /// Create an account. Administrators only; not exposed over REST.
    ///
    /// # Errors
    /// `Forbidden` for non-administrators, `Validation` on bad input,
    /// `Conflict` on a taken email or identifier.
    #[instrument(skip(self, ctx, new), fields(email = %new.email))]
    pub async fn provision(
        &self,
        ctx: &SecurityContext,
        new: NewUser,
    ) -> Result<User, DomainError> {
        if !ctx.is_admin() {
            return Err(DomainError::Forbidden);
        }
        let email = validate_email(&new.email)?;
        let username = validate_title("username", &new.username, MAX_USERNAME_LENGTH)?;
        self.ensure_email_free(&email, None).await?;
        if let Some(id) = new.id
            && user::Entity::find()
                .secure()
                .scope_with(&AccessScope::allow_all())
                .and_id(id)
                .one(&self.db)
                .await?
                .is_some()
        {
            return Err(DomainError::conflict(format!("user {id} already exists")));
        }

        let now = OffsetDateTime::now_utc();
        let model = user::ActiveModel {
            id: new.id.map_or(NotSet, Set),
            email: Set(email),
            username: Set(username),
            roles: Set(user::join_roles(&new.roles)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(user_id = model.id, "provisioned user");
        Ok(model.into())
    }

    async fn find_visible(
        &self,
        ctx: &SecurityContext,
        id: i64,
    ) -> Result<user::Model, DomainError> {
        self.filter
            .apply(user::Entity::find().secure(), ResourceKind::User, ctx)?
            .and_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("user", id))
    }

    /// Email uniqueness spans all accounts, not only the visible ones.
    async fn ensure_email_free(&self, email: &str, except: Option<i64>) -> Result<(), DomainError> {
        let mut cond = Condition::all().add(user::Column::Email.eq(email));
        if let Some(id) = except {
            cond = cond.add(user::Column::Id.ne(id));
        }
        let taken = user::Entity::find()
            .secure()
            .scope_with(&AccessScope::allow_all())
            .filter(cond)
            .count(&self.db)
            .await?;
        if taken > 0 {
            return Err(DomainError::conflict(format!("email '{email}' is already in use")));
        }
        Ok(())
    }
}
