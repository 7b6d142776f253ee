use std::marker::PhantomData;

use calendar_security::AccessScope;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, sea_query::Expr};

use crate::secure::cond::build_scope_condition;
use crate::secure::select::{Scoped, Unscoped};
use crate::secure::{ScopableEntity, ScopeError};

/// A type-safe wrapper around `SeaORM`'s `DeleteMany` that enforces scoping.
///
/// # Example
/// ```ignore
/// use calendar_db::secure::SecureDeleteExt;
///
/// let result = image::Entity::delete_many()
///     .secure()            // SecureDeleteMany<E, Unscoped>
///     .scope_with(&scope)  // SecureDeleteMany<E, Scoped>
///     .and_id(image_id)
///     .exec(conn)
///     .await?;
/// ```
#[derive(Clone, Debug)]
pub struct SecureDeleteMany<E: EntityTrait, S> {
    pub(crate) inner: sea_orm::DeleteMany<E>,
    pub(crate) _state: PhantomData<S>,
}

/// Extension trait to convert a regular `SeaORM` `DeleteMany` into a `SecureDeleteMany`.
pub trait SecureDeleteExt<E: EntityTrait>: Sized {
    /// Convert this delete operation into a secure (unscoped) delete.
    /// You must call `.scope_with()` before executing.
    fn secure(self) -> SecureDeleteMany<E, Unscoped>;
}

impl<E> SecureDeleteExt<E> for sea_orm::DeleteMany<E>
where
    E: EntityTrait,
{
    fn secure(self) -> SecureDeleteMany<E, Unscoped> {
        SecureDeleteMany {
            inner: self,
            _state: PhantomData,
        }
    }
}

impl<E> SecureDeleteMany<E, Unscoped>
where
    E: ScopableEntity + EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    /// Apply access control scope to this delete, transitioning to the `Scoped` state.
    /// A deny-all scope deletes nothing.
    #[must_use]
    pub fn scope_with(self, scope: &AccessScope) -> SecureDeleteMany<E, Scoped> {
        let cond = build_scope_condition::<E>(scope);
        SecureDeleteMany {
            inner: self.inner.filter(cond),
            _state: PhantomData,
        }
    }
}

impl<E> SecureDeleteMany<E, Scoped>
where
    E: EntityTrait,
{
    /// Add additional filters to the scoped delete.
    #[must_use]
    pub fn filter(mut self, filter: sea_orm::Condition) -> Self {
        self.inner = QueryFilter::filter(self.inner, filter);
        self
    }

    /// Restrict the delete to a single resource.
    #[must_use]
    pub fn and_id(self, id: i64) -> Self
    where
        E: ScopableEntity,
        E::Column: ColumnTrait + Copy,
    {
        self.filter(sea_orm::Condition::all().add(Expr::col(E::resource_col()).eq(id)))
    }

    /// Execute the delete operation.
    ///
    /// # Errors
    /// Returns `ScopeError::Db` if the database operation fails.
    pub async fn exec(
        self,
        conn: &impl ConnectionTrait,
    ) -> Result<sea_orm::DeleteResult, ScopeError> {
        Ok(self.inner.exec(conn).await?)
    }
}
