use std::marker::PhantomData;

use calendar_security::AccessScope;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, sea_query::Expr,
};

use crate::secure::cond::build_scope_condition;
use crate::secure::{ScopableEntity, ScopeError};

/// Typestate marker: query has not yet been scoped.
/// Cannot execute queries in this state.
#[derive(Debug, Clone, Copy)]
pub struct Unscoped;

/// Typestate marker: query has been scoped with access control.
#[derive(Debug, Clone, Copy)]
pub struct Scoped;

/// A type-safe wrapper around `SeaORM`'s `Select` that enforces scoping.
///
/// Queries cannot be executed until `.scope_with()` has been called.
///
/// # Example
/// ```rust,ignore
/// use calendar_db::secure::SecureEntityExt;
///
/// let scope = AccessScope::for_property(pep_properties::OWNER_ID, principal_id);
/// let calendars = calendar::Entity::find()
///     .secure()           // SecureSelect<E, Unscoped>
///     .scope_with(&scope) // SecureSelect<E, Scoped>
///     .all(conn)          // now executable
///     .await?;
/// ```
#[must_use]
#[derive(Clone, Debug)]
pub struct SecureSelect<E: EntityTrait, S> {
    pub(crate) inner: sea_orm::Select<E>,
    pub(crate) _state: PhantomData<S>,
}

/// Extension trait to convert a regular `SeaORM` `Select` into a `SecureSelect`.
pub trait SecureEntityExt<E: EntityTrait>: Sized {
    /// Convert this select query into a secure (unscoped) select.
    /// You must call `.scope_with()` before executing the query.
    fn secure(self) -> SecureSelect<E, Unscoped>;
}

impl<E> SecureEntityExt<E> for sea_orm::Select<E>
where
    E: EntityTrait,
{
    fn secure(self) -> SecureSelect<E, Unscoped> {
        SecureSelect {
            inner: self,
            _state: PhantomData,
        }
    }
}

impl<E> SecureSelect<E, Unscoped>
where
    E: ScopableEntity + EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    /// Apply access control scope to this query, transitioning to the `Scoped` state.
    ///
    /// - Deny-all scope → no rows
    /// - Allow-all scope → no additional predicate
    /// - Otherwise → the scope's predicate is AND-ed onto the query
    pub fn scope_with(self, scope: &AccessScope) -> SecureSelect<E, Scoped> {
        let cond = build_scope_condition::<E>(scope);
        SecureSelect {
            inner: self.inner.filter(cond),
            _state: PhantomData,
        }
    }
}

impl<E> SecureSelect<E, Scoped>
where
    E: EntityTrait,
{
    /// Execute the query and return all matching results.
    ///
    /// # Errors
    /// Returns `ScopeError::Db` if the database query fails.
    pub async fn all(self, conn: &impl ConnectionTrait) -> Result<Vec<E::Model>, ScopeError> {
        Ok(self.inner.all(conn).await?)
    }

    /// Execute the query and return at most one result.
    ///
    /// # Errors
    /// Returns `ScopeError::Db` if the database query fails.
    pub async fn one(self, conn: &impl ConnectionTrait) -> Result<Option<E::Model>, ScopeError> {
        Ok(self.inner.one(conn).await?)
    }

    /// Execute the query and return the number of matching results.
    ///
    /// # Errors
    /// Returns `ScopeError::Db` if the database query fails.
    pub async fn count(self, conn: &impl ConnectionTrait) -> Result<u64, ScopeError>
    where
        E::Model: sea_orm::FromQueryResult + Send + Sync,
    {
        Ok(self.inner.count(conn).await?)
    }

    /// Narrow the scoped query to a single resource.
    ///
    /// # Example
    /// ```ignore
    /// let event = event::Entity::find()
    ///     .secure()
    ///     .scope_with(&scope)
    ///     .and_id(event_id)
    ///     .one(conn)
    ///     .await?;
    /// ```
    pub fn and_id(self, id: i64) -> Self
    where
        E: ScopableEntity,
        E::Column: ColumnTrait + Copy,
    {
        let cond = sea_orm::Condition::all().add(Expr::col(E::resource_col()).eq(id));
        self.filter(cond)
    }

    /// Add additional filters to the scoped query.
    /// The scope conditions remain in place.
    pub fn filter(mut self, filter: sea_orm::Condition) -> Self {
        self.inner = QueryFilter::filter(self.inner, filter);
        self
    }

    /// Add ordering to the scoped query.
    pub fn order_by<C>(mut self, col: C, order: sea_orm::Order) -> Self
    where
        C: sea_orm::IntoSimpleExpr,
    {
        self.inner = QueryOrder::order_by(self.inner, col, order);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.inner = QuerySelect::limit(self.inner, limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.inner = QuerySelect::offset(self.inner, offset);
        self
    }
}
