use calendar_security::{AccessScope, ScopeConstraint, ScopeFilter, ScopeValue};
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{ColumnTrait, Condition, EntityTrait};

use crate::secure::ScopableEntity;

/// Compiles `scope` into the `WHERE` clause for rows of `E`.
///
/// Each constraint becomes one branch of an `OR`; inside a branch every
/// filter must hold. A branch that names a property `E` cannot resolve is
/// dropped, and a scope with no branch left matches no rows.
pub fn build_scope_condition<E>(scope: &AccessScope) -> Condition
where
    E: ScopableEntity + EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    if scope.is_unconstrained() {
        return Condition::all();
    }

    let branches: Vec<Condition> = scope
        .constraints()
        .iter()
        .filter_map(branch::<E>)
        .collect();
    if branches.is_empty() {
        if !scope.is_deny_all() {
            tracing::debug!(
                constraints = scope.constraints().len(),
                "scope names no column of this entity; matching nothing"
            );
        }
        return match_nothing();
    }
    branches
        .into_iter()
        .fold(Condition::any(), |any, branch| any.add(branch))
}

fn match_nothing() -> Condition {
    Condition::all().add(Expr::value(false))
}

fn branch<E>(constraint: &ScopeConstraint) -> Option<Condition>
where
    E: ScopableEntity + EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    let predicates = constraint
        .filters()
        .iter()
        .map(predicate::<E>)
        .collect::<Option<Vec<_>>>()?;
    Some(
        predicates
            .into_iter()
            .fold(Condition::all(), |all, p| all.add(p)),
    )
}

fn predicate<E>(filter: &ScopeFilter) -> Option<SimpleExpr>
where
    E: ScopableEntity + EntityTrait,
    E::Column: ColumnTrait + Copy,
{
    let column = E::resolve_property(filter.property())?;
    Some(match filter {
        ScopeFilter::Eq(eq) => column.eq(bind(eq.value())),
        ScopeFilter::In(set) => column.is_in(set.values().iter().map(bind)),
    })
}

/// Scope value as a bound query parameter.
fn bind(value: &ScopeValue) -> sea_orm::Value {
    match value {
        ScopeValue::Int(n) => (*n).into(),
        ScopeValue::String(s) => s.clone().into(),
    }
}
