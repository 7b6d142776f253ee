use calendar_security::pep_properties;
use sea_orm::EntityTrait;

/// Contract for entities that can be filtered by an [`AccessScope`].
///
/// Each entity names its identity column and, when it has one, the column
/// holding the owning principal. `resolve_property` maps authorization
/// property names onto columns; an unknown name yields `None`, which makes
/// the constraint using it match nothing.
///
/// # Example
/// ```rust,ignore
/// impl ScopableEntity for calendar::Entity {
///     fn resource_col() -> Self::Column {
///         calendar::Column::Id
///     }
///     fn owner_col() -> Option<Self::Column> {
///         Some(calendar::Column::OwnerId)
///     }
/// }
/// ```
///
/// [`AccessScope`]: calendar_security::AccessScope
pub trait ScopableEntity: EntityTrait {
    /// Column that stores the row's identifier (usually the primary key).
    fn resource_col() -> Self::Column;

    /// Column that stores the owning principal's identifier.
    ///
    /// `None` for entities without an owner (e.g. `user`, whose owner is itself).
    fn owner_col() -> Option<Self::Column>;

    /// Resolve an authorization property name to a column.
    fn resolve_property(property: &str) -> Option<Self::Column> {
        match property {
            p if p == pep_properties::RESOURCE_ID => Some(Self::resource_col()),
            p if p == pep_properties::OWNER_ID => Self::owner_col(),
            _ => None,
        }
    }
}
