use calendar_db::secure::ScopableEntity;
use sea_orm::entity::prelude::*;
use time::OffsetDateTime;

use crate::domain::model::User;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub email: String,
    pub username: String,
    /// Comma-separated role names.
    pub roles: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// A user row is its own ownership key.
impl ScopableEntity for Entity {
    fn resource_col() -> Column {
        Column::Id
    }
    fn owner_col() -> Option<Column> {
        None
    }
}

#[must_use]
pub fn join_roles(roles: &[String]) -> String {
    roles.join(",")
}

#[must_use]
pub fn split_roles(roles: &str) -> Vec<String> {
    roles
        .split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

impl From<Model> for User {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            roles: split_roles(&m.roles),
            email: m.email,
            username: m.username,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
