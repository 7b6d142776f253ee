use calendar_db::secure::ScopableEntity;
use sea_orm::entity::prelude::*;
use time::OffsetDateTime;

use crate::domain::model::Calendar;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "calendar")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub color: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Owner,
}

impl ActiveModelBehavior for ActiveModel {}

impl ScopableEntity for Entity {
    fn resource_col() -> Column {
        Column::Id
    }
    fn owner_col() -> Option<Column> {
        Some(Column::OwnerId)
    }
}

impl From<Model> for Calendar {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            owner_id: m.owner_id,
            title: m.title,
            description: m.description,
            color: m.color,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
