use calendar_db::secure::ScopableEntity;
use sea_orm::entity::prelude::*;
use time::OffsetDateTime;

use crate::domain::model::Image;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "image")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub owner_id: i64,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub created_at: OffsetDateTime,
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

impl From<Model> for Image {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            owner_id: m.owner_id,
            file_name: m.file_name,
            mime_type: m.mime_type,
            size_bytes: m.size_bytes,
            created_at: m.created_at,
        }
    }
}
