use calendar_db::secure::ScopableEntity;
use sea_orm::entity::prelude::*;
use time::OffsetDateTime;

use crate::domain::model::CalendarImage;

/// Placement of an image on a calendar.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "calendar_image")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub owner_id: i64,
    pub calendar_id: i64,
    pub image_id: i64,
    pub position: i32,
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
    #[sea_orm(
        belongs_to = "super::calendar::Entity",
        from = "Column::CalendarId",
        to = "super::calendar::Column::Id",
        on_delete = "Cascade"
    )]
    Calendar,
    #[sea_orm(
        belongs_to = "super::image::Entity",
        from = "Column::ImageId",
        to = "super::image::Column::Id",
        on_delete = "Cascade"
    )]
    Image,
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

impl From<Model> for CalendarImage {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            owner_id: m.owner_id,
            calendar_id: m.calendar_id,
            image_id: m.image_id,
            position: m.position,
            created_at: m.created_at,
        }
    }
}
