use calendar_db::secure::ScopableEntity;
use sea_orm::entity::prelude::*;
use time::OffsetDateTime;

use crate::domain::model::Event;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "event")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub owner_id: i64,
    pub calendar_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: OffsetDateTime,
    pub ends_at: OffsetDateTime,
    pub all_day: bool,
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
    #[sea_orm(
        belongs_to = "super::calendar::Entity",
        from = "Column::CalendarId",
        to = "super::calendar::Column::Id",
        on_delete = "Cascade"
    )]
    Calendar,
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

impl From<Model> for Event {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            owner_id: m.owner_id,
            calendar_id: m.calendar_id,
            title: m.title,
            description: m.description,
            location: m.location,
            starts_at: m.starts_at,
            ends_at: m.ends_at,
            all_day: m.all_day,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
