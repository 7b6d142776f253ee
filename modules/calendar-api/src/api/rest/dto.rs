//! Wire types. Timestamps are RFC 3339.

use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

use crate::domain::model::{
    Calendar, CalendarImage, CalendarPatch, Event, EventPatch, EventQuery, Image, NewCalendar,
    NewCalendarImage, NewEvent, NewImage, User, UserPatch,
};

const DEFAULT_CALENDAR_COLOR: &str = "#3788d8";

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

fn default_color() -> String {
    DEFAULT_CALENDAR_COLOR.to_owned()
}

// ==================== Queries ====================

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct EventListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub calendar_id: Option<i64>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub from: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub to: Option<OffsetDateTime>,
}

impl EventListQuery {
    #[must_use]
    pub fn filters(&self) -> EventQuery {
        EventQuery {
            calendar_id: self.calendar_id,
            from: self.from,
            to: self.to,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CalendarImageListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub calendar_id: Option<i64>,
}

// ==================== Requests ====================

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCalendarReq {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_color")]
    pub color: String,
}

impl From<CreateCalendarReq> for NewCalendar {
    fn from(r: CreateCalendarReq) -> Self {
        Self {
            title: r.title,
            description: r.description,
            color: r.color,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateCalendarReq {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub color: Option<String>,
}

impl From<UpdateCalendarReq> for CalendarPatch {
    fn from(r: UpdateCalendarReq) -> Self {
        Self {
            title: r.title,
            description: r.description,
            color: r.color,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateEventReq {
    pub calendar_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub starts_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub ends_at: OffsetDateTime,
    #[serde(default)]
    pub all_day: bool,
}

impl From<CreateEventReq> for NewEvent {
    fn from(r: CreateEventReq) -> Self {
        Self {
            calendar_id: r.calendar_id,
            title: r.title,
            description: r.description,
            location: r.location,
            starts_at: r.starts_at,
            ends_at: r.ends_at,
            all_day: r.all_day,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateEventReq {
    #[serde(default)]
    pub calendar_id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub location: Option<Option<String>>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub starts_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub ends_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub all_day: Option<bool>,
}

impl From<UpdateEventReq> for EventPatch {
    fn from(r: UpdateEventReq) -> Self {
        Self {
            calendar_id: r.calendar_id,
            title: r.title,
            description: r.description,
            location: r.location,
            starts_at: r.starts_at,
            ends_at: r.ends_at,
            all_day: r.all_day,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateImageReq {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
}

impl From<CreateImageReq> for NewImage {
    fn from(r: CreateImageReq) -> Self {
        Self {
            file_name: r.file_name,
            mime_type: r.mime_type,
            size_bytes: r.size_bytes,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCalendarImageReq {
    pub calendar_id: i64,
    pub image_id: i64,
    #[serde(default)]
    pub position: i32,
}

impl From<CreateCalendarImageReq> for NewCalendarImage {
    fn from(r: CreateCalendarImageReq) -> Self {
        Self {
            calendar_id: r.calendar_id,
            image_id: r.image_id,
            position: r.position,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserReq {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl From<UpdateUserReq> for UserPatch {
    fn from(r: UpdateUserReq) -> Self {
        Self {
            email: r.email,
            username: r.username,
        }
    }
}

// ==================== Responses ====================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarDto {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub color: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Calendar> for CalendarDto {
    fn from(c: Calendar) -> Self {
        Self {
            id: c.id,
            owner_id: c.owner_id,
            title: c.title,
            description: c.description,
            color: c.color,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarImageDto {
    pub id: i64,
    pub owner_id: i64,
    pub calendar_id: i64,
    pub image_id: i64,
    pub position: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<CalendarImage> for CalendarImageDto {
    fn from(c: CalendarImage) -> Self {
        Self {
            id: c.id,
            owner_id: c.owner_id,
            calendar_id: c.calendar_id,
            image_id: c.image_id,
            position: c.position,
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDto {
    pub id: i64,
    pub owner_id: i64,
    pub calendar_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub starts_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub ends_at: OffsetDateTime,
    pub all_day: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Event> for EventDto {
    fn from(e: Event) -> Self {
        Self {
            id: e.id,
            owner_id: e.owner_id,
            calendar_id: e.calendar_id,
            title: e.title,
            description: e.description,
            location: e.location,
            starts_at: e.starts_at,
            ends_at: e.ends_at,
            all_day: e.all_day,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageDto {
    pub id: i64,
    pub owner_id: i64,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Image> for ImageDto {
    fn from(i: Image) -> Self {
        Self {
            id: i.id,
            owner_id: i.owner_id,
            file_name: i.file_name,
            mime_type: i.mime_type,
            size_bytes: i.size_bytes,
            created_at: i.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub roles: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            username: u.username,
            roles: u.roles,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn calendar_patch_distinguishes_null_from_absent() {
        let absent: UpdateCalendarReq = serde_json::from_str(r#"{"title":"x"}"#).unwrap();
        assert_eq!(absent.description, None);

        let cleared: UpdateCalendarReq = serde_json::from_str(r#"{"description":null}"#).unwrap();
        assert_eq!(cleared.description, Some(None));

        let set: UpdateCalendarReq = serde_json::from_str(r#"{"description":"d"}"#).unwrap();
        assert_eq!(set.description, Some(Some("d".to_owned())));
    }

    #[test]
    fn create_calendar_defaults_color() {
        let req: CreateCalendarReq = serde_json::from_str(r#"{"title":"Work"}"#).unwrap();
        assert_eq!(req.color, DEFAULT_CALENDAR_COLOR);
    }

    #[test]
    fn event_request_reads_rfc3339() {
        let req: CreateEventReq = serde_json::from_str(
            r#"{"calendar_id":1,"title":"t","starts_at":"2026-03-02T09:00:00Z","ends_at":"2026-03-02T10:00:00+01:00"}"#,
        )
        .unwrap();
        assert!(!req.all_day);
        assert_eq!(req.starts_at, req.ends_at);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let res: Result<CreateImageReq, _> = serde_json::from_str(
            r#"{"file_name":"a.png","mime_type":"image/png","size_bytes":1,"owner_id":9}"#,
        );
        assert!(res.is_err());
    }
}
