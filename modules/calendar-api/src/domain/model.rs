//! Domain models.
//!
//! `owner_id` is never part of a `New*` or `*Patch` value: it is taken from
//! the acting principal at creation and never reassigned.

use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub roles: Vec<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    /// Explicit identifier, otherwise assigned by the database.
    pub id: Option<i64>,
    pub email: String,
    pub username: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calendar {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub color: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewCalendar {
    pub title: String,
    pub description: Option<String>,
    pub color: String,
}

#[derive(Debug, Clone, Default)]
pub struct CalendarPatch {
    pub title: Option<String>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarImage {
    pub id: i64,
    pub owner_id: i64,
    pub calendar_id: i64,
    pub image_id: i64,
    pub position: i32,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewCalendarImage {
    pub calendar_id: i64,
    pub image_id: i64,
    pub position: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
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

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub calendar_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: OffsetDateTime,
    pub ends_at: OffsetDateTime,
    pub all_day: bool,
}

#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    pub calendar_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub location: Option<Option<String>>,
    pub starts_at: Option<OffsetDateTime>,
    pub ends_at: Option<OffsetDateTime>,
    pub all_day: Option<bool>,
}

/// Filters for event listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventQuery {
    pub calendar_id: Option<i64>,
    /// Only events ending after this instant.
    pub from: Option<OffsetDateTime>,
    /// Only events starting before this instant.
    pub to: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub id: i64,
    pub owner_id: i64,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewImage {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
}
