//! Action attributes checked by voters, e.g. `EVENT_UPDATE` or `USER_READ`.

use std::fmt;
use std::str::FromStr;

use crate::resource::ResourceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

impl Action {
    pub const ALL: [Self; 4] = [Self::Create, Self::Read, Self::Update, Self::Delete];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Read => "READ",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

/// An action on a resource type.
///
/// Only the enumerated combinations exist: create/read/update/delete for
/// calendar, calendar image, event and image; read/update/delete for user.
/// Users are provisioned separately, so `USER_CREATE` is not an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Attribute {
    kind: ResourceKind,
    action: Action,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown attribute '{0}'")]
pub struct ParseAttributeError(pub String);

impl Attribute {
    pub const CALENDAR_CREATE: Self = Self::of(ResourceKind::Calendar, Action::Create);
    pub const CALENDAR_READ: Self = Self::of(ResourceKind::Calendar, Action::Read);
    pub const CALENDAR_UPDATE: Self = Self::of(ResourceKind::Calendar, Action::Update);
    pub const CALENDAR_DELETE: Self = Self::of(ResourceKind::Calendar, Action::Delete);
    pub const CALENDAR_IMAGE_CREATE: Self = Self::of(ResourceKind::CalendarImage, Action::Create);
    pub const CALENDAR_IMAGE_READ: Self = Self::of(ResourceKind::CalendarImage, Action::Read);
    pub const CALENDAR_IMAGE_UPDATE: Self = Self::of(ResourceKind::CalendarImage, Action::Update);
    pub const CALENDAR_IMAGE_DELETE: Self = Self::of(ResourceKind::CalendarImage, Action::Delete);
    pub const EVENT_CREATE: Self = Self::of(ResourceKind::Event, Action::Create);
    pub const EVENT_READ: Self = Self::of(ResourceKind::Event, Action::Read);
    pub const EVENT_UPDATE: Self = Self::of(ResourceKind::Event, Action::Update);
    pub const EVENT_DELETE: Self = Self::of(ResourceKind::Event, Action::Delete);
    pub const IMAGE_CREATE: Self = Self::of(ResourceKind::Image, Action::Create);
    pub const IMAGE_READ: Self = Self::of(ResourceKind::Image, Action::Read);
    pub const IMAGE_UPDATE: Self = Self::of(ResourceKind::Image, Action::Update);
    pub const IMAGE_DELETE: Self = Self::of(ResourceKind::Image, Action::Delete);
    pub const USER_READ: Self = Self::of(ResourceKind::User, Action::Read);
    pub const USER_UPDATE: Self = Self::of(ResourceKind::User, Action::Update);
    pub const USER_DELETE: Self = Self::of(ResourceKind::User, Action::Delete);

    const fn of(kind: ResourceKind, action: Action) -> Self {
        Self { kind, action }
    }

    /// Build an attribute, rejecting combinations outside the enumerated set.
    #[must_use]
    pub fn new(kind: ResourceKind, action: Action) -> Option<Self> {
        match (kind, action) {
            (ResourceKind::User, Action::Create) => None,
            _ => Some(Self::of(kind, action)),
        }
    }

    #[must_use]
    pub const fn kind(self) -> ResourceKind {
        self.kind
    }

    #[must_use]
    pub const fn action(self) -> Action {
        self.action
    }

    /// Whether this attribute targets the `user` resource.
    #[must_use]
    pub fn is_user_attribute(self) -> bool {
        self.kind == ResourceKind::User
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}",
            self.kind.as_str().to_ascii_uppercase(),
            self.action.as_str()
        )
    }
}

impl FromStr for Attribute {
    type Err = ParseAttributeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseAttributeError(s.to_owned());
        let (prefix, suffix) = s.rsplit_once('_').ok_or_else(err)?;
        let action = Action::ALL
            .into_iter()
            .find(|a| a.as_str() == suffix)
            .ok_or_else(err)?;
        let kind = ResourceKind::ALL
            .into_iter()
            .find(|k| k.as_str().to_ascii_uppercase() == prefix)
            .ok_or_else(err)?;
        Self::new(kind, action).ok_or_else(err)
    }
}
