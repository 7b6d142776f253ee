//! Protected resource types and their ownership keys.

use std::fmt;

use calendar_security::pep_properties;

/// A resource type subject to row scoping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Calendar,
    CalendarImage,
    Event,
    Image,
    User,
}

impl ResourceKind {
    pub const ALL: [Self; 5] = [
        Self::Calendar,
        Self::CalendarImage,
        Self::Event,
        Self::Image,
        Self::User,
    ];

    /// Ownership key per resource type: the property compared against the
    /// caller's identifier. A `user` row is owned by itself.
    pub const OWNERSHIP: [(Self, &'static str); 5] = [
        (Self::Calendar, pep_properties::OWNER_ID),
        (Self::CalendarImage, pep_properties::OWNER_ID),
        (Self::Event, pep_properties::OWNER_ID),
        (Self::Image, pep_properties::OWNER_ID),
        (Self::User, pep_properties::RESOURCE_ID),
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Calendar => "calendar",
            Self::CalendarImage => "calendar_image",
            Self::Event => "event",
            Self::Image => "image",
            Self::User => "user",
        }
    }

    /// Resolve a resource-type tag. `calendar-image` is accepted as an alias.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "calendar-image" => Some(Self::CalendarImage),
            _ => Self::ALL.into_iter().find(|k| k.as_str() == tag),
        }
    }

    /// The property that ties a row of this type to its owner.
    #[must_use]
    pub fn ownership_property(self) -> &'static str {
        Self::OWNERSHIP
            .iter()
            .find(|(kind, _)| *kind == self)
            .map_or(pep_properties::OWNER_ID, |&(_, prop)| prop)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for ResourceKind {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// A concrete resource instance, identified by type and id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub id: i64,
}

impl ResourceRef {
    #[must_use]
    pub const fn new(kind: ResourceKind, id: i64) -> Self {
        Self { kind, id }
    }

    #[must_use]
    pub const fn user(id: i64) -> Self {
        Self::new(ResourceKind::User, id)
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.id)
    }
}
