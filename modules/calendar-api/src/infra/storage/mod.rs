//! sea-orm persistence: entities and schema bootstrap.

pub mod entity;
pub mod schema;
