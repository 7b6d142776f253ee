#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use calendar_authz::AccessPolicyConfig;
use calendar_security::constants::{ROLE_ADMIN, ROLE_USER};
use calendar_security::{Principal, SecurityContext};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use time::macros::datetime;

use crate::config::ServiceConfig;
use crate::domain::model::{Calendar, Event, NewCalendar, NewEvent, NewUser};
use crate::domain::service::AppServices;
use crate::infra::storage::schema::create_tables;

pub const ADMIN_ID: i64 = 1;
pub const ALICE_ID: i64 = 2;
pub const BOB_ID: i64 = 3;

#[must_use]
pub fn admin_ctx() -> SecurityContext {
    SecurityContext::for_principal(Principal::new(
        ADMIN_ID,
        "admin",
        vec![ROLE_ADMIN.to_owned(), ROLE_USER.to_owned()],
    ))
}

#[must_use]
pub fn user_ctx(id: i64) -> SecurityContext {
    SecurityContext::for_principal(Principal::new(
        id,
        format!("user{id}"),
        vec![ROLE_USER.to_owned()],
    ))
}

/// Single-connection in-memory sqlite with the schema applied.
pub async fn inmem_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1);
    let db = Database::connect(opts)
        .await
        .expect("Failed to connect to in-memory database");
    create_tables(&db).await.expect("Failed to create tables");
    db
}

#[must_use]
pub fn build_services(db: DatabaseConnection) -> AppServices {
    AppServices::new(
        db,
        Arc::new(AccessPolicyConfig::default()),
        ServiceConfig::default(),
    )
}

#[must_use]
pub fn build_public_services(db: DatabaseConnection) -> AppServices {
    AppServices::new(
        db,
        Arc::new(AccessPolicyConfig::public_access()),
        ServiceConfig::default(),
    )
}

/// Services over a fresh database holding the admin, alice and bob accounts.
pub async fn seeded() -> (DatabaseConnection, AppServices) {
    let db = inmem_db().await;
    let services = build_services(db.clone());
    for (id, name) in [(ADMIN_ID, "admin"), (ALICE_ID, "alice"), (BOB_ID, "bob")] {
        services
            .users
            .provision(
                &admin_ctx(),
                NewUser {
                    id: Some(id),
                    email: format!("{name}@example.com"),
                    username: name.to_owned(),
                    roles: vec![ROLE_USER.to_owned()],
                },
            )
            .await
            .expect("seed user");
    }
    (db, services)
}

pub async fn seed_calendar(services: &AppServices, owner: i64, title: &str) -> Calendar {
    services
        .calendars
        .create(
            &user_ctx(owner),
            NewCalendar {
                title: title.to_owned(),
                description: None,
                color: "#336699".to_owned(),
            },
        )
        .await
        .expect("seed calendar")
}

pub async fn seed_event(
    services: &AppServices,
    owner: i64,
    calendar_id: i64,
    title: &str,
) -> Event {
    services
        .events
        .create(
            &user_ctx(owner),
            NewEvent {
                calendar_id,
                title: title.to_owned(),
                description: None,
                location: None,
                starts_at: datetime!(2026-03-02 09:00 UTC),
                ends_at: datetime!(2026-03-02 10:00 UTC),
                all_day: false,
            },
        )
        .await
        .expect("seed event")
}
