#![allow(clippy::unwrap_used, clippy::expect_used)]

use sea_orm::{ActiveModelTrait, NotSet, Set};
use time::OffsetDateTime;
use time::macros::datetime;

use crate::domain::error::DomainError;
use crate::domain::model::{
    CalendarPatch, EventPatch, EventQuery, NewCalendarImage, NewImage, NewUser, UserPatch,
};
use crate::domain::pagination::PageRequest;
use crate::infra::storage::entity::user;
use crate::test_support::{
    ADMIN_ID, ALICE_ID, BOB_ID, admin_ctx, build_public_services, seed_calendar, seed_event,
    seeded, user_ctx,
};
use calendar_security::SecurityContext;
use calendar_security::constants::ROLE_USER;

fn new_image(name: &str) -> NewImage {
    NewImage {
        file_name: name.to_owned(),
        mime_type: "image/png".to_owned(),
        size_bytes: 1024,
    }
}

#[tokio::test]
async fn owners_only_list_their_calendars() {
    let (_db, services) = seeded().await;
    seed_calendar(&services, ALICE_ID, "Work").await;
    seed_calendar(&services, ALICE_ID, "Home").await;
    seed_calendar(&services, BOB_ID, "Gym").await;

    let alice = services
        .calendars
        .list(&user_ctx(ALICE_ID), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(alice.info.total, 2);
    assert!(alice.items.iter().all(|c| c.owner_id == ALICE_ID));

    let bob = services
        .calendars
        .list(&user_ctx(BOB_ID), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(bob.items.len(), 1);
    assert_eq!(bob.items[0].title, "Gym");

    let admin = services
        .calendars
        .list(&admin_ctx(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(admin.info.total, 3);
}

#[tokio::test]
async fn anonymous_list_requires_authentication() {
    let (_db, services) = seeded().await;
    seed_calendar(&services, ALICE_ID, "Work").await;

    let err = services
        .events
        .list(
            &SecurityContext::anonymous(),
            EventQuery::default(),
            PageRequest::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Unauthorized), "got {err:?}");
}

#[tokio::test]
async fn public_access_mode_shows_everything() {
    let (db, services) = seeded().await;
    seed_calendar(&services, ALICE_ID, "Work").await;
    seed_calendar(&services, BOB_ID, "Gym").await;

    let public = build_public_services(db);
    let page = public
        .calendars
        .list(&SecurityContext::anonymous(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.info.total, 2);
}

#[tokio::test]
async fn public_access_mode_still_requires_principal_for_writes() {
    let (db, services) = seeded().await;
    let cal = seed_calendar(&services, ALICE_ID, "Work").await;
    let ev = seed_event(&services, ALICE_ID, cal.id, "Standup").await;
    let image = services
        .images
        .create(&user_ctx(ALICE_ID), new_image("cover.png"))
        .await
        .unwrap();
    let placement = services
        .calendar_images
        .create(
            &user_ctx(ALICE_ID),
            NewCalendarImage {
                calendar_id: cal.id,
                image_id: image.id,
                position: 0,
            },
        )
        .await
        .unwrap();

    let public = build_public_services(db);
    let anon = SecurityContext::anonymous();
    let patch = CalendarPatch {
        title: Some("Renamed".to_owned()),
        ..CalendarPatch::default()
    };
    let results = [
        public.calendars.update(&anon, cal.id, patch).await.map(|_| ()),
        public.events.update(&anon, ev.id, EventPatch::default()).await.map(|_| ()),
        public.calendar_images.delete(&anon, placement.id).await,
        public.events.delete(&anon, ev.id).await,
        public.images.delete(&anon, image.id).await,
        public.calendars.delete(&anon, cal.id).await,
    ];
    for res in results {
        assert!(matches!(res, Err(DomainError::Unauthorized)), "got {res:?}");
    }

    let untouched = services.calendars.get(&user_ctx(ALICE_ID), cal.id).await.unwrap();
    assert_eq!(untouched.title, "Work");
    services.events.get(&user_ctx(ALICE_ID), ev.id).await.unwrap();
    services.images.get(&user_ctx(ALICE_ID), image.id).await.unwrap();
    services
        .calendar_images
        .get(&user_ctx(ALICE_ID), placement.id)
        .await
        .unwrap();
}

#[tokio::test]
async fn foreign_calendar_is_not_found() {
    let (_db, services) = seeded().await;
    let bobs = seed_calendar(&services, BOB_ID, "Gym").await;
    let alice = user_ctx(ALICE_ID);

    let err = services.calendars.get(&alice, bobs.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));

    let patch = CalendarPatch {
        title: Some("Mine now".to_owned()),
        ..CalendarPatch::default()
    };
    let err = services
        .calendars
        .update(&alice, bobs.id, patch)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));

    let err = services.calendars.delete(&alice, bobs.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));

    let still_there = services
        .calendars
        .get(&user_ctx(BOB_ID), bobs.id)
        .await
        .unwrap();
    assert_eq!(still_there.title, "Gym");
}

#[tokio::test]
async fn calendar_update_normalizes_fields() {
    let (_db, services) = seeded().await;
    let cal = seed_calendar(&services, ALICE_ID, "Work").await;

    let updated = services
        .calendars
        .update(
            &user_ctx(ALICE_ID),
            cal.id,
            CalendarPatch {
                title: Some("  Office  ".to_owned()),
                description: Some(Some("weekdays".to_owned())),
                color: Some("#AABBCC".to_owned()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Office");
    assert_eq!(updated.description.as_deref(), Some("weekdays"));
    assert_eq!(updated.color, "#aabbcc");
    assert_eq!(updated.owner_id, ALICE_ID);
}

#[tokio::test]
async fn anonymous_create_is_unauthorized() {
    let (_db, services) = seeded().await;
    let err = services
        .images
        .create(&SecurityContext::anonymous(), new_image("a.png"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Unauthorized));
}

#[tokio::test]
async fn event_on_foreign_calendar_is_rejected() {
    let (_db, services) = seeded().await;
    let bobs = seed_calendar(&services, BOB_ID, "Gym").await;
    let alices = seed_calendar(&services, ALICE_ID, "Work").await;
    let ev = seed_event(&services, ALICE_ID, alices.id, "Standup").await;

    let err = services
        .events
        .update(
            &user_ctx(ALICE_ID),
            ev.id,
            EventPatch {
                calendar_id: Some(bobs.id),
                ..EventPatch::default()
            },
        )
        .await
        .unwrap_err();
    assert!(
        matches!(&err, DomainError::Validation { field, .. } if field == "calendar_id"),
        "got {err:?}"
    );
}

#[tokio::test]
async fn event_update_checks_merged_time_range() {
    let (_db, services) = seeded().await;
    let cal = seed_calendar(&services, ALICE_ID, "Work").await;
    let ev = seed_event(&services, ALICE_ID, cal.id, "Standup").await;

    let err = services
        .events
        .update(
            &user_ctx(ALICE_ID),
            ev.id,
            EventPatch {
                ends_at: Some(datetime!(2026-03-02 08:00 UTC)),
                ..EventPatch::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(&err, DomainError::Validation { field, .. } if field == "ends_at"));
}

#[tokio::test]
async fn event_list_filters_by_calendar_and_range() {
    let (_db, services) = seeded().await;
    let work = seed_calendar(&services, ALICE_ID, "Work").await;
    let home = seed_calendar(&services, ALICE_ID, "Home").await;
    seed_event(&services, ALICE_ID, work.id, "Standup").await;
    seed_event(&services, ALICE_ID, home.id, "Laundry").await;
    let bob_cal = seed_calendar(&services, BOB_ID, "Gym").await;
    seed_event(&services, BOB_ID, bob_cal.id, "Run").await;

    let alice = user_ctx(ALICE_ID);
    let all = services
        .events
        .list(&alice, EventQuery::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(all.info.total, 2);

    let work_only = services
        .events
        .list(
            &alice,
            EventQuery {
                calendar_id: Some(work.id),
                ..EventQuery::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(work_only.items.len(), 1);
    assert_eq!(work_only.items[0].title, "Standup");

    let later = services
        .events
        .list(
            &alice,
            EventQuery {
                from: Some(datetime!(2026-03-02 10:00 UTC)),
                ..EventQuery::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert!(later.items.is_empty());
}

#[tokio::test]
async fn calendar_image_needs_visible_image() {
    let (_db, services) = seeded().await;
    let cal = seed_calendar(&services, ALICE_ID, "Work").await;
    let bobs_image = services
        .images
        .create(&user_ctx(BOB_ID), new_image("bob.png"))
        .await
        .unwrap();
    let alices_image = services
        .images
        .create(&user_ctx(ALICE_ID), new_image("alice.png"))
        .await
        .unwrap();
    let alice = user_ctx(ALICE_ID);

    let err = services
        .calendar_images
        .create(
            &alice,
            NewCalendarImage {
                calendar_id: cal.id,
                image_id: bobs_image.id,
                position: 0,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(&err, DomainError::Validation { field, .. } if field == "image_id"));

    let placed = services
        .calendar_images
        .create(
            &alice,
            NewCalendarImage {
                calendar_id: cal.id,
                image_id: alices_image.id,
                position: 3,
            },
        )
        .await
        .unwrap();
    assert_eq!(placed.owner_id, ALICE_ID);

    let listed = services
        .calendar_images
        .list(&alice, Some(cal.id), PageRequest::default())
        .await
        .unwrap();
    let ids: Vec<i64> = listed.items.iter().map(|ci| ci.id).collect();
    assert_eq!(ids, vec![placed.id]);

    let err = services
        .calendar_images
        .get(&user_ctx(BOB_ID), placed.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn users_only_see_themselves() {
    let (_db, services) = seeded().await;
    let alice = user_ctx(ALICE_ID);

    let page = services
        .users
        .list(&alice, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.info.total, 1);
    assert_eq!(page.items[0].id, ALICE_ID);

    let err = services.users.get(&alice, BOB_ID).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));

    let me = services.users.me(&alice).await.unwrap();
    assert_eq!(me.username, "alice");
}

#[tokio::test]
async fn voter_blocks_admin_acting_on_other_accounts() {
    let (_db, services) = seeded().await;

    let err = services
        .users
        .get(&admin_ctx(), ALICE_ID)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));

    let own = services.users.get(&admin_ctx(), ADMIN_ID).await.unwrap();
    assert_eq!(own.id, ADMIN_ID);
}

#[tokio::test]
async fn user_update_rejects_taken_email() {
    let (_db, services) = seeded().await;
    let alice = user_ctx(ALICE_ID);

    let err = services
        .users
        .update(
            &alice,
            ALICE_ID,
            UserPatch {
                email: Some("BOB@example.com".to_owned()),
                username: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict { .. }));

    let updated = services
        .users
        .update(
            &alice,
            ALICE_ID,
            UserPatch {
                email: Some("Alice@Example.org".to_owned()),
                username: Some("alice2".to_owned()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.email, "alice@example.org");
    assert_eq!(updated.username, "alice2");
}

#[tokio::test]
async fn deleting_account_removes_owned_rows() {
    let (_db, services) = seeded().await;
    let cal = seed_calendar(&services, ALICE_ID, "Work").await;
    seed_event(&services, ALICE_ID, cal.id, "Standup").await;

    services
        .users
        .delete(&user_ctx(ALICE_ID), ALICE_ID)
        .await
        .unwrap();

    let calendars = services
        .calendars
        .list(&admin_ctx(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(calendars.info.total, 0);
    let events = services
        .events
        .list(&admin_ctx(), EventQuery::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(events.info.total, 0);
}

#[tokio::test]
async fn provisioning_is_admin_only() {
    let (_db, services) = seeded().await;
    let new = NewUser {
        id: None,
        email: "carol@example.com".to_owned(),
        username: "carol".to_owned(),
        roles: Vec::new(),
    };

    let err = services
        .users
        .provision(&user_ctx(ALICE_ID), new.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden));

    let carol = services.users.provision(&admin_ctx(), new.clone()).await.unwrap();
    assert!(carol.id > BOB_ID);

    let err = services.users.provision(&admin_ctx(), new).await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict { .. }));
}

#[tokio::test]
async fn pages_are_bounded() {
    let (_db, services) = seeded().await;
    for i in 0..5 {
        seed_calendar(&services, ALICE_ID, &format!("Cal {i}")).await;
    }
    let cfg = crate::config::ServiceConfig::default();
    let page = services
        .calendars
        .list(&user_ctx(ALICE_ID), PageRequest::new(Some(2), Some(2), &cfg))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].title, "Cal 2");
    assert_eq!(page.info.total, 5);
    assert_eq!(page.info.total_pages, 3);
}

#[tokio::test]
async fn unique_violation_on_write_is_conflict() {
    let (db, _services) = seeded().await;
    let now = OffsetDateTime::now_utc();

    let err = user::ActiveModel {
        id: NotSet,
        email: Set("alice@example.com".to_owned()),
        username: Set("alice-again".to_owned()),
        roles: Set(ROLE_USER.to_owned()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await
    .unwrap_err();

    let err = DomainError::from(err);
    assert!(matches!(err, DomainError::Conflict { .. }), "got {err:?}");
}
