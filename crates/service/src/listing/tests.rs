use std::sync::Arc;

use models::profession::ProfessionType;
use models::user::Role;
use models::category;
use proptest::prelude::*;
use uuid::Uuid;

use super::business::{BusinessDraft, BusinessPatch};
use super::event::{EventDraft, EventPatch, EventPatchForm};
use super::profession::{ProfessionDraft, ProfessionPatch};
use crate::auth::AuthConfig;
use crate::caller::Caller;
use crate::directory::MemoryDirectory;
use crate::errors::ServiceError;
use crate::review_service::ReviewInput;
use crate::Services;

struct Fixture {
    dir: Arc<MemoryDirectory>,
    svc: Services,
    owner: Caller,
    other: Caller,
    admin: Caller,
    organizer: Caller,
    professional: Caller,
    category: category::Model,
}

fn fixture() -> Fixture {
    let dir = Arc::new(MemoryDirectory::default());
    let mk = |name: &str, role: Role| {
        let u = dir.insert_user(name, &format!("{name}@example.com"), role).unwrap();
        Caller::new(u.id, u.role)
    };
    let owner = mk("owner", Role::BusinessOwner);
    let other = mk("other", Role::User);
    let admin = mk("admin", Role::Admin);
    let organizer = mk("organizer", Role::EventOrganizer);
    let professional = mk("pro", Role::Professional);
    let category = dir.insert_category("Food").unwrap();
    let svc = Services::in_memory_with(dir.clone(), AuthConfig::new("test-secret"));
    Fixture { dir, svc, owner, other, admin, organizer, professional, category }
}

fn cafe(category_id: Uuid) -> BusinessDraft {
    BusinessDraft {
        name: Some("Joe's Cafe".into()),
        phone: Some("555-1000".into()),
        address: Some("1 Main St".into()),
        category_id: Some(category_id.to_string()),
        ..BusinessDraft::default()
    }
}

fn gig(category_id: Uuid) -> EventDraft {
    EventDraft {
        name: Some("Jazz Night".into()),
        description: Some("Live music".into()),
        location: Some("Hall A".into()),
        start_date: Some("2030-05-01T19:00:00Z".into()),
        end_date: Some("2030-05-01T23:00:00+02:00".into()),
        category_id: Some(category_id.to_string()),
    }
}

fn doctor(specialties: &[&str], location: &str) -> ProfessionDraft {
    ProfessionDraft {
        name: Some("Dr. Ada".into()),
        profession_type: Some("doctor".into()),
        location: Some(location.into()),
        specialties: Some(specialties.iter().map(|s| s.to_string()).collect()),
        ..ProfessionDraft::default()
    }
}

const IMAGE: &str = "uploads/business_images/1-1.png";

fn violated_fields(err: ServiceError) -> Vec<String> {
    match err {
        ServiceError::Validation(list) => list.into_iter().map(|v| v.field).collect(),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn business_create_binds_owner_and_category() {
    let f = fixture();
    let b = f.svc.businesses.create(&f.owner, cafe(f.category.id), Some(IMAGE.into())).await.unwrap();
    assert_eq!(b.owner_id, f.owner.id);
    assert_eq!(b.category_id, f.category.id);
    assert!(b.is_active);
    assert_eq!(b.image, IMAGE);

    let detail = f.svc.businesses.find_one(b.id).await.unwrap();
    assert_eq!(detail.owner.map(|o| o.id), Some(f.owner.id));
    assert_eq!(detail.category.map(|c| c.id), Some(f.category.id));
    assert_eq!(detail.reviews.map(|r| r.len()), Some(0));
}

#[tokio::test]
async fn business_create_with_unknown_category_persists_nothing() {
    let f = fixture();
    let err = f.svc.businesses.create(&f.owner, cafe(Uuid::new_v4()), Some(IMAGE.into())).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound("Category")));
    assert!(f.svc.businesses.find_all(true).await.unwrap().is_empty());
}

#[tokio::test]
async fn business_create_reports_every_violation_including_image() {
    let f = fixture();
    let err = f.svc.businesses.create(&f.owner, BusinessDraft::default(), None).await.unwrap_err();
    assert_eq!(violated_fields(err), ["name", "phone", "address", "category_id", "image"]);

    let err = f.svc.businesses.create(&f.owner, cafe(f.category.id), None).await.unwrap_err();
    match err {
        ServiceError::Validation(list) => assert_eq!(list[0].message, "Image is required"),
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn soft_deleted_category_is_not_resolvable() {
    let f = fixture();
    f.svc.categories.remove(f.category.id, &f.admin).await.unwrap();
    let err = f.svc.businesses.create(&f.owner, cafe(f.category.id), Some(IMAGE.into())).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound("Category")));
}

#[tokio::test]
async fn unknown_caller_identity_is_user_not_found() {
    let f = fixture();
    let ghost = Caller::new(Uuid::new_v4(), Role::User);
    let err = f.svc.businesses.create(&ghost, cafe(f.category.id), Some(IMAGE.into())).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound("User")));
}

#[tokio::test]
async fn only_owner_or_admin_may_update_or_remove() {
    let f = fixture();
    let b = f.svc.businesses.create(&f.owner, cafe(f.category.id), Some(IMAGE.into())).await.unwrap();

    let patch = BusinessPatch { name: Some("Stolen".into()), ..BusinessPatch::default() };
    assert!(matches!(f.svc.businesses.update(b.id, patch, &f.other).await, Err(ServiceError::Forbidden(_))));
    assert!(matches!(f.svc.businesses.remove(b.id, &f.other).await, Err(ServiceError::Forbidden(_))));
    let stored = f.svc.businesses.find_one(b.id).await.unwrap().listing;
    assert_eq!(stored, b);

    let patch = BusinessPatch { name: Some("Joe's Bistro".into()), ..BusinessPatch::default() };
    assert_eq!(f.svc.businesses.update(b.id, patch, &f.owner).await.unwrap().name, "Joe's Bistro");
    let patch = BusinessPatch { phone: Some("555-2000".into()), ..BusinessPatch::default() };
    let updated = f.svc.businesses.update(b.id, patch, &f.admin).await.unwrap();
    assert_eq!(updated.phone, "555-2000");
    assert_eq!(updated.owner_id, f.owner.id);
    f.svc.businesses.remove(b.id, &f.admin).await.unwrap();
}

#[tokio::test]
async fn update_with_unknown_category_leaves_row_untouched() {
    let f = fixture();
    let b = f.svc.businesses.create(&f.owner, cafe(f.category.id), Some(IMAGE.into())).await.unwrap();
    let patch = BusinessPatch { name: Some("Moved".into()), category_id: Some(Uuid::new_v4()), ..BusinessPatch::default() };
    let err = f.svc.businesses.update(b.id, patch, &f.owner).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound("Category")));
    assert_eq!(f.svc.businesses.find_one(b.id).await.unwrap().listing.name, "Joe's Cafe");

    let drinks = f.dir.insert_category("Drinks").unwrap();
    let patch = BusinessPatch { category_id: Some(drinks.id), ..BusinessPatch::default() };
    assert_eq!(f.svc.businesses.update(b.id, patch, &f.owner).await.unwrap().category_id, drinks.id);
}

#[tokio::test]
async fn event_role_gate_runs_before_category_lookup() {
    let f = fixture();
    let err = f.svc.events.create(&f.other, gig(Uuid::new_v4()), None).await.unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
    assert!(f.svc.events.authorize_create(&f.owner).is_err());
    assert!(f.svc.events.authorize_create(&f.organizer).is_ok());

    let e = f.svc.events.create(&f.organizer, gig(f.category.id), None).await.unwrap();
    assert_eq!(e.organizer_id, f.organizer.id);
    assert_eq!(e.end_date.to_rfc3339(), "2030-05-01T23:00:00+02:00");
    assert!(f.svc.events.create(&f.admin, gig(f.category.id), Some("uploads/events/event-1-1.png".into())).await.is_ok());
}

#[tokio::test]
async fn event_validation_rejects_blank_optionals_and_bad_dates() {
    let f = fixture();
    let draft = EventDraft {
        description: Some(String::new()),
        start_date: Some("yesterday".into()),
        ..gig(f.category.id)
    };
    let err = f.svc.events.create(&f.organizer, draft, None).await.unwrap_err();
    assert_eq!(violated_fields(err), ["description", "start_date"]);
}

#[tokio::test]
async fn remove_hides_from_strict_find_one_but_row_persists() {
    let f = fixture();
    let e = f.svc.events.create(&f.organizer, gig(f.category.id), None).await.unwrap();
    f.svc.events.remove(e.id, &f.organizer).await.unwrap();
    assert!(matches!(f.svc.events.find_one(e.id).await, Err(ServiceError::NotFound("Event"))));
    assert!(f.svc.events.find_all(false).await.unwrap().is_empty());
    let all = f.svc.events.find_all(true).await.unwrap();
    assert!(all.iter().any(|d| d.listing.id == e.id && !d.listing.is_active));

    // second remove is silent, update of a hidden event is NotFound
    f.svc.events.remove(e.id, &f.organizer).await.unwrap();
    let patch = EventPatch { name: Some("Back".into()), ..EventPatch::default() };
    assert!(matches!(f.svc.events.update(e.id, patch, &f.organizer).await, Err(ServiceError::NotFound("Event"))));
}

#[tokio::test]
async fn business_find_one_still_returns_inactive_rows() {
    let f = fixture();
    let b = f.svc.businesses.create(&f.owner, cafe(f.category.id), Some(IMAGE.into())).await.unwrap();
    f.svc.businesses.remove(b.id, &f.owner).await.unwrap();
    f.svc.businesses.remove(b.id, &f.owner).await.unwrap();
    let detail = f.svc.businesses.find_one(b.id).await.unwrap();
    assert!(!detail.listing.is_active);
    assert!(f.svc.businesses.find_all(false).await.unwrap().is_empty());
    assert!(f.svc.businesses.find_by_owner(f.owner.id, Some(&f.owner)).await.unwrap().is_empty());
}

#[tokio::test]
async fn remove_of_missing_listing_is_not_found() {
    let f = fixture();
    assert!(matches!(f.svc.businesses.remove(Uuid::new_v4(), &f.admin).await, Err(ServiceError::NotFound("Business"))));
}

#[tokio::test]
async fn business_merge_skips_empty_strings_event_merge_applies_them() {
    let f = fixture();
    let b = f.svc.businesses.create(&f.owner, cafe(f.category.id), Some(IMAGE.into())).await.unwrap();
    let patch = BusinessPatch { name: Some(String::new()), description: Some(String::new()), ..BusinessPatch::default() };
    let b2 = f.svc.businesses.update(b.id, patch, &f.owner).await.unwrap();
    assert_eq!(b2.name, "Joe's Cafe");
    assert_eq!(b2.description, None);

    let e = f.svc.events.create(&f.organizer, gig(f.category.id), None).await.unwrap();
    let patch = EventPatchForm { location: Some(String::new()), ..EventPatchForm::default() }.parse(None).unwrap();
    let e2 = f.svc.events.update(e.id, patch, &f.organizer).await.unwrap();
    assert_eq!(e2.location.as_deref(), Some(""));
    assert_eq!(e2.name, "Jazz Night");
}

#[tokio::test]
async fn event_patch_form_reports_bad_fields_and_carries_image() {
    let bad = EventPatchForm { start_date: Some("soon".into()), category_id: Some("x".into()), ..EventPatchForm::default() };
    assert_eq!(violated_fields(bad.parse(None).unwrap_err()), ["start_date", "category_id"]);
    let ok = EventPatchForm::default().parse(Some("uploads/events/event-2-2.gif".into())).unwrap();
    assert_eq!(ok.image.as_deref(), Some("uploads/events/event-2-2.gif"));
}

#[tokio::test]
async fn find_by_owner_returns_empty_for_strangers() {
    let f = fixture();
    f.svc.businesses.create(&f.owner, cafe(f.category.id), Some(IMAGE.into())).await.unwrap();
    assert_eq!(f.svc.businesses.find_by_owner(f.owner.id, Some(&f.owner)).await.unwrap().len(), 1);
    assert_eq!(f.svc.businesses.find_by_owner(f.owner.id, Some(&f.admin)).await.unwrap().len(), 1);
    assert!(f.svc.businesses.find_by_owner(f.owner.id, Some(&f.other)).await.unwrap().is_empty());
    assert!(f.svc.businesses.find_by_owner(f.owner.id, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn find_by_category_lists_active_rows_only() {
    let f = fixture();
    let drinks = f.dir.insert_category("Drinks").unwrap();
    let a = f.svc.businesses.create(&f.owner, cafe(f.category.id), Some(IMAGE.into())).await.unwrap();
    let b = f.svc.businesses.create(&f.owner, cafe(f.category.id), Some(IMAGE.into())).await.unwrap();
    f.svc.businesses.create(&f.owner, cafe(drinks.id), Some(IMAGE.into())).await.unwrap();
    f.svc.businesses.remove(b.id, &f.owner).await.unwrap();

    let ids: Vec<Uuid> = f.svc.businesses.find_by_category(f.category.id).await.unwrap().into_iter().map(|d| d.listing.id).collect();
    assert_eq!(ids, vec![a.id]);
}

#[tokio::test]
async fn business_reads_attach_reviews() {
    let f = fixture();
    let b = f.svc.businesses.create(&f.owner, cafe(f.category.id), Some(IMAGE.into())).await.unwrap();
    let input = |rating| ReviewInput { business_id: b.id, rating: Some(rating), comment: Some("tasty".into()) };
    f.svc.reviews.create(&f.other, input(5)).await.unwrap();
    assert!(matches!(f.svc.reviews.create(&f.other, input(6)).await, Err(ServiceError::Validation(_))));

    let all = f.svc.businesses.find_all(false).await.unwrap();
    assert_eq!(all[0].reviews.as_ref().map(|r| r.len()), Some(1));
    assert_eq!(f.svc.reviews.list_for_business(b.id).await.unwrap()[0].user_id, f.other.id);

    f.svc.businesses.remove(b.id, &f.owner).await.unwrap();
    assert!(matches!(f.svc.reviews.create(&f.other, input(4)).await, Err(ServiceError::NotFound("Business"))));
}

#[tokio::test]
async fn event_and_profession_details_carry_no_reviews() {
    let f = fixture();
    f.svc.events.create(&f.organizer, gig(f.category.id), None).await.unwrap();
    let all = f.svc.events.find_all(false).await.unwrap();
    assert!(all[0].reviews.is_none());
    assert!(all[0].category.is_some());
}

#[tokio::test]
async fn profession_gate_and_projection() {
    let f = fixture();
    let err = f.svc.professions.create(&f.owner, doctor(&["Cardiology"], "Springfield")).await.unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));

    let p = f.svc.professions.create(&f.professional, doctor(&["Cardiology", "Sports Medicine"], "Springfield")).await.unwrap();
    assert_eq!(p.profession_type, ProfessionType::Doctor);
    assert_eq!(p.specialties, vec!["Cardiology".to_string(), "Sports Medicine".to_string()]);
    let user = p.user.expect("user embedded");
    assert_eq!(user.id, f.professional.id);
    assert_eq!(user.role, Role::Professional);

    let json = serde_json::to_value(f.svc.professions.find_one(p.id).await.unwrap()).unwrap();
    assert!(json["user"].get("password_hash").is_none());
    assert_eq!(json["user"]["email"], "pro@example.com");
}

#[tokio::test]
async fn profession_validation_collects_type_and_name() {
    let f = fixture();
    let draft = ProfessionDraft { profession_type: Some("wizard".into()), ..ProfessionDraft::default() };
    let err = f.svc.professions.create(&f.professional, draft).await.unwrap_err();
    assert_eq!(violated_fields(err), ["name", "profession_type"]);
}

#[tokio::test]
async fn profession_queries_filter_by_type_location_and_specialty() {
    let f = fixture();
    let a = f.svc.professions.create(&f.professional, doctor(&["Family Law"], "Springfield")).await.unwrap();
    let mut lawyer = doctor(&[], "Shelbyville");
    lawyer.profession_type = Some("lawyer".into());
    let b = f.svc.professions.create(&f.admin, lawyer).await.unwrap();
    assert!(b.specialties.is_empty());

    let docs = f.svc.professions.find_all(false, Some(ProfessionType::Doctor)).await.unwrap();
    assert_eq!(docs.iter().map(|p| p.id).collect::<Vec<_>>(), vec![a.id]);
    assert_eq!(f.svc.professions.find_all(false, None).await.unwrap().len(), 2);

    assert_eq!(f.svc.professions.find_by_location("Springfield").await.unwrap().len(), 1);
    assert!(f.svc.professions.find_by_location("springfield").await.unwrap().is_empty());

    assert_eq!(f.svc.professions.find_by_specialty("Law").await.unwrap()[0].id, a.id);
    assert!(f.svc.professions.find_by_specialty("law").await.unwrap().is_empty());
    assert!(f.svc.professions.find_by_specialty("").await.unwrap().iter().all(|p| p.id != b.id));
}

#[tokio::test]
async fn profession_presence_merge_and_soft_delete() {
    let f = fixture();
    let p = f.svc.professions.create(&f.professional, doctor(&["Cardiology"], "Springfield")).await.unwrap();
    let patch = ProfessionPatch { biography: Some(String::new()), specialties: Some(vec![]), ..ProfessionPatch::default() };
    let updated = f.svc.professions.update(p.id, patch, &f.professional).await.unwrap();
    assert_eq!(updated.biography.as_deref(), Some(""));
    assert!(updated.specialties.is_empty());
    assert_eq!(updated.location.as_deref(), Some("Springfield"));

    assert!(matches!(f.svc.professions.remove(p.id, &f.other).await, Err(ServiceError::Forbidden(_))));
    f.svc.professions.remove(p.id, &f.professional).await.unwrap();
    assert!(matches!(f.svc.professions.find_one(p.id).await, Err(ServiceError::NotFound("Profession"))));
    assert!(f.svc.professions.find_by_owner(f.professional.id, Some(&f.professional)).await.unwrap().is_empty());
}

#[tokio::test]
async fn profession_update_rejects_commas_in_specialties() {
    let f = fixture();
    let p = f.svc.professions.create(&f.professional, doctor(&["Cardiology"], "Springfield")).await.unwrap();
    let patch = ProfessionPatch {
        name: Some("Dr. Ada Lovelace".into()),
        specialties: Some(vec!["A,B".into()]),
        ..ProfessionPatch::default()
    };
    let err = f.svc.professions.update(p.id, patch, &f.professional).await.unwrap_err();
    assert_eq!(violated_fields(err), ["specialties"]);

    let stored = f.svc.professions.find_one(p.id).await.unwrap();
    assert_eq!(stored.name, "Dr. Ada");
    assert_eq!(stored.specialties, ["Cardiology"]);
}

#[tokio::test]
async fn profession_update_checks_owner_before_fields() {
    let f = fixture();
    let p = f.svc.professions.create(&f.professional, doctor(&["Cardiology"], "Springfield")).await.unwrap();
    let patch = ProfessionPatch { specialties: Some(vec!["A,B".into()]), ..ProfessionPatch::default() };
    let err = f.svc.professions.update(p.id, patch, &f.other).await.unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
}

#[tokio::test]
async fn authorize_update_refuses_strangers_and_missing_rows() {
    let f = fixture();
    let e = f.svc.events.create(&f.organizer, gig(f.category.id), None).await.unwrap();
    f.svc.events.authorize_update(e.id, &f.organizer).await.unwrap();
    f.svc.events.authorize_update(e.id, &f.admin).await.unwrap();
    assert!(matches!(f.svc.events.authorize_update(e.id, &f.other).await, Err(ServiceError::Forbidden(_))));
    assert!(matches!(
        f.svc.events.authorize_update(Uuid::new_v4(), &f.organizer).await,
        Err(ServiceError::NotFound("Event"))
    ));

    f.svc.events.remove(e.id, &f.organizer).await.unwrap();
    assert!(matches!(f.svc.events.authorize_update(e.id, &f.organizer).await, Err(ServiceError::NotFound("Event"))));
}

fn non_admin_role() -> impl Strategy<Value = Role> {
    prop_oneof![
        Just(Role::User),
        Just(Role::BusinessOwner),
        Just(Role::EventOrganizer),
        Just(Role::Professional),
    ]
}

fn maybe_text() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("[A-Za-z ]{1,12}")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn partial_event_update_keeps_unsupplied_fields(
        name in maybe_text(),
        description in maybe_text(),
        location in maybe_text(),
    ) {
        let f = fixture();
        tokio_test::block_on(async {
            let before = f.svc.events.create(&f.organizer, gig(f.category.id), None).await.unwrap();
            let patch = EventPatch { name: name.clone(), description: description.clone(), location: location.clone(), ..EventPatch::default() };
            let after = f.svc.events.update(before.id, patch, &f.organizer).await.unwrap();
            prop_assert_eq!(&after.name, name.as_ref().unwrap_or(&before.name));
            prop_assert_eq!(after.description.clone(), description.or(before.description.clone()));
            prop_assert_eq!(after.location.clone(), location.or(before.location.clone()));
            prop_assert_eq!(after.start_date, before.start_date);
            prop_assert_eq!(after.category_id, before.category_id);
            prop_assert_eq!(after.organizer_id, before.organizer_id);
            Ok(())
        })?;
    }

    #[test]
    fn strangers_can_never_mutate(role in non_admin_role(), name in "[A-Za-z]{1,12}") {
        let f = fixture();
        tokio_test::block_on(async {
            let stranger = f.dir.insert_user("stranger", &format!("s-{}@example.com", Uuid::new_v4()), role).unwrap();
            let stranger = Caller::new(stranger.id, stranger.role);
            let before = f.svc.businesses.create(&f.owner, cafe(f.category.id), Some(IMAGE.into())).await.unwrap();
            let patch = BusinessPatch { name: Some(name), ..BusinessPatch::default() };
            let updated = f.svc.businesses.update(before.id, patch, &stranger).await;
            prop_assert!(matches!(updated, Err(ServiceError::Forbidden(_))));
            let removed = f.svc.businesses.remove(before.id, &stranger).await;
            prop_assert!(matches!(removed, Err(ServiceError::Forbidden(_))));
            prop_assert_eq!(f.svc.businesses.find_one(before.id).await.unwrap().listing, before);
            Ok(())
        })?;
    }

    #[test]
    fn business_truthy_merge_ignores_empty_text(phone in "[0-9-]{0,10}") {
        let f = fixture();
        tokio_test::block_on(async {
            let before = f.svc.businesses.create(&f.owner, cafe(f.category.id), Some(IMAGE.into())).await.unwrap();
            let patch = BusinessPatch { phone: Some(phone.clone()), ..BusinessPatch::default() };
            let after = f.svc.businesses.update(before.id, patch, &f.owner).await.unwrap();
            let expected = if phone.is_empty() { before.phone.clone() } else { phone };
            prop_assert_eq!(after.phone, expected);
            Ok(())
        })?;
    }

    #[test]
    fn remove_is_idempotent(times in 1usize..4) {
        let f = fixture();
        tokio_test::block_on(async {
            let e = f.svc.events.create(&f.organizer, gig(f.category.id), None).await.unwrap();
            for _ in 0..times {
                prop_assert!(f.svc.events.remove(e.id, &f.admin).await.is_ok());
            }
            let all = f.svc.events.find_all(true).await.unwrap();
            prop_assert!(all.iter().any(|d| d.listing.id == e.id && !d.listing.is_active));
            Ok(())
        })?;
    }
}
