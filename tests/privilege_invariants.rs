//! Privilege Invariant Tests
//!
//! Ownership-aware authorization through the data engine, with actors
//! re-read from the identity relation.

use std::sync::Arc;

use serde_json::{json, Value};

use typedcms::auth::{Actor, AuthError, Privileges, UserError};
use typedcms::service::{CmsService, ServiceError};
use typedcms::store::SqliteStore;

fn service() -> (CmsService<SqliteStore>, Actor) {
    let store = SqliteStore::open_in_memory().unwrap();
    store.bootstrap().unwrap();
    let service = CmsService::new(Arc::new(store));
    let admin = service.seed_admin("gandalf", "you_shall_not_pass").unwrap().unwrap();
    let admin = service.resolve_actor(admin.id).unwrap();

    service
        .create_content_type(
            Some(&admin),
            &json!({
                "name": "post",
                "fields": [{ "name": "title", "type": "text", "required": true }]
            }),
        )
        .unwrap();
    (service, admin)
}

fn user_with(service: &CmsService<SqliteStore>, admin: &Actor, username: &str, granted: &[&str]) -> Actor {
    let mut privileges = serde_json::to_value(Privileges::default()).unwrap();
    for key in granted {
        privileges[*key] = json!(true);
    }
    let user = service
        .create_user(
            Some(admin),
            &json!({
                "username": username,
                "password": "secret123",
                "role": "user",
                "privileges": privileges
            }),
        )
        .unwrap();
    service.resolve_actor(user.id).unwrap()
}

fn post(service: &CmsService<SqliteStore>, actor: &Actor, title: &str) -> String {
    service
        .create_record(Some(actor), "post", &json!({ "title": title }))
        .unwrap()
        .id
        .to_string()
}

fn denied() -> ServiceError {
    ServiceError::AuthorizationDenied(AuthError::InsufficientPrivileges)
}

// =============================================================================
// OWN VS ANY
// =============================================================================

/// Test: `read own` reads only the actor's own records.
#[test]
fn test_read_own_only_reads_own_records() {
    let (service, admin) = service();
    let frodo = user_with(&service, &admin, "frodo", &["create", "read own"]);
    let sam = user_with(&service, &admin, "sam", &["create", "read own"]);

    let frodos = post(&service, &frodo, "ring");
    let sams = post(&service, &sam, "potatoes");

    assert!(service.read_record(Some(&frodo), "post", &frodos).is_ok());
    assert_eq!(
        service.read_record(Some(&frodo), "post", &sams).unwrap_err(),
        denied()
    );
}

/// Test: `any` privileges ignore ownership.
#[test]
fn test_any_privileges_cross_ownership() {
    let (service, admin) = service();
    let author = user_with(&service, &admin, "frodo", &["create"]);
    let moderator = user_with(&service, &admin, "elrond", &["read any", "update any", "delete any"]);

    let id = post(&service, &author, "ring");
    assert!(service.read_record(Some(&moderator), "post", &id).is_ok());

    let updated = service
        .update_record(Some(&moderator), "post", &id, &json!({ "title": "edited" }))
        .unwrap();
    assert_eq!(updated.owner_id, author.id);

    service.delete_record(Some(&moderator), "post", &id).unwrap();
}

/// Test: Update and delete honour their own flags independently of read.
#[test]
fn test_update_and_delete_flags() {
    let (service, admin) = service();
    let author = user_with(&service, &admin, "frodo", &["create", "read own", "update own"]);
    let id = post(&service, &author, "ring");

    assert!(service
        .update_record(Some(&author), "post", &id, &json!({ "title": "edited" }))
        .is_ok());
    assert_eq!(
        service.delete_record(Some(&author), "post", &id).unwrap_err(),
        denied()
    );
}

/// Test: Without `create` nothing can be inserted.
#[test]
fn test_create_requires_privilege() {
    let (service, admin) = service();
    let reader = user_with(&service, &admin, "pippin", &["read any"]);

    let err = service
        .create_record(Some(&reader), "post", &json!({ "title": "fool of a took" }))
        .unwrap_err();
    assert_eq!(err, denied());
}

/// Test: Privilege checks happen before record validation.
#[test]
fn test_denial_precedes_validation() {
    let (service, admin) = service();
    let reader = user_with(&service, &admin, "pippin", &["read any"]);

    let err = service
        .create_record(Some(&reader), "post", &json!({ "wrong": 1 }))
        .unwrap_err();
    assert_eq!(err, denied());
}

// =============================================================================
// ROLES AND ANONYMOUS CALLERS
// =============================================================================

/// Test: Anonymous callers are denied every operation.
#[test]
fn test_anonymous_is_denied_everywhere() {
    let (service, _admin) = service();
    let access_denied = ServiceError::AuthorizationDenied(AuthError::AccessDenied);
    let body = json!({ "title": "x" });

    assert_eq!(service.list_content_types(None).unwrap_err(), access_denied);
    assert_eq!(service.get_content_type(None, "post").unwrap_err(), access_denied);
    assert_eq!(service.create_record(None, "post", &body).unwrap_err(), access_denied);
    assert_eq!(service.read_record(None, "post", "1").unwrap_err(), access_denied);
    assert_eq!(service.list_records(None, "post").unwrap_err(), access_denied);
    assert_eq!(service.update_record(None, "post", "1", &body).unwrap_err(), access_denied);
    assert_eq!(service.delete_record(None, "post", "1").unwrap_err(), access_denied);
    assert_eq!(service.drop_content_type(None, "post").unwrap_err(), access_denied);
    assert_eq!(service.get_user(None, "1").unwrap_err(), access_denied);
}

/// Test: Schema and user management require the admin role, not privileges.
#[test]
fn test_schema_operations_are_admin_only() {
    let (service, admin) = service();
    let everything = [
        "create", "read own", "read any", "update own", "update any", "delete own", "delete any",
    ];
    let power_user = user_with(&service, &admin, "boromir", &everything);
    let admin_required = ServiceError::AuthorizationDenied(AuthError::AdminRequired);

    let body = json!({ "name": "note", "fields": [{ "name": "text", "type": "text", "required": true }] });
    assert_eq!(
        service.create_content_type(Some(&power_user), &body).unwrap_err(),
        admin_required
    );
    assert_eq!(
        service.drop_content_type(Some(&power_user), "post").unwrap_err(),
        admin_required
    );
    assert_eq!(
        service.get_user(Some(&power_user), "1").unwrap_err(),
        admin_required
    );

    // reading schema only needs a logged-in actor
    assert!(service.get_content_type(Some(&power_user), "post").is_ok());
}

// =============================================================================
// USERS
// =============================================================================

/// Test: Usernames are unique.
#[test]
fn test_duplicate_username() {
    let (service, admin) = service();
    user_with(&service, &admin, "frodo", &[]);

    let body = json!({
        "username": "frodo",
        "password": "secret123",
        "role": "user",
        "privileges": serde_json::to_value(Privileges::default()).unwrap()
    });
    let err = service.create_user(Some(&admin), &body).unwrap_err();
    assert_eq!(err, ServiceError::UserInvalid(UserError::UsernameTaken));
    assert_eq!(err.to_string(), "username already in use");
}

/// Test: Stored users are fetched without their password hash.
#[test]
fn test_get_user_hides_password_hash() {
    let (service, admin) = service();
    let frodo = user_with(&service, &admin, "frodo", &["create"]);

    let user = service.get_user(Some(&admin), &frodo.id.to_string()).unwrap();
    let value: Value = serde_json::to_value(&user).unwrap();
    assert_eq!(value["username"], "frodo");
    assert_eq!(value["privileges"]["create"], true);
    assert!(value.get("password_hash").is_none());

    assert_eq!(
        service.get_user(Some(&admin), "999").unwrap_err(),
        ServiceError::UserNotFound
    );
}

/// Test: Login checks the password and hides which part was wrong.
#[test]
fn test_authenticate() {
    let (service, admin) = service();
    user_with(&service, &admin, "frodo", &[]);

    assert!(service.authenticate("frodo", "secret123").is_ok());

    let invalid = ServiceError::AuthorizationDenied(AuthError::InvalidCredentials);
    assert_eq!(service.authenticate("frodo", "wrong").unwrap_err(), invalid);
    assert_eq!(service.authenticate("nobody", "secret123").unwrap_err(), invalid);
}
