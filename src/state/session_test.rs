use std::cell::{Cell, RefCell};

use futures::executor::block_on;

use super::*;
use crate::state::storage::MemoryStorage;

// =============================================================
// Fixtures
// =============================================================

struct FakeIdentity {
    response: Result<Option<SessionProfile>, ApiError>,
    calls: Cell<usize>,
    seen_token: RefCell<Option<String>>,
}

impl FakeIdentity {
    fn new(response: Result<Option<SessionProfile>, ApiError>) -> Self {
        Self {
            response,
            calls: Cell::new(0),
            seen_token: RefCell::new(None),
        }
    }
}

impl IdentityApi for FakeIdentity {
    async fn validate_session(&self, token: &str) -> Result<Option<SessionProfile>, ApiError> {
        self.calls.set(self.calls.get() + 1);
        *self.seen_token.borrow_mut() = Some(token.to_owned());
        self.response.clone()
    }
}

fn teacher_profile() -> SessionProfile {
    SessionProfile {
        id: Some("u7".to_owned()),
        username: Some("grace".to_owned()),
        email: Some("grace@example.com".to_owned()),
        role: Some("Teacher".to_owned()),
        bio: Some("compilers".to_owned()),
        ..SessionProfile::default()
    }
}

fn store_with_token(token: &str) -> (SessionStore<MemoryStorage>, MemoryStorage) {
    let storage = MemoryStorage::new();
    let mut store = SessionStore::new(storage.clone());
    store.set_user(UserPatch {
        username: Some(Some("grace".to_owned())),
        ..UserPatch::default()
    }
    .token(token));
    (store, storage)
}

// =============================================================
// set_user
// =============================================================

#[test]
fn set_user_only_changes_present_fields() {
    let mut store = SessionStore::new(MemoryStorage::new());
    store.set_user(UserPatch {
        id: Some(Some("u1".to_owned())),
        username: Some(Some("ada".to_owned())),
        email: Some(Some("ada@example.com".to_owned())),
        role: Some(Some(Role::Student)),
        ..UserPatch::default()
    });

    store.set_user(UserPatch {
        email: Some(Some("ada@lms.dev".to_owned())),
        ..UserPatch::default()
    });

    let session = store.session();
    assert_eq!(session.id.as_deref(), Some("u1"));
    assert_eq!(session.username.as_deref(), Some("ada"));
    assert_eq!(session.email.as_deref(), Some("ada@lms.dev"));
    assert_eq!(session.role, Some(Role::Student));
}

#[test]
fn set_user_explicit_null_clears_field() {
    let mut store = SessionStore::new(MemoryStorage::new());
    store.set_user(UserPatch {
        bio: Some(Some("hello".to_owned())),
        ..UserPatch::default()
    });
    store.set_user(UserPatch {
        bio: Some(None),
        ..UserPatch::default()
    });
    assert_eq!(store.session().bio, None);
}

#[test]
fn set_user_without_authorized_flag_is_unauthorized() {
    let (mut store, _) = store_with_token("tok");
    store.set_user(
        UserPatch {
            role: Some(Some(Role::Teacher)),
            ..UserPatch::default()
        }
        .authorized(true),
    );
    assert!(store.session().authorized);

    store.set_user(UserPatch {
        bio: Some(Some("updated".to_owned())),
        ..UserPatch::default()
    });
    assert!(!store.session().authorized);
}

#[test]
fn set_user_refuses_authorization_without_token() {
    let mut store = SessionStore::new(MemoryStorage::new());
    store.set_user(
        UserPatch {
            role: Some(Some(Role::Admin)),
            ..UserPatch::default()
        }
        .authorized(true),
    );
    assert!(!store.session().authorized);
}

#[test]
fn set_user_refuses_authorization_without_role() {
    let (mut store, _) = store_with_token("tok");
    store.set_user(UserPatch::default().authorized(true));
    assert!(!store.session().authorized);
}

#[test]
fn set_user_coerces_missing_token_to_empty_and_persists_it() {
    let storage = MemoryStorage::new();
    let mut store = SessionStore::new(storage.clone());
    store.set_user(UserPatch {
        username: Some(Some("ada".to_owned())),
        ..UserPatch::default()
    });
    assert_eq!(store.session().token.as_deref(), Some(""));
    assert_eq!(store.token(), None);
    assert_eq!(storage.get_item(TOKEN_KEY).as_deref(), Some(""));
}

#[test]
fn set_user_persists_subset() {
    let (mut store, storage) = store_with_token("tok");
    store.set_user(UserPatch {
        role: Some(Some(Role::Teacher)),
        bio: Some(Some("not persisted".to_owned())),
        ..UserPatch::default()
    });

    let raw = storage.get_item(USER_KEY).unwrap();
    let persisted: PersistedSession = serde_json::from_str(&raw).unwrap();
    assert_eq!(persisted.username.as_deref(), Some("grace"));
    assert_eq!(persisted.role, Some(Role::Teacher));
    assert_eq!(persisted.token.as_deref(), Some("tok"));
    assert!(!raw.contains("not persisted"));
    assert_eq!(storage.get_item(TOKEN_KEY).as_deref(), Some("tok"));
}

#[test]
fn patch_deserialization_drops_unknown_keys_and_normalizes_role() {
    let patch: UserPatch =
        serde_json::from_str(r#"{"username":"ada","role":"Teacher","favouriteColour":"green"}"#).unwrap();
    assert_eq!(patch.username, Some(Some("ada".to_owned())));
    assert_eq!(patch.role, Some(Some(Role::Teacher)));
    assert_eq!(patch.email, None);
}

#[test]
fn patch_deserialization_unknown_role_clears_role_and_keeps_other_fields() {
    let patch: UserPatch = serde_json::from_str(r#"{"username":"x","role":"superuser"}"#).unwrap();
    assert_eq!(patch.username, Some(Some("x".to_owned())));
    assert_eq!(patch.role, Some(None));
}

#[test]
fn patch_deserialization_null_role_clears_role() {
    let patch: UserPatch = serde_json::from_str(r#"{"role":null}"#).unwrap();
    assert_eq!(patch.role, Some(None));
}

#[test]
fn patch_deserialization_distinguishes_null_from_absent() {
    let patch: UserPatch = serde_json::from_str(r#"{"email":null}"#).unwrap();
    assert_eq!(patch.email, Some(None));
    assert_eq!(patch.username, None);
}

// =============================================================
// clear_user
// =============================================================

#[test]
fn clear_user_resets_session_and_storage() {
    let (mut store, storage) = store_with_token("tok");
    store.clear_user();

    assert_eq!(store.session(), &Session::default());
    assert!(!store.snapshot().authorized);
    assert_eq!(store.token(), None);
    assert_eq!(storage.get_item(TOKEN_KEY), None);
    assert_eq!(storage.get_item(USER_KEY), None);
}

#[test]
fn clear_user_is_idempotent() {
    let (mut store, storage) = store_with_token("tok");
    store.clear_user();
    store.clear_user();
    assert_eq!(store.session(), &Session::default());
    assert!(storage.is_empty());
}

// =============================================================
// rehydrate
// =============================================================

#[test]
fn rehydrate_restores_persisted_subset_without_authorizing() {
    let (mut store, storage) = store_with_token("tok");
    store.set_user(
        UserPatch {
            role: Some(Some(Role::Teacher)),
            bio: Some(Some("gone after reload".to_owned())),
            ..UserPatch::default()
        }
        .authorized(true),
    );

    let reloaded = SessionStore::rehydrate(storage);
    let session = reloaded.session();
    assert_eq!(session.username.as_deref(), Some("grace"));
    assert_eq!(session.role, Some(Role::Teacher));
    assert_eq!(reloaded.token(), Some("tok"));
    assert_eq!(session.bio, None);
    assert!(!session.authorized);
}

#[test]
fn rehydrate_falls_back_to_token_key() {
    let storage = MemoryStorage::new();
    storage.set_item(TOKEN_KEY, "legacy").unwrap();
    let store = SessionStore::rehydrate(storage);
    assert_eq!(store.token(), Some("legacy"));
    assert_eq!(store.session().username, None);
}

#[test]
fn rehydrate_ignores_corrupt_user_entry() {
    let storage = MemoryStorage::new();
    storage.set_item(USER_KEY, "{not json").unwrap();
    storage.set_item(TOKEN_KEY, "tok").unwrap();
    let store = SessionStore::rehydrate(storage);
    assert_eq!(store.token(), Some("tok"));
}

#[test]
fn rehydrate_treats_empty_token_as_absent() {
    let storage = MemoryStorage::new();
    storage.set_item(TOKEN_KEY, "").unwrap();
    let store = SessionStore::rehydrate(storage);
    assert_eq!(store.token(), None);
}

// =============================================================
// auto_login
// =============================================================

#[test]
fn auto_login_without_token_makes_no_request() {
    let api = FakeIdentity::new(Ok(Some(teacher_profile())));
    let mut store = SessionStore::new(MemoryStorage::new());
    assert!(!block_on(store.auto_login(&api)));
    assert_eq!(api.calls.get(), 0);
}

#[test]
fn auto_login_with_empty_token_makes_no_request() {
    let api = FakeIdentity::new(Ok(Some(teacher_profile())));
    let (mut store, _) = store_with_token("");
    assert!(!block_on(store.auto_login(&api)));
    assert_eq!(api.calls.get(), 0);
}

#[test]
fn auto_login_valid_profile_authorizes() {
    let api = FakeIdentity::new(Ok(Some(teacher_profile())));
    let (mut store, _) = store_with_token("tok");

    assert!(block_on(store.auto_login(&api)));
    assert_eq!(api.calls.get(), 1);
    assert_eq!(api.seen_token.borrow().as_deref(), Some("tok"));

    let session = store.session();
    assert!(session.authorized);
    assert_eq!(session.id.as_deref(), Some("u7"));
    assert_eq!(session.email.as_deref(), Some("grace@example.com"));
    assert_eq!(session.role, Some(Role::Teacher));
    assert_eq!(session.bio.as_deref(), Some("compilers"));
    assert_eq!(store.token(), Some("tok"));
}

#[test]
fn auto_login_adopts_refreshed_token() {
    let mut profile = teacher_profile();
    profile.token = Some("fresh".to_owned());
    let api = FakeIdentity::new(Ok(Some(profile)));
    let (mut store, storage) = store_with_token("stale");

    assert!(block_on(store.auto_login(&api)));
    assert_eq!(store.token(), Some("fresh"));
    assert_eq!(storage.get_item(TOKEN_KEY).as_deref(), Some("fresh"));
}

#[test]
fn auto_login_expired_clears_session() {
    let api = FakeIdentity::new(Ok(Some(SessionProfile {
        expired: true,
        ..teacher_profile()
    })));
    let (mut store, storage) = store_with_token("tok");

    assert!(!block_on(store.auto_login(&api)));
    assert_eq!(store.session(), &Session::default());
    assert_eq!(storage.get_item(TOKEN_KEY), None);
}

#[test]
fn auto_login_no_data_clears_session() {
    let api = FakeIdentity::new(Ok(None));
    let (mut store, _) = store_with_token("tok");
    assert!(!block_on(store.auto_login(&api)));
    assert_eq!(store.token(), None);
}

#[test]
fn auto_login_empty_profile_clears_session() {
    let api = FakeIdentity::new(Ok(Some(SessionProfile::default())));
    let (mut store, _) = store_with_token("tok");
    assert!(!block_on(store.auto_login(&api)));
    assert!(!store.snapshot().authorized);
}

#[test]
fn auto_login_transport_failure_clears_session() {
    let api = FakeIdentity::new(Err(ApiError::Timeout(5000)));
    let (mut store, storage) = store_with_token("tok");

    assert!(!block_on(store.auto_login(&api)));
    assert_eq!(api.calls.get(), 1);
    assert_eq!(store.session(), &Session::default());
    assert!(storage.is_empty());
}

#[test]
fn auto_login_unknown_role_clears_session() {
    let api = FakeIdentity::new(Ok(Some(SessionProfile {
        role: Some("janitor".to_owned()),
        ..teacher_profile()
    })));
    let (mut store, _) = store_with_token("tok");
    assert!(!block_on(store.auto_login(&api)));
    assert_eq!(store.session(), &Session::default());
}

#[test]
fn auto_login_profile_with_empty_token_clears_session() {
    let api = FakeIdentity::new(Ok(Some(SessionProfile {
        token: Some(String::new()),
        ..teacher_profile()
    })));
    let (mut store, storage) = store_with_token("tok");

    assert!(!block_on(store.auto_login(&api)));
    assert_eq!(store.session(), &Session::default());
    assert!(storage.is_empty());
}

// =============================================================
// accept_login
// =============================================================

#[test]
fn accept_login_authorizes_and_persists_token() {
    let storage = MemoryStorage::new();
    let mut store = SessionStore::new(storage.clone());
    let response = LoginResponse {
        token: "t1".to_owned(),
        user: teacher_profile(),
    };

    assert!(store.accept_login(response));
    assert!(store.snapshot().authorized);
    assert_eq!(store.snapshot().role, Some(Role::Teacher));
    assert_eq!(storage.get_item(TOKEN_KEY).as_deref(), Some("t1"));
}

#[test]
fn accept_login_with_unknown_role_clears_session() {
    let mut store = SessionStore::new(MemoryStorage::new());
    let response = LoginResponse {
        token: "t1".to_owned(),
        user: SessionProfile {
            role: Some("superuser".to_owned()),
            ..teacher_profile()
        },
    };

    assert!(!store.accept_login(response));
    assert_eq!(store.session(), &Session::default());
    assert!(store.storage().is_empty());
}

#[test]
fn accept_login_without_role_clears_session() {
    let mut store = SessionStore::new(MemoryStorage::new());
    let response = LoginResponse {
        token: "t1".to_owned(),
        user: SessionProfile {
            role: None,
            ..teacher_profile()
        },
    };

    assert!(!store.accept_login(response));
    assert_eq!(store.token(), None);
    assert_eq!(store.storage().get_item(TOKEN_KEY), None);
}

// =============================================================
// validate_token
// =============================================================

#[test]
fn validate_token_classifies_responses() {
    let expired = FakeIdentity::new(Ok(Some(SessionProfile {
        expired: true,
        ..SessionProfile::default()
    })));
    assert_eq!(block_on(validate_token(&expired, "t")), RestoreOutcome::Expired);

    let missing_role = FakeIdentity::new(Ok(Some(SessionProfile {
        role: None,
        ..teacher_profile()
    })));
    assert_eq!(block_on(validate_token(&missing_role, "t")), RestoreOutcome::UnknownRole(None));

    let failed = FakeIdentity::new(Err(ApiError::Unavailable));
    assert_eq!(
        block_on(validate_token(&failed, "t")),
        RestoreOutcome::Failed(ApiError::Unavailable)
    );
}

#[test]
fn snapshot_reflects_authorization_and_role() {
    let api = FakeIdentity::new(Ok(Some(teacher_profile())));
    let (mut store, _) = store_with_token("tok");
    block_on(store.auto_login(&api));
    assert_eq!(
        store.snapshot(),
        SessionSnapshot {
            authorized: true,
            role: Some(Role::Teacher),
        }
    );
}

// =============================================================
// restore
// =============================================================

#[test]
fn restore_rehydrates_then_validates() {
    let (_, storage) = store_with_token("tok");
    let api = FakeIdentity::new(Ok(Some(teacher_profile())));

    let store = block_on(SessionStore::restore(storage, &api));
    assert_eq!(api.calls.get(), 1);
    assert!(store.snapshot().authorized);
    assert_eq!(store.session().username.as_deref(), Some("grace"));
}

#[test]
fn restore_with_empty_storage_stays_anonymous() {
    let api = FakeIdentity::new(Ok(Some(teacher_profile())));
    let store = block_on(SessionStore::restore(MemoryStorage::new(), &api));
    assert_eq!(api.calls.get(), 0);
    assert_eq!(store.snapshot(), SessionSnapshot::default());
}
