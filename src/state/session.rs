//! Session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Single source of truth for "who is signed in and are they authorized".
//! Route guards and role-gated components read a `SessionSnapshot`; login,
//! logout, and startup restore mutate the store. Every mutation mirrors the
//! persisted subset (`id`, `username`, `email`, `role`, `token`) to durable
//! storage so the next launch can rehydrate it.
//!
//! INVARIANTS
//! ==========
//! - `authorized` is only ever true after a server-confirmed identity, and
//!   only while a non-empty token and a known role are held.
//! - `clear_user` resets everything and removes persisted keys; calling it
//!   twice is the same as calling it once.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use serde::{Deserialize, Deserializer, Serialize};

use super::role::Role;
use super::storage::{SessionStorage, StorageError, TOKEN_KEY, USER_KEY};
use crate::net::api::IdentityApi;
use crate::net::error::ApiError;
use crate::net::types::{LoginResponse, SessionProfile};

/// Identity and authorization status of the current user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub id: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    /// Bearer credential. `Some("")` after an update that carried no token.
    pub token: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub authorized: bool,
}

impl Session {
    /// The held token, if non-empty.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            authorized: self.authorized,
            role: self.role,
        }
    }

    fn merge(&mut self, patch: UserPatch) {
        let UserPatch {
            id,
            username,
            email,
            role,
            token,
            created_at,
            updated_at,
            avatar_url,
            bio,
            authorized,
        } = patch;

        overwrite(&mut self.id, id);
        overwrite(&mut self.username, username);
        overwrite(&mut self.email, email);
        overwrite(&mut self.role, role);
        overwrite(&mut self.token, token);
        overwrite(&mut self.created_at, created_at);
        overwrite(&mut self.updated_at, updated_at);
        overwrite(&mut self.avatar_url, avatar_url);
        overwrite(&mut self.bio, bio);

        self.token = Some(self.token.take().unwrap_or_default());

        let requested = authorized.unwrap_or(false);
        self.authorized = requested && self.token().is_some() && self.role.is_some();
        if requested && !self.authorized {
            leptos::logging::warn!("session: authorization refused without token and known role");
        }
    }
}

fn overwrite<T>(slot: &mut Option<T>, value: Option<Option<T>>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// What the navigation guard needs to know about the session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub authorized: bool,
    pub role: Option<Role>,
}

/// Partial session update. Outer `None` leaves a field untouched; `Some(None)`
/// clears it. Unknown keys are dropped when deserializing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(default, deserialize_with = "present")]
    pub id: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub username: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub email: Option<Option<String>>,
    /// An unrecognized role name clears the stored role.
    #[serde(default, deserialize_with = "present_role")]
    pub role: Option<Option<Role>>,
    #[serde(default, deserialize_with = "present")]
    pub token: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub created_at: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub updated_at: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub avatar_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub bio: Option<Option<String>>,
    #[serde(default)]
    pub authorized: Option<bool>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn present_role<'de, D>(deserializer: D) -> Result<Option<Option<Role>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|raw| Some(raw.as_deref().and_then(Role::parse)))
}

impl UserPatch {
    /// Patch carrying every field the server supplied. Fields the server
    /// omitted stay untouched; an unrecognized role clears the stored one.
    pub fn from_profile(profile: &SessionProfile) -> Self {
        let set = |v: &Option<String>| v.clone().map(Some);
        Self {
            id: set(&profile.id),
            username: set(&profile.username),
            email: set(&profile.email),
            role: profile.role.as_deref().map(Role::parse),
            token: set(&profile.token),
            created_at: set(&profile.created_at),
            updated_at: set(&profile.updated_at),
            avatar_url: set(&profile.avatar_url),
            bio: set(&profile.bio),
            authorized: None,
        }
    }

    #[must_use]
    pub fn authorized(mut self, authorized: bool) -> Self {
        self.authorized = Some(authorized);
        self
    }

    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(Some(token.into()));
        self
    }
}

/// Fields mirrored to durable storage.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub id: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub token: Option<String>,
}

impl From<&Session> for PersistedSession {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id.clone(),
            username: session.username.clone(),
            email: session.email.clone(),
            role: session.role,
            token: session.token.clone(),
        }
    }
}

/// Result of asking the identity endpoint about a token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RestoreOutcome {
    Valid(SessionProfile),
    NoData,
    Expired,
    UnknownRole(Option<String>),
    Failed(ApiError),
}

/// Ask the identity endpoint whether `token` still names a valid user.
pub async fn validate_token<A: IdentityApi>(api: &A, token: &str) -> RestoreOutcome {
    match api.validate_session(token).await {
        Err(e) => RestoreOutcome::Failed(e),
        Ok(None) => RestoreOutcome::NoData,
        Ok(Some(profile)) if profile.expired => RestoreOutcome::Expired,
        Ok(Some(profile)) if profile.is_empty() => RestoreOutcome::NoData,
        Ok(Some(profile)) => {
            if profile.role.as_deref().and_then(Role::parse).is_none() {
                RestoreOutcome::UnknownRole(profile.role)
            } else {
                RestoreOutcome::Valid(profile)
            }
        }
    }
}

/// Session state plus the storage it is mirrored to.
#[derive(Clone, Debug)]
pub struct SessionStore<S> {
    session: Session,
    storage: S,
}

impl<S: SessionStorage> SessionStore<S> {
    /// Empty session; nothing is read from storage.
    pub fn new(storage: S) -> Self {
        Self {
            session: Session::default(),
            storage,
        }
    }

    /// Rebuild the persisted subset from storage. Never authorizes.
    pub fn rehydrate(storage: S) -> Self {
        let persisted = storage
            .get_item(USER_KEY)
            .and_then(|raw| match serde_json::from_str::<PersistedSession>(&raw) {
                Ok(p) => Some(p),
                Err(e) => {
                    leptos::logging::warn!("session: discarding unreadable persisted user: {e}");
                    None
                }
            })
            .unwrap_or_else(|| PersistedSession {
                token: storage.get_item(TOKEN_KEY),
                ..PersistedSession::default()
            });

        let session = Session {
            id: persisted.id,
            username: persisted.username,
            email: persisted.email,
            role: persisted.role,
            token: persisted.token.filter(|t| !t.is_empty()),
            ..Session::default()
        };
        Self { session, storage }
    }

    /// Startup sequence: rehydrate from storage, then validate the held token.
    /// Await this before mounting the router.
    pub async fn restore<A: IdentityApi>(storage: S, api: &A) -> Self {
        let mut store = Self::rehydrate(storage);
        let authorized = store.auto_login(api).await;
        leptos::logging::log!("session: startup restore authorized={authorized}");
        store
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    pub fn token(&self) -> Option<&str> {
        self.session.token()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Merge `patch` into the session and persist.
    ///
    /// `authorized` comes from the patch alone (absent means false), so
    /// profile edits never grant authorization by themselves.
    pub fn set_user(&mut self, patch: UserPatch) {
        self.session.merge(patch);
        self.persist();
    }

    /// Apply a login response. A response that cannot yield an authorized
    /// session (no token, unknown role) clears the session and returns false.
    pub fn accept_login(&mut self, response: LoginResponse) -> bool {
        let LoginResponse { token, user } = response;
        self.set_user(UserPatch::from_profile(&user).token(token).authorized(true));
        if !self.session.authorized {
            leptos::logging::warn!("session: login response could not be authorized");
            self.clear_user();
            return false;
        }
        true
    }

    /// Reset the session and drop persisted keys.
    pub fn clear_user(&mut self) {
        self.session = Session::default();
        log_storage_error(self.storage.remove_item(TOKEN_KEY));
        log_storage_error(self.storage.remove_item(USER_KEY));
    }

    /// Restore the session from the held token.
    ///
    /// Returns `false` without any request when no token is held. Any failure
    /// or invalid answer clears the session. Never panics or propagates errors.
    pub async fn auto_login<A: IdentityApi>(&mut self, api: &A) -> bool {
        let Some(token) = self.token().map(str::to_owned) else {
            return false;
        };
        let outcome = validate_token(api, &token).await;
        self.finish_restore(outcome)
    }

    /// Apply a restore outcome. Returns whether the session is now authorized.
    pub fn finish_restore(&mut self, outcome: RestoreOutcome) -> bool {
        match outcome {
            RestoreOutcome::Valid(profile) => {
                self.set_user(UserPatch::from_profile(&profile).authorized(true));
                if !self.session.authorized {
                    leptos::logging::warn!("session: validated profile could not be authorized");
                    self.clear_user();
                    return false;
                }
                leptos::logging::log!("session: restored user={:?}", self.session.username);
                true
            }
            RestoreOutcome::NoData => {
                leptos::logging::log!("session: validation returned no data");
                self.clear_user();
                false
            }
            RestoreOutcome::Expired => {
                leptos::logging::log!("session: token expired");
                self.clear_user();
                false
            }
            RestoreOutcome::UnknownRole(role) => {
                leptos::logging::warn!("session: rejecting unknown role {role:?}");
                self.clear_user();
                false
            }
            RestoreOutcome::Failed(e) => {
                leptos::logging::warn!("session: restore failed: {e}");
                self.clear_user();
                false
            }
        }
    }

    fn persist(&self) {
        let token = self.session.token.as_deref().unwrap_or_default();
        log_storage_error(self.storage.set_item(TOKEN_KEY, token));
        match serde_json::to_string(&PersistedSession::from(&self.session)) {
            Ok(raw) => log_storage_error(self.storage.set_item(USER_KEY, &raw)),
            Err(e) => leptos::logging::warn!("session: failed to encode persisted user: {e}"),
        }
    }
}

fn log_storage_error(result: Result<(), StorageError>) {
    match result {
        Ok(()) | Err(StorageError::Unavailable) => {}
        Err(e) => leptos::logging::warn!("session: {e}"),
    }
}
