//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! The session store is provided as an `RwSignal<UserStore>` context so every
//! guard and component observes mutations as soon as they happen.

pub mod role;
pub mod session;
pub mod storage;

/// Session store backed by browser `localStorage`.
pub type UserStore = session::SessionStore<storage::LocalStorage>;
