//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and delegates chrome and
//! access control to `components`.

pub mod home;
pub mod login;
pub mod not_found;
pub mod section;
