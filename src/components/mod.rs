//! Reusable UI components.
//!
//! ARCHITECTURE
//! ============
//! `route_gate` and `role_gate` apply the navigation guard to whole pages and
//! individual elements; `layout` draws the navigation chrome around pages.

pub mod layout;
pub mod role_gate;
pub mod route_gate;
