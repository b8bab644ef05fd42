//! Networking modules for the REST backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `request` is the HTTP wrapper, `api` names the endpoints, `types` defines
//! the wire schema, and `error` the failures callers see.

pub mod api;
pub mod error;
pub mod request;
pub mod types;
