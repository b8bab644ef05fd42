//! Client-side routing: the static route table and the guard that gates it.

pub mod guard;
pub mod routes;
