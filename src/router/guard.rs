//! Navigation guard: decides whether a route transition proceeds.
//!
//! The guard is a pure function of route metadata and a session snapshot. It
//! never touches the network; session restore has already finished by the
//! time the router mounts.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use super::routes::RouteMeta;
use crate::state::role::Role;
use crate::state::session::SessionSnapshot;

/// Where the guard sends rejected navigations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedirectTargets {
    pub login: String,
    pub home: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RedirectReason {
    /// Route requires sign-in and the session is not authorized.
    Unauthenticated,
    /// Route restricts roles and the current role is not listed.
    Forbidden,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    Redirect { to: String, reason: RedirectReason },
}

/// Role membership. `None` in `required` admits users without a role.
pub fn has_role(required: &[Option<Role>], current: Option<Role>) -> bool {
    required.contains(&current)
}

/// Authentication is checked first, then role restriction.
pub fn decide(meta: &RouteMeta, session: &SessionSnapshot, targets: &RedirectTargets) -> Decision {
    if meta.requires_auth && !session.authorized {
        return Decision::Redirect {
            to: targets.login.clone(),
            reason: RedirectReason::Unauthenticated,
        };
    }
    if let Some(roles) = meta.roles {
        if !has_role(roles, session.role) {
            return Decision::Redirect {
                to: targets.home.clone(),
                reason: RedirectReason::Forbidden,
            };
        }
    }
    Decision::Proceed
}
