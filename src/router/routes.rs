//! Static route table.
//!
//! DESIGN
//! ======
//! Routes are plain data: a path plus metadata the guard reads. The table is
//! built once and never mutated; the Leptos router in `app` mounts one view
//! per entry and looks its metadata up here.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use crate::state::role::Role;

/// Per-route authorization and layout metadata.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouteMeta {
    pub requires_auth: bool,
    /// Allowed roles. `None` means no role restriction.
    pub roles: Option<&'static [Option<Role>]>,
    /// Render without the top/side navigation chrome.
    pub hide_layout: bool,
}

impl RouteMeta {
    const PUBLIC: Self = Self {
        requires_auth: false,
        roles: None,
        hide_layout: false,
    };

    const AUTHENTICATED: Self = Self {
        requires_auth: true,
        ..Self::PUBLIC
    };

    const BARE: Self = Self {
        hide_layout: true,
        ..Self::PUBLIC
    };
}

/// Which page renders a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteView {
    Home,
    Section,
    Login,
    NotFound,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub path: &'static str,
    pub title: &'static str,
    pub view: RouteView,
    pub meta: RouteMeta,
}

pub const STAFF_ROLES: &[Option<Role>] = &[Some(Role::Teacher), Some(Role::Admin)];
const MEMBERS: &[Option<Role>] = &[Some(Role::Student), Some(Role::Teacher), Some(Role::Admin)];
const ANYONE: &[Option<Role>] = &[None, Some(Role::Student), Some(Role::Teacher), Some(Role::Admin)];

const fn route(path: &'static str, title: &'static str, view: RouteView, meta: RouteMeta) -> RouteDescriptor {
    RouteDescriptor { path, title, view, meta }
}

static ROUTES: &[RouteDescriptor] = &[
    route("/", "My Classes", RouteView::Home, RouteMeta::PUBLIC),
    route("/calendar", "Calendar", RouteView::Section, RouteMeta::AUTHENTICATED),
    route("/archived-classes", "Archived Classes", RouteView::Section, RouteMeta::AUTHENTICATED),
    route("/settings", "Settings", RouteView::Section, RouteMeta::AUTHENTICATED),
    route("/class-materials", "Class Materials", RouteView::Section, RouteMeta::AUTHENTICATED),
    route("/class-basic-info", "Class Information", RouteView::Section, RouteMeta::AUTHENTICATED),
    route("/class-grades", "Grades", RouteView::Section, RouteMeta::AUTHENTICATED),
    route(
        "/assignment-grading",
        "Assignment Grading",
        RouteView::Section,
        RouteMeta {
            roles: Some(STAFF_ROLES),
            ..RouteMeta::AUTHENTICATED
        },
    ),
    route(
        "/code-submission",
        "Code Submission",
        RouteView::Section,
        RouteMeta {
            roles: Some(MEMBERS),
            ..RouteMeta::AUTHENTICATED
        },
    ),
    route(
        "/course-catalog",
        "Course Catalog",
        RouteView::Section,
        RouteMeta {
            roles: Some(ANYONE),
            ..RouteMeta::PUBLIC
        },
    ),
    route("/login", "Sign In", RouteView::Login, RouteMeta::BARE),
    route("/register", "Register", RouteView::Section, RouteMeta::BARE),
    route("/reset-password", "Reset Password", RouteView::Section, RouteMeta::BARE),
];

static NOT_FOUND: RouteDescriptor = route("*", "Page Not Found", RouteView::NotFound, RouteMeta::PUBLIC);

/// Ordered, immutable list of routes with a catch-all fallback.
#[derive(Clone, Copy, Debug)]
pub struct RouteTable {
    routes: &'static [RouteDescriptor],
    fallback: &'static RouteDescriptor,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            routes: ROUTES,
            fallback: &NOT_FOUND,
        }
    }
}

impl RouteTable {
    pub fn routes(&self) -> &'static [RouteDescriptor] {
        self.routes
    }

    pub fn fallback(&self) -> &'static RouteDescriptor {
        self.fallback
    }

    /// Match `path` exactly after dropping query, fragment, and trailing slash.
    pub fn resolve(&self, path: &str) -> &'static RouteDescriptor {
        let normalized = normalize_path(path);
        self.routes
            .iter()
            .find(|r| r.path == normalized)
            .unwrap_or(self.fallback)
    }
}

fn normalize_path(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let trimmed = path[..end].trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}
