//! Page-level navigation guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! Wraps every routed page. Reads the session signal synchronously; session
//! restore has completed before the router mounts, so the first decision
//! already sees the restored state.

use leptos::prelude::*;
use leptos_router::components::Redirect;

use crate::config::ClientConfig;
use crate::router::guard::{self, Decision};
use crate::router::routes::RouteDescriptor;
use crate::state::UserStore;

#[component]
pub fn RouteGate(route: &'static RouteDescriptor, children: ChildrenFn) -> impl IntoView {
    let session = expect_context::<RwSignal<UserStore>>();
    let targets = expect_context::<ClientConfig>().redirects();
    let decision = Memo::new(move |_| session.with(|s| guard::decide(&route.meta, &s.snapshot(), &targets)));

    move || match decision.get() {
        Decision::Proceed => children(),
        Decision::Redirect { to, reason } => {
            leptos::logging::log!("guard: {} -> {to} ({reason:?})", route.path);
            view! { <Redirect path=to/> }.into_any()
        }
    }
}
