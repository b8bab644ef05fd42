//! Element-level role visibility.

use leptos::prelude::*;

use crate::router::guard::has_role;
use crate::state::UserStore;
use crate::state::role::Role;

/// Render `children` only while the current role is one of `roles`.
/// Uses the same membership rule as the navigation guard.
#[component]
pub fn RoleGate(roles: &'static [Option<Role>], children: ChildrenFn) -> impl IntoView {
    let session = expect_context::<RwSignal<UserStore>>();
    let visible = Memo::new(move |_| session.with(|s| has_role(roles, s.snapshot().role)));

    view! { <Show when=move || visible.get()>{children()}</Show> }
}
