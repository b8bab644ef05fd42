//! Top bar and side navigation around routed pages.

use leptos::prelude::*;
use leptos_meta::Title;
use leptos_router::NavigateOptions;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use super::role_gate::RoleGate;
use crate::config::ClientConfig;
use crate::router::routes::{RouteDescriptor, STAFF_ROLES};
use crate::state::UserStore;

/// Draws navigation chrome unless the route asks for a bare page.
#[component]
pub fn AppLayout(route: &'static RouteDescriptor, children: Children) -> impl IntoView {
    if route.meta.hide_layout {
        return view! {
            <Title text=route.title/>
            <main class="bare-page">{children()}</main>
        }
        .into_any();
    }

    let session = expect_context::<RwSignal<UserStore>>();
    let config = expect_context::<ClientConfig>();
    let navigate = use_navigate();

    let display_name = move || {
        session.with(|s| {
            let session = s.session();
            if session.authorized {
                session.username.clone().unwrap_or_else(|| "me".to_owned())
            } else {
                "Guest".to_owned()
            }
        })
    };
    let authorized = move || session.with(|s| s.snapshot().authorized);

    let login_path = config.login_path.clone();
    let on_logout = move |_| {
        #[cfg(feature = "csr")]
        {
            let token = session.with_untracked(|s| s.token().map(str::to_owned));
            let client = crate::net::request::ApiClient::new(&config).with_token(token);
            leptos::task::spawn_local(async move {
                crate::net::api::logout(&client).await;
            });
        }
        session.update(UserStore::clear_user);
        navigate(&login_path, NavigateOptions::default());
    };

    view! {
        <Title text=route.title/>
        <header class="top-bar">
            <A href="/">"Classroom"</A>
            <span class="top-bar__user">{display_name}</span>
            <a class="top-bar__login" href="/login" class:hidden=authorized>"Sign in"</a>
            <button class="top-bar__logout" class:hidden=move || !authorized() on:click=on_logout>
                "Sign out"
            </button>
        </header>
        <nav class="side-nav">
            <A href="/">"Classes"</A>
            <A href="/calendar">"Calendar"</A>
            <A href="/class-materials">"Materials"</A>
            <A href="/class-grades">"Grades"</A>
            <A href="/code-submission">"Code"</A>
            <RoleGate roles=STAFF_ROLES>
                <A href="/assignment-grading">"Grading"</A>
            </RoleGate>
            <A href="/archived-classes">"Archived"</A>
            <A href="/settings">"Settings"</A>
        </nav>
        <main class="page">{children()}</main>
    }
    .into_any()
}
