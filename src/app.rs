//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::provide_meta_context;
use leptos_router::hooks::use_location;
use leptos_router::{
    StaticSegment, WildcardSegment,
    components::{Route, Router, Routes},
};

use crate::components::layout::AppLayout;
use crate::components::route_gate::RouteGate;
use crate::config::ClientConfig;
use crate::pages::{home::HomePage, login::LoginPage, not_found::NotFoundPage, section::SectionPage};
use crate::router::routes::{RouteDescriptor, RouteTable, RouteView};
use crate::state::UserStore;

/// Root application component.
///
/// `store` must already be restored; the router mounts with whatever it holds.
#[component]
pub fn App(store: UserStore, config: ClientConfig) -> impl IntoView {
    provide_meta_context();

    let session = RwSignal::new(store);
    provide_context(session);
    provide_context(config);

    view! {
        <Router>
            <Routes fallback=|| view! { <RoutedPage/> }>
                <Route path=StaticSegment("") view=RoutedPage/>
                <Route path=WildcardSegment("any") view=RoutedPage/>
            </Routes>
        </Router>
    }
}

/// Resolve the current location against the route table, then guard and
/// lay out the matching page.
#[component]
fn RoutedPage() -> impl IntoView {
    let table = RouteTable::default();
    let location = use_location();

    move || {
        let route = table.resolve(&location.pathname.get());
        view! {
            <RouteGate route=route>
                <AppLayout route=route>{page_view(route)}</AppLayout>
            </RouteGate>
        }
    }
}

fn page_view(route: &'static RouteDescriptor) -> AnyView {
    match route.view {
        RouteView::Home => view! { <HomePage/> }.into_any(),
        RouteView::Login => view! { <LoginPage/> }.into_any(),
        RouteView::Section => view! { <SectionPage title=route.title/> }.into_any(),
        RouteView::NotFound => view! { <NotFoundPage/> }.into_any(),
    }
}
