//! Course-section pages (calendar, materials, grades, ...).
//!
//! Section bodies are rendered by feature components outside this crate's
//! core; the page supplies the heading and access-controlled frame.

use leptos::prelude::*;

#[component]
pub fn SectionPage(title: &'static str) -> impl IntoView {
    view! {
        <section class="section-page">
            <h1>{title}</h1>
            <div class="section-page__body"></div>
        </section>
    }
}
