//! Landing page: greets the user and lists their classes.

use leptos::prelude::*;

use crate::net::types::ClassItem;
use crate::state::UserStore;

#[component]
pub fn HomePage() -> impl IntoView {
    let session = expect_context::<RwSignal<UserStore>>();
    let classes = RwSignal::new(Vec::<ClassItem>::new());
    let error = RwSignal::new(None::<String>);

    #[cfg(feature = "csr")]
    {
        let config = expect_context::<crate::config::ClientConfig>();
        Effect::new(move || {
            let token = session.with(|s| s.snapshot().authorized.then(|| s.token().map(str::to_owned)).flatten());
            let Some(token) = token else {
                classes.set(Vec::new());
                return;
            };
            let client = crate::net::request::ApiClient::new(&config).with_token(Some(token));
            leptos::task::spawn_local(async move {
                match crate::net::api::fetch_data::<Vec<ClassItem>>(&client, "/api/classes", "Could not load classes.").await {
                    Ok(list) => {
                        classes.set(list);
                        error.set(None);
                    }
                    Err(msg) => error.set(Some(msg)),
                }
            });
        });
    }

    let greeting = move || {
        session.with(|s| match (&s.session().username, s.snapshot().authorized) {
            (Some(name), true) => format!("Welcome back, {name}"),
            _ => "Welcome".to_owned(),
        })
    };

    view! {
        <section class="home">
            <h1>{greeting}</h1>
            <Show when=move || error.get().is_some()>
                <p class="home__error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <ul class="class-list">
                <For
                    each=move || classes.get()
                    key=|class| class.id.clone()
                    children=|class| {
                        view! {
                            <li class="class-list__item">
                                <h2>{class.name}</h2>
                                <p>{class.description}</p>
                            </li>
                        }
                    }
                />
            </ul>
        </section>
    }
}
