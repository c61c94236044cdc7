use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::app::Route;
use crate::components::ErrorBanner;
use crate::session::Session;

#[component]
pub(crate) fn Login(route: RwSignal<Route>) -> impl IntoView {
    let session = expect_context::<Session>();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let pending = RwSignal::new(false);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        error.set(None);
        pending.set(true);
        spawn_local(async move {
            let email = email.get_untracked();
            let password = password.get_untracked();
            match api::login(&session, email.trim(), &password).await {
                Ok(auth) => {
                    session.log_in(&auth.token);
                    route.set(Route::List);
                }
                Err(err) => error.set(Some(err.to_string())),
            }
            pending.set(false);
        });
    };

    view! {
        <form class="auth-form" on:submit=on_submit>
            <h3>"Log in"</h3>
            <ErrorBanner error=error />

            <input
                placeholder="Email"
                type="email"
                prop:value=move || email.get()
                on:input=move |ev| email.set(event_target_value(&ev))
                required
            />
            <input
                placeholder="Password"
                type="password"
                prop:value=move || password.get()
                on:input=move |ev| password.set(event_target_value(&ev))
                required
            />

            <button type="submit" disabled=move || pending.get()>"Log in"</button>

            <small>
                "No account yet? "
                <button type="button" on:click=move |_| route.set(Route::Register)>
                    "Register"
                </button>
            </small>
        </form>
    }
}
