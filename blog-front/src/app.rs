use leptos::prelude::*;

use crate::components::{Login, PostDetail, PostForm, PostList, Register};
use crate::session::Session;

/// Экраны приложения; полноценный роутер тут не нужен.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Route {
    List,
    Login,
    Register,
    Post(i64),
    Create,
    Edit(i64),
}

#[component]
pub fn App() -> impl IntoView {
    let session = Session::new();
    provide_context(session);

    let route = RwSignal::new(Route::List);

    view! {
        <main class="page">
            <section class="container">
                <header class="top-bar">
                    <h2>"Blog Front"</h2>
                    <button on:click=move |_| route.set(Route::List)>"Posts"</button>
                    <Show when=move || session.is_authenticated()>
                        <button on:click=move |_| route.set(Route::Create)>"New post"</button>
                        <span class="whoami">
                            {move || session.display_name().unwrap_or_default()}
                        </span>
                        <button on:click=move |_| {
                            session.log_out();
                            route.set(Route::Login);
                        }>"Log out"</button>
                    </Show>
                    <Show when=move || !session.is_authenticated()>
                        <button on:click=move |_| route.set(Route::Register)>"Register"</button>
                        <button on:click=move |_| route.set(Route::Login)>"Login"</button>
                    </Show>
                </header>

                {move || match route.get() {
                    Route::List => view! { <PostList route=route /> }.into_any(),
                    Route::Login => view! { <Login route=route /> }.into_any(),
                    Route::Register => view! { <Register route=route /> }.into_any(),
                    Route::Post(id) => view! { <PostDetail post_id=id route=route /> }.into_any(),
                    // защищённые экраны: без credential показываем логин
                    Route::Create | Route::Edit(_) if !session.is_authenticated() => {
                        view! { <Login route=route /> }.into_any()
                    }
                    Route::Create => view! { <PostForm post_id=None route=route /> }.into_any(),
                    Route::Edit(id) => {
                        view! { <PostForm post_id=Some(id) route=route /> }.into_any()
                    }
                }}
            </section>
        </main>
    }
}
