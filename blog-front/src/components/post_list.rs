use blog_front_core::{Category, SearchPhase, format_timestamp};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::app::Route;
use crate::controller::ListController;
use crate::session::Session;

/// Список постов: поиск с debounce, фильтр по категории, пагинация.
#[component]
pub(crate) fn PostList(route: RwSignal<Route>) -> impl IntoView {
    let session = expect_context::<Session>();
    let controller = ListController::new(session);
    let state = controller.state();

    let categories = RwSignal::new(Vec::<Category>::new());
    spawn_local(async move {
        // неудача некритична: остаёмся без фильтра категорий
        if let Ok(list) = api::fetch_categories(&session).await {
            categories.set(list);
        }
    });

    view! {
        <h3>"Posts"</h3>

        <div class="filters">
            <input
                placeholder="Search by title or content…"
                prop:value=move || state.with(|s| s.raw_text().to_string())
                on:input=move |ev| controller.on_text_input(event_target_value(&ev))
            />
            <select
                prop:value=move || state.with(|s| s.category().to_string())
                on:change=move |ev| controller.on_category(event_target_value(&ev))
            >
                <option value="">"All categories"</option>
                <For
                    each=move || categories.get()
                    key=|category| category.id
                    children=move |category| {
                        view! { <option value=category.title.clone()>{category.title}</option> }
                    }
                />
            </select>
        </div>

        <Show when=move || state.with(|s| s.error().is_some())>
            <div class="error-banner">
                <span>{move || state.with(|s| s.error().unwrap_or_default().to_string())}</span>
                <button on:click=move |_| controller.retry()>"Retry"</button>
            </div>
        </Show>

        <Show when=move || state.with(|s| s.is_loading())>
            <p>"Loading…"</p>
        </Show>

        <Show when=move || {
            state.with(|s| s.phase() == SearchPhase::Loaded && s.items().is_empty())
        }>
            <p>"Nothing to show."</p>
        </Show>

        <ul class="post-list">
            <For
                each=move || state.with(|s| s.items().to_vec())
                key=|post| post.id
                children=move |post| {
                    let post_id = post.id;
                    let author = post.author.clone();
                    let category = post.category.clone().unwrap_or_else(|| "N/A".to_string());
                    let date = post
                        .created_at
                        .as_deref()
                        .map(format_timestamp)
                        .unwrap_or_default();
                    view! {
                        <li class="post-card">
                            <h4>{post.title.clone()}</h4>
                            <small>{format!("By {} — {category} — {date}", post.author)}</small>
                            <p>{post.content.clone()}</p>
                            <div class="actions">
                                <button on:click=move |_| route.set(Route::Post(post_id))>
                                    "View"
                                </button>
                                <Show when=move || {
                                    session.display_name().is_some_and(|name| name == author)
                                }>
                                    <button on:click=move |_| route.set(Route::Edit(post_id))>
                                        "Edit"
                                    </button>
                                </Show>
                            </div>
                        </li>
                    }
                }
            />
        </ul>

        <Show when=move || state.with(|s| s.total() > 0)>
            <div class="pager">
                <button
                    on:click=move |_| {
                        let page = state.with_untracked(|s| s.page());
                        controller.on_page(page.saturating_sub(1));
                    }
                    disabled=move || state.with(|s| !s.can_prev())
                >
                    "« Prev"
                </button>
                <span>
                    {move || {
                        state.with(|s| {
                            format!("Page {} of {} — {} results", s.page(), s.total_pages(), s.total())
                        })
                    }}
                </span>
                <button
                    on:click=move |_| {
                        let page = state.with_untracked(|s| s.page());
                        controller.on_page(page + 1);
                    }
                    disabled=move || state.with(|s| !s.can_next())
                >
                    "Next »"
                </button>
            </div>
        </Show>
    }
}
