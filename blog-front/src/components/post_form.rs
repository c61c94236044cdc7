use blog_front_core::Category;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::api::PostPayload;
use crate::app::Route;
use crate::components::ErrorBanner;
use crate::session::Session;

fn non_empty(value: String) -> Option<String> {
    let value = value.trim().to_string();
    (!value.is_empty()).then_some(value)
}

/// Форма создания/редактирования поста. В режиме редактирования
/// пост предзагружается, чужой пост блокирует форму.
#[component]
pub(crate) fn PostForm(post_id: Option<i64>, route: RwSignal<Route>) -> impl IntoView {
    let session = expect_context::<Session>();
    let is_edit = post_id.is_some();

    let title = RwSignal::new(String::new());
    let content = RwSignal::new(String::new());
    let extra = RwSignal::new(String::new());
    let image = RwSignal::new(String::new());
    let category = RwSignal::new(String::new());
    let categories = RwSignal::new(Vec::<Category>::new());
    let error = RwSignal::new(None::<String>);
    let blocked = RwSignal::new(false);
    let pending = RwSignal::new(false);

    spawn_local(async move {
        // неудача некритична: категорию можно вписать руками
        if let Ok(list) = api::fetch_categories(&session).await {
            categories.set(list);
        }
    });

    if let Some(id) = post_id {
        spawn_local(async move {
            match api::fetch_post(&session, id).await {
                Ok(data) => {
                    let owner = session
                        .display_name()
                        .is_some_and(|name| name == data.post.author);
                    if !owner {
                        blocked.set(true);
                        error.set(Some("You are not the owner of this post.".to_string()));
                        return;
                    }
                    title.set(data.post.title);
                    content.set(data.post.content);
                    extra.set(data.post.extra.unwrap_or_default());
                    image.set(data.post.image.unwrap_or_default());
                    category.set(data.post.category.unwrap_or_default());
                }
                Err(err) => error.set(Some(err.to_string())),
            }
        });
    }

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        error.set(None);

        let title_value = title.get_untracked().trim().to_string();
        let content_value = content.get_untracked().trim().to_string();
        let category_value = category.get_untracked().trim().to_string();
        if title_value.is_empty() || content_value.is_empty() || category_value.is_empty() {
            error.set(Some("Title, content and category are required.".to_string()));
            return;
        }

        let payload = PostPayload {
            title: title_value,
            content: content_value,
            extra: non_empty(extra.get_untracked()),
            image: non_empty(image.get_untracked()),
            category: category_value,
        };

        pending.set(true);
        spawn_local(async move {
            let result = match post_id {
                Some(id) => api::update_post(&session, id, &payload).await,
                None => api::create_post(&session, &payload).await,
            };
            match result {
                Ok(()) => route.set(Route::List),
                Err(err) => error.set(Some(err.to_string())),
            }
            pending.set(false);
        });
    };

    view! {
        <form class="post-form" on:submit=on_submit>
            <h3>{if is_edit { "Edit post" } else { "Create post" }}</h3>
            <ErrorBanner error=error />

            <button type="button" on:click=move |_| route.set(Route::List)>"← Back"</button>

            <Show when=move || !blocked.get()>
                <label>"Title (required)"</label>
                <input
                    prop:value=move || title.get()
                    on:input=move |ev| title.set(event_target_value(&ev))
                    required
                />

                <label>"Content (required)"</label>
                <input
                    prop:value=move || content.get()
                    on:input=move |ev| content.set(event_target_value(&ev))
                    required
                />

                <label>"Second line"</label>
                <input
                    prop:value=move || extra.get()
                    on:input=move |ev| extra.set(event_target_value(&ev))
                />

                <label>"Image (URL)"</label>
                <input
                    prop:value=move || image.get()
                    on:input=move |ev| image.set(event_target_value(&ev))
                />

                <label>"Category"</label>
                <Show
                    when=move || !categories.get().is_empty()
                    fallback=move || {
                        view! {
                            <input
                                placeholder="Exact name of an existing category"
                                prop:value=move || category.get()
                                on:input=move |ev| category.set(event_target_value(&ev))
                                required
                            />
                        }
                    }
                >
                    <select
                        prop:value=move || category.get()
                        on:change=move |ev| category.set(event_target_value(&ev))
                        required
                    >
                        <option value="" disabled>"Select a category"</option>
                        <For
                            each=move || categories.get()
                            key=|category| category.id
                            children=move |category| {
                                view! {
                                    <option value=category.title.clone()>{category.title}</option>
                                }
                            }
                        />
                    </select>
                </Show>

                <button type="submit" disabled=move || pending.get()>
                    {if is_edit { "Save changes" } else { "Create" }}
                </button>
            </Show>
        </form>
    }
}
