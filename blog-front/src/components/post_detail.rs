use blog_front_core::PostDetail as PostWithComments;
use blog_front_core::format_timestamp;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::app::Route;
use crate::components::ErrorBanner;
use crate::session::Session;

const COMMENT_MAX_LEN: usize = 1000;

/// Детали поста: текст, комментарии, форма комментария,
/// edit/delete для владельца.
#[component]
pub(crate) fn PostDetail(post_id: i64, route: RwSignal<Route>) -> impl IntoView {
    let session = expect_context::<Session>();

    let detail = RwSignal::new(None::<PostWithComments>);
    let error = RwSignal::new(None::<String>);
    let comment_text = RwSignal::new(String::new());
    let pending = RwSignal::new(false);

    let load = move || {
        spawn_local(async move {
            match api::fetch_post(&session, post_id).await {
                Ok(data) => detail.set(Some(data)),
                Err(err) => error.set(Some(err.to_string())),
            }
        });
    };
    load();

    let is_owner = move || {
        let author = detail.with(|d| d.as_ref().map(|d| d.post.author.clone()));
        match (session.display_name(), author) {
            (Some(name), Some(author)) => name == author,
            _ => false,
        }
    };

    let on_delete = move |_| {
        if !is_owner() {
            error.set(Some("You are not the owner of this post.".to_string()));
            return;
        }
        pending.set(true);
        spawn_local(async move {
            match api::delete_post(&session, post_id).await {
                Ok(()) => route.set(Route::List),
                Err(err) => error.set(Some(err.to_string())),
            }
            pending.set(false);
        });
    };

    let on_comment = move |ev: SubmitEvent| {
        ev.prevent_default();
        error.set(None);
        if !session.is_authenticated() {
            error.set(Some("Log in to comment.".to_string()));
            return;
        }
        pending.set(true);
        spawn_local(async move {
            let text = comment_text.get_untracked();
            match api::add_comment(&session, post_id, text.trim()).await {
                Ok(()) => {
                    comment_text.set(String::new());
                    // перечитываем пост: комментарии приходят вместе с ним
                    load();
                }
                Err(err) => error.set(Some(err.to_string())),
            }
            pending.set(false);
        });
    };

    let chars_left = move || COMMENT_MAX_LEN.saturating_sub(comment_text.get().chars().count());

    view! {
        <button on:click=move |_| route.set(Route::List)>"← Back"</button>
        <ErrorBanner error=error />

        {move || match detail.get() {
            None => view! { <p>"Loading…"</p> }.into_any(),
            Some(data) => {
                let post = data.post;
                let category = post.category.clone().unwrap_or_else(|| "N/A".to_string());
                let date = post
                    .created_at
                    .as_deref()
                    .map(format_timestamp)
                    .unwrap_or_default();
                let image = post.image.clone().map(|src| {
                    view! { <img src=src class="post-image" /> }
                });
                let extra = post.extra.clone().map(|line| view! { <p>{line}</p> });
                let owner_controls = is_owner().then(|| {
                    view! {
                        <div class="actions">
                            <button on:click=move |_| route.set(Route::Edit(post_id))>
                                "Edit"
                            </button>
                            <button on:click=on_delete disabled=move || pending.get()>
                                "Delete"
                            </button>
                        </div>
                    }
                });
                let comments = if data.comments.is_empty() {
                    view! { <p>"No comments yet."</p> }.into_any()
                } else {
                    let entries = data
                        .comments
                        .iter()
                        .map(|comment| {
                            let date = comment
                                .created_at
                                .as_deref()
                                .map(format_timestamp)
                                .unwrap_or_default();
                            view! {
                                <li class="comment">
                                    <div class="comment-head">
                                        <strong>{comment.author.clone()}</strong>
                                        <small>{date}</small>
                                    </div>
                                    <div>{comment.content.clone()}</div>
                                </li>
                            }
                        })
                        .collect_view();
                    view! { <ul class="comments">{entries}</ul> }.into_any()
                };

                view! {
                    <article class="post">
                        <h3>{post.title.clone()}</h3>
                        <small>{format!("By {} — {category} — {date}", post.author)}</small>
                        {image}
                        <p>{post.content.clone()}</p>
                        {extra}
                        {owner_controls}
                    </article>
                    <hr />
                    <h4>"Comments"</h4>
                    {comments}
                }
                .into_any()
            }
        }}

        <Show
            when=move || session.is_authenticated()
            fallback=|| view! { <p>"Log in to comment."</p> }
        >
            <form class="comment-form" on:submit=on_comment>
                <textarea
                    placeholder="Write a comment…"
                    prop:value=move || comment_text.get()
                    on:input=move |ev| comment_text.set(event_target_value(&ev))
                    maxlength=COMMENT_MAX_LEN.to_string()
                    required
                />
                <small>
                    {move || format!("{} characters left (max {COMMENT_MAX_LEN}).", chars_left())}
                </small>
                <button type="submit" disabled=move || pending.get()>"Comment"</button>
            </form>
        </Show>
    }
}
