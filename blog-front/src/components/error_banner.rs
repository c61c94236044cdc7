use leptos::prelude::*;

/// Закрываемый баннер с текстом ошибки; пустой сигнал — ничего не рисуем.
#[component]
pub(crate) fn ErrorBanner(error: RwSignal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || error.get().is_some()>
            <div class="error-banner">
                <span>{move || error.get().unwrap_or_default()}</span>
                <button on:click=move |_| error.set(None)>"✕"</button>
            </div>
        </Show>
    }
}
