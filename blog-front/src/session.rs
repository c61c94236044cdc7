use blog_front_core::{Identity, identity_from_token};
use leptos::prelude::*;

const TOKEN_KEY: &str = "blog_token";

fn parse_token(raw: &str) -> Option<String> {
    let token = raw.trim().to_string();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

fn load_token() -> Option<String> {
    let window = web_sys::window()?;
    let storage = window.local_storage().ok()??;
    let raw = storage.get_item(TOKEN_KEY).ok()??;
    parse_token(&raw)
}

fn persist_token(token: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or_else(|| "window is not available".to_string())?;
    let storage = window
        .local_storage()
        .map_err(|_| "failed to access localStorage".to_string())?
        .ok_or_else(|| "localStorage is not available".to_string())?;

    storage
        .set_item(TOKEN_KEY, token)
        .map_err(|_| "failed to save token".to_string())
}

fn erase_token() -> Result<(), String> {
    let window = web_sys::window().ok_or_else(|| "window is not available".to_string())?;
    let storage = window
        .local_storage()
        .map_err(|_| "failed to access localStorage".to_string())?
        .ok_or_else(|| "localStorage is not available".to_string())?;

    storage
        .remove_item(TOKEN_KEY)
        .map_err(|_| "failed to clear token".to_string())
}

/// Сессия текущего пользователя: credential в сигнале + localStorage.
///
/// Создаётся один раз на старте приложения и передаётся явно всем,
/// кто ходит в API. Отсутствующий токен означает «аноним».
#[derive(Debug, Clone, Copy)]
pub(crate) struct Session {
    token: RwSignal<Option<String>>,
}

impl Session {
    /// Инициализирует сессию из localStorage: токен переживает перезагрузку.
    pub(crate) fn new() -> Self {
        Self {
            token: RwSignal::new(load_token()),
        }
    }

    /// Реактивное чтение токена (для view-замыканий).
    pub(crate) fn token(&self) -> Option<String> {
        self.token.get()
    }

    /// Нереактивное чтение токена (для построения запросов).
    pub(crate) fn bearer(&self) -> Option<String> {
        self.token.get_untracked()
    }

    pub(crate) fn is_authenticated(&self) -> bool {
        self.token.get().is_some()
    }

    /// Сохраняет credential после успешного логина.
    pub(crate) fn log_in(&self, token: &str) {
        if let Err(err) = persist_token(token) {
            leptos::logging::warn!("token not persisted: {err}");
        }
        self.token.set(parse_token(token));
    }

    /// Сбрасывает credential; сессия снова анонимна.
    pub(crate) fn log_out(&self) {
        if let Err(err) = erase_token() {
            leptos::logging::warn!("token not cleared: {err}");
        }
        self.token.set(None);
    }

    /// Claims из токена для отображения и проверок владения.
    ///
    /// Битый токен молча даёт `None` — сетевых запросов здесь нет.
    pub(crate) fn identity(&self) -> Option<Identity> {
        self.token.get().and_then(|token| identity_from_token(&token))
    }

    /// Имя из claims, если пользователь залогинен и токен читается.
    pub(crate) fn display_name(&self) -> Option<String> {
        self.identity().and_then(|identity| identity.name)
    }
}
