//! Платформонезависимая логика браузерного клиента блога.
//!
//! Крейт собирается и нативно, и под wasm32: здесь живут модель данных,
//! нормализация ошибок API, декодирование claims из токена и конечный
//! автомат поиска/пагинации. Всё, где возможны гонки (debounce,
//! отмена запросов, устаревшие ответы), описано здесь явными
//! переходами и покрыто нативными тестами; `blog-front` лишь
//! подключает таймеры и fetch браузера.
#![warn(missing_docs)]

mod auth;
mod error;
mod models;
mod search;

pub use auth::{Identity, identity_from_token};
pub use error::{ApiError, ApiFailure};
pub use models::{
    AuthData, Category, Comment, Envelope, Post, PostDetail, PostPage, format_timestamp,
};
pub use search::{
    DEBOUNCE_MS, IssuedQuery, PAGE_SIZE, PostQuery, ResponseOutcome, SearchAction, SearchPhase,
    SearchState,
};
