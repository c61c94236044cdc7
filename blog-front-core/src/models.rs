use chrono::DateTime;
use serde::Deserialize;

/// Успешные ответы API приходят завёрнутыми в `{ "data": ... }`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// Полезная нагрузка ответа.
    pub data: T,
}

/// Пост в списке и в деталях.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Post {
    /// Идентификатор поста.
    pub id: i64,
    /// Заголовок.
    pub title: String,
    /// Имя автора; по нему же проверяется владение постом.
    pub author: String,
    /// Категория, если назначена.
    #[serde(default)]
    pub category: Option<String>,
    /// Основной текст.
    #[serde(default)]
    pub content: String,
    /// Дополнительная строка текста.
    #[serde(default)]
    pub extra: Option<String>,
    /// URL картинки.
    #[serde(default)]
    pub image: Option<String>,
    /// Дата публикации (RFC 3339).
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Пост вместе с комментариями (ответ детального эндпоинта).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PostDetail {
    /// Сам пост.
    #[serde(flatten)]
    pub post: Post,
    /// Комментарии; отсутствующее поле читается как пустой список.
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// Комментарий к посту.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Comment {
    /// Идентификатор комментария.
    pub id: i64,
    /// Имя автора.
    #[serde(default)]
    pub author: String,
    /// Текст; сервер присылает его уже экранированным.
    pub content: String,
    /// Дата (RFC 3339).
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Категория из справочника.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Category {
    /// Идентификатор категории.
    pub id: i64,
    /// Название; именно оно уходит в фильтр `category`.
    pub title: String,
}

/// Страница результатов списка постов.
///
/// Декодируется снисходительно: отсутствующие `items`/`total` дают
/// пустую страницу, отсутствующий `totalPages` читается как 1.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPage {
    /// Посты текущей страницы, не длиннее `pageSize`.
    #[serde(default)]
    pub items: Vec<Post>,
    /// Номер страницы (нумерация с 1).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Размер страницы, которым отвечал сервер.
    #[serde(default)]
    pub page_size: u32,
    /// Общее число результатов.
    #[serde(default)]
    pub total: u64,
    /// Общее число страниц.
    #[serde(default = "default_total_pages")]
    pub total_pages: u32,
}

fn default_page() -> u32 {
    1
}

fn default_total_pages() -> u32 {
    1
}

/// Полезная нагрузка ответа логина.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthData {
    /// Bearer-токен.
    pub token: String,
}

/// RFC 3339 → строка для отображения; пустая строка, если дата не парсится.
pub fn format_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn post_page_defaults_for_missing_fields() {
        let page: PostPage = serde_json::from_value(json!({})).expect("empty page must parse");
        assert!(page.items.is_empty());
        assert_eq!(page.page, 1);
        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn post_page_reads_camel_case_wire_names() {
        let page: PostPage = serde_json::from_value(json!({
            "items": [],
            "page": 2,
            "pageSize": 5,
            "total": 12,
            "totalPages": 3,
        }))
        .expect("page must parse");
        assert_eq!(page.page, 2);
        assert_eq!(page.page_size, 5);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn post_detail_flattens_post_and_defaults_comments() {
        let detail: PostDetail = serde_json::from_value(json!({
            "id": 7,
            "title": "t",
            "author": "ann",
            "content": "body",
        }))
        .expect("detail must parse");
        assert_eq!(detail.post.id, 7);
        assert!(detail.comments.is_empty());
    }

    #[test]
    fn format_timestamp_renders_rfc3339() {
        assert_eq!(
            format_timestamp("2026-01-02T03:04:05Z"),
            "2026-01-02 03:04"
        );
    }

    #[test]
    fn format_timestamp_is_empty_for_garbage() {
        assert_eq!(format_timestamp("not-a-date"), "");
    }
}
