use serde::Deserialize;
use thiserror::Error;

/// Разделитель между базовым сообщением и деталями валидации.
const DETAIL_SEPARATOR: &str = " • ";

#[derive(Debug, Clone, Error)]
/// Ошибки клиентской части blog-front.
pub enum ApiError {
    /// Запрос отменён (superseded или teardown). Пользователю не показывается.
    #[error("request cancelled")]
    Cancelled,

    /// Ошибка транспорта: сеть недоступна, CORS и т.п.
    #[error("network error: {0}")]
    Network(String),

    /// Сервер ответил статусом ошибки; сообщение уже собрано из тела.
    #[error("{message}")]
    Http {
        /// HTTP-статус ответа.
        status: u16,
        /// Человекочитаемое сообщение (`ApiFailure::to_text`).
        message: String,
    },

    /// Успешный статус, но тело не удалось десериализовать.
    #[error("decode error: {0}")]
    Decode(String),
}

impl ApiError {
    /// Ошибка со статусом и нормализованным сообщением из тела ответа.
    pub fn from_failure(status: u16, body: &serde_json::Value) -> Self {
        Self::Http {
            status,
            message: ApiFailure::from_body(status, body).to_text(),
        }
    }

    /// `true` только для кооперативной отмены.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Тело ошибки в том виде, в котором его присылают разные ревизии API.
#[derive(Debug, Default, Deserialize)]
struct FailureBody {
    message: Option<String>,
    error: Option<String>,
    errors: Option<Vec<FailureEntry>>,
}

/// Элемент `errors`: строка, объект с message-подобным полем
/// (две конвенции именования) или что-то неизвестное.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FailureEntry {
    Text(String),
    Entry {
        message: Option<String>,
        mensaje: Option<String>,
    },
    Other(serde_json::Value),
}

impl FailureEntry {
    fn text(&self) -> Option<String> {
        let text = match self {
            Self::Text(text) => Some(text.as_str()),
            Self::Entry { message, mensaje } => {
                message.as_deref().or(mensaje.as_deref())
            }
            Self::Other(_) => None,
        };
        text.map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Каноническая форма ошибки сервера `{ message?, error?, errors? }`.
pub struct ApiFailure {
    /// Базовое сообщение: `message`, иначе `error`, иначе `Error HTTP <status>`.
    pub message: String,
    /// Фрагменты из `errors`, уже приведённые к строкам.
    pub details: Vec<String>,
}

impl ApiFailure {
    /// Нормализует произвольное JSON-тело ошибки.
    ///
    /// Тело, не являющееся объектом, и неизвестные форматы `errors`
    /// деградируют до `Error HTTP <status>` без паники.
    pub fn from_body(status: u16, body: &serde_json::Value) -> Self {
        let parsed: FailureBody = serde_json::from_value(body.clone()).unwrap_or_default();

        let message = parsed
            .message
            .or(parsed.error)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| format!("Error HTTP {status}"));

        let details = parsed
            .errors
            .unwrap_or_default()
            .iter()
            .filter_map(FailureEntry::text)
            .collect();

        Self { message, details }
    }

    /// Сообщение и детали одной строкой через ` • `.
    pub fn to_text(&self) -> String {
        if self.details.is_empty() {
            return self.message.clone();
        }
        let mut text = self.message.clone();
        for detail in &self.details {
            text.push_str(DETAIL_SEPARATOR);
            text.push_str(detail);
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_with_object_detail_composes_with_bullet() {
        let body = json!({ "message": "Invalid", "errors": [{ "message": "title required" }] });
        let failure = ApiFailure::from_body(400, &body);
        assert_eq!(failure.to_text(), "Invalid • title required");
    }

    #[test]
    fn prefers_message_over_error_field() {
        let body = json!({ "message": "primary", "error": "secondary" });
        let failure = ApiFailure::from_body(422, &body);
        assert_eq!(failure.message, "primary");
        assert!(failure.details.is_empty());
    }

    #[test]
    fn falls_back_to_error_field() {
        let body = json!({ "error": "boom" });
        let failure = ApiFailure::from_body(500, &body);
        assert_eq!(failure.to_text(), "boom");
    }

    #[test]
    fn falls_back_to_status_when_body_is_not_an_object() {
        let failure = ApiFailure::from_body(502, &json!("bad gateway"));
        assert_eq!(failure.to_text(), "Error HTTP 502");
    }

    #[test]
    fn blank_message_falls_back_to_status() {
        let body = json!({ "message": "   " });
        let failure = ApiFailure::from_body(404, &body);
        assert_eq!(failure.to_text(), "Error HTTP 404");
    }

    #[test]
    fn string_entries_and_both_key_conventions_contribute() {
        let body = json!({
            "message": "Invalid",
            "errors": ["plain", { "mensaje": "campo requerido" }, { "message": "too long" }],
        });
        let failure = ApiFailure::from_body(400, &body);
        assert_eq!(
            failure.to_text(),
            "Invalid • plain • campo requerido • too long"
        );
    }

    #[test]
    fn unknown_entries_are_skipped() {
        let body = json!({ "message": "Invalid", "errors": [42, { "code": 7 }, ""] });
        let failure = ApiFailure::from_body(400, &body);
        assert_eq!(failure.to_text(), "Invalid");
    }

    #[test]
    fn from_failure_builds_http_variant() {
        let body = json!({ "message": "nope" });
        let err = ApiError::from_failure(403, &body);
        match err {
            ApiError::Http { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "nope");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn only_cancelled_reports_cancelled() {
        assert!(ApiError::Cancelled.is_cancelled());
        assert!(!ApiError::Network("down".into()).is_cancelled());
        assert!(!ApiError::Decode("bad json".into()).is_cancelled());
    }
}
