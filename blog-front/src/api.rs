use blog_front_core::{
    ApiError, AuthData, Category, Envelope, PostDetail, PostPage, PostQuery,
};
use gloo_net::http::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use web_sys::AbortSignal;

use crate::session::Session;

const API_BASE_URL: &str = match option_env!("BLOG_API_BASE_URL") {
    Some(value) => value,
    None => "http://localhost:3000/api",
};

fn endpoint(path: &str) -> String {
    format!(
        "{}/{}",
        API_BASE_URL.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

// Прерванный fetch — это отмена, а не сетевая ошибка.
fn transport_error(err: gloo_net::Error) -> ApiError {
    match err {
        gloo_net::Error::JsError(js) if js.name == "AbortError" => ApiError::Cancelled,
        other => ApiError::Network(other.to_string()),
    }
}

async fn decode_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let succeeded = response.ok();

    // тело парсится всегда, независимо от статуса; не-JSON подменяется
    // минимальным синтетическим телом
    let body: serde_json::Value = match response.json().await {
        Ok(value) => value,
        Err(_) => serde_json::json!({
            "message": if succeeded { "OK".to_string() } else { format!("HTTP {status}") },
        }),
    };

    if !succeeded {
        return Err(ApiError::from_failure(status, &body));
    }
    serde_json::from_value(body).map_err(|err| ApiError::Decode(err.to_string()))
}

/// Единая точка доступа к API: все запросы собираются и уходят отсюда.
pub(crate) struct ApiCall<'a> {
    method: Method,
    path: String,
    query: Vec<(&'static str, String)>,
    body: Option<serde_json::Value>,
    requires_auth: bool,
    signal: Option<&'a AbortSignal>,
}

impl<'a> ApiCall<'a> {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            requires_auth: false,
            signal: None,
        }
    }

    pub(crate) fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub(crate) fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub(crate) fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub(crate) fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub(crate) fn query(mut self, params: Vec<(&'static str, String)>) -> Self {
        self.query = params;
        self
    }

    pub(crate) fn json<B: Serialize>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|err| ApiError::Decode(err.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }

    pub(crate) fn auth(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    pub(crate) fn signal(mut self, signal: Option<&'a AbortSignal>) -> Self {
        self.signal = signal;
        self
    }

    /// Отправляет запрос и возвращает распарсенное JSON-тело.
    ///
    /// Авторизационный заголовок добавляется только когда он запрошен
    /// и credential есть; без credential запрос уходит как есть, отказ —
    /// забота сервера. Отсутствующее тело не сериализуется вовсе
    /// (литерал `"null"` не уходит никогда).
    pub(crate) async fn send<T: DeserializeOwned>(self, session: &Session) -> Result<T, ApiError> {
        let url = endpoint(&self.path);

        let mut builder = RequestBuilder::new(&url)
            .method(self.method)
            .header("Content-Type", "application/json")
            .abort_signal(self.signal);

        if !self.query.is_empty() {
            builder = builder.query(self.query.iter().map(|(key, value)| (*key, value.as_str())));
        }

        if self.requires_auth {
            if let Some(token) = session.bearer() {
                builder = builder.header("Authorization", &format!("Bearer {token}"));
            }
        }

        let request = match &self.body {
            Some(body) => builder.json(body).map_err(transport_error)?,
            None => builder.build().map_err(transport_error)?,
        };

        let response = request.send().await.map_err(transport_error)?;
        decode_response(response).await
    }
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct CommentRequest<'a> {
    content: &'a str,
}

/// Тело create/update поста. Пустые опциональные поля не уходят вовсе,
/// чтобы не спотыкаться о серверную валидацию `optional`-полей.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct PostPayload {
    pub(crate) title: String,
    pub(crate) content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) extra: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) image: Option<String>,
    pub(crate) category: String,
}

pub(crate) async fn login(
    session: &Session,
    email: &str,
    password: &str,
) -> Result<AuthData, ApiError> {
    let payload = LoginRequest { email, password };
    let envelope: Envelope<AuthData> = ApiCall::post("/auth/login")
        .json(&payload)?
        .send(session)
        .await?;
    Ok(envelope.data)
}

pub(crate) async fn register(
    session: &Session,
    name: &str,
    email: &str,
    password: &str,
) -> Result<(), ApiError> {
    let payload = RegisterRequest {
        name,
        email,
        password,
    };
    let _: serde_json::Value = ApiCall::post("/auth/register")
        .json(&payload)?
        .send(session)
        .await?;
    Ok(())
}

/// Запрос списка постов; единственный вызов, привязанный к abort-сигналу.
pub(crate) async fn search_posts(
    session: &Session,
    query: &PostQuery,
    signal: Option<&AbortSignal>,
) -> Result<PostPage, ApiError> {
    let envelope: Envelope<PostPage> = ApiCall::get("/posts")
        .query(query.params())
        .signal(signal)
        .send(session)
        .await?;
    Ok(envelope.data)
}

pub(crate) async fn fetch_post(session: &Session, id: i64) -> Result<PostDetail, ApiError> {
    let envelope: Envelope<PostDetail> = ApiCall::get(format!("/posts/{id}"))
        .send(session)
        .await?;
    Ok(envelope.data)
}

pub(crate) async fn fetch_categories(session: &Session) -> Result<Vec<Category>, ApiError> {
    let envelope: Envelope<Vec<Category>> = ApiCall::get("/categories").send(session).await?;
    Ok(envelope.data)
}

pub(crate) async fn create_post(session: &Session, payload: &PostPayload) -> Result<(), ApiError> {
    let _: serde_json::Value = ApiCall::post("/posts")
        .auth()
        .json(payload)?
        .send(session)
        .await?;
    Ok(())
}

pub(crate) async fn update_post(
    session: &Session,
    id: i64,
    payload: &PostPayload,
) -> Result<(), ApiError> {
    let _: serde_json::Value = ApiCall::put(format!("/posts/{id}"))
        .auth()
        .json(payload)?
        .send(session)
        .await?;
    Ok(())
}

pub(crate) async fn delete_post(session: &Session, id: i64) -> Result<(), ApiError> {
    let _: serde_json::Value = ApiCall::delete(format!("/posts/{id}"))
        .auth()
        .send(session)
        .await?;
    Ok(())
}

pub(crate) async fn add_comment(
    session: &Session,
    post_id: i64,
    content: &str,
) -> Result<(), ApiError> {
    let payload = CommentRequest { content };
    let _: serde_json::Value = ApiCall::post(format!("/posts/{post_id}/comments"))
        .auth()
        .json(&payload)?
        .send(session)
        .await?;
    Ok(())
}
