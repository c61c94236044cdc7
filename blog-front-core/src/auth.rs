use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;

/// Claims из credential-токена.
///
/// Только подсказка для отображения и проверки владения постом:
/// клиент ничего не верифицирует, авторитетен всегда сервер.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Identity {
    /// Идентификатор пользователя.
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Отображаемое имя; по нему сравнивается авторство постов.
    #[serde(default)]
    pub name: Option<String>,
    /// Момент выдачи токена (unix-секунды, claim `iat`).
    #[serde(default, rename = "iat")]
    pub issued_at: Option<i64>,
    /// Момент истечения токена (unix-секунды, claim `exp`).
    #[serde(default, rename = "exp")]
    pub expires_at: Option<i64>,
}

/// Декодирует claims из среднего сегмента токена.
///
/// Любой сбой на любом шаге (нет разделителя, не base64, не UTF-8,
/// не JSON) даёт `None`, не ошибку: битый токен означает «аноним».
pub fn identity_from_token(token: &str) -> Option<Identity> {
    let claims_segment = token.split('.').nth(1)?;
    let raw = URL_SAFE_NO_PAD.decode(claims_segment).ok()?;
    let json = String::from_utf8(raw).ok()?;
    match serde_json::from_str(&json) {
        Ok(identity) => Some(identity),
        Err(err) => {
            tracing::debug!(%err, "token claims are not valid JSON");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with_claims(claims: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims);
        format!("{header}.{payload}.signature")
    }

    #[test]
    fn round_trips_claims_from_a_valid_token() {
        let token =
            token_with_claims(r#"{"user_id":42,"name":"ann","iat":1700000000,"exp":1700003600}"#);
        let identity = identity_from_token(&token).expect("claims must decode");
        assert_eq!(identity.user_id, Some(42));
        assert_eq!(identity.name.as_deref(), Some("ann"));
        assert_eq!(identity.issued_at, Some(1_700_000_000));
        assert_eq!(identity.expires_at, Some(1_700_003_600));
    }

    #[test]
    fn extra_claims_are_ignored() {
        let token = token_with_claims(r#"{"name":"bob","role":"editor"}"#);
        let identity = identity_from_token(&token).expect("claims must decode");
        assert_eq!(identity.name.as_deref(), Some("bob"));
        assert_eq!(identity.user_id, None);
    }

    #[test]
    fn missing_delimiter_yields_none() {
        assert!(identity_from_token("justonesegment").is_none());
    }

    #[test]
    fn non_base64_segment_yields_none() {
        assert!(identity_from_token("head.%%%%.tail").is_none());
    }

    #[test]
    fn non_json_claims_yield_none() {
        let payload = URL_SAFE_NO_PAD.encode("not json at all");
        assert!(identity_from_token(&format!("head.{payload}.tail")).is_none());
    }

    #[test]
    fn empty_token_yields_none() {
        assert!(identity_from_token("").is_none());
    }
}
