use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;
use tokio::sync::Mutex;

use crate::AppState;

type HmacSha256 = Hmac<Sha256>;

const COOKIE_NAME: &str = "metalca_session";
const SESSION_DURATION_SECS: i64 = 7 * 24 * 3600; // 7 days

/// A caller with an identity in a valid session cookie.
/// Page handlers that require login extract this; it redirects to the login page otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub username: String,
}

impl FromRequestParts<Arc<AppState>> for Session {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match session_from_parts(parts, &state.config.session_secret) {
            Some(session) => Ok(session),
            None => Err(Redirect::to(&state.config.login_path).into_response()),
        }
    }
}

/// Session if there is one. For JSON endpoints that work with or without login.
pub struct MaybeSession(pub Option<Session>);

impl FromRequestParts<Arc<AppState>> for MaybeSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeSession(session_from_parts(
            parts,
            &state.config.session_secret,
        )))
    }
}

fn session_from_parts(parts: &Parts, secret: &str) -> Option<Session> {
    let cookie_header = parts
        .headers
        .get(axum::http::header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let value = parse_cookie(cookie_header, COOKIE_NAME)?;
    let username = verify_session(value, secret)?;
    Some(Session { username })
}

/// Per-caller state that outlives a single request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CallerContext {
    pub username: String,
    pub uploaded_datasets: Vec<String>,
}

/// In-memory caller contexts, keyed by username.
///
/// Entries are never evicted. A context is only stored once its caller has
/// uploaded something, so the map grows with uploading users, not logins.
#[derive(Default)]
pub struct SessionStore {
    contexts: Mutex<HashMap<String, CallerContext>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for `session`, empty if the caller has none yet.
    pub async fn load(&self, session: &Session) -> CallerContext {
        let contexts = self.contexts.lock().await;
        contexts
            .get(&session.username)
            .cloned()
            .unwrap_or_else(|| CallerContext {
                username: session.username.clone(),
                uploaded_datasets: Vec::new(),
            })
    }

    /// Store `context`. A context with nothing uploaded is not kept.
    pub async fn save(&self, context: CallerContext) {
        if context.uploaded_datasets.is_empty() {
            return;
        }
        let mut contexts = self.contexts.lock().await;
        contexts.insert(context.username.clone(), context);
    }
}

/// Create a signed session cookie value: `username|expiry|signature`.
/// The username is percent-encoded so it cannot contain separators.
pub fn create_session(username: &str, secret: &str) -> String {
    let expiry = chrono::Utc::now().timestamp() + SESSION_DURATION_SECS;
    let payload = format!("{}|{expiry}", urlencoding::encode(username));
    let sig = sign(&payload, secret);
    format!("{payload}|{sig}")
}

/// Build the Set-Cookie header value.
/// In release builds, adds `Secure` flag to prevent transmission over HTTP.
pub fn session_cookie(username: &str, secret: &str) -> String {
    let value = create_session(username, secret);
    let secure = if cfg!(debug_assertions) { "" } else { "; Secure" };
    format!(
        "{COOKIE_NAME}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={SESSION_DURATION_SECS}{secure}"
    )
}

/// Verify a session cookie value. Returns the username if valid.
fn verify_session(value: &str, secret: &str) -> Option<String> {
    let parts: Vec<&str> = value.splitn(3, '|').collect();
    if parts.len() != 3 {
        return None;
    }

    let encoded_username = parts[0];
    let expiry_str = parts[1];
    let sig = parts[2];

    let payload = format!("{encoded_username}|{expiry_str}");
    let expected_sig = sign(&payload, secret);
    if !constant_time_eq(sig.as_bytes(), expected_sig.as_bytes()) {
        return None;
    }

    let expiry: i64 = expiry_str.parse().ok()?;
    if chrono::Utc::now().timestamp() > expiry {
        return None;
    }

    let username = urlencoding::decode(encoded_username).ok()?.into_owned();
    if username.is_empty() {
        return None;
    }
    Some(username)
}

fn sign(payload: &str, secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time comparison to prevent timing attacks.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter()
        .zip(b.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

/// Parse a specific cookie from the Cookie header string.
fn parse_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    for part in header.split(';') {
        let part = part.trim();
        if let Some(value) = part.strip_prefix(name) {
            if let Some(value) = value.strip_prefix('=') {
                return Some(value);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_session() {
        let secret = "test-secret-key";
        let cookie_value = create_session("asha", secret);
        assert_eq!(verify_session(&cookie_value, secret), Some("asha".to_string()));
    }

    #[test]
    fn usernames_with_separators_survive() {
        let secret = "test-secret-key";
        let cookie_value = create_session("a|b; c", secret);
        assert!(!cookie_value.contains(';'));
        assert_eq!(verify_session(&cookie_value, secret), Some("a|b; c".to_string()));
    }

    #[test]
    fn rejects_tampered_session() {
        let secret = "test-secret-key";
        let cookie_value = create_session("asha", secret);
        let tampered = cookie_value.replacen("asha", "ravi", 1);
        assert_eq!(verify_session(&tampered, secret), None);
    }

    #[test]
    fn rejects_wrong_secret() {
        let cookie_value = create_session("asha", "secret-a");
        assert_eq!(verify_session(&cookie_value, "secret-b"), None);
    }

    #[test]
    fn rejects_expired_session() {
        let secret = "test-secret";
        let expiry = chrono::Utc::now().timestamp() - 100;
        let payload = format!("asha|{expiry}");
        let sig = sign(&payload, secret);
        let value = format!("{payload}|{sig}");
        assert_eq!(verify_session(&value, secret), None);
    }

    #[test]
    fn parse_cookie_works() {
        assert_eq!(
            parse_cookie("metalca_session=abc123; other=xyz", "metalca_session"),
            Some("abc123")
        );
        assert_eq!(
            parse_cookie("other=xyz; metalca_session=abc123", "metalca_session"),
            Some("abc123")
        );
        assert_eq!(parse_cookie("other=xyz", "metalca_session"), None);
    }

    #[tokio::test]
    async fn store_keeps_contexts_per_user() {
        let store = SessionStore::new();
        let asha = Session { username: "asha".into() };
        let ravi = Session { username: "ravi".into() };

        let mut context = store.load(&asha).await;
        assert!(context.uploaded_datasets.is_empty());
        context.uploaded_datasets = vec!["a.csv".into()];
        store.save(context).await;

        assert_eq!(store.load(&asha).await.uploaded_datasets, vec!["a.csv"]);
        assert!(store.load(&ravi).await.uploaded_datasets.is_empty());
    }

    #[tokio::test]
    async fn callers_without_uploads_are_not_stored() {
        let store = SessionStore::new();
        for name in ["a", "b", "c"] {
            let context = store.load(&Session { username: name.into() }).await;
            store.save(context).await;
        }

        assert!(store.contexts.lock().await.is_empty());
    }
}
