//! One-shot messages shown on the next rendered page.

use axum::response::{IntoResponse, Redirect, Response};
use serde::{Deserialize, Serialize};

use crate::cookies::{self, SetCookie, FLASH_COOKIE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Danger,
    Warning,
    Info,
}

impl FlashKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashKind::Success => "success",
            FlashKind::Danger => "danger",
            FlashKind::Warning => "warning",
            FlashKind::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn new(kind: FlashKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(FlashKind::Success, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(FlashKind::Danger, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(FlashKind::Warning, message)
    }
}

/// Serialize flashes into a cookie-safe value.
pub fn encode(flashes: &[Flash]) -> String {
    // Vec<Flash> serialization cannot fail.
    hex::encode(serde_json::to_vec(flashes).unwrap_or_default())
}

/// Parse a flash cookie value. Tampered or stale values yield nothing.
pub fn decode(value: &str) -> Vec<Flash> {
    hex::decode(value)
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .unwrap_or_default()
}

/// Redirect to `to`, carrying `flash` to the next page.
pub fn redirect(to: &str, flash: Flash, secure: bool) -> Response {
    redirect_with(to, flash, secure, Vec::new())
}

/// Like [`redirect`], also setting `extra` cookies (e.g. the session).
pub fn redirect_with(to: &str, flash: Flash, secure: bool, extra: Vec<SetCookie>) -> Response {
    let mut response = Redirect::to(to).into_response();
    let mut cookies = extra;
    cookies.push(SetCookie::new(FLASH_COOKIE, encode(&[flash]), secure));
    cookies::append_all(response.headers_mut(), &cookies);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, StatusCode};

    #[test]
    fn test_encode_decode() {
        let flashes = vec![Flash::success("Logged in."), Flash::danger("Name is required.")];
        assert_eq!(decode(&encode(&flashes)), flashes);
    }

    #[test]
    fn test_decode_garbage() {
        assert!(decode("zz-not-hex").is_empty());
        assert!(decode(&hex::encode(b"{not json")).is_empty());
        assert!(decode("").is_empty());
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&Flash::warning("x")).unwrap();
        assert_eq!(json, r#"{"kind":"warning","message":"x"}"#);
    }

    #[test]
    fn test_redirect_sets_flash_cookie() {
        let response = redirect("/admin", Flash::success("Workout added."), false);
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/admin");
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("nfg_flash="));
    }
}
