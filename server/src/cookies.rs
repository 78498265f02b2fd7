//! Minimal cookie handling for the session, CSRF and flash cookies.
//!
//! All values we store are hex strings, so no percent-encoding is needed.

use axum::http::{header, HeaderMap, HeaderValue};

pub const SESSION_COOKIE: &str = "nfg_session";
pub const CSRF_COOKIE: &str = "nfg_csrf";
pub const FLASH_COOKIE: &str = "nfg_flash";

/// Find a cookie value in the request's `Cookie` headers.
pub fn get<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"'))
        .filter(|value| !value.is_empty())
}

/// A `Set-Cookie` header value scoped to the whole site.
#[derive(Debug, Clone)]
pub struct SetCookie {
    name: &'static str,
    value: String,
    max_age: Option<i64>,
    secure: bool,
}

impl SetCookie {
    /// Session cookie (no Max-Age) carrying `value`.
    pub fn new(name: &'static str, value: impl Into<String>, secure: bool) -> Self {
        Self {
            name,
            value: value.into(),
            max_age: None,
            secure,
        }
    }

    /// A cookie that tells the browser to drop `name` immediately.
    pub fn removal(name: &'static str, secure: bool) -> Self {
        Self {
            name,
            value: String::new(),
            max_age: Some(0),
            secure,
        }
    }

    pub fn max_age_secs(mut self, secs: i64) -> Self {
        self.max_age = Some(secs);
        self
    }

    pub fn header_value(&self) -> Option<HeaderValue> {
        HeaderValue::from_str(&self.to_string()).ok()
    }
}

impl std::fmt::Display for SetCookie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}; Path=/; HttpOnly; SameSite=Lax", self.name, self.value)?;
        if let Some(max_age) = self.max_age {
            write!(f, "; Max-Age={max_age}")?;
        }
        if self.secure {
            f.write_str("; Secure")?;
        }
        Ok(())
    }
}

/// Append `cookies` to `headers` as separate `Set-Cookie` entries.
pub fn append_all(headers: &mut HeaderMap, cookies: &[SetCookie]) {
    for cookie in cookies {
        if let Some(value) = cookie.header_value() {
            headers.append(header::SET_COOKIE, value);
        }
    }
}
