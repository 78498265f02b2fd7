//! Double-submit CSRF tokens.
//!
//! Every visitor gets a random token in the `nfg_csrf` cookie. Forms echo it
//! back in a hidden `csrf_token` field and the two must agree.

use axum::http::HeaderMap;

use crate::auth::{generate_token, tokens_match};
use crate::cookies::{self, SetCookie, CSRF_COOKIE};
use crate::error::AppError;

pub const FORM_FIELD: &str = "csrf_token";

#[derive(Debug, Clone)]
pub struct CsrfToken {
    value: String,
    /// Minted for this request; the browser has not seen it yet.
    fresh: bool,
}

impl CsrfToken {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        match cookies::get(headers, CSRF_COOKIE) {
            Some(value) => Self {
                value: value.to_string(),
                fresh: false,
            },
            None => Self {
                value: generate_token(),
                fresh: true,
            },
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Accept `submitted` only if it matches a token the browser already held.
    pub fn verify(&self, submitted: Option<&str>) -> Result<(), AppError> {
        match submitted {
            Some(submitted) if !self.fresh && tokens_match(submitted, &self.value) => Ok(()),
            _ => Err(AppError::BadCsrf),
        }
    }

    /// Cookie to set when the token was minted for this request.
    pub fn cookie(&self, secure: bool) -> Option<SetCookie> {
        self.fresh
            .then(|| SetCookie::new(CSRF_COOKIE, self.value.clone(), secure))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderValue};

    fn headers_with_token(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("nfg_csrf={token}")).unwrap(),
        );
        headers
    }

    #[test]
    fn test_existing_cookie_is_reused() {
        let token = CsrfToken::from_headers(&headers_with_token("abc123"));
        assert_eq!(token.value(), "abc123");
        assert!(token.cookie(false).is_none());
    }

    #[test]
    fn test_missing_cookie_mints_token() {
        let token = CsrfToken::from_headers(&HeaderMap::new());
        assert_eq!(token.value().len(), 64);
        let cookie = token.cookie(true).unwrap().to_string();
        assert!(cookie.starts_with(&format!("nfg_csrf={}", token.value())));
        assert!(cookie.ends_with("; Secure"));
    }

    #[test]
    fn test_verify() {
        let token = CsrfToken::from_headers(&headers_with_token("abc123"));
        assert!(token.verify(Some("abc123")).is_ok());
        assert!(matches!(token.verify(Some("abc124")), Err(AppError::BadCsrf)));
        assert!(matches!(token.verify(None), Err(AppError::BadCsrf)));
    }

    #[test]
    fn test_fresh_token_never_verifies() {
        let token = CsrfToken::from_headers(&HeaderMap::new());
        let value = token.value().to_string();
        assert!(token.verify(Some(&value)).is_err());
    }
}
