use axum::{
    body::Body,
    extract::{ConnectInfo, FromRequestParts, OriginalUri, State},
    http::{request::Parts, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;
use std::net::SocketAddr;

use super::db::username_for_token;
use crate::config::Config;
use crate::cookies::{self, SESSION_COOKIE};
use crate::db::DbPool;
use crate::flash::{self, Flash};
use crate::state::AppState;

pub const SIGN_IN_REQUIRED: &str = "Please sign in to access Admin.";

/// The admin username if the request carries a live session for it.
pub fn current_admin(pool: &DbPool, config: &Config, headers: &HeaderMap) -> Option<String> {
    let token = cookies::get(headers, SESSION_COOKIE)?;
    let mut conn = pool.get().ok()?;

    match username_for_token(&mut conn, token) {
        Ok(Some(username)) if username == config.admin.username => Some(username),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(error = %e, "session lookup failed");
            None
        }
    }
}

/// Middleware that requires an admin session for every route it wraps.
/// Anyone else is sent to the login page with a `next` pointing back here.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if current_admin(&state.pool, &state.config, request.headers()).is_some() {
        return next.run(request).await;
    }

    // Nested routers see a stripped path; the original one is what the browser asked for.
    let uri = request
        .extensions()
        .get::<OriginalUri>()
        .map(|original| &original.0)
        .unwrap_or_else(|| request.uri());
    let next_path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/admin".to_string());
    let login = format!("/login?{}", login_query(&next_path));

    flash::redirect(
        &login,
        Flash::warning(SIGN_IN_REQUIRED),
        state.config.secure_cookies,
    )
}

fn login_query(next_path: &str) -> String {
    serde_urlencoded::to_string([("next", next_path)]).unwrap_or_default()
}

/// Only same-site relative paths are followed after login.
pub fn safe_next(next: Option<&str>) -> &str {
    match next.map(str::trim) {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.contains("://") =>
        {
            path
        }
        _ => "/admin",
    }
}

/// Client address: the first `X-Forwarded-For` hop, else the peer address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl ClientIp {
    pub fn resolve(headers: &HeaderMap, peer: Option<SocketAddr>) -> Self {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        match (forwarded, peer) {
            (Some(ip), _) => ClientIp(ip.to_string()),
            (None, Some(addr)) => ClientIp(addr.ip().to_string()),
            (None, None) => ClientIp("unknown".to_string()),
        }
    }
}

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        Ok(ClientIp::resolve(&parts.headers, peer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_safe_next() {
        assert_eq!(safe_next(Some("/admin/styles")), "/admin/styles");
        assert_eq!(safe_next(Some("/workouts?filter=top")), "/workouts?filter=top");
        assert_eq!(safe_next(Some("//evil.example")), "/admin");
        assert_eq!(safe_next(Some("https://evil.example/")), "/admin");
        assert_eq!(safe_next(Some("/\\evil.example")), "/admin");
        assert_eq!(safe_next(Some("")), "/admin");
        assert_eq!(safe_next(None), "/admin");
    }

    #[test]
    fn test_login_query_encodes_path() {
        assert_eq!(
            login_query("/admin/workouts/new?x=1"),
            "next=%2Fadmin%2Fworkouts%2Fnew%3Fx%3D1"
        );
    }

    #[test]
    fn test_client_ip_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        let peer: SocketAddr = "127.0.0.1:5000".parse().unwrap();
        assert_eq!(
            ClientIp::resolve(&headers, Some(peer)),
            ClientIp("203.0.113.9".to_string())
        );
    }

    #[test]
    fn test_client_ip_falls_back_to_peer() {
        let peer: SocketAddr = "192.0.2.4:5000".parse().unwrap();
        assert_eq!(
            ClientIp::resolve(&HeaderMap::new(), Some(peer)),
            ClientIp("192.0.2.4".to_string())
        );
        assert_eq!(
            ClientIp::resolve(&HeaderMap::new(), None),
            ClientIp("unknown".to_string())
        );
    }
}
