use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::Response,
    Form,
};
use serde::Deserialize;

use crate::auth::{
    check_admin_credentials, create_session, delete_session, safe_next, ClientIp,
};
use crate::context::PageContext;
use crate::cookies::{self, SetCookie, SESSION_COOKIE};
use crate::error::AppError;
use crate::flash::{self, Flash};
use crate::forms::{CsrfForm, LoginForm};
use crate::get_conn;
use crate::state::AppState;
use crate::views::LoginPage;

const TOO_MANY_ATTEMPTS: &str = "Too many failed login attempts. Try again in ~15 minutes.";
const INVALID_CREDENTIALS: &str = "Invalid credentials.";
const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Deserialize)]
pub struct LoginParams {
    pub next: Option<String>,
}

/// Cookie lifetime matching a session of `ttl_days`, saturating on overflow.
fn session_max_age(ttl_days: i64) -> i64 {
    ttl_days.checked_mul(SECONDS_PER_DAY).unwrap_or(i64::MAX)
}

fn render_login(
    ctx: &PageContext,
    status: StatusCode,
    username: &str,
    next: &str,
) -> Result<Response, AppError> {
    ctx.render_with_status(
        status,
        &LoginPage {
            layout: ctx.layout(),
            username: username.to_string(),
            next: next.to_string(),
        },
    )
}

pub async fn form(ctx: PageContext, Query(params): Query<LoginParams>) -> Result<Response, AppError> {
    render_login(
        &ctx,
        StatusCode::OK,
        "",
        params.next.as_deref().unwrap_or(""),
    )
}

pub async fn submit(
    mut ctx: PageContext,
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    ctx.verify_csrf(form.csrf_token.as_deref())?;
    let username = form.username.trim();

    if !state.throttle.allowed(&ip) {
        tracing::warn!(%ip, tracked_ips = state.throttle.tracked_ips(), "login throttled");
        ctx.push_flash(Flash::danger(TOO_MANY_ATTEMPTS));
        return render_login(&ctx, StatusCode::TOO_MANY_REQUESTS, username, &form.next);
    }

    if !check_admin_credentials(&state.config.admin, username, form.password.trim()) {
        state.throttle.record_failure(&ip);
        tracing::warn!(%ip, "failed admin login");
        ctx.push_flash(Flash::danger(INVALID_CREDENTIALS));
        return render_login(&ctx, StatusCode::UNAUTHORIZED, username, &form.next);
    }

    state.throttle.clear(&ip);
    let mut conn = get_conn!(state.pool);
    let ttl_days = state.config.session_ttl_days;
    let token = create_session(&mut conn, username, ttl_days)?;
    tracing::info!(%ip, "admin logged in");

    let secure = ctx.secure_cookies();
    let session = SetCookie::new(SESSION_COOKIE, token, secure).max_age_secs(session_max_age(ttl_days));
    Ok(flash::redirect_with(
        safe_next(Some(&form.next)),
        Flash::success("Logged in."),
        secure,
        vec![session],
    ))
}

pub async fn logout(
    ctx: PageContext,
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<CsrfForm>,
) -> Result<Response, AppError> {
    ctx.verify_csrf(form.csrf_token.as_deref())?;

    if let Some(token) = cookies::get(&headers, SESSION_COOKIE) {
        let mut conn = get_conn!(state.pool);
        delete_session(&mut conn, token)?;
    }
    tracing::info!(admin = ctx.admin().unwrap_or_default(), "admin logged out");

    let secure = ctx.secure_cookies();
    Ok(flash::redirect_with(
        "/",
        Flash::success("Logged out."),
        secure,
        vec![SetCookie::removal(SESSION_COOKIE, secure)],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_max_age() {
        assert_eq!(session_max_age(30), 30 * 86_400);
        assert_eq!(session_max_age(i64::MAX / 2), i64::MAX);
    }
}
