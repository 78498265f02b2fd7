//! Per-request page state: CSRF token, pending flashes and admin status.

use askama::Template;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use std::convert::Infallible;
use std::sync::Arc;

use crate::auth::current_admin;
use crate::config::Config;
use crate::cookies::{self, SetCookie, FLASH_COOKIE};
use crate::csrf::CsrfToken;
use crate::error::AppError;
use crate::flash::{self, Flash};
use crate::state::AppState;
use crate::views::Layout;

pub struct PageContext {
    config: Arc<Config>,
    csrf: CsrfToken,
    flashes: Vec<Flash>,
    had_flash_cookie: bool,
    admin: Option<String>,
}

impl PageContext {
    pub fn new(config: Arc<Config>, headers: &HeaderMap, admin: Option<String>) -> Self {
        let flash_cookie = cookies::get(headers, FLASH_COOKIE);
        Self {
            csrf: CsrfToken::from_headers(headers),
            flashes: flash_cookie.map(flash::decode).unwrap_or_default(),
            had_flash_cookie: flash_cookie.is_some(),
            admin,
            config,
        }
    }

    pub fn secure_cookies(&self) -> bool {
        self.config.secure_cookies
    }

    pub fn admin(&self) -> Option<&str> {
        self.admin.as_deref()
    }

    /// Show `flash` on the page rendered by this request.
    pub fn push_flash(&mut self, flash: Flash) {
        self.flashes.push(flash);
    }

    pub fn layout(&self) -> Layout {
        Layout::new(
            &self.config.site_name,
            self.csrf.value(),
            self.flashes.clone(),
            self.admin.is_some(),
        )
    }

    pub fn verify_csrf(&self, submitted: Option<&str>) -> Result<(), AppError> {
        self.csrf.verify(submitted)
    }

    /// Redirect with a flash for the next page.
    pub fn redirect(&self, to: &str, flash: Flash) -> Response {
        flash::redirect(to, flash, self.secure_cookies())
    }

    pub fn render<T: Template>(&self, page: &T) -> Result<Response, AppError> {
        self.render_with_status(StatusCode::OK, page)
    }

    /// Render `page`, issuing the CSRF cookie if it is new and consuming any flash cookie.
    pub fn render_with_status<T: Template>(
        &self,
        status: StatusCode,
        page: &T,
    ) -> Result<Response, AppError> {
        let body = page.render()?;
        let mut response = (status, Html(body)).into_response();

        let secure = self.secure_cookies();
        let mut set = Vec::new();
        if let Some(cookie) = self.csrf.cookie(secure) {
            set.push(cookie);
        }
        if self.had_flash_cookie {
            set.push(SetCookie::removal(FLASH_COOKIE, secure));
        }
        cookies::append_all(response.headers_mut(), &set);

        Ok(response)
    }
}

impl FromRequestParts<AppState> for PageContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let admin = current_admin(&state.pool, &state.config, &parts.headers);
        Ok(Self::new(state.config.clone(), &parts.headers, admin))
    }
}
