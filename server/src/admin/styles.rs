use axum::{
    extract::{Path, State},
    response::Response,
    Form,
};
use diesel::prelude::*;
use nfg_core::slugify;

use super::parse_id;
use crate::context::PageContext;
use crate::error::AppError;
use crate::flash::Flash;
use crate::forms::{CsrfForm, StyleForm};
use crate::get_conn;
use crate::models::{NewStyle, Style};
use crate::schema::styles;
use crate::state::AppState;
use crate::views::AdminStylesPage;

const STYLES_PATH: &str = "/admin/styles";

pub async fn index(ctx: PageContext, State(state): State<AppState>) -> Result<Response, AppError> {
    let mut conn = get_conn!(state.pool);
    let styles: Vec<Style> = styles::table
        .order((styles::sort_order.asc(), styles::name.asc()))
        .select(Style::as_select())
        .load(&mut conn)?;

    ctx.render(&AdminStylesPage {
        layout: ctx.layout(),
        styles,
    })
}

pub async fn create(
    ctx: PageContext,
    State(state): State<AppState>,
    Form(form): Form<StyleForm>,
) -> Result<Response, AppError> {
    ctx.verify_csrf(form.csrf_token.as_deref())?;

    let name = form.name.trim();
    if name.is_empty() {
        return Ok(ctx.redirect(STYLES_PATH, Flash::danger("Style name is required.")));
    }
    let slug = slugify(name);

    let mut conn = get_conn!(state.pool);
    let taken: bool = diesel::select(diesel::dsl::exists(
        styles::table.filter(
            styles::name
                .eq(name.to_string())
                .or(styles::slug.eq(slug.clone())),
        ),
    ))
    .get_result(&mut conn)?;
    if taken {
        return Ok(ctx.redirect(
            STYLES_PATH,
            Flash::warning(format!("Style '{name}' already exists.")),
        ));
    }

    diesel::insert_into(styles::table)
        .values(&NewStyle {
            name,
            slug: &slug,
            sort_order: form.sort_order(),
            active: true,
        })
        .execute(&mut conn)?;
    tracing::info!(name, slug = %slug, "style added");

    Ok(ctx.redirect(STYLES_PATH, Flash::success("Style added.")))
}

pub async fn toggle(
    ctx: PageContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<CsrfForm>,
) -> Result<Response, AppError> {
    ctx.verify_csrf(form.csrf_token.as_deref())?;
    let id = parse_id(&id)?;

    let mut conn = get_conn!(state.pool);
    let active: bool = diesel::update(styles::table.find(id))
        .set(styles::active.eq(diesel::dsl::not(styles::active)))
        .returning(styles::active)
        .get_result(&mut conn)
        .optional()?
        .ok_or(AppError::NotFound)?;

    let message = if active {
        "Style activated."
    } else {
        "Style deactivated."
    };
    Ok(ctx.redirect(STYLES_PATH, Flash::success(message)))
}

pub async fn delete(
    ctx: PageContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<CsrfForm>,
) -> Result<Response, AppError> {
    ctx.verify_csrf(form.csrf_token.as_deref())?;
    let id = parse_id(&id)?;

    let mut conn = get_conn!(state.pool);
    diesel::delete(styles::table.find(id)).execute(&mut conn)?;

    Ok(ctx.redirect(STYLES_PATH, Flash::success("Style deleted.")))
}
