use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Form,
};
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use super::parse_id;
use crate::context::PageContext;
use crate::error::AppError;
use crate::flash::Flash;
use crate::forms::{CsrfForm, RecipeFormData};
use crate::get_conn;
use crate::models::Recipe;
use crate::schema::recipes;
use crate::state::AppState;
use crate::views::{AdminRecipesPage, RecipeFormPage};

const RECIPES_PATH: &str = "/admin/recipes";

fn form_page(ctx: &PageContext, id: Option<Uuid>, form: RecipeFormData) -> RecipeFormPage {
    let (heading, action) = match id {
        None => ("New recipe", "/admin/recipes/new".to_string()),
        Some(id) => ("Edit recipe", format!("/admin/recipes/{id}/edit")),
    };
    RecipeFormPage {
        layout: ctx.layout(),
        heading,
        action,
        form,
    }
}

pub async fn index(ctx: PageContext, State(state): State<AppState>) -> Result<Response, AppError> {
    let mut conn = get_conn!(state.pool);
    let recipes: Vec<Recipe> = recipes::table
        .order(recipes::name.asc())
        .select(Recipe::as_select())
        .load(&mut conn)?;

    ctx.render(&AdminRecipesPage {
        layout: ctx.layout(),
        recipes,
    })
}

pub async fn new_form(ctx: PageContext) -> Result<Response, AppError> {
    ctx.render(&form_page(&ctx, None, RecipeFormData::default()))
}

pub async fn create(
    mut ctx: PageContext,
    State(state): State<AppState>,
    Form(form): Form<RecipeFormData>,
) -> Result<Response, AppError> {
    ctx.verify_csrf(form.csrf_token.as_deref())?;

    let changes = match form.changes() {
        Ok(changes) => changes,
        Err(message) => {
            ctx.push_flash(Flash::danger(message));
            let page = form_page(&ctx, None, form);
            return ctx.render_with_status(StatusCode::UNPROCESSABLE_ENTITY, &page);
        }
    };

    let mut conn = get_conn!(state.pool);
    diesel::insert_into(recipes::table)
        .values(&changes)
        .execute(&mut conn)?;
    tracing::info!(name = %changes.name, "recipe added");

    Ok(ctx.redirect(RECIPES_PATH, Flash::success("Recipe added.")))
}

pub async fn edit_form(
    ctx: PageContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    let mut conn = get_conn!(state.pool);
    let recipe: Recipe = recipes::table
        .find(id)
        .select(Recipe::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(AppError::NotFound)?;

    ctx.render(&form_page(&ctx, Some(id), RecipeFormData::from_recipe(&recipe)))
}

pub async fn update(
    mut ctx: PageContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<RecipeFormData>,
) -> Result<Response, AppError> {
    ctx.verify_csrf(form.csrf_token.as_deref())?;
    let id = parse_id(&id)?;

    let changes = match form.changes() {
        Ok(changes) => changes,
        Err(message) => {
            ctx.push_flash(Flash::danger(message));
            let page = form_page(&ctx, Some(id), form);
            return ctx.render_with_status(StatusCode::UNPROCESSABLE_ENTITY, &page);
        }
    };

    let mut conn = get_conn!(state.pool);
    let updated = diesel::update(recipes::table.find(id))
        .set((&changes, recipes::updated_at.eq(Utc::now())))
        .execute(&mut conn)?;
    if updated == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ctx.redirect(RECIPES_PATH, Flash::success("Recipe updated.")))
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
    diesel::delete(recipes::table.find(id)).execute(&mut conn)?;

    Ok(ctx.redirect(RECIPES_PATH, Flash::success("Recipe deleted.")))
}
