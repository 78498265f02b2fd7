use axum::{extract::State, response::Response};
use diesel::prelude::*;
use std::sync::Arc;

use crate::context::PageContext;
use crate::db::DbPool;
use crate::error::AppError;
use crate::get_conn;
use crate::models::Recipe;
use crate::schema::recipes;
use crate::views::RecipesPage;

pub async fn list(ctx: PageContext, State(pool): State<Arc<DbPool>>) -> Result<Response, AppError> {
    let mut conn = get_conn!(pool);
    let recipes = recipes::table
        .order(recipes::name.asc())
        .select(Recipe::as_select())
        .load(&mut conn)?;

    ctx.render(&RecipesPage {
        layout: ctx.layout(),
        recipes,
    })
}
