use axum::{
    extract::{Query, State},
    response::Response,
};
use diesel::prelude::*;
use std::sync::Arc;

use crate::context::PageContext;
use crate::db::DbPool;
use crate::error::AppError;
use crate::get_conn;
use crate::models::{Recipe, Workout};
use crate::raw_sql::contains_pattern;
use crate::schema::recipes;
use crate::views::{cards, HomePage, Pager, SearchPage};
use crate::workouts::query::{BrowseParams, Paging, WorkoutFilter, WorkoutSort, SEARCH_PER_PAGE};

/// Site-wide search over workouts (paged) and recipe names.
pub async fn search(
    ctx: PageContext,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<BrowseParams>,
) -> Result<Response, AppError> {
    let q = params.q.as_deref().unwrap_or("").trim().to_string();
    if q.is_empty() {
        return ctx.render(&HomePage {
            layout: ctx.layout(),
        });
    }

    let filter = WorkoutFilter::text(&q);
    let paging = Paging::parse(
        params.page.as_deref(),
        params.per_page.as_deref(),
        SEARCH_PER_PAGE,
    );

    let mut conn = get_conn!(pool);
    let total: i64 = filter.query().count().get_result(&mut conn)?;
    let items: Vec<Workout> = paging
        .apply(WorkoutSort::Name.apply(filter.query()))
        .select(Workout::as_select())
        .load(&mut conn)?;
    let recipes: Vec<Recipe> = recipes::table
        .filter(recipes::name.ilike(contains_pattern(&q)))
        .order(recipes::name.asc())
        .select(Recipe::as_select())
        .load(&mut conn)?;

    tracing::debug!(%q, total, recipes = recipes.len(), "search");

    ctx.render(&SearchPage {
        layout: ctx.layout(),
        pager: Pager::new("/search", &[("q", q.as_str())], paging, total),
        items: cards(&items),
        total,
        recipes,
        q,
    })
}
