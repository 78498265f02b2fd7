use axum::{
    extract::{Query, State},
    response::Response,
};
use diesel::prelude::*;
use std::sync::Arc;

use crate::catalog::{active_styles, owned, BODY_PARTS_MASTER, WORKOUT_LEVELS};
use crate::context::PageContext;
use crate::db::DbPool;
use crate::error::AppError;
use crate::get_conn;
use crate::models::Workout;
use crate::views::{cards, BrowsePage, Pager, SelectOption};
use crate::workouts::query::{BrowseParams, Paging, WorkoutFilter, WorkoutSort, BROWSE_PER_PAGE};

pub async fn browse(
    ctx: PageContext,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<BrowseParams>,
) -> Result<Response, AppError> {
    let filter = WorkoutFilter::from_browse(&params);
    let sort = WorkoutSort::parse(params.sort.as_deref());
    let paging = Paging::parse(
        params.page.as_deref(),
        params.per_page.as_deref(),
        BROWSE_PER_PAGE,
    );

    let mut conn = get_conn!(pool);
    let total: i64 = filter.query().count().get_result(&mut conn)?;
    let items: Vec<Workout> = paging
        .apply(sort.apply(filter.query()))
        .select(Workout::as_select())
        .load(&mut conn)?;
    let styles = active_styles(&mut conn)?;

    let level = filter.level.as_deref().unwrap_or("");
    let body = filter.body.as_deref().unwrap_or("");
    let style = filter.style.as_deref().unwrap_or("");
    let q = filter.text.as_deref().unwrap_or("");
    let sort_param = if sort == WorkoutSort::Name {
        ""
    } else {
        sort.as_str()
    };

    let pager = Pager::new(
        "/workouts/browse",
        &[
            ("level", level),
            ("body", body),
            ("style", style),
            ("q", q),
            ("sort", sort_param),
        ],
        paging,
        total,
    );

    let sorts = WorkoutSort::ALL
        .iter()
        .map(|s| SelectOption {
            value: s.as_str().to_string(),
            label: s.label().to_string(),
            selected: *s == sort,
        })
        .collect();

    ctx.render(&BrowsePage {
        layout: ctx.layout(),
        items: cards(&items),
        total,
        pager,
        q: q.to_string(),
        per_page: paging.per_page,
        levels: SelectOption::list(&owned(WORKOUT_LEVELS), level),
        body_parts: SelectOption::list(&owned(BODY_PARTS_MASTER), body),
        styles: SelectOption::list(&styles, style),
        sorts,
    })
}
