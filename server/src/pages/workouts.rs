use axum::{
    extract::{Path, Query, State},
    response::Response,
};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;

use crate::catalog::{
    active_styles, featured_body_parts, owned, BODY_PARTS_MASTER, FEATURED_STYLES, WORKOUT_LEVELS,
};
use crate::context::PageContext;
use crate::db::DbPool;
use crate::error::AppError;
use crate::get_conn;
use crate::models::Workout;
use crate::schema::workouts;
use crate::views::{
    cards, format_rating, link, AllWorkoutsPage, BodyPartsIndexPage, NamedCount, NavLink,
    StylesIndexPage, WorkoutDetailPage, WorkoutsLandingPage,
};
use crate::workouts::query::{related_query, LandingFilter};
use crate::workouts::{body_parts_in_use, count_for_body_part, counts_by_style};

#[derive(Debug, Deserialize)]
pub struct LandingParams {
    pub filter: Option<String>,
}

pub async fn landing(
    ctx: PageContext,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<LandingParams>,
) -> Result<Response, AppError> {
    let mut conn = get_conn!(pool);
    let filter = LandingFilter::parse(params.filter.as_deref());

    let present = body_parts_in_use(&mut conn)?;
    let styles = active_styles(&mut conn)?;
    let spotlight: Vec<Workout> = filter
        .query()
        .select(Workout::as_select())
        .load(&mut conn)?;

    ctx.render(&WorkoutsLandingPage {
        layout: ctx.layout(),
        levels: NavLink::browse("level", &owned(WORKOUT_LEVELS)),
        body_parts_featured: NavLink::browse("body", &featured_body_parts(&present)),
        styles: NavLink::browse("style", &styles),
        styles_featured: NavLink::browse("style", &owned(FEATURED_STYLES)),
        spotlight_title: filter.title(),
        spotlight: cards(&spotlight),
    })
}

pub async fn all(ctx: PageContext, State(pool): State<Arc<DbPool>>) -> Result<Response, AppError> {
    let mut conn = get_conn!(pool);
    let items: Vec<Workout> = workouts::table
        .order(workouts::name.asc())
        .select(Workout::as_select())
        .load(&mut conn)?;

    ctx.render(&AllWorkoutsPage {
        layout: ctx.layout(),
        items: cards(&items),
    })
}

pub async fn styles_index(
    ctx: PageContext,
    State(pool): State<Arc<DbPool>>,
) -> Result<Response, AppError> {
    let mut conn = get_conn!(pool);
    let names = active_styles(&mut conn)?;
    let counts = counts_by_style(&mut conn)?;

    let styles = names
        .into_iter()
        .map(|name| NamedCount {
            count: counts.get(&name).copied().unwrap_or(0),
            url: link("/workouts/browse", &[("style", name.as_str())]),
            name,
        })
        .collect();

    ctx.render(&StylesIndexPage {
        layout: ctx.layout(),
        styles,
    })
}

pub async fn body_parts_index(
    ctx: PageContext,
    State(pool): State<Arc<DbPool>>,
) -> Result<Response, AppError> {
    let mut conn = get_conn!(pool);

    let mut body_parts = Vec::with_capacity(BODY_PARTS_MASTER.len());
    for part in BODY_PARTS_MASTER {
        body_parts.push(NamedCount {
            name: part.to_string(),
            count: count_for_body_part(&mut conn, part)?,
            url: link("/workouts/browse", &[("body", *part)]),
        });
    }

    ctx.render(&BodyPartsIndexPage {
        layout: ctx.layout(),
        body_parts,
    })
}

pub async fn detail(
    ctx: PageContext,
    State(pool): State<Arc<DbPool>>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let mut conn = get_conn!(pool);

    let workout: Workout = workouts::table
        .filter(workouts::slug.eq(&slug))
        .select(Workout::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(AppError::NotFound)?;

    let related: Vec<Workout> = related_query(&workout)
        .select(Workout::as_select())
        .load(&mut conn)?;

    ctx.render(&WorkoutDetailPage {
        layout: ctx.layout(),
        parts: workout.targeted_parts(),
        rating: format_rating(workout.rating),
        related: cards(&related),
        workout,
    })
}
