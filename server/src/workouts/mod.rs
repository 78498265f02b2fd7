//! Workout lookups shared by the public pages.

pub mod query;

use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::sql_types::Text;
use std::collections::HashMap;

use crate::raw_sql::DISTINCT_BODY_PARTS_QUERY;
use crate::schema::workouts;

#[derive(QueryableByName)]
struct BodyPartRow {
    #[diesel(sql_type = Text)]
    part: String,
}

/// Every body part used by at least one workout.
pub fn body_parts_in_use(conn: &mut PgConnection) -> QueryResult<Vec<String>> {
    let rows: Vec<BodyPartRow> = diesel::sql_query(DISTINCT_BODY_PARTS_QUERY).load(conn)?;
    Ok(rows.into_iter().map(|r| r.part).collect())
}

/// Number of workouts per style name.
pub fn counts_by_style(conn: &mut PgConnection) -> QueryResult<HashMap<String, i64>> {
    let rows: Vec<(String, i64)> = workouts::table
        .group_by(workouts::style)
        .select((workouts::style, count_star()))
        .load(conn)?;
    Ok(rows.into_iter().collect())
}

/// Workouts that target `part`, either as the primary part or anywhere in the list.
pub fn count_for_body_part(conn: &mut PgConnection, part: &str) -> QueryResult<i64> {
    workouts::table
        .filter(
            workouts::body_part
                .eq(part.to_string())
                .or(crate::value_in_array!("workouts.body_parts", part.to_string())),
        )
        .count()
        .get_result(conn)
}
