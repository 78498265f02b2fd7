use diesel::pg::Pg;
use diesel::prelude::*;
use serde::Deserialize;

use crate::models::Workout;
use crate::raw_sql::contains_pattern;
use crate::schema::workouts;

pub type WorkoutQuery = workouts::BoxedQuery<'static, Pg>;

pub const BROWSE_PER_PAGE: i64 = 6;
pub const SEARCH_PER_PAGE: i64 = 24;
pub const MAX_PER_PAGE: i64 = 100;
pub const RELATED_LIMIT: i64 = 6;
const LANDING_LIST_LIMIT: i64 = 20;
const LANDING_PREVIEW_LIMIT: i64 = 3;

/// Raw query string of `/workouts/browse` and `/search`.
///
/// Everything arrives as text so bad numbers degrade to defaults instead of a 400.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrowseParams {
    pub level: Option<String>,
    pub body: Option<String>,
    pub style: Option<String>,
    pub q: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkoutSort {
    #[default]
    Name,
    Recent,
    Rating,
    Favorites,
}

impl WorkoutSort {
    pub const ALL: [WorkoutSort; 4] = [
        WorkoutSort::Name,
        WorkoutSort::Recent,
        WorkoutSort::Rating,
        WorkoutSort::Favorites,
    ];

    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("recent") => WorkoutSort::Recent,
            Some("rating") => WorkoutSort::Rating,
            Some("favorites") => WorkoutSort::Favorites,
            _ => WorkoutSort::Name,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutSort::Name => "name",
            WorkoutSort::Recent => "recent",
            WorkoutSort::Rating => "rating",
            WorkoutSort::Favorites => "favorites",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WorkoutSort::Name => "Name",
            WorkoutSort::Recent => "Recently added",
            WorkoutSort::Rating => "Top rated",
            WorkoutSort::Favorites => "Favorites only",
        }
    }

    /// Apply the ordering. `Favorites` is a filter, so it orders by name.
    pub fn apply(&self, query: WorkoutQuery) -> WorkoutQuery {
        match self {
            WorkoutSort::Recent => query.order(workouts::created_at.desc()),
            WorkoutSort::Rating => query.order((workouts::rating.desc(), workouts::name.asc())),
            WorkoutSort::Name | WorkoutSort::Favorites => query.order(workouts::name.asc()),
        }
    }
}

/// Conditions a workout must meet. All set fields are ANDed together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutFilter {
    pub level: Option<String>,
    pub style: Option<String>,
    pub body: Option<String>,
    pub favorites_only: bool,
    pub text: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl WorkoutFilter {
    pub fn from_browse(params: &BrowseParams) -> Self {
        Self {
            level: non_empty(params.level.as_deref()),
            style: non_empty(params.style.as_deref()),
            body: non_empty(params.body.as_deref()),
            favorites_only: WorkoutSort::parse(params.sort.as_deref()) == WorkoutSort::Favorites,
            text: non_empty(params.q.as_deref()),
        }
    }

    /// Free-text match only, as used by site search.
    pub fn text(q: &str) -> Self {
        Self {
            text: non_empty(Some(q)),
            ..Self::default()
        }
    }

    pub fn query(&self) -> WorkoutQuery {
        let mut query = workouts::table.into_boxed();

        if let Some(level) = &self.level {
            query = query.filter(workouts::level.eq(level.clone()));
        }
        if let Some(style) = &self.style {
            query = query.filter(workouts::style.eq(style.clone()));
        }
        if let Some(body) = &self.body {
            query = query.filter(
                workouts::body_part
                    .eq(body.clone())
                    .or(crate::value_in_array!("workouts.body_parts", body.clone())),
            );
        }
        if self.favorites_only {
            query = query.filter(workouts::is_favorite.eq(true));
        }
        if let Some(text) = &self.text {
            let pattern = contains_pattern(text);
            query = query.filter(
                workouts::name
                    .ilike(pattern.clone())
                    .or(workouts::level.ilike(pattern.clone()))
                    .or(workouts::body_part.ilike(pattern.clone()))
                    .or(workouts::style.ilike(pattern.clone()))
                    .or(crate::array_element_ilike!("workouts.body_parts", pattern.clone()))
                    .or(crate::array_element_ilike!("workouts.tags", pattern)),
            );
        }

        query
    }
}

/// 1-based page number and page size, clamped to sane bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub page: i64,
    pub per_page: i64,
}

impl Paging {
    pub fn parse(page: Option<&str>, per_page: Option<&str>, default_per_page: i64) -> Self {
        let page = page
            .and_then(|p| p.trim().parse::<i64>().ok())
            .unwrap_or(1)
            .max(1);
        let per_page = per_page
            .and_then(|p| p.trim().parse::<i64>().ok())
            .unwrap_or(default_per_page)
            .clamp(1, MAX_PER_PAGE);
        Self { page, per_page }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            1
        } else {
            (total + self.per_page - 1) / self.per_page
        }
    }

    pub fn apply(&self, query: WorkoutQuery) -> WorkoutQuery {
        query.limit(self.per_page).offset(self.offset())
    }
}

/// Spotlight list on the `/workouts` landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandingFilter {
    Preview,
    Favorites,
    Recent,
    Top,
}

impl LandingFilter {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("favorites") => LandingFilter::Favorites,
            Some("recent") => LandingFilter::Recent,
            Some("top") => LandingFilter::Top,
            _ => LandingFilter::Preview,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            LandingFilter::Preview => "All Workouts",
            LandingFilter::Favorites => "Favorites",
            LandingFilter::Recent => "Recently Added",
            LandingFilter::Top => "Top Rated",
        }
    }

    pub fn query(&self) -> WorkoutQuery {
        let query = workouts::table.into_boxed();
        match self {
            LandingFilter::Preview => query
                .order(workouts::name.asc())
                .limit(LANDING_PREVIEW_LIMIT),
            LandingFilter::Favorites => query
                .filter(workouts::is_favorite.eq(true))
                .order(workouts::name.asc()),
            LandingFilter::Recent => query
                .order(workouts::created_at.desc())
                .limit(LANDING_LIST_LIMIT),
            LandingFilter::Top => query
                .order((workouts::rating.desc(), workouts::name.asc()))
                .limit(LANDING_LIST_LIMIT),
        }
    }
}

/// Other workouts sharing a body part or the style of `workout`.
/// With neither to go on, any other workout qualifies.
pub fn related_query(workout: &Workout) -> WorkoutQuery {
    let parts = workout.targeted_parts();
    let style = workout.style.trim().to_string();

    let mut query = workouts::table
        .filter(workouts::slug.ne(workout.slug.clone()))
        .into_boxed();

    match (parts.is_empty(), style.is_empty()) {
        (true, true) => {}
        (false, true) => {
            query = query.filter(
                crate::array_overlaps!("workouts.body_parts", parts.clone())
                    .or(workouts::body_part.eq_any(parts)),
            );
        }
        (true, false) => {
            query = query.filter(workouts::style.eq(style));
        }
        (false, false) => {
            query = query.filter(
                crate::array_overlaps!("workouts.body_parts", parts.clone())
                    .or(workouts::body_part.eq_any(parts))
                    .or(workouts::style.eq(style)),
            );
        }
    }

    query
        .order((
            workouts::rating.desc(),
            workouts::created_at.desc(),
            workouts::name.asc(),
        ))
        .limit(RELATED_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn sql_of(query: WorkoutQuery) -> String {
        diesel::debug_query::<Pg, _>(&query).to_string()
    }

    fn params(pairs: &[(&str, &str)]) -> BrowseParams {
        let encoded = serde_urlencoded::to_string(pairs).unwrap();
        serde_urlencoded::from_str(&encoded).unwrap()
    }

    fn workout(slug: &str, style: &str, body_part: &str, body_parts: &[&str]) -> Workout {
        Workout {
            id: Uuid::new_v4(),
            name: slug.to_string(),
            slug: slug.to_string(),
            level: String::new(),
            body_part: body_part.to_string(),
            body_parts: body_parts.iter().map(|s| s.to_string()).collect(),
            style: style.to_string(),
            tags: Vec::new(),
            images: Vec::new(),
            muscle_image: None,
            info: None,
            tips: Vec::new(),
            youtube_id: None,
            is_favorite: false,
            rating: 0.0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!(WorkoutSort::parse(None), WorkoutSort::Name);
        assert_eq!(WorkoutSort::parse(Some("recent")), WorkoutSort::Recent);
        assert_eq!(WorkoutSort::parse(Some("rating")), WorkoutSort::Rating);
        assert_eq!(WorkoutSort::parse(Some("favorites")), WorkoutSort::Favorites);
        assert_eq!(WorkoutSort::parse(Some("bogus")), WorkoutSort::Name);
    }

    #[test]
    fn test_filter_from_browse_ignores_blank_values() {
        let filter = WorkoutFilter::from_browse(&params(&[
            ("level", "Beginner"),
            ("style", ""),
            ("body", "  "),
            ("q", "  push "),
        ]));
        assert_eq!(
            filter,
            WorkoutFilter {
                level: Some("Beginner".to_string()),
                style: None,
                body: None,
                favorites_only: false,
                text: Some("push".to_string()),
            }
        );
    }

    #[test]
    fn test_favorites_sort_adds_filter() {
        let filter = WorkoutFilter::from_browse(&params(&[("sort", "favorites")]));
        assert!(filter.favorites_only);
        let sql = sql_of(filter.query());
        assert!(sql.contains("\"workouts\".\"is_favorite\" = $1"), "{sql}");
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let sql = sql_of(WorkoutFilter::default().query());
        assert!(!sql.contains("WHERE"), "{sql}");
    }

    #[test]
    fn test_filters_are_anded() {
        let filter = WorkoutFilter {
            level: Some("Advanced".to_string()),
            style: Some("Barbell".to_string()),
            body: Some("Legs".to_string()),
            ..WorkoutFilter::default()
        };
        let sql = sql_of(filter.query());
        assert!(sql.contains("\"workouts\".\"level\" = $1"), "{sql}");
        assert!(sql.contains("\"workouts\".\"style\" = $2"), "{sql}");
        assert!(sql.contains("\"workouts\".\"body_part\" = $3"), "{sql}");
        assert!(sql.contains("$4 = ANY(workouts.body_parts)"), "{sql}");
        assert!(sql.contains(" AND "), "{sql}");
    }

    #[test]
    fn test_text_filter_escapes_and_binds() {
        let sql = sql_of(WorkoutFilter::text("50%_off").query());
        assert!(sql.contains("\"workouts\".\"name\" ILIKE $1"), "{sql}");
        assert!(sql.contains("unnest(workouts.tags)"), "{sql}");
        assert!(sql.contains("unnest(workouts.body_parts)"), "{sql}");
        assert!(sql.contains(r#""%50\\%\\_off%""#), "{sql}");
        assert!(!sql.contains("50%_off"), "{sql}");
    }

    #[test]
    fn test_blank_search_text_is_no_filter() {
        assert_eq!(WorkoutFilter::text("   "), WorkoutFilter::default());
    }

    #[test]
    fn test_paging_defaults_and_clamps() {
        assert_eq!(
            Paging::parse(None, None, BROWSE_PER_PAGE),
            Paging { page: 1, per_page: 6 }
        );
        assert_eq!(
            Paging::parse(Some("0"), Some("500"), BROWSE_PER_PAGE),
            Paging { page: 1, per_page: 100 }
        );
        assert_eq!(
            Paging::parse(Some("-3"), Some("0"), SEARCH_PER_PAGE),
            Paging { page: 1, per_page: 1 }
        );
        assert_eq!(
            Paging::parse(Some("two"), Some("many"), SEARCH_PER_PAGE),
            Paging { page: 1, per_page: 24 }
        );
    }

    #[test]
    fn test_paging_offset_and_total_pages() {
        let paging = Paging { page: 3, per_page: 6 };
        assert_eq!(paging.offset(), 12);
        assert_eq!(paging.total_pages(0), 1);
        assert_eq!(paging.total_pages(12), 2);
        assert_eq!(paging.total_pages(13), 3);
    }

    #[test]
    fn test_landing_filter_parse() {
        assert_eq!(LandingFilter::parse(Some("favorites")), LandingFilter::Favorites);
        assert_eq!(LandingFilter::parse(Some("recent")), LandingFilter::Recent);
        assert_eq!(LandingFilter::parse(Some("top")), LandingFilter::Top);
        assert_eq!(LandingFilter::parse(Some("other")), LandingFilter::Preview);
        assert_eq!(LandingFilter::parse(None), LandingFilter::Preview);
    }

    #[test]
    fn test_landing_queries() {
        let sql = sql_of(LandingFilter::Top.query());
        assert!(sql.contains("ORDER BY \"workouts\".\"rating\" DESC"), "{sql}");
        assert!(sql.contains("LIMIT $1"), "{sql}");

        let sql = sql_of(LandingFilter::Favorites.query());
        assert!(sql.contains("\"workouts\".\"is_favorite\" = $1"), "{sql}");
        assert!(!sql.contains("LIMIT"), "{sql}");
    }

    #[test]
    fn test_related_query_uses_parts_and_style() {
        let w = workout("squat", "Barbell", "Legs", &["Legs", "Glutes"]);
        let sql = sql_of(related_query(&w));
        assert!(sql.contains("\"workouts\".\"slug\" != $1"), "{sql}");
        assert!(sql.contains("workouts.body_parts && $2"), "{sql}");
        assert!(sql.contains("\"workouts\".\"style\" = $4"), "{sql}");
    }

    #[test]
    fn test_related_query_falls_back_to_single_body_part() {
        let w = workout("plank", "", "Core", &[]);
        let sql = sql_of(related_query(&w));
        assert!(sql.contains("workouts.body_parts && $2"), "{sql}");
        assert!(sql.contains("[\"Core\"]"), "{sql}");
        assert!(!sql.contains("\"workouts\".\"style\" ="), "{sql}");
    }

    #[test]
    fn test_related_query_without_hints_excludes_self_only() {
        let w = workout("mystery", "", "", &[]);
        let sql = sql_of(related_query(&w));
        assert!(sql.contains("\"workouts\".\"slug\" != $1"), "{sql}");
        assert!(!sql.contains("&&"), "{sql}");
    }
}
