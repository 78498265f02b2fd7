//! Fixed vocabularies for workouts, plus the admin-managed style list.

use diesel::prelude::*;
use nfg_core::slugify;

use crate::db::DbPool;
use crate::models::NewStyle;
use crate::schema::styles;

pub const WORKOUT_LEVELS: &[&str] = &["Beginner", "Intermediate", "Advanced"];

/// Used only while the styles table has no active entries.
pub const DEFAULT_WORKOUT_STYLES: &[&str] = &[
    "BodyWeight",
    "Barbell",
    "Dumbbell",
    "Kettlebell",
    "Resistance Bands",
    "Machines",
    "Calisthenics",
    "Cardio/Endurance",
    "Plyometric/Explosive",
    "CrossFit/Functional",
    "Yoga/Mobility",
];

pub const BODY_PARTS_MASTER: &[&str] = &[
    "Chest",
    "Back",
    "Lats",
    "Shoulders",
    "Arms",
    "Biceps",
    "Triceps",
    "Forearms",
    "Core",
    "Abs",
    "Obliques",
    "Lower Back",
    "Upper Back",
    "Legs",
    "Quads",
    "Hamstrings",
    "Glutes",
    "Calves",
    "Hips",
    "Full Body",
    "Neck",
];

pub const FEATURED_BODY_PARTS: &[&str] = &["Chest", "Back", "Legs"];
pub const FEATURED_STYLES: &[&str] = &["BodyWeight", "Barbell", "Machines"];

/// Entry in the quick menu shown on every page.
#[derive(Debug, Clone, Copy)]
pub struct QuickOption {
    pub label: &'static str,
    pub url: &'static str,
}

pub const QUICK_OPTIONS: &[QuickOption] = &[
    QuickOption {
        label: "Favorites",
        url: "/workouts?filter=favorites",
    },
    QuickOption {
        label: "Recently Added",
        url: "/workouts?filter=recent",
    },
    QuickOption {
        label: "Top Rated",
        url: "/workouts?filter=top",
    },
];

pub fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Active style names in display order, or the defaults when none exist.
pub fn active_styles(conn: &mut PgConnection) -> QueryResult<Vec<String>> {
    let names: Vec<String> = styles::table
        .filter(styles::active.eq(true))
        .order((styles::sort_order.asc(), styles::name.asc()))
        .select(styles::name)
        .load(conn)?;

    if names.is_empty() {
        Ok(owned(DEFAULT_WORKOUT_STYLES))
    } else {
        Ok(names)
    }
}

/// Featured body parts that actually occur in the data, or all of them when none do.
pub fn featured_body_parts(present: &[String]) -> Vec<String> {
    let featured: Vec<String> = FEATURED_BODY_PARTS
        .iter()
        .filter(|part| present.iter().any(|p| p == *part))
        .map(|part| part.to_string())
        .collect();

    if featured.is_empty() {
        owned(FEATURED_BODY_PARTS)
    } else {
        featured
    }
}

/// The default style rows, in order.
pub fn default_style_rows() -> Vec<(String, String, i32)> {
    DEFAULT_WORKOUT_STYLES
        .iter()
        .enumerate()
        .map(|(i, name)| (name.to_string(), slugify(name), i as i32))
        .collect()
}

/// Populate the styles table with the defaults the first time the app starts.
/// Failures are logged and otherwise ignored.
pub fn ensure_style_seed(pool: &DbPool) {
    let result = pool
        .get()
        .map_err(|e| e.to_string())
        .and_then(|mut conn| seed_styles(&mut conn).map_err(|e| e.to_string()));

    match result {
        Ok(0) => {}
        Ok(inserted) => tracing::info!(inserted, "seeded default workout styles"),
        Err(e) => tracing::warn!("Styles seed skipped: {e}"),
    }
}

fn seed_styles(conn: &mut PgConnection) -> QueryResult<usize> {
    let existing: i64 = styles::table.count().get_result(conn)?;
    if existing > 0 {
        return Ok(0);
    }

    let rows = default_style_rows();
    let new_styles: Vec<NewStyle> = rows
        .iter()
        .map(|(name, slug, order)| NewStyle {
            name,
            slug,
            sort_order: *order,
            active: true,
        })
        .collect();

    diesel::insert_into(styles::table)
        .values(&new_styles)
        .execute(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_master_lists() {
        assert_eq!(WORKOUT_LEVELS.len(), 3);
        assert_eq!(BODY_PARTS_MASTER.len(), 21);
        assert_eq!(DEFAULT_WORKOUT_STYLES.len(), 11);
        for part in FEATURED_BODY_PARTS {
            assert!(BODY_PARTS_MASTER.contains(part));
        }
        for style in FEATURED_STYLES {
            assert!(DEFAULT_WORKOUT_STYLES.contains(style));
        }
    }

    #[test]
    fn test_featured_body_parts_filters_to_present() {
        let present = vec!["Legs".to_string(), "Chest".to_string(), "Neck".to_string()];
        assert_eq!(featured_body_parts(&present), vec!["Chest", "Legs"]);
    }

    #[test]
    fn test_featured_body_parts_fallback() {
        assert_eq!(featured_body_parts(&[]), vec!["Chest", "Back", "Legs"]);
    }

    #[test]
    fn test_default_style_rows_have_unique_slugs() {
        let rows = default_style_rows();
        assert_eq!(rows[0], ("BodyWeight".to_string(), "bodyweight".to_string(), 0));
        assert_eq!(rows[7].1, "cardio-endurance");
        let slugs: std::collections::HashSet<&String> = rows.iter().map(|(_, slug, _)| slug).collect();
        assert_eq!(slugs.len(), rows.len());
    }

    #[test]
    fn test_quick_options_point_at_landing_filters() {
        let urls: Vec<&str> = QUICK_OPTIONS.iter().map(|o| o.url).collect();
        assert_eq!(
            urls,
            vec![
                "/workouts?filter=favorites",
                "/workouts?filter=recent",
                "/workouts?filter=top"
            ]
        );
    }
}
