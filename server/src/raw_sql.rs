//! Raw SQL fragments that can't be expressed in Diesel's type-safe DSL.
//!
//! # Safety
//!
//! All SQL in this module has been reviewed for SQL injection safety:
//! - User input is ALWAYS passed via `.bind()` parameters
//! - Column names are string literals fixed at compile time
//!
//! When adding new SQL here:
//! 1. Document why Diesel DSL can't be used
//! 2. Ensure all user input uses `.bind()`

/// Filter expression: `value` is one of the elements of a `TEXT[]` column.
///
/// # Why raw SQL?
/// Diesel's array `contains` collides with the range/jsonb methods of the same
/// name; `= ANY(col)` also lets Postgres use the GIN index.
#[macro_export]
macro_rules! value_in_array {
    ($column:literal, $value:expr) => {
        diesel::dsl::sql::<diesel::sql_types::Bool>("(")
            .bind::<diesel::sql_types::Text, _>($value)
            .sql(concat!(" = ANY(", $column, "))"))
    };
}

/// Filter expression: some element of a `TEXT[]` column matches an ILIKE pattern.
///
/// # Why raw SQL?
/// `unnest()` inside a correlated subquery isn't in Diesel's DSL.
#[macro_export]
macro_rules! array_element_ilike {
    ($column:literal, $pattern:expr) => {
        diesel::dsl::sql::<diesel::sql_types::Bool>(concat!(
            "EXISTS (SELECT 1 FROM unnest(",
            $column,
            ") AS elem WHERE elem ILIKE "
        ))
        .bind::<diesel::sql_types::Text, _>($pattern)
        .sql(")")
    };
}

/// Filter expression: a `TEXT[]` column shares at least one element with `values`.
#[macro_export]
macro_rules! array_overlaps {
    ($column:literal, $values:expr) => {
        diesel::dsl::sql::<diesel::sql_types::Bool>(concat!("(", $column, " && "))
            .bind::<diesel::sql_types::Array<diesel::sql_types::Text>, _>($values)
            .sql(")")
    };
}

/// Every body part named by any workout, from either the single field or the array.
///
/// # Safety
/// Static SQL string with no user input.
pub const DISTINCT_BODY_PARTS_QUERY: &str = "SELECT DISTINCT part FROM ( \
        SELECT body_part AS part FROM workouts WHERE body_part <> '' \
        UNION SELECT unnest(body_parts) AS part FROM workouts \
    ) AS parts ORDER BY part";

/// Escape `%`, `_` and the escape character itself so user text matches literally
/// inside an ILIKE pattern, then wrap it for a substring match.
pub fn contains_pattern(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::pg::Pg;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("push"), "%push%");
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("a_b"), "%a\\_b%");
        assert_eq!(contains_pattern("c:\\x"), "%c:\\\\x%");
    }

    #[test]
    fn test_value_in_array_binds_value() {
        let expr = value_in_array!("workouts.body_parts", "Chest".to_string());
        let sql = diesel::debug_query::<Pg, _>(&expr).to_string();
        assert!(sql.contains("($1 = ANY(workouts.body_parts))"), "{sql}");
        assert!(sql.contains("\"Chest\""), "{sql}");
    }

    #[test]
    fn test_array_element_ilike_binds_pattern() {
        let expr = array_element_ilike!("workouts.tags", contains_pattern("legs"));
        let sql = diesel::debug_query::<Pg, _>(&expr).to_string();
        assert!(
            sql.contains("EXISTS (SELECT 1 FROM unnest(workouts.tags) AS elem WHERE elem ILIKE $1)"),
            "{sql}"
        );
    }
}
