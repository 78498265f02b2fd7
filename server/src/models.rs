use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::workouts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Workout {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub level: String,
    pub body_part: String,
    pub body_parts: Vec<String>,
    pub style: String,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub muscle_image: Option<String>,
    pub info: Option<String>,
    pub tips: Vec<String>,
    pub youtube_id: Option<String>,
    pub is_favorite: bool,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Workout {
    /// Body parts this workout targets, falling back to the single legacy field.
    pub fn targeted_parts(&self) -> Vec<String> {
        if !self.body_parts.is_empty() {
            self.body_parts.clone()
        } else if !self.body_part.is_empty() {
            vec![self.body_part.clone()]
        } else {
            Vec::new()
        }
    }
}

/// Column values written by both the create and edit forms.
#[derive(Insertable, AsChangeset, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::workouts)]
#[diesel(treat_none_as_null = true)]
pub struct WorkoutChanges {
    pub name: String,
    pub slug: String,
    pub level: String,
    pub body_part: String,
    pub body_parts: Vec<String>,
    pub style: String,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub muscle_image: Option<String>,
    pub info: Option<String>,
    pub tips: Vec<String>,
    pub youtube_id: Option<String>,
    pub is_favorite: bool,
    pub rating: f64,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::styles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Style {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub sort_order: i32,
    pub active: bool,
    #[allow(dead_code)]
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::styles)]
pub struct NewStyle<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    pub sort_order: i32,
    pub active: bool,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Recipe {
    pub id: Uuid,
    pub name: String,
    pub url: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub image: Option<String>,
    #[allow(dead_code)]
    pub created_at: DateTime<Utc>,
    #[allow(dead_code)]
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, AsChangeset, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(treat_none_as_null = true)]
pub struct RecipeChanges {
    pub name: String,
    pub url: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub image: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::admin_sessions)]
pub struct NewAdminSession<'a> {
    pub username: &'a str,
    pub token_hash: &'a str,
    pub expires_at: DateTime<Utc>,
}
