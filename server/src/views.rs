//! Askama templates and the small view models they render.

use askama::Template;
use axum::http::StatusCode;

use crate::catalog::{QuickOption, QUICK_OPTIONS};
use crate::flash::Flash;
use crate::forms::{RecipeFormData, WorkoutFormData};
use crate::models::{Recipe, Style, Workout};
use crate::workouts::query::Paging;

/// Data every full page needs for the shared chrome.
#[derive(Debug, Clone)]
pub struct Layout {
    pub site_name: String,
    pub csrf_token: String,
    pub flashes: Vec<Flash>,
    pub is_admin: bool,
    pub quick_options: Vec<QuickOption>,
}

impl Layout {
    pub fn new(site_name: &str, csrf_token: &str, flashes: Vec<Flash>, is_admin: bool) -> Self {
        Self {
            site_name: site_name.to_string(),
            csrf_token: csrf_token.to_string(),
            flashes,
            is_admin,
            quick_options: QUICK_OPTIONS.to_vec(),
        }
    }
}

/// `path?k=v&...`, skipping empty values.
pub fn link(path: &str, pairs: &[(&str, &str)]) -> String {
    let pairs: Vec<(&str, &str)> = pairs
        .iter()
        .copied()
        .filter(|(_, v)| !v.is_empty())
        .collect();
    if pairs.is_empty() {
        return path.to_string();
    }
    match serde_urlencoded::to_string(&pairs) {
        Ok(query) => format!("{path}?{query}"),
        Err(_) => path.to_string(),
    }
}

pub fn format_rating(rating: f64) -> String {
    if rating > 0.0 {
        format!("{rating:.1}")
    } else {
        String::new()
    }
}

#[derive(Debug, Clone)]
pub struct WorkoutCard {
    pub name: String,
    pub url: String,
    pub level: String,
    pub style: String,
    pub parts: String,
    pub image: Option<String>,
    pub is_favorite: bool,
    pub rating: String,
}

impl From<&Workout> for WorkoutCard {
    fn from(w: &Workout) -> Self {
        Self {
            name: w.name.clone(),
            url: format!("/workouts/{}", w.slug),
            level: w.level.clone(),
            style: w.style.clone(),
            parts: w.targeted_parts().join(", "),
            image: w.images.first().cloned(),
            is_favorite: w.is_favorite,
            rating: format_rating(w.rating),
        }
    }
}

pub fn cards(workouts: &[Workout]) -> Vec<WorkoutCard> {
    workouts.iter().map(WorkoutCard::from).collect()
}

#[derive(Debug, Clone)]
pub struct NavLink {
    pub label: String,
    pub url: String,
}

impl NavLink {
    /// Links into the browse page, one per value of `key`.
    pub fn browse(key: &str, values: &[String]) -> Vec<Self> {
        values
            .iter()
            .map(|value| Self {
                label: value.clone(),
                url: link("/workouts/browse", &[(key, value.as_str())]),
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct NamedCount {
    pub name: String,
    pub count: i64,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn list(values: &[String], current: &str) -> Vec<Self> {
        values
            .iter()
            .map(|value| Self {
                value: value.clone(),
                label: value.clone(),
                selected: value == current,
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct Pager {
    pub page: i64,
    pub total_pages: i64,
    pub prev_url: Option<String>,
    pub next_url: Option<String>,
}

impl Pager {
    /// `pairs` is the current query without `page`/`per_page`.
    pub fn new(path: &str, pairs: &[(&str, &str)], paging: Paging, total: i64) -> Self {
        let total_pages = paging.total_pages(total);
        let per_page = paging.per_page.to_string();
        let page_url = |page: i64| {
            let page = page.to_string();
            let mut all = pairs.to_vec();
            all.push(("page", page.as_str()));
            all.push(("per_page", per_page.as_str()));
            link(path, &all)
        };

        Self {
            page: paging.page,
            total_pages,
            prev_url: (paging.page > 1).then(|| page_url(paging.page - 1)),
            next_url: (paging.page < total_pages).then(|| page_url(paging.page + 1)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageSlot {
    pub index: usize,
    pub url: String,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub status: u16,
    pub title: String,
    pub message: String,
}

impl ErrorPage {
    pub fn new(status: StatusCode, title: &str, message: &str) -> Self {
        Self {
            status: status.as_u16(),
            title: title.to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomePage {
    pub layout: Layout,
}

#[derive(Template)]
#[template(path = "workouts.html")]
pub struct WorkoutsLandingPage {
    pub layout: Layout,
    pub levels: Vec<NavLink>,
    pub body_parts_featured: Vec<NavLink>,
    pub styles: Vec<NavLink>,
    pub styles_featured: Vec<NavLink>,
    pub spotlight_title: &'static str,
    pub spotlight: Vec<WorkoutCard>,
}

#[derive(Template)]
#[template(path = "all_workouts.html")]
pub struct AllWorkoutsPage {
    pub layout: Layout,
    pub items: Vec<WorkoutCard>,
}

#[derive(Template)]
#[template(path = "styles_index.html")]
pub struct StylesIndexPage {
    pub layout: Layout,
    pub styles: Vec<NamedCount>,
}

#[derive(Template)]
#[template(path = "body_parts_index.html")]
pub struct BodyPartsIndexPage {
    pub layout: Layout,
    pub body_parts: Vec<NamedCount>,
}

#[derive(Template)]
#[template(path = "browse_workouts.html")]
pub struct BrowsePage {
    pub layout: Layout,
    pub items: Vec<WorkoutCard>,
    pub total: i64,
    pub pager: Pager,
    pub q: String,
    pub per_page: i64,
    pub levels: Vec<SelectOption>,
    pub body_parts: Vec<SelectOption>,
    pub styles: Vec<SelectOption>,
    pub sorts: Vec<SelectOption>,
}

#[derive(Template)]
#[template(path = "workout_detail.html")]
pub struct WorkoutDetailPage {
    pub layout: Layout,
    pub workout: Workout,
    pub parts: Vec<String>,
    pub rating: String,
    pub related: Vec<WorkoutCard>,
}

#[derive(Template)]
#[template(path = "recipes.html")]
pub struct RecipesPage {
    pub layout: Layout,
    pub recipes: Vec<Recipe>,
}

#[derive(Template)]
#[template(path = "search_results.html")]
pub struct SearchPage {
    pub layout: Layout,
    pub q: String,
    pub items: Vec<WorkoutCard>,
    pub total: i64,
    pub pager: Pager,
    pub recipes: Vec<Recipe>,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub layout: Layout,
    pub username: String,
    pub next: String,
}

#[derive(Debug, Clone)]
pub struct AdminWorkoutRow {
    pub id: String,
    pub name: String,
    pub url: String,
    pub level: String,
    pub style: String,
    pub is_favorite: bool,
    pub created: String,
}

impl From<&Workout> for AdminWorkoutRow {
    fn from(w: &Workout) -> Self {
        Self {
            id: w.id.to_string(),
            name: w.name.clone(),
            url: format!("/workouts/{}", w.slug),
            level: w.level.clone(),
            style: w.style.clone(),
            is_favorite: w.is_favorite,
            created: w.created_at.format("%Y-%m-%d").to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "admin/index.html")]
pub struct AdminIndexPage {
    pub layout: Layout,
    pub items: Vec<AdminWorkoutRow>,
}

#[derive(Template)]
#[template(path = "admin/workout_form.html")]
pub struct WorkoutFormPage {
    pub layout: Layout,
    pub heading: &'static str,
    pub action: String,
    pub form: WorkoutFormData,
    pub levels: Vec<SelectOption>,
    pub styles: Vec<SelectOption>,
    pub body_parts: Vec<String>,
    pub slots: Vec<ImageSlot>,
}

#[derive(Template)]
#[template(path = "admin/styles.html")]
pub struct AdminStylesPage {
    pub layout: Layout,
    pub styles: Vec<Style>,
}

#[derive(Template)]
#[template(path = "admin/recipes.html")]
pub struct AdminRecipesPage {
    pub layout: Layout,
    pub recipes: Vec<Recipe>,
}

#[derive(Template)]
#[template(path = "admin/recipe_form.html")]
pub struct RecipeFormPage {
    pub layout: Layout,
    pub heading: &'static str,
    pub action: String,
    pub form: RecipeFormData,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn layout() -> Layout {
        Layout::new("NFG", "tok123", vec![Flash::success("Saved <b>ok</b>")], false)
    }

    fn workout() -> Workout {
        Workout {
            id: Uuid::new_v4(),
            name: "Goblet Squat".to_string(),
            slug: "goblet-squat".to_string(),
            level: "Beginner".to_string(),
            body_part: "Legs".to_string(),
            body_parts: vec!["Legs".to_string(), "Glutes".to_string()],
            style: "Kettlebell".to_string(),
            tags: vec!["squat".to_string()],
            images: vec!["/static/uploads/20250101/a.png".to_string()],
            muscle_image: None,
            info: Some("Hold the bell at your chest.".to_string()),
            tips: vec!["Brace".to_string(), "Sit back".to_string()],
            youtube_id: Some("dQw4w9WgXcQ".to_string()),
            is_favorite: true,
            rating: 4.5,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_link_skips_empty_and_encodes() {
        assert_eq!(link("/workouts/browse", &[]), "/workouts/browse");
        assert_eq!(
            link("/workouts/browse", &[("style", "Cardio/Endurance"), ("q", "")]),
            "/workouts/browse?style=Cardio%2FEndurance"
        );
    }

    #[test]
    fn test_pager_urls() {
        let paging = Paging { page: 2, per_page: 6 };
        let pager = Pager::new("/workouts/browse", &[("level", "Beginner")], paging, 20);
        assert_eq!(pager.total_pages, 4);
        assert_eq!(
            pager.prev_url.as_deref(),
            Some("/workouts/browse?level=Beginner&page=1&per_page=6")
        );
        assert_eq!(
            pager.next_url.as_deref(),
            Some("/workouts/browse?level=Beginner&page=3&per_page=6")
        );

        let last = Pager::new("/search", &[], Paging { page: 1, per_page: 24 }, 3);
        assert!(last.prev_url.is_none());
        assert!(last.next_url.is_none());
    }

    #[test]
    fn test_select_option_marks_current() {
        let values = vec!["Beginner".to_string(), "Advanced".to_string()];
        let options = SelectOption::list(&values, "Advanced");
        assert!(!options[0].selected);
        assert!(options[1].selected);
    }

    #[test]
    fn test_workout_card() {
        let card = WorkoutCard::from(&workout());
        assert_eq!(card.url, "/workouts/goblet-squat");
        assert_eq!(card.parts, "Legs, Glutes");
        assert_eq!(card.rating, "4.5");
        assert_eq!(format_rating(0.0), "");
    }

    #[test]
    fn test_error_page_renders() {
        let html = ErrorPage::new(StatusCode::NOT_FOUND, "Page not found", "Nope")
            .render()
            .unwrap();
        assert!(html.contains("404"));
        assert!(html.contains("Page not found"));
    }

    #[test]
    fn test_layout_escapes_flash_and_carries_csrf() {
        let html = HomePage { layout: layout() }.render().unwrap();
        assert!(html.contains("Saved &lt;b&gt;ok&lt;/b&gt;"));
        assert!(html.contains("flash-success"));
        assert!(html.contains("/workouts?filter=favorites"));
        assert!(!html.contains("tok123"), "logout form only shown to admins");

        let mut admin_layout = layout();
        admin_layout.is_admin = true;
        let html = HomePage {
            layout: admin_layout,
        }
        .render()
        .unwrap();
        assert!(html.contains(r#"name="csrf_token" value="tok123""#));
    }

    #[test]
    fn test_detail_page_renders() {
        let w = workout();
        let page = WorkoutDetailPage {
            layout: layout(),
            parts: w.targeted_parts(),
            rating: format_rating(w.rating),
            workout: w,
            related: Vec::new(),
        };
        let html = page.render().unwrap();
        assert!(html.contains("Goblet Squat"));
        assert!(html.contains("https://www.youtube.com/embed/dQw4w9WgXcQ"));
        assert!(html.contains("Sit back"));
    }

    #[test]
    fn test_browse_page_renders_selected_options() {
        let levels = vec!["Beginner".to_string(), "Advanced".to_string()];
        let page = BrowsePage {
            layout: layout(),
            items: cards(&[workout()]),
            total: 1,
            pager: Pager::new("/workouts/browse", &[], Paging { page: 1, per_page: 6 }, 1),
            q: "squat".to_string(),
            per_page: 6,
            levels: SelectOption::list(&levels, "Advanced"),
            body_parts: Vec::new(),
            styles: Vec::new(),
            sorts: Vec::new(),
        };
        let html = page.render().unwrap();
        assert!(html.contains(r#"<option value="Advanced" selected>"#));
        assert!(html.contains("/workouts/goblet-squat"));
    }

    #[test]
    fn test_workout_form_renders_slots() {
        let page = WorkoutFormPage {
            layout: layout(),
            heading: "New workout",
            action: "/admin/workouts/new".to_string(),
            form: WorkoutFormData::default(),
            levels: Vec::new(),
            styles: Vec::new(),
            body_parts: vec!["Chest".to_string()],
            slots: (1..=8)
                .map(|index| ImageSlot {
                    index,
                    url: String::new(),
                })
                .collect(),
        };
        let html = page.render().unwrap();
        assert!(html.contains(r#"enctype="multipart/form-data""#));
        assert!(html.contains(r#"name="img8_file""#));
        assert!(html.contains(r#"name="csrf_token" value="tok123""#));
    }
}
