//! Admin and login form payloads.

use axum::extract::Multipart;
use nfg_core::{extract_youtube_id, slugify, split_list};
use serde::Deserialize;
use std::collections::HashMap;

use crate::error::AppError;
use crate::models::{Recipe, RecipeChanges, Workout, WorkoutChanges};
use crate::uploads::{UploadStore, UploadedFile};
use crate::views::ImageSlot;

/// Number of ordered image slots on the workout form.
pub const IMAGE_SLOTS: usize = 8;

/// A `multipart/form-data` body split into text fields and non-empty files.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::MalformedForm(e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::MalformedForm(e.body_text()))?;
                    if !file_name.is_empty() && !data.is_empty() {
                        form.files.insert(name, UploadedFile { file_name, data });
                    }
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::MalformedForm(e.body_text()))?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    /// Raw value of a text field, or "" when absent.
    pub fn text(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    /// First of `names` with a non-blank value, trimmed.
    pub fn first_text(&self, names: &[&str]) -> &str {
        names
            .iter()
            .map(|name| self.text(name).trim())
            .find(|value| !value.is_empty())
            .unwrap_or("")
    }

    pub fn file(&self, names: &[&str]) -> Option<&UploadedFile> {
        names.iter().find_map(|name| self.files.get(*name))
    }

    pub fn csrf_token(&self) -> Option<&str> {
        self.fields.get(crate::csrf::FORM_FIELD).map(String::as_str)
    }
}

#[cfg(test)]
impl MultipartForm {
    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_file(mut self, name: &str, file: UploadedFile) -> Self {
        self.files.insert(name.to_string(), file);
        self
    }
}

fn slot_url_names(i: usize) -> [String; 2] {
    [format!("img{i}_url"), format!("image_url_{i}")]
}

fn slot_file_names(i: usize) -> [String; 2] {
    [format!("img{i}_file"), format!("image_file_{i}")]
}

/// Gallery images in slot order. A stored upload wins over the slot's URL;
/// the legacy `images` list is used only when no slot yields anything.
pub async fn collect_images(
    form: &MultipartForm,
    uploads: &UploadStore,
) -> Result<Vec<String>, AppError> {
    let mut ordered = Vec::new();

    for i in 1..=IMAGE_SLOTS {
        let [file_a, file_b] = slot_file_names(i);
        if let Some(file) = form.file(&[file_a.as_str(), file_b.as_str()]) {
            if let Some(url) = uploads.save(file).await? {
                ordered.push(url);
                continue;
            }
        }

        let [url_a, url_b] = slot_url_names(i);
        let url = form.first_text(&[url_a.as_str(), url_b.as_str()]);
        if !url.is_empty() {
            ordered.push(url.to_string());
        }
    }

    if ordered.is_empty() {
        ordered = split_list(form.text("images"));
    }
    Ok(ordered)
}

pub async fn collect_muscle_image(
    form: &MultipartForm,
    uploads: &UploadStore,
) -> Result<Option<String>, AppError> {
    if let Some(file) = form.file(&["muscle_image_file"]) {
        if let Some(url) = uploads.save(file).await? {
            return Ok(Some(url));
        }
    }

    let url = form.first_text(&["muscle_image_url", "muscle_image"]);
    Ok((!url.is_empty()).then(|| url.to_string()))
}

/// The workout form as typed, kept as text so it can be shown again.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutFormData {
    pub name: String,
    pub slug: String,
    pub level: String,
    pub style: String,
    pub body_parts: String,
    pub body_part: String,
    pub tags: String,
    pub images: String,
    pub slots: Vec<String>,
    pub muscle_image: String,
    pub info: String,
    pub tips: String,
    pub youtube_id: String,
    pub rating: String,
    pub is_favorite: bool,
}

impl WorkoutFormData {
    pub fn from_multipart(form: &MultipartForm) -> Self {
        let slots = (1..=IMAGE_SLOTS)
            .map(|i| {
                let [a, b] = slot_url_names(i);
                form.first_text(&[a.as_str(), b.as_str()]).to_string()
            })
            .collect();

        Self {
            name: form.text("name").trim().to_string(),
            slug: form.text("slug").trim().to_string(),
            level: form.text("level").trim().to_string(),
            style: form.text("style").trim().to_string(),
            body_parts: form.text("body_parts").to_string(),
            body_part: form.text("body_part").trim().to_string(),
            tags: form.text("tags").to_string(),
            images: form.text("images").to_string(),
            slots,
            muscle_image: form
                .first_text(&["muscle_image_url", "muscle_image"])
                .to_string(),
            info: form.text("info").to_string(),
            tips: form.text("tips").to_string(),
            youtube_id: form.text("youtube_id").trim().to_string(),
            rating: form.text("rating").trim().to_string(),
            is_favorite: form.text("is_favorite") == "on",
        }
    }

    /// Pre-fill the edit form from a stored workout.
    pub fn from_workout(w: &Workout) -> Self {
        Self {
            name: w.name.clone(),
            slug: w.slug.clone(),
            level: w.level.clone(),
            style: w.style.clone(),
            body_parts: w.targeted_parts().join(", "),
            body_part: w.body_part.clone(),
            tags: w.tags.join(", "),
            images: w.images.join("\n"),
            slots: w.images.iter().take(IMAGE_SLOTS).cloned().collect(),
            muscle_image: w.muscle_image.clone().unwrap_or_default(),
            info: w.info.clone().unwrap_or_default(),
            tips: w.tips.join("\n"),
            youtube_id: w.youtube_id.clone().unwrap_or_default(),
            rating: if w.rating == 0.0 {
                String::new()
            } else {
                w.rating.to_string()
            },
            is_favorite: w.is_favorite,
        }
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.is_empty() {
            return Err("Name is required.");
        }
        Ok(())
    }

    /// Explicit slug if given, else derived from the name.
    pub fn resolved_slug(&self) -> String {
        if self.slug.is_empty() {
            slugify(&self.name)
        } else {
            self.slug.clone()
        }
    }

    pub fn rating_value(&self) -> f64 {
        self.rating
            .parse::<f64>()
            .ok()
            .filter(|r| r.is_finite())
            .unwrap_or(0.0)
    }

    pub fn changes(&self, images: Vec<String>, muscle_image: Option<String>) -> WorkoutChanges {
        let body_parts = split_list(&self.body_parts);
        let body_part = body_parts
            .first()
            .cloned()
            .unwrap_or_else(|| self.body_part.clone());
        let info = self.info.trim();

        WorkoutChanges {
            name: self.name.clone(),
            slug: self.resolved_slug(),
            level: self.level.clone(),
            body_part,
            body_parts,
            style: self.style.clone(),
            tags: split_list(&self.tags),
            images,
            muscle_image,
            info: (!info.is_empty()).then(|| info.to_string()),
            tips: split_list(&self.tips),
            youtube_id: extract_youtube_id(Some(&self.youtube_id)),
            is_favorite: self.is_favorite,
            rating: self.rating_value(),
        }
    }

    pub fn image_slots(&self) -> Vec<ImageSlot> {
        (1..=IMAGE_SLOTS)
            .map(|index| ImageSlot {
                index,
                url: self.slots.get(index - 1).cloned().unwrap_or_default(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecipeFormData {
    pub name: String,
    pub url: String,
    pub description: String,
    pub tags: String,
    pub image: String,
    pub csrf_token: Option<String>,
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl RecipeFormData {
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            name: recipe.name.clone(),
            url: recipe.url.clone().unwrap_or_default(),
            description: recipe.description.clone().unwrap_or_default(),
            tags: recipe.tags.join(", "),
            image: recipe.image.clone().unwrap_or_default(),
            csrf_token: None,
        }
    }

    pub fn changes(&self) -> Result<RecipeChanges, &'static str> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Name is required.");
        }
        Ok(RecipeChanges {
            name: name.to_string(),
            url: optional(&self.url),
            description: optional(&self.description),
            tags: split_list(&self.tags),
            image: optional(&self.image),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StyleForm {
    pub name: String,
    pub order: String,
    pub csrf_token: Option<String>,
}

impl StyleForm {
    pub fn sort_order(&self) -> i32 {
        self.order.trim().parse().unwrap_or(0)
    }
}

/// Body of the button-only forms (delete, toggle, logout).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CsrfForm {
    pub csrf_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub next: String,
    pub csrf_token: Option<String>,
}
