use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Response,
    Form,
};
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use super::{is_unique_violation, parse_id};
use crate::catalog::{active_styles, owned, BODY_PARTS_MASTER, WORKOUT_LEVELS};
use crate::context::PageContext;
use crate::error::AppError;
use crate::flash::Flash;
use crate::forms::{collect_images, collect_muscle_image, CsrfForm, MultipartForm, WorkoutFormData};
use crate::get_conn;
use crate::models::Workout;
use crate::schema::workouts;
use crate::state::AppState;
use crate::views::{AdminIndexPage, AdminWorkoutRow, SelectOption, WorkoutFormPage};

#[derive(Debug, Clone, Copy)]
enum FormMode {
    New,
    Edit(Uuid),
}

fn slug_conflict(slug: &str) -> String {
    format!("Slug '{slug}' is already used by another workout.")
}

fn render_form(
    conn: &mut PgConnection,
    ctx: &PageContext,
    mode: FormMode,
    data: WorkoutFormData,
    status: StatusCode,
) -> Result<Response, AppError> {
    let mut styles = active_styles(conn)?;
    if !data.style.is_empty() && !styles.contains(&data.style) {
        styles.push(data.style.clone());
    }

    let (heading, action) = match mode {
        FormMode::New => ("New workout", "/admin/workouts/new".to_string()),
        FormMode::Edit(id) => ("Edit workout", format!("/admin/workouts/{id}/edit")),
    };

    ctx.render_with_status(
        status,
        &WorkoutFormPage {
            layout: ctx.layout(),
            heading,
            action,
            levels: SelectOption::list(&owned(WORKOUT_LEVELS), &data.level),
            styles: SelectOption::list(&styles, &data.style),
            body_parts: owned(BODY_PARTS_MASTER),
            slots: data.image_slots(),
            form: data,
        },
    )
}

/// Whether another workout (other than `except`) already uses `slug`.
fn slug_taken(conn: &mut PgConnection, slug: &str, except: Option<Uuid>) -> QueryResult<bool> {
    let mut query = workouts::table
        .filter(workouts::slug.eq(slug.to_string()))
        .into_boxed();
    if let Some(id) = except {
        query = query.filter(workouts::id.ne(id));
    }
    diesel::select(diesel::dsl::exists(query)).get_result(conn)
}

pub async fn index(ctx: PageContext, State(state): State<AppState>) -> Result<Response, AppError> {
    let mut conn = get_conn!(state.pool);
    let items: Vec<Workout> = workouts::table
        .order(workouts::created_at.desc())
        .select(Workout::as_select())
        .load(&mut conn)?;

    ctx.render(&AdminIndexPage {
        layout: ctx.layout(),
        items: items.iter().map(AdminWorkoutRow::from).collect(),
    })
}

pub async fn new_form(ctx: PageContext, State(state): State<AppState>) -> Result<Response, AppError> {
    let mut conn = get_conn!(state.pool);
    render_form(
        &mut conn,
        &ctx,
        FormMode::New,
        WorkoutFormData::default(),
        StatusCode::OK,
    )
}

pub async fn create(
    ctx: PageContext,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let form = MultipartForm::read(multipart).await?;
    ctx.verify_csrf(form.csrf_token())?;
    save(ctx, state, FormMode::New, form).await
}

pub async fn edit_form(
    ctx: PageContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    let mut conn = get_conn!(state.pool);
    let workout: Workout = workouts::table
        .find(id)
        .select(Workout::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or(AppError::NotFound)?;

    render_form(
        &mut conn,
        &ctx,
        FormMode::Edit(id),
        WorkoutFormData::from_workout(&workout),
        StatusCode::OK,
    )
}

pub async fn update(
    ctx: PageContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    let form = MultipartForm::read(multipart).await?;
    ctx.verify_csrf(form.csrf_token())?;

    {
        let mut conn = get_conn!(state.pool);
        let exists: bool =
            diesel::select(diesel::dsl::exists(workouts::table.find(id))).get_result(&mut conn)?;
        if !exists {
            return Err(AppError::NotFound);
        }
    }

    save(ctx, state, FormMode::Edit(id), form).await
}

/// Shared create/update path: validate, store uploads, write the row.
async fn save(
    mut ctx: PageContext,
    state: AppState,
    mode: FormMode,
    form: MultipartForm,
) -> Result<Response, AppError> {
    let data = WorkoutFormData::from_multipart(&form);
    let except = match mode {
        FormMode::New => None,
        FormMode::Edit(id) => Some(id),
    };

    let slug = data.resolved_slug();
    let rejection = match data.validate() {
        Err(message) => Some((StatusCode::UNPROCESSABLE_ENTITY, message.to_string())),
        Ok(()) => {
            let mut conn = get_conn!(state.pool);
            slug_taken(&mut conn, &slug, except)?
                .then(|| (StatusCode::CONFLICT, slug_conflict(&slug)))
        }
    };
    if let Some((status, message)) = rejection {
        ctx.push_flash(Flash::danger(message));
        let mut conn = get_conn!(state.pool);
        return render_form(&mut conn, &ctx, mode, data, status);
    }

    let images = collect_images(&form, &state.uploads).await?;
    let muscle_image = collect_muscle_image(&form, &state.uploads).await?;
    let changes = data.changes(images, muscle_image);

    let mut conn = get_conn!(state.pool);
    let result = match mode {
        FormMode::New => diesel::insert_into(workouts::table)
            .values(&changes)
            .execute(&mut conn),
        FormMode::Edit(id) => diesel::update(workouts::table.find(id))
            .set((&changes, workouts::updated_at.eq(Utc::now())))
            .execute(&mut conn),
    };

    match result {
        Ok(_) => {
            tracing::info!(slug = %changes.slug, ?mode, "workout saved");
            let message = match mode {
                FormMode::New => "Workout added.",
                FormMode::Edit(_) => "Workout updated.",
            };
            Ok(ctx.redirect("/admin", Flash::success(message)))
        }
        Err(e) if is_unique_violation(&e) => {
            ctx.push_flash(Flash::danger(slug_conflict(&changes.slug)));
            render_form(&mut conn, &ctx, mode, data, StatusCode::CONFLICT)
        }
        Err(e) => {
            tracing::error!(error = %e, ?mode, "failed to save workout");
            ctx.push_flash(Flash::danger(format!("Error: {e}")));
            render_form(&mut conn, &ctx, mode, data, StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub async fn delete(
    ctx: PageContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<CsrfForm>,
) -> Result<Response, AppError> {
    ctx.verify_csrf(form.csrf_token.as_deref())?;
    let id = parse_id(&id)?;

    let mut conn = get_conn!(state.pool);
    let deleted = diesel::delete(workouts::table.find(id)).execute(&mut conn)?;
    tracing::info!(%id, deleted, "workout deleted");

    Ok(ctx.redirect("/admin", Flash::success("Workout deleted.")))
}
