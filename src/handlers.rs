use crate::{
    AppState,
    api::check_api_connection,
    auth::AuthSnapshot,
    error::LessonError,
    home::cta_for,
    models::{
        BinaryContent, ContentType, CtaContent, DashboardPage, Lesson, LessonContent,
        LessonUpdate, NewLesson, Role,
    },
    nav::{build_nav, sidebar_for},
};
use axum::{
    Json,
    extract::{Multipart, Path, State, multipart::Field},
    http::{StatusCode, Uri},
};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use utoipa::ToSchema;

// --- Form Parsing ---

fn malformed(e: impl Display) -> LessonError {
    LessonError::ValidationFailed(format!("Malformed lesson form: {}", e))
}

async fn text_field(field: Field<'_>) -> Result<String, LessonError> {
    field.text().await.map_err(malformed)
}

async fn parsed_field<T>(field: Field<'_>) -> Result<T, LessonError>
where
    T: FromStr,
    T::Err: Display,
{
    let name = field.name().unwrap_or_default().to_string();
    let raw = text_field(field).await?;
    raw.trim()
        .parse::<T>()
        .map_err(|e| malformed(format!("{}: {}", name, e)))
}

/// LessonForm
///
/// The browser's lesson form after multipart decoding. This is where lesson
/// content is classified: a part with a filename is a file upload, anything
/// else is text.
#[derive(Debug, Default)]
pub struct LessonForm {
    pub title: Option<String>,
    pub content: Option<LessonContent>,
    pub content_type: Option<ContentType>,
    pub duration_in_minutes: Option<i32>,
    pub is_published: Option<bool>,
    pub module_id: Option<i64>,
}

impl LessonForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, LessonError> {
        let mut form = LessonForm::default();

        while let Some(field) = multipart.next_field().await.map_err(malformed)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "title" => form.title = Some(text_field(field).await?),
                "content" => form.content = content_field(field).await?,
                "contentType" => form.content_type = Some(parsed_field(field).await?),
                "durationInMinutes" => form.duration_in_minutes = Some(parsed_field(field).await?),
                "isPublished" => form.is_published = Some(parsed_field(field).await?),
                "moduleId" => form.module_id = Some(parsed_field(field).await?),
                other => tracing::debug!(field = %other, "Ignoring unknown lesson form field"),
            }
        }

        Ok(form)
    }

    /// Fills a create request. Missing title/content become empty values so
    /// validation reports them with its own messages.
    pub fn into_new_lesson(self) -> Result<NewLesson, LessonError> {
        Ok(NewLesson {
            title: self.title.unwrap_or_default(),
            content: self
                .content
                .unwrap_or_else(|| LessonContent::Text(String::new())),
            content_type: self
                .content_type
                .ok_or_else(|| malformed("contentType is required"))?,
            duration_in_minutes: self
                .duration_in_minutes
                .ok_or_else(|| malformed("durationInMinutes is required"))?,
            is_published: self.is_published.unwrap_or(false),
            module_id: self
                .module_id
                .ok_or_else(|| malformed("moduleId is required"))?,
        })
    }

    pub fn into_update(self, id: i64) -> LessonUpdate {
        LessonUpdate {
            id,
            title: self.title,
            content: self.content,
            content_type: self.content_type,
            duration_in_minutes: self.duration_in_minutes,
            is_published: self.is_published,
            module_id: self.module_id,
        }
    }
}

/// A file input left empty still submits a part with `filename=""` and no
/// bytes. That part means "no new content" and decodes to `None`.
async fn content_field(field: Field<'_>) -> Result<Option<LessonContent>, LessonError> {
    match field.file_name().map(str::to_string) {
        Some(filename) => {
            let mime = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field.bytes().await.map_err(malformed)?;
            if filename.is_empty() && bytes.is_empty() {
                tracing::debug!("Ignoring empty file input for lesson content");
                return Ok(None);
            }
            Ok(Some(LessonContent::Binary(BinaryContent::new(
                bytes.to_vec(),
                mime,
                filename,
            ))))
        }
        None => Ok(Some(LessonContent::Text(text_field(field).await?))),
    }
}

// --- Public Handlers ---

/// ApiStatus
///
/// Reachability of the ElCentre backend.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiStatus {
    pub reachable: bool,
    pub api_base_url: String,
}

/// get_home_cta
///
/// [Public Route] Call-to-action block of the landing page, adapted to the
/// visitor's login state and role.
#[utoipa::path(
    get,
    path = "/home/cta",
    responses((status = 200, description = "Call to action", body = CtaContent))
)]
pub async fn get_home_cta(snapshot: AuthSnapshot) -> Json<CtaContent> {
    Json(cta_for(&snapshot))
}

/// get_api_status
///
/// [Public Route] Probes the backend's `/ping` endpoint (5 second timeout).
#[utoipa::path(
    get,
    path = "/api-status",
    responses((status = 200, description = "Backend reachability", body = ApiStatus))
)]
pub async fn get_api_status(State(state): State<AppState>) -> Json<ApiStatus> {
    let reachable = check_api_connection(&state.http, &state.config.api_base_url).await;
    Json(ApiStatus {
        reachable,
        api_base_url: state.config.api_base_url.clone(),
    })
}

// --- Lesson Handlers ---

/// get_module_lessons
///
/// [Authenticated Route] Lessons of a module. A failing backend yields an
/// empty list rather than an error page.
#[utoipa::path(
    get,
    path = "/modules/{id}/lessons",
    params(("id" = i64, Path, description = "Module ID")),
    responses((status = 200, description = "Lessons", body = [Lesson]))
)]
pub async fn get_module_lessons(
    State(state): State<AppState>,
    Path(module_id): Path<i64>,
) -> Json<Vec<Lesson>> {
    Json(state.lessons.get_lessons_by_module_id(module_id).await)
}

/// get_lesson
///
/// [Authenticated Route] A single lesson.
#[utoipa::path(
    get,
    path = "/lessons/{id}",
    params(("id" = i64, Path, description = "Lesson ID")),
    responses(
        (status = 200, description = "Found", body = Lesson),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_lesson(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Lesson>, StatusCode> {
    match state.lessons.get_lesson_by_id(id).await {
        Some(lesson) => Ok(Json(lesson)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// create_lesson
///
/// [Instructor Route] Creates a lesson from a multipart form
/// (`title`, `content`, `contentType`, `durationInMinutes`, `isPublished`, `moduleId`).
#[utoipa::path(
    post,
    path = "/instructor/lessons",
    responses(
        (status = 201, description = "Created", body = Lesson),
        (status = 400, description = "Validation failed")
    )
)]
pub async fn create_lesson(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Lesson>), LessonError> {
    let lesson = LessonForm::from_multipart(multipart)
        .await?
        .into_new_lesson()?;
    let created = state.lessons.add_lesson(lesson).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// update_lesson
///
/// [Instructor Route] Partially updates a lesson. Omitting `content` keeps
/// the stored content.
#[utoipa::path(
    put,
    path = "/instructor/lessons/{id}",
    params(("id" = i64, Path, description = "Lesson ID")),
    responses(
        (status = 200, description = "Updated", body = Lesson),
        (status = 400, description = "Validation failed")
    )
)]
pub async fn update_lesson(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<Lesson>, LessonError> {
    let update = LessonForm::from_multipart(multipart).await?.into_update(id);
    let updated = state.lessons.update_lesson(update).await?;
    Ok(Json(updated))
}

/// delete_lesson
///
/// [Instructor Route] Deletes a lesson.
#[utoipa::path(
    delete,
    path = "/instructor/lessons/{id}",
    params(("id" = i64, Path, description = "Lesson ID")),
    responses((status = 204, description = "Deleted"))
)]
pub async fn delete_lesson(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, LessonError> {
    state.lessons.delete_lesson(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Dashboards ---

fn dashboard_title(role: Option<Role>) -> &'static str {
    match role {
        Some(Role::Admin) => "Admin Dashboard",
        Some(Role::Instructor) => "Instructor Dashboard",
        Some(Role::Student) | None => "Dashboard",
    }
}

/// get_dashboard
///
/// [Guarded Route] Dashboard page model for the signed-in role, with the
/// sidebar entry for the current path highlighted.
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Dashboard", body = DashboardPage),
        (status = 303, description = "Redirect to login or the role's home")
    )
)]
pub async fn get_dashboard(snapshot: AuthSnapshot, uri: Uri) -> Json<DashboardPage> {
    let role = snapshot.role();
    let first_name = snapshot
        .user
        .as_ref()
        .map(|user| user.first_name.clone())
        .unwrap_or_default();
    let items = role.map(sidebar_for).unwrap_or_default();

    Json(DashboardPage {
        title: dashboard_title(role).to_string(),
        greeting: format!("Welcome back, {}", first_name),
        sidebar: build_nav(&items, uri.path()),
    })
}
