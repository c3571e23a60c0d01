use crate::{
    api::LessonApiState,
    error::LessonError,
    models::{
        ContentType, CreateLessonPayload, Lesson, LessonContent, LessonUpdate, NewLesson,
        UpdateLessonPayload,
    },
};

/// Media types accepted for video uploads.
pub const VIDEO_MIME_TYPES: [&str; 3] = ["video/mp4", "video/webm", "video/ogg"];

/// Largest accepted video upload: 500 MiB.
pub const MAX_VIDEO_BYTES: u64 = 500 * 1024 * 1024;

/// ValidationMode
///
/// Create checks every field; Update only checks what is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    Create,
    Update,
}

/// ValidationError
///
/// The first rule a lesson input broke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// LessonFields
///
/// Borrowed view of the fields validation looks at, shared by create and
/// update input.
#[derive(Debug, Clone, Copy, Default)]
pub struct LessonFields<'a> {
    pub title: Option<&'a str>,
    pub content: Option<&'a LessonContent>,
    pub content_type: Option<ContentType>,
    pub duration_in_minutes: Option<i32>,
}

impl<'a> From<&'a NewLesson> for LessonFields<'a> {
    fn from(lesson: &'a NewLesson) -> Self {
        Self {
            title: Some(lesson.title.as_str()),
            content: Some(&lesson.content),
            content_type: Some(lesson.content_type),
            duration_in_minutes: Some(lesson.duration_in_minutes),
        }
    }
}

impl<'a> From<&'a LessonUpdate> for LessonFields<'a> {
    fn from(update: &'a LessonUpdate) -> Self {
        Self {
            title: update.title.as_deref(),
            content: update.content.as_ref(),
            content_type: update.content_type,
            duration_in_minutes: update.duration_in_minutes,
        }
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// validate
///
/// Checks a lesson input. Rules run in a fixed order and the first failure is
/// returned; later rules are not evaluated.
///
/// Binary format and size limits are only enforced on update. New video
/// lessons are checked for presence only.
pub fn validate(fields: LessonFields<'_>, mode: ValidationMode) -> Option<ValidationError> {
    // 1. Title
    match (mode, fields.title) {
        (ValidationMode::Create, None) => {
            return Some(ValidationError::new("Lesson title is required"));
        }
        (_, Some(title)) if is_blank(title) => {
            return Some(ValidationError::new("Lesson title is required"));
        }
        _ => {}
    }

    // 2. Duration
    if let Some(duration) = fields.duration_in_minutes {
        if duration <= 0 {
            return Some(ValidationError::new("Duration must be greater than zero"));
        }
    }

    // 3. Content
    match mode {
        ValidationMode::Update => validate_update_content(&fields),
        ValidationMode::Create => validate_create_content(&fields),
    }
}

fn validate_update_content(fields: &LessonFields<'_>) -> Option<ValidationError> {
    let content = fields.content?;

    match content {
        LessonContent::Text(text) if is_blank(text) => {
            return Some(ValidationError::new("Text content cannot be empty"));
        }
        LessonContent::Binary(file) => {
            if !VIDEO_MIME_TYPES.contains(&file.mime.as_str()) {
                return Some(ValidationError::new(format!(
                    "Invalid video format. Supported formats: {}",
                    VIDEO_MIME_TYPES.join(", ")
                )));
            }
            if file.size() > MAX_VIDEO_BYTES {
                return Some(ValidationError::new(
                    "Video file is too large (maximum 500MB)",
                ));
            }
        }
        LessonContent::Text(_) => {}
    }

    let mismatched = matches!(
        (fields.content_type, content),
        (Some(ContentType::Text), LessonContent::Binary(_))
            | (Some(ContentType::Video), LessonContent::Text(_))
    );
    if mismatched {
        return Some(ValidationError::new(
            "Content does not match the lesson content type",
        ));
    }

    None
}

fn validate_create_content(fields: &LessonFields<'_>) -> Option<ValidationError> {
    match fields.content_type {
        Some(ContentType::Text) => match fields.content {
            Some(LessonContent::Text(text)) if !is_blank(text) => None,
            _ => Some(ValidationError::new(
                "Text content is required for text lessons",
            )),
        },
        Some(ContentType::Video) => match fields.content {
            Some(LessonContent::Binary(_)) => None,
            _ => Some(ValidationError::new(
                "Video content is required for new video lessons",
            )),
        },
        None => None,
    }
}

/// LessonService
///
/// Validates lesson writes, reshapes them for the backend and delegates to
/// the `LessonApi` collaborator.
///
/// Reads degrade to "nothing found" when the backend fails. Writes always
/// surface the collaborator's error so a failed save never looks successful.
#[derive(Clone)]
pub struct LessonService {
    api: LessonApiState,
}

impl LessonService {
    pub fn new(api: LessonApiState) -> Self {
        Self { api }
    }

    /// Lessons of a module, or an empty list when the backend call fails.
    pub async fn get_lessons_by_module_id(&self, module_id: i64) -> Vec<Lesson> {
        match self.api.get_by_module(module_id).await {
            Ok(lessons) => lessons,
            Err(e) => {
                tracing::error!(module_id, error = %e, "Error fetching lessons for module");
                Vec::new()
            }
        }
    }

    /// One lesson, or `None` when the backend call fails.
    pub async fn get_lesson_by_id(&self, id: i64) -> Option<Lesson> {
        match self.api.get_by_id(id).await {
            Ok(lesson) => Some(lesson),
            Err(e) => {
                tracing::error!(lesson_id = id, error = %e, "Error fetching lesson");
                None
            }
        }
    }

    /// add_lesson
    ///
    /// Creates a lesson. Text content is uploaded as `content.txt`.
    pub async fn add_lesson(&self, lesson: NewLesson) -> Result<Lesson, LessonError> {
        let module_id = lesson.module_id;
        if let Some(err) = validate(LessonFields::from(&lesson), ValidationMode::Create) {
            tracing::warn!(module_id, error = %err.message, "Error adding lesson: validation failed");
            return Err(LessonError::ValidationFailed(err.message));
        }

        let payload = CreateLessonPayload::from(lesson);

        self.api.add(payload).await.map_err(|e| {
            tracing::error!(module_id, error = %e, "Error adding lesson");
            LessonError::RemoteCallFailed(e)
        })
    }

    /// update_lesson
    ///
    /// Sends only the fields present in `update`. Without new content the
    /// backend is told to keep the stored content.
    pub async fn update_lesson(&self, update: LessonUpdate) -> Result<Lesson, LessonError> {
        let lesson_id = update.id;
        if let Some(err) = validate(LessonFields::from(&update), ValidationMode::Update) {
            tracing::warn!(lesson_id, error = %err.message, "Error updating lesson: validation failed");
            return Err(LessonError::ValidationFailed(err.message));
        }

        let payload = UpdateLessonPayload::from(update);

        tracing::debug!(
            lesson_id,
            title = ?payload.title,
            content_type = ?payload.content_type,
            duration_in_minutes = ?payload.duration_in_minutes,
            is_published = ?payload.is_published,
            has_content = payload.content.is_some(),
            keep_existing_content = ?payload.keep_existing_content,
            "Updating lesson"
        );

        self.api.update(payload).await.map_err(|e| {
            tracing::error!(lesson_id, error = %e, "Error updating lesson");
            LessonError::RemoteCallFailed(e)
        })
    }

    pub async fn delete_lesson(&self, id: i64) -> Result<bool, LessonError> {
        match self.api.delete(id).await {
            Ok(()) => Ok(true),
            Err(e) => {
                tracing::error!(lesson_id = id, error = %e, "Error deleting lesson");
                Err(LessonError::RemoteCallFailed(e))
            }
        }
    }
}
