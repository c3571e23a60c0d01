use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::{
    error::ApiError,
    models::{BinaryContent, ContentType, CreateLessonPayload, Lesson, UpdateLessonPayload},
};

/// Timeout applied to the backend reachability probe.
pub const PING_TIMEOUT: Duration = Duration::from_secs(5);

// 1. LessonApi Contract
/// LessonApi
///
/// The remote-call collaborator for lesson resources. The service layer only
/// talks to this trait, so the reqwest-backed client can be swapped for the
/// in-memory `MockLessonApi` in tests.
#[async_trait]
pub trait LessonApi: Send + Sync {
    /// Lists the lessons of a module.
    async fn get_by_module(&self, module_id: i64) -> Result<Vec<Lesson>, ApiError>;

    /// Fetches one lesson.
    async fn get_by_id(&self, id: i64) -> Result<Lesson, ApiError>;

    /// Creates a lesson and returns the stored record.
    async fn add(&self, payload: CreateLessonPayload) -> Result<Lesson, ApiError>;

    /// Applies a sparse update and returns the stored record.
    async fn update(&self, payload: UpdateLessonPayload) -> Result<Lesson, ApiError>;

    async fn delete(&self, id: i64) -> Result<(), ApiError>;
}

/// LessonApiState
///
/// Shared handle to the collaborator, held by the service and the app state.
pub type LessonApiState = Arc<dyn LessonApi>;

// 2. The Real Implementation (ElCentre backend over HTTP)
/// HttpLessonApi
///
/// Talks to the backend's `/lessons` endpoints. Writes are sent as
/// `multipart/form-data` because lesson content always travels as a file part.
#[derive(Clone)]
pub struct HttpLessonApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpLessonApi {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

/// Turns a non-success response into `ApiError::Status`, keeping the body as
/// the message so backend validation errors reach the logs.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    check_status(response)
        .await?
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

fn file_part(content: BinaryContent) -> Result<Part, ApiError> {
    let BinaryContent {
        bytes,
        mime,
        filename,
    } = content;

    Part::bytes(bytes)
        .file_name(filename)
        .mime_str(&mime)
        .map_err(|e| ApiError::InvalidPayload(e.to_string()))
}

fn content_type_field(content_type: ContentType) -> String {
    content_type.as_str().to_string()
}

/// Encodes a create payload. The destructuring is exhaustive, so a field added
/// to `CreateLessonPayload` fails to compile until it is sent here too.
fn create_form(payload: CreateLessonPayload) -> Result<Form, ApiError> {
    let CreateLessonPayload {
        title,
        content,
        content_type,
        duration_in_minutes,
        is_published,
        module_id,
    } = payload;

    Ok(Form::new()
        .text("Title", title)
        .part("Content", file_part(content)?)
        .text("ContentType", content_type_field(content_type))
        .text("DurationInMinutes", duration_in_minutes.to_string())
        .text("IsPublished", is_published.to_string())
        .text("ModuleId", module_id.to_string()))
}

fn update_form(payload: UpdateLessonPayload) -> Result<Form, ApiError> {
    let UpdateLessonPayload {
        id,
        title,
        content,
        content_type,
        duration_in_minutes,
        is_published,
        module_id,
        keep_existing_content,
    } = payload;

    let mut form = Form::new().text("Id", id.to_string());

    if let Some(title) = title {
        form = form.text("Title", title);
    }
    if let Some(content) = content {
        form = form.part("Content", file_part(content)?);
    }
    if let Some(content_type) = content_type {
        form = form.text("ContentType", content_type_field(content_type));
    }
    if let Some(duration) = duration_in_minutes {
        form = form.text("DurationInMinutes", duration.to_string());
    }
    if let Some(is_published) = is_published {
        form = form.text("IsPublished", is_published.to_string());
    }
    if let Some(module_id) = module_id {
        form = form.text("ModuleId", module_id.to_string());
    }
    if let Some(keep) = keep_existing_content {
        form = form.text("KeepExistingContent", keep.to_string());
    }

    Ok(form)
}

#[async_trait]
impl LessonApi for HttpLessonApi {
    async fn get_by_module(&self, module_id: i64) -> Result<Vec<Lesson>, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("lessons/module/{}", module_id)))
            .send()
            .await?;
        read_json(response).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Lesson, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("lessons/{}", id)))
            .send()
            .await?;
        read_json(response).await
    }

    async fn add(&self, payload: CreateLessonPayload) -> Result<Lesson, ApiError> {
        let form = create_form(payload)?;
        let response = self
            .client
            .post(self.url("lessons"))
            .multipart(form)
            .send()
            .await?;
        read_json(response).await
    }

    async fn update(&self, payload: UpdateLessonPayload) -> Result<Lesson, ApiError> {
        let url = self.url(&format!("lessons/{}", payload.id));
        let form = update_form(payload)?;
        let response = self.client.put(url).multipart(form).send().await?;
        read_json(response).await
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("lessons/{}", id)))
            .send()
            .await?;
        check_status(response).await.map(|_| ())
    }
}

/// check_api_connection
///
/// Probes `GET {base}/ping` with a 5 second timeout. Any failure, including
/// the timeout, reports the backend as unreachable.
pub async fn check_api_connection(client: &reqwest::Client, base_url: &str) -> bool {
    let url = format!("{}/ping", base_url.trim_end_matches('/'));

    match client.get(&url).timeout(PING_TIMEOUT).send().await {
        Ok(response) => response.status().is_success(),
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "API connection check failed");
            false
        }
    }
}

// 3. The Mock Implementation (For Tests)
/// ApiCall
///
/// One recorded interaction with `MockLessonApi`.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    GetByModule(i64),
    GetById(i64),
    Add(CreateLessonPayload),
    Update(UpdateLessonPayload),
    Delete(i64),
}

/// MockLessonApi
///
/// In-memory collaborator. Serves `lessons` for reads, records every call,
/// and fails every call with `failure` when it is set.
#[derive(Default)]
pub struct MockLessonApi {
    pub lessons: Vec<Lesson>,
    pub failure: Option<ApiError>,
    calls: Mutex<Vec<ApiCall>>,
}

impl MockLessonApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lessons(lessons: Vec<Lesson>) -> Self {
        Self {
            lessons,
            ..Self::default()
        }
    }

    pub fn new_failing(error: ApiError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn record(&self, call: ApiCall) -> Result<(), ApiError> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(call);
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn not_found(id: i64) -> ApiError {
        ApiError::Status {
            status: 404,
            message: format!("Lesson {} not found", id),
        }
    }
}

#[async_trait]
impl LessonApi for MockLessonApi {
    async fn get_by_module(&self, module_id: i64) -> Result<Vec<Lesson>, ApiError> {
        self.record(ApiCall::GetByModule(module_id))?;
        Ok(self
            .lessons
            .iter()
            .filter(|lesson| lesson.module_id == module_id)
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Lesson, ApiError> {
        self.record(ApiCall::GetById(id))?;
        self.lessons
            .iter()
            .find(|lesson| lesson.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    async fn add(&self, payload: CreateLessonPayload) -> Result<Lesson, ApiError> {
        self.record(ApiCall::Add(payload.clone()))?;
        let next_id = self.lessons.iter().map(|lesson| lesson.id).max().unwrap_or(0) + 1;
        Ok(Lesson {
            id: next_id,
            title: payload.title,
            content: Some(payload.content.filename),
            content_type: payload.content_type,
            duration_in_minutes: payload.duration_in_minutes,
            is_published: payload.is_published,
            module_id: payload.module_id,
        })
    }

    async fn update(&self, payload: UpdateLessonPayload) -> Result<Lesson, ApiError> {
        self.record(ApiCall::Update(payload.clone()))?;
        let mut lesson = self
            .lessons
            .iter()
            .find(|lesson| lesson.id == payload.id)
            .cloned()
            .ok_or_else(|| Self::not_found(payload.id))?;

        if let Some(title) = payload.title {
            lesson.title = title;
        }
        if let Some(content) = payload.content {
            lesson.content = Some(content.filename);
        }
        if let Some(content_type) = payload.content_type {
            lesson.content_type = content_type;
        }
        if let Some(duration) = payload.duration_in_minutes {
            lesson.duration_in_minutes = duration;
        }
        if let Some(is_published) = payload.is_published {
            lesson.is_published = is_published;
        }
        if let Some(module_id) = payload.module_id {
            lesson.module_id = module_id;
        }
        Ok(lesson)
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.record(ApiCall::Delete(id))
    }
}
