use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Identity ---

/// Role
///
/// The closed set of account types. The backend sends these as free-form
/// strings ("Student", "instructor", ...); they are parsed into this enum once
/// at the authentication boundary and never compared as strings afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    Student,
    Instructor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Instructor => "instructor",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "instructor" => Ok(Role::Instructor),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown user type '{}'", other)),
        }
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// User
///
/// The signed-in account as resolved from the session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub user_type: Role,
}

// --- Lessons ---

/// ContentType
///
/// What a lesson carries. Serialized as `"text"` / `"video"`, which is also
/// the value sent in the backend's `ContentType` field. Parsed
/// case-insensitively, like `Role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ContentType {
    Text,
    Video,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Video => "video",
        }
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(ContentType::Text),
            "video" => Ok(ContentType::Video),
            other => Err(format!("unknown content type '{}'", other)),
        }
    }
}

impl<'de> Deserialize<'de> for ContentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Lesson
///
/// A lesson as returned by the backend. For video lessons `content` holds the
/// media URL, for text lessons the text itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Lesson {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    pub content_type: ContentType,
    pub duration_in_minutes: i32,
    pub is_published: bool,
    pub module_id: i64,
}

/// BinaryContent
///
/// A file-shaped upload. Every lesson body reaches the backend in this shape,
/// including text lessons (wrapped as `content.txt`).
#[derive(Clone, PartialEq, Eq)]
pub struct BinaryContent {
    pub bytes: Vec<u8>,
    pub mime: String,
    pub filename: String,
}

impl BinaryContent {
    pub fn new(bytes: Vec<u8>, mime: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            bytes,
            mime: mime.into(),
            filename: filename.into(),
        }
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

impl fmt::Debug for BinaryContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryContent")
            .field("filename", &self.filename)
            .field("mime", &self.mime)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// LessonContent
///
/// The body of a lesson as submitted by the browser. Decided once when the
/// multipart form is parsed: a file part is `Binary`, a plain field is `Text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LessonContent {
    Text(String),
    Binary(BinaryContent),
}

impl LessonContent {
    /// Converts the content into the uniform upload shape. Text becomes a
    /// UTF-8 `content.txt` file with media type `text/plain`.
    pub fn into_upload(self) -> BinaryContent {
        match self {
            LessonContent::Text(text) => {
                BinaryContent::new(text.into_bytes(), "text/plain", "content.txt")
            }
            LessonContent::Binary(file) => file,
        }
    }
}

/// NewLesson
///
/// Input for creating a lesson. Every field is mandatory.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLesson {
    pub title: String,
    pub content: LessonContent,
    pub content_type: ContentType,
    pub duration_in_minutes: i32,
    pub is_published: bool,
    pub module_id: i64,
}

/// LessonUpdate
///
/// Partial update of an existing lesson. `None` means "leave as is".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LessonUpdate {
    pub id: i64,
    pub title: Option<String>,
    pub content: Option<LessonContent>,
    pub content_type: Option<ContentType>,
    pub duration_in_minutes: Option<i32>,
    pub is_published: Option<bool>,
    pub module_id: Option<i64>,
}

// --- Backend payloads ---

/// CreateLessonPayload
///
/// The create request as handed to `LessonApi::add`. The backend's PascalCase
/// field names are applied by the multipart encoder in `api`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateLessonPayload {
    pub title: String,
    pub content: BinaryContent,
    pub content_type: ContentType,
    pub duration_in_minutes: i32,
    pub is_published: bool,
    pub module_id: i64,
}

impl From<NewLesson> for CreateLessonPayload {
    fn from(lesson: NewLesson) -> Self {
        let NewLesson {
            title,
            content,
            content_type,
            duration_in_minutes,
            is_published,
            module_id,
        } = lesson;

        Self {
            title,
            content: content.into_upload(),
            content_type,
            duration_in_minutes,
            is_published,
            module_id,
        }
    }
}

/// UpdateLessonPayload
///
/// Sparse update request. Absent fields are omitted from the request, and a
/// missing `Content` is replaced by `KeepExistingContent = true` so the
/// backend does not clear the stored content.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateLessonPayload {
    pub id: i64,
    pub title: Option<String>,
    pub content: Option<BinaryContent>,
    pub content_type: Option<ContentType>,
    pub duration_in_minutes: Option<i32>,
    pub is_published: Option<bool>,
    pub module_id: Option<i64>,
    pub keep_existing_content: Option<bool>,
}

impl From<LessonUpdate> for UpdateLessonPayload {
    fn from(update: LessonUpdate) -> Self {
        let LessonUpdate {
            id,
            title,
            content,
            content_type,
            duration_in_minutes,
            is_published,
            module_id,
        } = update;

        let keep_existing_content = content.is_none().then_some(true);

        Self {
            id,
            title,
            content: content.map(LessonContent::into_upload),
            content_type,
            duration_in_minutes,
            is_published,
            module_id,
            keep_existing_content,
        }
    }
}

// --- View models ---

/// CtaContent
///
/// The home page call-to-action block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CtaContent {
    pub heading: String,
    pub body: String,
    pub action_label: String,
    pub action_href: String,
}

/// NavItem
///
/// A sidebar link definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct NavItem {
    pub href: String,
    pub title: String,
    pub icon: Option<String>,
}

/// NavEntry
///
/// A sidebar link as rendered for the current location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct NavEntry {
    pub href: String,
    pub title: String,
    pub icon: Option<String>,
    pub active: bool,
}

/// DashboardPage
///
/// View model for the role dashboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardPage {
    pub title: String,
    pub greeting: String,
    pub sidebar: Vec<NavEntry>,
}
