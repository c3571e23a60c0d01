use elcentre_portal::{
    lesson_service::{LessonFields, MAX_VIDEO_BYTES, ValidationMode, validate},
    models::{BinaryContent, ContentType, LessonContent, LessonUpdate, NewLesson},
};

fn text_lesson(title: &str, body: &str) -> NewLesson {
    NewLesson {
        title: title.to_string(),
        content: LessonContent::Text(body.to_string()),
        content_type: ContentType::Text,
        duration_in_minutes: 10,
        is_published: false,
        module_id: 3,
    }
}

fn video(mime: &str, size: u64) -> LessonContent {
    LessonContent::Binary(BinaryContent::new(
        vec![0u8; size as usize],
        mime,
        "lecture.mp4",
    ))
}

fn create_error(lesson: &NewLesson) -> Option<String> {
    validate(LessonFields::from(lesson), ValidationMode::Create).map(|e| e.message)
}

fn update_error(update: &LessonUpdate) -> Option<String> {
    validate(LessonFields::from(update), ValidationMode::Update).map(|e| e.message)
}

// --- Create ---

#[test]
fn test_create_valid_text_lesson() {
    assert_eq!(create_error(&text_lesson("Ownership", "Moves and borrows")), None);
}

#[test]
fn test_create_blank_title_wins_over_other_failures() {
    let mut lesson = text_lesson("   ", "");
    lesson.duration_in_minutes = -5;
    assert_eq!(
        create_error(&lesson).as_deref(),
        Some("Lesson title is required")
    );
}

#[test]
fn test_create_missing_title_via_fields() {
    let fields = LessonFields {
        title: None,
        content_type: Some(ContentType::Text),
        ..LessonFields::default()
    };
    assert_eq!(
        validate(fields, ValidationMode::Create).map(|e| e.message).as_deref(),
        Some("Lesson title is required")
    );
}

#[test]
fn test_create_non_positive_duration() {
    for duration in [0, -1] {
        let mut lesson = text_lesson("Intro", "Welcome");
        lesson.duration_in_minutes = duration;
        assert_eq!(
            create_error(&lesson).as_deref(),
            Some("Duration must be greater than zero")
        );
    }
}

#[test]
fn test_create_text_lesson_requires_text() {
    assert_eq!(
        create_error(&text_lesson("Intro", "  \n ")).as_deref(),
        Some("Text content is required for text lessons")
    );

    let mut with_file = text_lesson("Intro", "");
    with_file.content = video("video/mp4", 4);
    assert_eq!(
        create_error(&with_file).as_deref(),
        Some("Text content is required for text lessons")
    );
}

#[test]
fn test_create_video_lesson_requires_file() {
    let mut lesson = text_lesson("Intro", "not a file");
    lesson.content_type = ContentType::Video;
    assert_eq!(
        create_error(&lesson).as_deref(),
        Some("Video content is required for new video lessons")
    );

    lesson.content = video("video/mp4", 16);
    assert_eq!(create_error(&lesson), None);
}

// Create only checks that a file is present. Format and size limits are
// enforced on update alone; these assertions pin that asymmetry.
#[test]
fn test_create_does_not_check_video_format_or_size() {
    let mut lesson = text_lesson("Intro", "");
    lesson.content_type = ContentType::Video;
    lesson.content = video("application/pdf", 8);
    assert_eq!(create_error(&lesson), None);
}

// --- Update ---

#[test]
fn test_update_with_no_fields_is_valid() {
    assert_eq!(update_error(&LessonUpdate { id: 1, ..Default::default() }), None);
}

#[test]
fn test_update_present_blank_title_rejected() {
    let update = LessonUpdate {
        id: 1,
        title: Some(" ".to_string()),
        ..Default::default()
    };
    assert_eq!(
        update_error(&update).as_deref(),
        Some("Lesson title is required")
    );
}

#[test]
fn test_update_duration_checked_when_present() {
    let update = LessonUpdate {
        id: 1,
        duration_in_minutes: Some(0),
        ..Default::default()
    };
    assert_eq!(
        update_error(&update).as_deref(),
        Some("Duration must be greater than zero")
    );
}

#[test]
fn test_update_blank_text_rejected() {
    let update = LessonUpdate {
        id: 1,
        content: Some(LessonContent::Text(String::new())),
        content_type: Some(ContentType::Text),
        ..Default::default()
    };
    assert_eq!(
        update_error(&update).as_deref(),
        Some("Text content cannot be empty")
    );
}

#[test]
fn test_update_rejects_unsupported_video_format() {
    let update = LessonUpdate {
        id: 1,
        content: Some(video("video/quicktime", 10)),
        ..Default::default()
    };
    assert_eq!(
        update_error(&update).as_deref(),
        Some("Invalid video format. Supported formats: video/mp4, video/webm, video/ogg")
    );
}

#[test]
fn test_update_accepts_supported_video_formats() {
    for mime in ["video/mp4", "video/webm", "video/ogg"] {
        let update = LessonUpdate {
            id: 1,
            content: Some(video(mime, 10)),
            content_type: Some(ContentType::Video),
            ..Default::default()
        };
        assert_eq!(update_error(&update), None, "{mime} should be accepted");
    }
}

#[test]
fn test_update_video_size_boundary() {
    let at_limit = LessonUpdate {
        id: 1,
        content: Some(video("video/mp4", MAX_VIDEO_BYTES)),
        ..Default::default()
    };
    assert_eq!(update_error(&at_limit), None);

    let over_limit = LessonUpdate {
        id: 1,
        content: Some(video("video/mp4", MAX_VIDEO_BYTES + 1)),
        ..Default::default()
    };
    assert_eq!(
        update_error(&over_limit).as_deref(),
        Some("Video file is too large (maximum 500MB)")
    );
}

#[test]
fn test_update_rejects_content_type_mismatch() {
    let update = LessonUpdate {
        id: 1,
        content: Some(LessonContent::Text("Notes".to_string())),
        content_type: Some(ContentType::Video),
        ..Default::default()
    };
    assert_eq!(
        update_error(&update).as_deref(),
        Some("Content does not match the lesson content type")
    );
}
