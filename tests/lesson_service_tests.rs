use elcentre_portal::{
    LessonService, MockLessonApi,
    api::{ApiCall, LessonApiState},
    error::{ApiError, LessonError},
    models::{
        BinaryContent, ContentType, Lesson, LessonContent, LessonUpdate, NewLesson,
    },
};
use std::sync::Arc;
use tracing_test::traced_test;

// --- Fixtures ---

fn stored_lesson(id: i64, module_id: i64) -> Lesson {
    Lesson {
        id,
        title: format!("Lesson {}", id),
        content: Some("Existing body".to_string()),
        content_type: ContentType::Text,
        duration_in_minutes: 15,
        is_published: true,
        module_id,
    }
}

fn new_text_lesson() -> NewLesson {
    NewLesson {
        title: "Pattern matching".to_string(),
        content: LessonContent::Text("match all the things".to_string()),
        content_type: ContentType::Text,
        duration_in_minutes: 20,
        is_published: false,
        module_id: 7,
    }
}

fn service_with(mock: MockLessonApi) -> (LessonService, Arc<MockLessonApi>) {
    let mock = Arc::new(mock);
    let service = LessonService::new(mock.clone() as LessonApiState);
    (service, mock)
}

fn backend_down() -> ApiError {
    ApiError::Status {
        status: 503,
        message: "maintenance".to_string(),
    }
}

// --- Reads ---

#[tokio::test]
async fn test_get_lessons_by_module_filters_module() {
    let (service, mock) = service_with(MockLessonApi::with_lessons(vec![
        stored_lesson(1, 7),
        stored_lesson(2, 8),
        stored_lesson(3, 7),
    ]));

    let lessons = service.get_lessons_by_module_id(7).await;
    let ids: Vec<i64> = lessons.iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![1, 3]);
    assert_eq!(mock.calls(), vec![ApiCall::GetByModule(7)]);
}

#[tokio::test]
async fn test_get_lessons_by_module_recovers_to_empty() {
    let (service, _) = service_with(MockLessonApi::new_failing(backend_down()));
    assert!(service.get_lessons_by_module_id(7).await.is_empty());
}

#[tokio::test]
async fn test_get_lesson_by_id_found() {
    let (service, _) = service_with(MockLessonApi::with_lessons(vec![stored_lesson(4, 1)]));
    assert_eq!(service.get_lesson_by_id(4).await, Some(stored_lesson(4, 1)));
}

#[tokio::test]
async fn test_get_lesson_by_id_returns_none_when_collaborator_fails() {
    let (service, mock) = service_with(MockLessonApi::new_failing(ApiError::Transport(
        "connection refused".to_string(),
    )));

    assert_eq!(service.get_lesson_by_id(4).await, None);
    assert_eq!(mock.calls(), vec![ApiCall::GetById(4)]);
}

// --- Create ---

#[tokio::test]
async fn test_add_lesson_wraps_text_as_file() {
    let (service, mock) = service_with(MockLessonApi::new());

    let created = service.add_lesson(new_text_lesson()).await.unwrap();
    assert_eq!(created.title, "Pattern matching");

    let calls = mock.calls();
    let ApiCall::Add(payload) = &calls[0] else {
        panic!("expected an add call, got {:?}", calls);
    };
    assert_eq!(payload.content.filename, "content.txt");
    assert_eq!(payload.content.mime, "text/plain");
    assert_eq!(payload.content.bytes, b"match all the things".to_vec());
    assert_eq!(payload.content_type, ContentType::Text);
    assert_eq!(payload.module_id, 7);
}

#[tokio::test]
async fn test_add_lesson_passes_video_through() {
    let (service, mock) = service_with(MockLessonApi::new());
    let file = BinaryContent::new(vec![1, 2, 3], "video/webm", "intro.webm");

    let lesson = NewLesson {
        content: LessonContent::Binary(file.clone()),
        content_type: ContentType::Video,
        ..new_text_lesson()
    };
    service.add_lesson(lesson).await.unwrap();

    match &mock.calls()[0] {
        ApiCall::Add(payload) => assert_eq!(payload.content, file),
        other => panic!("unexpected call {:?}", other),
    }
}

#[tokio::test]
async fn test_add_lesson_validation_never_reaches_network() {
    let (service, mock) = service_with(MockLessonApi::new());
    let lesson = NewLesson {
        title: String::new(),
        ..new_text_lesson()
    };

    let result = service.add_lesson(lesson).await;
    assert_eq!(
        result,
        Err(LessonError::ValidationFailed(
            "Lesson title is required".to_string()
        ))
    );
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_add_lesson_propagates_remote_error_unchanged() {
    let original = backend_down();
    let (service, _) = service_with(MockLessonApi::new_failing(original.clone()));

    match service.add_lesson(new_text_lesson()).await {
        Err(LessonError::RemoteCallFailed(e)) => assert_eq!(e, original),
        other => panic!("expected remote failure, got {:?}", other),
    }
}

// --- Update ---

#[tokio::test]
async fn test_update_without_content_keeps_existing() {
    let (service, mock) = service_with(MockLessonApi::with_lessons(vec![stored_lesson(5, 2)]));

    let updated = service
        .update_lesson(LessonUpdate {
            id: 5,
            title: Some("Renamed".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.content, Some("Existing body".to_string()));

    let calls = mock.calls();
    let ApiCall::Update(payload) = &calls[0] else {
        panic!("expected an update call");
    };
    assert_eq!(payload.keep_existing_content, Some(true));
    assert_eq!(payload.content, None);
    assert_eq!(payload.duration_in_minutes, None);
    assert_eq!(payload.is_published, None);
}

#[tokio::test]
async fn test_update_with_text_content_wraps_and_drops_keep_marker() {
    let (service, mock) = service_with(MockLessonApi::with_lessons(vec![stored_lesson(5, 2)]));

    service
        .update_lesson(LessonUpdate {
            id: 5,
            content: Some(LessonContent::Text("New notes".to_string())),
            ..Default::default()
        })
        .await
        .unwrap();

    let calls = mock.calls();
    let ApiCall::Update(payload) = &calls[0] else {
        panic!("expected an update call");
    };
    assert_eq!(payload.keep_existing_content, None);
    let content = payload.content.as_ref().unwrap();
    assert_eq!(content.filename, "content.txt");
    assert_eq!(content.mime, "text/plain");
}

#[tokio::test]
async fn test_update_invalid_video_rejected_locally() {
    let (service, mock) = service_with(MockLessonApi::with_lessons(vec![stored_lesson(5, 2)]));

    let result = service
        .update_lesson(LessonUpdate {
            id: 5,
            content: Some(LessonContent::Binary(BinaryContent::new(
                vec![0; 4],
                "image/png",
                "slide.png",
            ))),
            ..Default::default()
        })
        .await;

    assert!(matches!(result, Err(LessonError::ValidationFailed(_))));
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_update_propagates_remote_error_unchanged() {
    // No stored lesson: the mock answers 404.
    let (service, _) = service_with(MockLessonApi::new());

    let result = service
        .update_lesson(LessonUpdate {
            id: 99,
            is_published: Some(true),
            ..Default::default()
        })
        .await;

    assert_eq!(
        result,
        Err(LessonError::RemoteCallFailed(ApiError::Status {
            status: 404,
            message: "Lesson 99 not found".to_string(),
        }))
    );
}

// --- Delete ---

#[tokio::test]
async fn test_delete_lesson_returns_true() {
    let (service, mock) = service_with(MockLessonApi::new());
    assert_eq!(service.delete_lesson(12).await, Ok(true));
    assert_eq!(mock.calls(), vec![ApiCall::Delete(12)]);
}

#[tokio::test]
async fn test_delete_lesson_reraises_original_error() {
    let original = ApiError::Status {
        status: 403,
        message: "not your lesson".to_string(),
    };
    let (service, _) = service_with(MockLessonApi::new_failing(original.clone()));

    assert_eq!(
        service.delete_lesson(12).await,
        Err(LessonError::RemoteCallFailed(original))
    );
}

// --- Logging ---

#[tokio::test]
#[traced_test]
async fn test_add_lesson_logs_validation_failure() {
    let (service, _) = service_with(MockLessonApi::new());
    let lesson = NewLesson {
        duration_in_minutes: 0,
        ..new_text_lesson()
    };

    let result = service.add_lesson(lesson).await;

    assert!(matches!(result, Err(LessonError::ValidationFailed(_))));
    assert!(logs_contain("Error adding lesson: validation failed"));
    assert!(logs_contain("module_id=7"));
    assert!(logs_contain("Duration must be greater than zero"));
}

#[tokio::test]
#[traced_test]
async fn test_update_lesson_logs_validation_failure() {
    let (service, _) = service_with(MockLessonApi::with_lessons(vec![stored_lesson(5, 7)]));
    let update = LessonUpdate {
        id: 5,
        title: Some("   ".to_string()),
        ..Default::default()
    };

    let result = service.update_lesson(update).await;

    assert_eq!(
        result,
        Err(LessonError::ValidationFailed(
            "Lesson title is required".to_string()
        ))
    );
    assert!(logs_contain("Error updating lesson: validation failed"));
    assert!(logs_contain("lesson_id=5"));
}
