mod common;

use async_trait::async_trait;
use common::{Level, RecordingNotifier, ScheduleBuilder, StubRecognizer};
use shift_snap::core::TextRecognizer;
use shift_snap::{
    ParserConfig, Result, ScheduleEngine, ScheduleError, ScheduleImage, SchedulePipeline,
    ScheduleSession, SessionState,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// 第一次呼叫會卡住，直到測試放行
struct GatedRecognizer {
    calls: AtomicUsize,
    started: Notify,
    release: Notify,
    fail_first: bool,
}

impl GatedRecognizer {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            started: Notify::new(),
            release: Notify::new(),
            fail_first: false,
        }
    }

    fn failing_first() -> Self {
        Self {
            fail_first: true,
            ..Self::new()
        }
    }
}

#[async_trait]
impl TextRecognizer for GatedRecognizer {
    async fn recognize(&self, _image: &ScheduleImage, _language: &str) -> Result<Vec<String>> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            self.started.notify_one();
            self.release.notified().await;
            if self.fail_first {
                return Err(ScheduleError::RecognitionFailure {
                    message: "tesseract timed out".to_string(),
                });
            }
        }
        Ok(vec!["01/02/2023".to_string()])
    }
}

#[tokio::test]
async fn test_slow_run_cannot_overwrite_newer_result() {
    let recognizer = Arc::new(GatedRecognizer::new());
    let engine = ScheduleEngine::new(
        SchedulePipeline::new(recognizer.clone(), ParserConfig::default()),
        Arc::new(RecordingNotifier::default()),
    );
    let session = ScheduleSession::new();
    let first_image = ScheduleBuilder::new(1).shift(0, 9.25, 17.0).build();
    let second_image = ScheduleBuilder::new(2)
        .shift(0, 9.25, 17.0)
        .shift(1, 10.75, 18.5)
        .build();

    let (stale, fresh) = tokio::join!(session.process(&engine, &first_image), async {
        recognizer.started.notified().await;
        let fresh = session.process(&engine, &second_image).await;
        recognizer.release.notify_one();
        fresh
    });

    let fresh = fresh.unwrap();
    assert_eq!(fresh.len(), 2);
    match stale.unwrap_err() {
        ScheduleError::SupersededRun {
            generation,
            current,
        } => assert_eq!((generation, current), (1, 2)),
        other => panic!("expected SupersededRun, got {:?}", other),
    }
    assert_eq!(
        session.state(),
        SessionState::Ready {
            generation: 2,
            events: fresh
        }
    );

    let messages: Vec<String> = engine
        .notifier()
        .messages()
        .into_iter()
        .map(|(_, message)| message)
        .collect();
    assert_eq!(
        messages,
        vec![
            "finding events...",
            "found 1 events",
            "Figuring out the dates...",
            "finding events...",
            "found 2 events",
            "Figuring out the dates...",
            "Found first date \"01/02/2023\"",
            "generating google calendar urls",
            "Done parsing",
        ]
    );
}

#[tokio::test]
async fn test_superseded_failure_is_not_reported() {
    let recognizer = Arc::new(GatedRecognizer::failing_first());
    let engine = ScheduleEngine::new(
        SchedulePipeline::new(recognizer.clone(), ParserConfig::default()),
        Arc::new(RecordingNotifier::default()),
    );
    let session = ScheduleSession::new();
    let image = ScheduleBuilder::new(1).shift(0, 9.0, 17.0).build();

    let (stale, fresh) = tokio::join!(session.process(&engine, &image), async {
        recognizer.started.notified().await;
        let fresh = session.process(&engine, &image).await;
        recognizer.release.notify_one();
        fresh
    });

    assert_eq!(fresh.unwrap().len(), 1);
    assert!(matches!(
        stale.unwrap_err(),
        ScheduleError::SupersededRun { generation: 1, current: 2 }
    ));

    let messages = engine.notifier().messages();
    assert!(messages.iter().all(|(level, _)| *level == Level::Info));
    assert_eq!(
        messages.last(),
        Some(&(Level::Info, "Done parsing".to_string()))
    );
    assert!(matches!(session.state(), SessionState::Ready { generation: 2, .. }));
}

#[tokio::test]
async fn test_each_submission_replaces_previous_state() {
    let engine = ScheduleEngine::new(
        SchedulePipeline::new(
            Arc::new(StubRecognizer::new(&["01/02/2023"])),
            ParserConfig::default(),
        ),
        Arc::new(RecordingNotifier::default()),
    );
    let session = ScheduleSession::new();

    let first = session
        .process(&engine, &ScheduleBuilder::new(1).shift(0, 9.25, 17.0).build())
        .await
        .unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(session.state().generation(), Some(1));

    let err = session
        .process(&engine, &ScheduleBuilder::new(1).build())
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::NoMarkersFound { .. }));
    assert_eq!(
        session.state(),
        SessionState::Failed {
            generation: 2,
            message: "No work blocks were found in the screenshot".to_string()
        }
    );
}
