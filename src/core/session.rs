//! Run bookkeeping for repeated screenshot submissions.
//!
//! Each submission gets a generation number. Only the newest generation may
//! commit its outcome, so a slow OCR call from an older submission can never
//! overwrite the result of a newer one.

use crate::core::engine::ScheduleEngine;
use crate::core::{Pipeline, ProgressNotifier};
use crate::domain::model::{ParsedEvent, ScheduleImage};
use crate::utils::error::{Result, ScheduleError};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// 尚未收到任何截圖
    #[default]
    Empty,
    Processing {
        generation: u64,
    },
    Ready {
        generation: u64,
        events: Vec<ParsedEvent>,
    },
    Failed {
        generation: u64,
        message: String,
    },
}

impl SessionState {
    pub fn generation(&self) -> Option<u64> {
        match self {
            SessionState::Empty => None,
            SessionState::Processing { generation }
            | SessionState::Ready { generation, .. }
            | SessionState::Failed { generation, .. } => Some(*generation),
        }
    }

    pub fn is_processing(&self) -> bool {
        matches!(self, SessionState::Processing { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunToken {
    generation: u64,
}

impl RunToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Default)]
struct SessionInner {
    generation: u64,
    state: SessionState,
}

#[derive(Debug, Default)]
pub struct ScheduleSession {
    inner: Mutex<SessionInner>,
}

impl ScheduleSession {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        // 狀態只做整體替換，poison 後的內容仍然一致
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn state(&self) -> SessionState {
        self.lock().state.clone()
    }

    pub fn current_generation(&self) -> u64 {
        self.lock().generation
    }

    pub fn is_current(&self, token: RunToken) -> bool {
        self.current_generation() == token.generation
    }

    /// 開始新的一輪，之前還沒結束的執行全部作廢。
    pub fn begin(&self) -> RunToken {
        let mut inner = self.lock();
        if inner.state.is_processing() {
            tracing::info!("Run {} is superseded by a new submission", inner.generation);
        }
        inner.generation += 1;
        let generation = inner.generation;
        inner.state = SessionState::Processing { generation };
        tracing::debug!("Run {} started", generation);
        RunToken { generation }
    }

    fn commit(&self, token: RunToken, state: SessionState) -> bool {
        let mut inner = self.lock();
        if inner.generation != token.generation {
            tracing::warn!(
                "Discarding result of run {}, run {} is newer",
                token.generation,
                inner.generation
            );
            return false;
        }
        inner.state = state;
        true
    }

    pub fn commit_events(&self, token: RunToken, events: Vec<ParsedEvent>) -> bool {
        self.commit(
            token,
            SessionState::Ready {
                generation: token.generation,
                events,
            },
        )
    }

    pub fn commit_failure(&self, token: RunToken, message: String) -> bool {
        self.commit(
            token,
            SessionState::Failed {
                generation: token.generation,
                message,
            },
        )
    }

    /// Runs the engine for a new generation and commits the outcome if no
    /// newer run started in the meantime.
    pub async fn process<P: Pipeline, N: ProgressNotifier>(
        &self,
        engine: &ScheduleEngine<P, N>,
        image: &ScheduleImage,
    ) -> Result<Vec<ParsedEvent>> {
        let token = self.begin();
        let notifier = CurrentRunNotifier {
            session: self,
            token,
            inner: engine.notifier(),
        };
        let outcome = engine.run_reporting(image, &notifier).await;

        let committed = match &outcome {
            Ok(events) => self.commit_events(token, events.clone()),
            Err(e) => self.commit_failure(token, e.user_friendly_message()),
        };

        if committed {
            outcome
        } else {
            Err(ScheduleError::SupersededRun {
                generation: token.generation,
                current: self.current_generation(),
            })
        }
    }
}

/// 只轉送目前這一輪的進度訊息；被取代的執行不再更新使用者看到的內容。
struct CurrentRunNotifier<'a, N: ProgressNotifier + ?Sized> {
    session: &'a ScheduleSession,
    token: RunToken,
    inner: &'a N,
}

impl<N: ProgressNotifier + ?Sized> CurrentRunNotifier<'_, N> {
    fn forward(&self, message: &str, send: impl FnOnce(&N)) {
        if self.session.is_current(self.token) {
            send(self.inner);
        } else {
            tracing::debug!(
                "Dropping message from superseded run {}: {}",
                self.token.generation,
                message
            );
        }
    }
}

impl<N: ProgressNotifier + ?Sized> ProgressNotifier for CurrentRunNotifier<'_, N> {
    fn info(&self, message: &str) {
        self.forward(message, |n| n.info(message));
    }

    fn warn(&self, message: &str) {
        self.forward(message, |n| n.warn(message));
    }

    fn error(&self, message: &str) {
        self.forward(message, |n| n.error(message));
    }
}
