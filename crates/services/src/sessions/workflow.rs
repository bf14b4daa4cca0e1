use std::sync::Arc;

use thiserror::Error;
use url::Url;

use quiz_core::model::QuizConfig;

use super::service::QuizSession;
use super::view::QuestionView;
use crate::Clock;
use crate::dataset_service::RosterSource;
use crate::error::{DatasetError, SessionError};

/// Errors from starting a quiz end to end.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StartError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl StartError {
    /// Whether re-invoking start may succeed without changing the configuration.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            StartError::Dataset(err) => err.is_retryable(),
            StartError::Session(_) => false,
        }
    }
}

/// Orchestrates roster loading and session start.
///
/// The roster is awaited before any session exists; a failed load leaves
/// nothing behind, so calling `start_quiz` again is the retry.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    source: Arc<dyn RosterSource>,
    portrait_base: Option<Url>,
    seed: Option<u64>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, source: Arc<dyn RosterSource>) -> Self {
        Self {
            clock,
            source,
            portrait_base: None,
            seed: None,
        }
    }

    #[must_use]
    pub fn with_portrait_base(mut self, base: Url) -> Self {
        self.portrait_base = Some(base);
        self
    }

    /// Seed every session this service opens.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Load the roster and return an idle session bound to it.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError` if the roster cannot be loaded.
    pub async fn open_session(&self) -> Result<QuizSession, DatasetError> {
        let roster = self.source.roster().await?;
        let mut session = QuizSession::new(roster).with_clock(self.clock);
        if let Some(seed) = self.seed {
            session = session.with_seed(seed);
        }
        if let Some(base) = self.portrait_base.clone() {
            session = session.with_portrait_base(base);
        }
        Ok(session)
    }

    /// Load the roster and start a quiz with `config`.
    ///
    /// # Errors
    ///
    /// Returns `StartError::Dataset` if the roster cannot be loaded and
    /// `StartError::Session` if the plan would be empty.
    pub async fn start_quiz(
        &self,
        config: QuizConfig,
    ) -> Result<(QuizSession, QuestionView), StartError> {
        let mut session = self.open_session().await?;
        let view = session.start(config)?;
        Ok((session, view))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset_service::StaticRoster;
    use crate::sessions::SessionPhase;
    use quiz_core::model::{Entity, Roster};
    use quiz_core::time::fixed_clock;

    fn source(size: u32) -> Arc<dyn RosterSource> {
        let roster: Roster = (1..=size)
            .map(|i| Entity::new(None, format!("Student {i}"), 14 + i % 4, "Abydos").unwrap())
            .collect();
        Arc::new(StaticRoster::new(roster))
    }

    #[tokio::test]
    async fn start_quiz_returns_live_session() {
        let service = QuizLoopService::new(fixed_clock(), source(4)).with_seed(Some(1));
        let (session, view) = service.start_quiz(QuizConfig::default()).await.unwrap();

        assert_eq!(session.phase(), SessionPhase::AwaitingAnswer);
        assert_eq!(view.total, 4);
    }

    #[tokio::test]
    async fn empty_roster_surfaces_as_session_error() {
        let service = QuizLoopService::new(fixed_clock(), source(0));
        let err = service.start_quiz(QuizConfig::default()).await.unwrap_err();

        assert!(matches!(
            err,
            StartError::Session(SessionError::EmptyPlan { roster: 0, .. })
        ));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn same_seed_replays_same_plan() {
        let service = QuizLoopService::new(fixed_clock(), source(12)).with_seed(Some(99));
        let (first, _) = service.start_quiz(QuizConfig::default()).await.unwrap();
        let (second, _) = service.start_quiz(QuizConfig::default()).await.unwrap();

        assert_eq!(first.plan(), second.plan());
    }
}
