use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fmt;
use std::sync::Arc;
use url::Url;

use quiz_core::model::{
    AnswerRecord, AnswerValue, PlannedQuestion, QuestionKind, QuizConfig, Roster, SessionId,
    Submission,
};
use quiz_core::{Clock, Grader};

use super::countdown::{SessionClock, Urgency};
use super::options::{AnswerOptionBuilder, AnswerPrompt};
use super::plan::{QuestionGenerator, QuizPlan};
use super::progress::SessionProgress;
use super::view::{Advance, CountdownUpdate, Feedback, QuestionView, QuizSummary};
use crate::error::SessionError;

//
// ─── PHASES ────────────────────────────────────────────────────────────────────
//

/// Where a quiz session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Configuring,
    AwaitingAnswer,
    ShowingFeedback,
    Complete,
}

//
// ─── ACTIVE QUIZ ───────────────────────────────────────────────────────────────
//

/// State of one run, from `start` until `reset`.
struct ActiveQuiz {
    id: SessionId,
    config: QuizConfig,
    plan: QuizPlan,
    current: usize,
    score: u32,
    log: Vec<AnswerRecord>,
    prompt: AnswerPrompt,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl ActiveQuiz {
    fn question(&self) -> Option<&PlannedQuestion> {
        self.plan.get(self.current)
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Quiz orchestrator: owns the plan, score and answer log, and exposes the
/// transitions the presentation layer drives.
///
/// Calls made in the wrong phase return `None` and change nothing. Grading
/// only happens from `AwaitingAnswer` and leaves that phase immediately, so
/// whichever of a user answer or a countdown expiry arrives first wins.
pub struct QuizSession {
    roster: Arc<Roster>,
    rng: StdRng,
    clock: Clock,
    countdown: SessionClock,
    portrait_base: Option<Url>,
    phase: SessionPhase,
    quiz: Option<ActiveQuiz>,
}

impl QuizSession {
    #[must_use]
    pub fn new(roster: Arc<Roster>) -> Self {
        Self {
            roster,
            rng: StdRng::from_os_rng(),
            clock: Clock::system(),
            countdown: SessionClock::new(),
            portrait_base: None,
            phase: SessionPhase::Configuring,
            quiz: None,
        }
    }

    /// Seed the random source so plans and option orders replay exactly.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Base URL under which entity portraits live, e.g. `.../collection/`.
    #[must_use]
    pub fn with_portrait_base(mut self, base: Url) -> Self {
        self.portrait_base = Some(base);
        self
    }

    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn session_id(&self) -> Option<SessionId> {
        self.quiz.as_ref().map(|quiz| quiz.id)
    }

    #[must_use]
    pub fn config(&self) -> Option<&QuizConfig> {
        self.quiz.as_ref().map(|quiz| &quiz.config)
    }

    #[must_use]
    pub fn plan(&self) -> Option<&QuizPlan> {
        self.quiz.as_ref().map(|quiz| &quiz.plan)
    }

    /// Index of the question awaiting an answer; equals the plan length once complete.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.quiz.as_ref().map_or(0, |quiz| quiz.current)
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.quiz.as_ref().map_or(0, |quiz| quiz.score)
    }

    #[must_use]
    pub fn log(&self) -> &[AnswerRecord] {
        self.quiz
            .as_ref()
            .map(|quiz| quiz.log.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn countdown(&self) -> &SessionClock {
        &self.countdown
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let Some(quiz) = self.quiz.as_ref() else {
            return SessionProgress::default();
        };
        let total = quiz.plan.total();
        SessionProgress {
            total,
            answered: quiz.log.len(),
            remaining: total.saturating_sub(quiz.log.len()),
            score: quiz.score,
            is_complete: self.phase == SessionPhase::Complete,
        }
    }

    /// The question awaiting an answer, if any.
    #[must_use]
    pub fn current_question(&self) -> Option<QuestionView> {
        if self.phase != SessionPhase::AwaitingAnswer {
            return None;
        }
        self.question_view()
    }

    /// Build a plan and present its first question.
    ///
    /// Any run in progress is discarded first, so on failure the session is
    /// left in `Configuring`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyPlan` if the roster is empty or the config
    /// asks for zero questions.
    pub fn start(&mut self, config: QuizConfig) -> Result<QuestionView, SessionError> {
        self.reset();

        let plan = QuestionGenerator::new(&self.roster, &config).generate(&mut self.rng);
        let Some(first) = plan.get(0) else {
            tracing::warn!(
                roster = self.roster.len(),
                requested = config.question_count(),
                "quiz start rejected: empty plan"
            );
            return Err(SessionError::EmptyPlan {
                roster: self.roster.len(),
                requested: config.question_count(),
            });
        };

        let prompt = AnswerOptionBuilder::new(&self.roster).build(
            first,
            config.answer_mode(),
            &mut self.rng,
        );
        let id = SessionId::new_v4();
        tracing::info!(
            session_id = %id,
            questions = plan.total(),
            kind = %config.kind(),
            mode = %config.answer_mode(),
            ordering = %config.ordering(),
            timer = config.timer().is_enabled(),
            "quiz started"
        );

        if config.timer().is_enabled() {
            self.countdown.start(config.timer().duration_secs());
        }
        self.quiz = Some(ActiveQuiz {
            id,
            config,
            plan,
            current: 0,
            score: 0,
            log: Vec::new(),
            prompt,
            started_at: self.clock.now(),
            completed_at: None,
        });
        self.phase = SessionPhase::AwaitingAnswer;

        self.question_view().ok_or(SessionError::EmptyPlan {
            roster: self.roster.len(),
            requested: self.quiz.as_ref().map_or(0, |quiz| quiz.config.question_count()),
        })
    }

    /// Submit raw input for the current question.
    ///
    /// Input that does not parse for the question kind (a non-integer age,
    /// blank text) is ignored and the question stays open.
    pub fn submit(&mut self, input: &str) -> Option<Feedback> {
        if self.phase != SessionPhase::AwaitingAnswer {
            tracing::debug!(phase = ?self.phase, "submit ignored");
            return None;
        }
        let kind = self.quiz.as_ref()?.question()?.kind();
        let Some(value) = AnswerValue::parse(kind, input) else {
            tracing::debug!(%kind, "unparseable answer ignored");
            return None;
        };
        self.grade_current(Submission::Answer(value))
    }

    /// Pick the multiple-choice option at `index` (0-based, display order).
    pub fn choose(&mut self, index: usize) -> Option<Feedback> {
        if self.phase != SessionPhase::AwaitingAnswer {
            tracing::debug!(phase = ?self.phase, "choice ignored");
            return None;
        }
        let value = self.quiz.as_ref()?.prompt.choices().get(index)?.clone();
        self.grade_current(Submission::Answer(value))
    }

    /// Advance the countdown by one second.
    ///
    /// On the tick that reaches zero the current question is graded as timed
    /// out. Returns `None` when no countdown is running.
    pub fn tick(&mut self) -> Option<CountdownUpdate> {
        if self.phase != SessionPhase::AwaitingAnswer {
            return None;
        }
        let tick = self.countdown.tick()?;
        let timed_out = if tick.expired {
            tracing::warn!(session_id = ?self.session_id(), "question timed out");
            self.grade_current(Submission::TimeExpired)
        } else {
            None
        };

        Some(CountdownUpdate {
            remaining: tick.remaining,
            urgency: Urgency::for_remaining(tick.remaining),
            timed_out,
        })
    }

    /// Move past feedback to the next question, or finish the quiz.
    pub fn advance(&mut self) -> Option<Advance> {
        if self.phase != SessionPhase::ShowingFeedback {
            tracing::debug!(phase = ?self.phase, "advance ignored");
            return None;
        }
        let quiz = self.quiz.as_mut()?;
        quiz.current += 1;

        let Some(question) = quiz.plan.get(quiz.current) else {
            let completed_at = self.clock.now();
            quiz.completed_at = Some(completed_at);
            self.phase = SessionPhase::Complete;
            tracing::info!(
                session_id = %quiz.id,
                score = quiz.score,
                total = quiz.plan.total(),
                "quiz complete"
            );
            return self.summary().map(Advance::Complete);
        };

        quiz.prompt = AnswerOptionBuilder::new(&self.roster).build(
            question,
            quiz.config.answer_mode(),
            &mut self.rng,
        );
        if quiz.config.timer().is_enabled() {
            self.countdown.start(quiz.config.timer().duration_secs());
        }
        self.phase = SessionPhase::AwaitingAnswer;
        self.question_view().map(Advance::Next)
    }

    /// Discard the current run and return to `Configuring`. The roster is kept.
    pub fn reset(&mut self) {
        self.countdown.clear();
        if let Some(quiz) = self.quiz.take() {
            tracing::debug!(session_id = %quiz.id, answered = quiz.log.len(), "quiz reset");
        }
        self.phase = SessionPhase::Configuring;
    }

    /// Final result, available once the quiz is complete.
    #[must_use]
    pub fn summary(&self) -> Option<QuizSummary> {
        if self.phase != SessionPhase::Complete {
            return None;
        }
        let quiz = self.quiz.as_ref()?;
        Some(QuizSummary {
            session_id: quiz.id,
            score: quiz.score,
            total: quiz.plan.total(),
            log: quiz.log.clone(),
            started_at: quiz.started_at,
            completed_at: quiz.completed_at?,
        })
    }

    fn grade_current(&mut self, submitted: Submission) -> Option<Feedback> {
        self.countdown.stop();
        let answered_at = self.clock.now();
        let quiz = self.quiz.as_mut()?;
        let record = Grader::record(quiz.question()?, submitted, answered_at);

        if record.is_correct {
            quiz.score += 1;
        }
        tracing::debug!(
            session_id = %quiz.id,
            question = quiz.current,
            kind = %record.kind,
            correct = record.is_correct,
            "answer graded"
        );
        quiz.log.push(record.clone());
        self.phase = SessionPhase::ShowingFeedback;

        Some(Feedback {
            record,
            score: quiz.score,
            answered: quiz.log.len(),
            total: quiz.plan.total(),
        })
    }

    fn question_view(&self) -> Option<QuestionView> {
        let quiz = self.quiz.as_ref()?;
        let question = quiz.question()?;
        let entity = question.entity();
        let hides_name = question.kind() == QuestionKind::Name;

        Some(QuestionView {
            number: quiz.current + 1,
            total: quiz.plan.total(),
            score: quiz.score,
            kind: question.kind(),
            text: question.kind().prompt(),
            subject_name: (!hides_name).then(|| entity.name().to_owned()),
            portrait: self
                .portrait_base
                .as_ref()
                .and_then(|base| entity.portrait_url(base)),
            answer: quiz.prompt.clone(),
            countdown: self.countdown.remaining(),
        })
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("roster_len", &self.roster.len())
            .field("phase", &self.phase)
            .field("session_id", &self.session_id())
            .field("current", &self.current_index())
            .field("score", &self.score())
            .field("countdown", &self.countdown.state())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
