use chrono::{DateTime, Utc};
use url::Url;

use quiz_core::model::{AnswerRecord, QuestionKind, SessionId};
use quiz_core::time::elapsed_secs;

use super::countdown::Urgency;
use super::options::AnswerPrompt;

/// Presentation-agnostic view of the question awaiting an answer.
///
/// Carries no formatting beyond the question text; the presentation layer
/// decides how to render choices and the countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    /// 1-based position in the plan.
    pub number: usize,
    pub total: usize,
    pub score: u32,
    pub kind: QuestionKind,
    pub text: &'static str,
    /// Hidden when the question asks for the name.
    pub subject_name: Option<String>,
    pub portrait: Option<Url>,
    pub answer: AnswerPrompt,
    /// Seconds on the countdown when it is enabled.
    pub countdown: Option<u32>,
}

/// Result of grading one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub record: AnswerRecord,
    pub score: u32,
    pub answered: usize,
    pub total: usize,
}

impl Feedback {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.record.is_correct
    }

    #[must_use]
    pub fn timed_out(&self) -> bool {
        self.record.submitted.is_timeout()
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.answered >= self.total
    }
}

/// One second of countdown, plus the timeout grading if it just expired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownUpdate {
    pub remaining: u32,
    pub urgency: Urgency,
    pub timed_out: Option<Feedback>,
}

/// Outcome of moving past the feedback screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    Next(QuestionView),
    Complete(QuizSummary),
}

/// Final result of a quiz run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSummary {
    pub session_id: SessionId,
    pub score: u32,
    pub total: usize,
    pub log: Vec<AnswerRecord>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl QuizSummary {
    /// Score as a whole percentage, rounded half away from zero.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let score = u64::from(self.score);
        let total = self.total as u64;
        u32::try_from((score * 200 + total) / (total * 2)).unwrap_or(100)
    }

    #[must_use]
    pub fn duration_secs(&self) -> u64 {
        elapsed_secs(self.started_at, self.completed_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    fn summary(score: u32, total: usize) -> QuizSummary {
        QuizSummary {
            session_id: SessionId::new_v4(),
            score,
            total,
            log: Vec::new(),
            started_at: fixed_now(),
            completed_at: fixed_now() + chrono::Duration::seconds(42),
        }
    }

    #[test]
    fn percentage_rounds_to_nearest() {
        assert_eq!(summary(0, 5).percentage(), 0);
        assert_eq!(summary(2, 3).percentage(), 67);
        assert_eq!(summary(1, 3).percentage(), 33);
        assert_eq!(summary(1, 8).percentage(), 13);
        assert_eq!(summary(5, 5).percentage(), 100);
        assert_eq!(summary(0, 0).percentage(), 0);
    }

    #[test]
    fn duration_spans_start_to_completion() {
        assert_eq!(summary(1, 1).duration_secs(), 42);
    }
}
