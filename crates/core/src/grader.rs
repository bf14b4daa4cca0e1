use chrono::{DateTime, Utc};

use crate::model::{AnswerRecord, AnswerValue, PlannedQuestion, QuestionKind, Submission};

/// Compares submissions against expected values.
///
/// Ages compare as exact integers. Names and academies compare after trimming
/// and lowercasing; inner whitespace and punctuation must match. A timeout is
/// always wrong.
pub struct Grader;

impl Grader {
    #[must_use]
    pub fn grade(submitted: &Submission, expected: &AnswerValue, kind: QuestionKind) -> bool {
        let Submission::Answer(value) = submitted else {
            return false;
        };

        match kind {
            QuestionKind::Age => match (as_age(value), as_age(expected)) {
                (Some(given), Some(wanted)) => given == wanted,
                _ => false,
            },
            QuestionKind::Name | QuestionKind::Academy => {
                normalize(&value.to_string()) == normalize(&expected.to_string())
            }
        }
    }

    /// Grade `submitted` for `question` and build the log entry.
    #[must_use]
    pub fn record(
        question: &PlannedQuestion,
        submitted: Submission,
        answered_at: DateTime<Utc>,
    ) -> AnswerRecord {
        let expected = question.expected();
        let is_correct = Self::grade(&submitted, &expected, question.kind());
        AnswerRecord {
            entity: question.entity().clone(),
            kind: question.kind(),
            submitted,
            expected,
            is_correct,
            answered_at,
        }
    }
}

fn as_age(value: &AnswerValue) -> Option<u32> {
    match value {
        AnswerValue::Age(age) => Some(*age),
        AnswerValue::Text(raw) => raw.trim().parse().ok(),
    }
}

fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}
