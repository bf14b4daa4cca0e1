use chrono::{DateTime, Utc};
use std::fmt;

use crate::model::config::QuestionKind;
use crate::model::entity::Entity;

//
// ─── PLANNED QUESTION ──────────────────────────────────────────────────────────
//

/// One slot in a quiz plan. The kind is resolved once and never re-rolled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedQuestion {
    entity: Entity,
    kind: QuestionKind,
}

impl PlannedQuestion {
    #[must_use]
    pub fn new(entity: Entity, kind: QuestionKind) -> Self {
        Self { entity, kind }
    }

    #[must_use]
    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    /// The value a correct answer must match.
    #[must_use]
    pub fn expected(&self) -> AnswerValue {
        match self.kind {
            QuestionKind::Age => AnswerValue::Age(self.entity.age()),
            QuestionKind::Name => AnswerValue::Text(self.entity.name().to_owned()),
            QuestionKind::Academy => AnswerValue::Text(self.entity.academy().to_owned()),
        }
    }
}

//
// ─── ANSWERS ───────────────────────────────────────────────────────────────────
//

/// A typed answer value: an integer age or free text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnswerValue {
    Age(u32),
    Text(String),
}

impl AnswerValue {
    /// Parse raw user input for a question of `kind`.
    ///
    /// Age input must be an integer; text input is trimmed and must be non-empty.
    /// Returns `None` for input that cannot be submitted.
    #[must_use]
    pub fn parse(kind: QuestionKind, raw: &str) -> Option<Self> {
        let raw = raw.trim();
        match kind {
            QuestionKind::Age => raw.parse::<u32>().ok().map(Self::Age),
            QuestionKind::Name | QuestionKind::Academy if raw.is_empty() => None,
            QuestionKind::Name | QuestionKind::Academy => Some(Self::Text(raw.to_owned())),
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Age(age) => write!(f, "{age}"),
            AnswerValue::Text(text) => f.write_str(text),
        }
    }
}

/// What was submitted for a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Answer(AnswerValue),
    TimeExpired,
}

impl Submission {
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Submission::TimeExpired)
    }
}

impl From<AnswerValue> for Submission {
    fn from(value: AnswerValue) -> Self {
        Self::Answer(value)
    }
}

impl fmt::Display for Submission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Submission::Answer(value) => value.fmt(f),
            Submission::TimeExpired => f.write_str("Time expired"),
        }
    }
}

//
// ─── ANSWER RECORD ─────────────────────────────────────────────────────────────
//

/// Graded outcome of one question. Appended once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub entity: Entity,
    pub kind: QuestionKind,
    pub submitted: Submission,
    pub expected: AnswerValue,
    pub is_correct: bool,
    pub answered_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aru() -> Entity {
        Entity::new(None, "Aru", 16, "Gehenna").unwrap()
    }

    #[test]
    fn expected_follows_kind() {
        assert_eq!(
            PlannedQuestion::new(aru(), QuestionKind::Age).expected(),
            AnswerValue::Age(16)
        );
        assert_eq!(
            PlannedQuestion::new(aru(), QuestionKind::Name).expected(),
            AnswerValue::Text("Aru".into())
        );
        assert_eq!(
            PlannedQuestion::new(aru(), QuestionKind::Academy).expected(),
            AnswerValue::Text("Gehenna".into())
        );
    }

    #[test]
    fn parse_rejects_unsubmittable_input() {
        assert_eq!(
            AnswerValue::parse(QuestionKind::Age, " 17 "),
            Some(AnswerValue::Age(17))
        );
        assert_eq!(AnswerValue::parse(QuestionKind::Age, "seventeen"), None);
        assert_eq!(AnswerValue::parse(QuestionKind::Name, "   "), None);
        assert_eq!(
            AnswerValue::parse(QuestionKind::Academy, " Red Winter "),
            Some(AnswerValue::Text("Red Winter".into()))
        );
    }

    #[test]
    fn timeout_displays_sentinel() {
        assert_eq!(Submission::TimeExpired.to_string(), "Time expired");
        assert!(Submission::TimeExpired.is_timeout());
    }
}
