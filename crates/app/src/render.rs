//! Plain-text rendering of session views for the terminal.

use std::fmt::Write as _;

use quiz_core::model::QuestionKind;
use services::session::{AnswerPrompt, InputRule, Urgency};
use services::{CountdownUpdate, Feedback, QuestionView, QuizSummary};

pub fn question(view: &QuestionView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\nQuestion {}/{}  (score {})",
        view.number, view.total, view.score
    );
    if let Some(name) = &view.subject_name {
        let _ = writeln!(out, "Student: {name}");
    }
    if let Some(portrait) = &view.portrait {
        let _ = writeln!(out, "Portrait: {portrait}");
    }
    let _ = writeln!(out, "{}", view.text);

    match &view.answer {
        AnswerPrompt::Choices(choices) => {
            for (index, choice) in choices.iter().enumerate() {
                let _ = writeln!(out, "  {}) {choice}", index + 1);
            }
            let _ = write!(out, "Pick 1-{} or type the answer", choices.len());
        }
        AnswerPrompt::FreeText(InputRule::Integer { min, max }) => {
            let _ = write!(out, "Type an age ({min}-{max})");
        }
        AnswerPrompt::FreeText(InputRule::Text) => {
            let _ = write!(out, "Type the {}", noun(view.kind));
        }
    }
    if let Some(secs) = view.countdown {
        let _ = write!(out, ", {secs}s on the clock");
    }
    out.push_str(": ");
    out
}

/// `None` while there is plenty of time left, to keep the terminal quiet.
pub fn countdown(update: &CountdownUpdate) -> Option<String> {
    match update.urgency {
        Urgency::Calm => None,
        Urgency::Warning => Some(format!("[{}s left]", update.remaining)),
        Urgency::Danger => Some(format!("[{}s left!]", update.remaining)),
    }
}

pub fn feedback(feedback: &Feedback) -> String {
    let record = &feedback.record;
    let verdict = if feedback.timed_out() {
        format!("Time's up! The answer was {}.", record.expected)
    } else if feedback.is_correct() {
        "Correct!".to_owned()
    } else {
        format!(
            "Wrong: you said {}, the answer was {}.",
            record.submitted, record.expected
        )
    };
    let next = if feedback.is_last() {
        "see your results"
    } else {
        "continue"
    };
    format!(
        "{verdict}  Score {}/{}. Press Enter to {next}.",
        feedback.score, feedback.answered
    )
}

pub fn summary(summary: &QuizSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\nQuiz complete: {}/{} ({}%) in {}s",
        summary.score,
        summary.total,
        summary.percentage(),
        summary.duration_secs()
    );
    for (index, record) in summary.log.iter().enumerate() {
        let mark = if record.is_correct { '+' } else { '-' };
        let _ = writeln!(
            out,
            "  {mark} {}. {} ({}): {} / {}",
            index + 1,
            record.entity.name(),
            record.kind.label(),
            record.submitted,
            record.expected
        );
    }
    out.push_str("Play again? [y/N] ");
    out
}

fn noun(kind: QuestionKind) -> &'static str {
    match kind {
        QuestionKind::Age => "age",
        QuestionKind::Name => "student's name",
        QuestionKind::Academy => "academy",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AnswerRecord, AnswerValue, Entity, SessionId, Submission};
    use quiz_core::time::fixed_now;

    fn view(answer: AnswerPrompt) -> QuestionView {
        QuestionView {
            number: 2,
            total: 5,
            score: 1,
            kind: QuestionKind::Age,
            text: QuestionKind::Age.prompt(),
            subject_name: Some("Aru".to_owned()),
            portrait: None,
            answer,
            countdown: Some(10),
        }
    }

    fn record(submitted: Submission, is_correct: bool) -> AnswerRecord {
        AnswerRecord {
            entity: Entity::new(None, "Aru", 16, "Gehenna").unwrap(),
            kind: QuestionKind::Age,
            submitted,
            expected: AnswerValue::Age(16),
            is_correct,
            answered_at: fixed_now(),
        }
    }

    #[test]
    fn choices_are_numbered_from_one() {
        let prompt = AnswerPrompt::Choices(vec![AnswerValue::Age(15), AnswerValue::Age(16)]);
        let text = question(&view(prompt));

        assert!(text.contains("Question 2/5"));
        assert!(text.contains("Student: Aru"));
        assert!(text.contains("  1) 15\n"));
        assert!(text.contains("  2) 16\n"));
        assert!(text.contains("10s on the clock"));
    }

    #[test]
    fn free_text_shows_input_hint() {
        let prompt = AnswerPrompt::FreeText(InputRule::Integer { min: 1, max: 25 });
        assert!(question(&view(prompt)).contains("Type an age (1-25)"));
    }

    #[test]
    fn calm_countdown_is_silent() {
        let update = CountdownUpdate {
            remaining: 12,
            urgency: Urgency::Calm,
            timed_out: None,
        };
        assert_eq!(countdown(&update), None);

        let update = CountdownUpdate {
            remaining: 3,
            urgency: Urgency::Danger,
            timed_out: None,
        };
        assert_eq!(countdown(&update).as_deref(), Some("[3s left!]"));
    }

    #[test]
    fn feedback_names_expected_value() {
        let wrong = Feedback {
            record: record(Submission::Answer(AnswerValue::Age(15)), false),
            score: 0,
            answered: 1,
            total: 5,
        };
        let text = feedback(&wrong);
        assert!(text.starts_with("Wrong: you said 15, the answer was 16."));
        assert!(text.ends_with("Press Enter to continue."));

        let late = Feedback {
            record: record(Submission::TimeExpired, false),
            score: 0,
            answered: 5,
            total: 5,
        };
        let text = feedback(&late);
        assert!(text.starts_with("Time's up! The answer was 16."));
        assert!(text.ends_with("see your results."));
    }

    #[test]
    fn summary_lists_each_answer() {
        let result = QuizSummary {
            session_id: SessionId::new_v4(),
            score: 1,
            total: 2,
            log: vec![
                record(Submission::Answer(AnswerValue::Age(16)), true),
                record(Submission::TimeExpired, false),
            ],
            started_at: fixed_now(),
            completed_at: fixed_now(),
        };
        let text = summary(&result);

        assert!(text.contains("Quiz complete: 1/2 (50%)"));
        assert!(text.contains("+ 1. Aru"));
        assert!(text.contains("- 2. Aru"));
        assert!(text.contains("Time expired"));
    }
}
