use std::ops::RangeInclusive;

use rand::Rng;
use rand::seq::SliceRandom;

use quiz_core::model::{
    AnswerMode, AnswerValue, Entity, KNOWN_ACADEMIES, PlannedQuestion, QuestionKind, Roster,
};

/// Number of choices shown for a multiple-choice question, when available.
pub const OPTION_COUNT: usize = 4;

/// Ages a distractor may take, widened to cover older entities in the roster.
pub const AGE_RANGE: RangeInclusive<u32> = 1..=25;

/// Distractor ages sit within this distance of the correct age.
const AGE_SPREAD: u32 = 3;

/// How the current question expects its answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerPrompt {
    /// Pick one of these, in display order. Contains the correct value.
    Choices(Vec<AnswerValue>),
    /// Type a value matching the rule.
    FreeText(InputRule),
}

/// Input constraints for free-text answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRule {
    /// An integer; the range is a hint for the input widget, not a grading rule.
    Integer { min: u32, max: u32 },
    /// Non-blank text.
    Text,
}

impl AnswerPrompt {
    #[must_use]
    pub fn choices(&self) -> &[AnswerValue] {
        match self {
            AnswerPrompt::Choices(values) => values,
            AnswerPrompt::FreeText(_) => &[],
        }
    }

    #[must_use]
    pub fn is_multiple_choice(&self) -> bool {
        matches!(self, AnswerPrompt::Choices(_))
    }
}

/// Produces answer options for a question.
pub struct AnswerOptionBuilder<'a> {
    roster: &'a Roster,
}

impl<'a> AnswerOptionBuilder<'a> {
    #[must_use]
    pub fn new(roster: &'a Roster) -> Self {
        Self { roster }
    }

    pub fn build<R: Rng + ?Sized>(
        &self,
        question: &PlannedQuestion,
        mode: AnswerMode,
        rng: &mut R,
    ) -> AnswerPrompt {
        match mode {
            AnswerMode::FreeText => {
                AnswerPrompt::FreeText(input_rule(question.kind(), self.age_bounds(question)))
            }
            AnswerMode::MultipleChoice => {
                let mut options = match question.kind() {
                    QuestionKind::Age => {
                        age_choices(question.entity().age(), &self.age_bounds(question), rng)
                    }
                    QuestionKind::Name => self.name_choices(question, rng),
                    QuestionKind::Academy => academy_choices(question.entity().academy(), rng),
                };
                options.as_mut_slice().shuffle(rng);
                AnswerPrompt::Choices(options)
            }
        }
    }

    /// `AGE_RANGE`, stretched up to the oldest roster entity or the current one.
    fn age_bounds(&self, question: &PlannedQuestion) -> RangeInclusive<u32> {
        let oldest = self
            .roster
            .iter()
            .map(Entity::age)
            .chain(std::iter::once(question.entity().age()))
            .max()
            .unwrap_or_default();
        *AGE_RANGE.start()..=oldest.max(*AGE_RANGE.end())
    }

    /// Correct name plus up to three other distinct names from the roster.
    fn name_choices<R: Rng + ?Sized>(
        &self,
        question: &PlannedQuestion,
        rng: &mut R,
    ) -> Vec<AnswerValue> {
        let correct = question.entity().name();
        let mut others: Vec<&str> = self
            .roster
            .iter()
            .map(|entity| entity.name())
            .filter(|name| *name != correct)
            .collect();
        others.sort_unstable();
        others.dedup();
        others.as_mut_slice().shuffle(rng);

        std::iter::once(correct)
            .chain(others.into_iter().take(OPTION_COUNT - 1))
            .map(|name| AnswerValue::Text(name.to_owned()))
            .collect()
    }
}

fn input_rule(kind: QuestionKind, ages: RangeInclusive<u32>) -> InputRule {
    match kind {
        QuestionKind::Age => InputRule::Integer {
            min: *ages.start(),
            max: *ages.end(),
        },
        QuestionKind::Name | QuestionKind::Academy => InputRule::Text,
    }
}

/// Correct age plus up to three distinct nearby ages inside `bounds`.
///
/// Candidates are enumerated up front and sampled without replacement, so a
/// correct age near the range edge yields fewer distractors rather than looping.
fn age_choices<R: Rng + ?Sized>(
    correct: u32,
    bounds: &RangeInclusive<u32>,
    rng: &mut R,
) -> Vec<AnswerValue> {
    let low = correct.saturating_sub(AGE_SPREAD);
    let high = correct.saturating_add(AGE_SPREAD);
    let mut candidates: Vec<u32> = (low..=high)
        .filter(|age| *age != correct && bounds.contains(age))
        .collect();
    candidates.as_mut_slice().shuffle(rng);

    std::iter::once(correct)
        .chain(candidates.into_iter().take(OPTION_COUNT - 1))
        .map(AnswerValue::Age)
        .collect()
}

/// Correct academy plus up to three catalog academies.
fn academy_choices<R: Rng + ?Sized>(correct: &str, rng: &mut R) -> Vec<AnswerValue> {
    let mut others: Vec<&str> = KNOWN_ACADEMIES
        .iter()
        .copied()
        .filter(|academy| *academy != correct)
        .collect();
    others.as_mut_slice().shuffle(rng);

    std::iter::once(correct)
        .chain(others.into_iter().take(OPTION_COUNT - 1))
        .map(|academy| AnswerValue::Text(academy.to_owned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::Entity;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn entity(name: &str, age: u32, academy: &str) -> Entity {
        Entity::new(None, name, age, academy).unwrap()
    }

    fn small_roster() -> Roster {
        Roster::new(vec![
            entity("Aru", 16, "Gehenna"),
            entity("Hina", 17, "Gehenna"),
            entity("Mika", 17, "Trinity"),
            entity("Yuuka", 16, "Millennium"),
            entity("Hoshino", 17, "Abydos"),
        ])
    }

    fn age_values(prompt: &AnswerPrompt) -> Vec<u32> {
        prompt
            .choices()
            .iter()
            .map(|value| match value {
                AnswerValue::Age(age) => *age,
                AnswerValue::Text(text) => panic!("unexpected text option {text}"),
            })
            .collect()
    }

    #[test]
    fn age_options_are_four_distinct_values_in_range() {
        let roster = small_roster();
        let builder = AnswerOptionBuilder::new(&roster);
        for age in 1..=25 {
            let question = PlannedQuestion::new(entity("Test", age, "SRT"), QuestionKind::Age);
            for seed in 0..8 {
                let prompt = builder.build(
                    &question,
                    AnswerMode::MultipleChoice,
                    &mut StdRng::seed_from_u64(seed),
                );
                let values = age_values(&prompt);
                let distinct: HashSet<_> = values.iter().copied().collect();
                assert_eq!(values.len(), OPTION_COUNT, "age {age}");
                assert_eq!(distinct.len(), OPTION_COUNT);
                assert!(values.contains(&age));
                assert!(values.iter().all(|value| AGE_RANGE.contains(value)));
                assert!(values.iter().all(|value| value.abs_diff(age) <= AGE_SPREAD));
            }
        }
    }

    #[test]
    fn older_entities_widen_age_bounds() {
        let mut entities = small_roster().entities().to_vec();
        entities.push(entity("Elder", 40, "SRT"));
        let roster = Roster::new(entities);
        let builder = AnswerOptionBuilder::new(&roster);

        let elder = PlannedQuestion::new(entity("Elder", 40, "SRT"), QuestionKind::Age);
        let prompt = builder.build(
            &elder,
            AnswerMode::MultipleChoice,
            &mut StdRng::seed_from_u64(5),
        );
        let values = age_values(&prompt);
        assert_eq!(values.len(), OPTION_COUNT);
        assert!(values.iter().all(|value| (37..=40).contains(value)));

        let young = PlannedQuestion::new(entity("Aru", 16, "Gehenna"), QuestionKind::Age);
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(
            builder.build(&young, AnswerMode::FreeText, &mut rng),
            AnswerPrompt::FreeText(InputRule::Integer { min: 1, max: 40 })
        );
    }

    #[test]
    fn correct_position_varies_across_draws() {
        let roster = small_roster();
        let builder = AnswerOptionBuilder::new(&roster);
        let question = PlannedQuestion::new(entity("Aru", 16, "Gehenna"), QuestionKind::Age);
        let positions: HashSet<_> = (0..32)
            .map(|seed| {
                let prompt = builder.build(
                    &question,
                    AnswerMode::MultipleChoice,
                    &mut StdRng::seed_from_u64(seed),
                );
                prompt
                    .choices()
                    .iter()
                    .position(|value| *value == AnswerValue::Age(16))
                    .unwrap()
            })
            .collect();
        assert!(positions.len() > 1);
    }

    #[test]
    fn name_options_exclude_current_and_shrink_with_small_roster() {
        let roster = small_roster();
        let question = PlannedQuestion::new(roster.entities()[0].clone(), QuestionKind::Name);
        let prompt = AnswerOptionBuilder::new(&roster).build(
            &question,
            AnswerMode::MultipleChoice,
            &mut StdRng::seed_from_u64(11),
        );
        let names: HashSet<_> = prompt.choices().iter().map(ToString::to_string).collect();
        assert_eq!(names.len(), OPTION_COUNT);
        assert!(names.contains("Aru"));

        let pair = Roster::new(vec![entity("Aru", 16, "Gehenna"), entity("Hina", 17, "Gehenna")]);
        let prompt = AnswerOptionBuilder::new(&pair).build(
            &question,
            AnswerMode::MultipleChoice,
            &mut StdRng::seed_from_u64(11),
        );
        assert_eq!(prompt.choices().len(), 2);
    }

    #[test]
    fn academy_options_come_from_catalog() {
        let roster = small_roster();
        let question = PlannedQuestion::new(entity("Hoshino", 17, "Abydos"), QuestionKind::Academy);
        let prompt = AnswerOptionBuilder::new(&roster).build(
            &question,
            AnswerMode::MultipleChoice,
            &mut StdRng::seed_from_u64(2),
        );
        let academies: Vec<_> = prompt.choices().iter().map(ToString::to_string).collect();
        assert_eq!(academies.len(), OPTION_COUNT);
        assert_eq!(academies.iter().filter(|a| *a == "Abydos").count(), 1);
        assert!(academies.iter().all(|a| KNOWN_ACADEMIES.contains(&a.as_str())));
    }

    #[test]
    fn free_text_builds_input_rule_only() {
        let roster = small_roster();
        let builder = AnswerOptionBuilder::new(&roster);
        let mut rng = StdRng::seed_from_u64(0);
        let age = PlannedQuestion::new(entity("Aru", 16, "Gehenna"), QuestionKind::Age);
        let name = PlannedQuestion::new(entity("Aru", 16, "Gehenna"), QuestionKind::Name);

        assert_eq!(
            builder.build(&age, AnswerMode::FreeText, &mut rng),
            AnswerPrompt::FreeText(InputRule::Integer { min: 1, max: 25 })
        );
        let prompt = builder.build(&name, AnswerMode::FreeText, &mut rng);
        assert_eq!(prompt, AnswerPrompt::FreeText(InputRule::Text));
        assert!(prompt.choices().is_empty());
    }
}
