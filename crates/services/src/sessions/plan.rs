use rand::Rng;
use rand::seq::SliceRandom;

use quiz_core::model::{OrderingBias, PlannedQuestion, QuestionKind, QuizConfig, Roster};

/// Ordered questions for one quiz run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuizPlan {
    questions: Vec<PlannedQuestion>,
}

impl QuizPlan {
    /// Total number of questions in this plan.
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PlannedQuestion> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn questions(&self) -> &[PlannedQuestion] {
        &self.questions
    }
}

/// Builds a quiz plan from the roster according to the quiz settings.
pub struct QuestionGenerator<'a> {
    roster: &'a Roster,
    config: &'a QuizConfig,
}

impl<'a> QuestionGenerator<'a> {
    #[must_use]
    pub fn new(roster: &'a Roster, config: &'a QuizConfig) -> Self {
        Self { roster, config }
    }

    /// Draw `min(question_count, roster size)` distinct entities and resolve a
    /// kind for each.
    ///
    /// - Every ordering shuffles a copy of the roster; `FavorLast` then reverses it.
    /// - With `Mixed`, each question gets a kind drawn uniformly and independently.
    pub fn generate<R: Rng + ?Sized>(self, rng: &mut R) -> QuizPlan {
        let mut order: Vec<usize> = (0..self.roster.len()).collect();
        order.as_mut_slice().shuffle(rng);
        if self.config.ordering() == OrderingBias::FavorLast {
            order.reverse();
        }

        let take = self.config.question_count().min(order.len());
        let entities = self.roster.entities();
        let questions = order
            .into_iter()
            .take(take)
            .map(|index| {
                let kind = self.config.kind().fixed().unwrap_or_else(|| {
                    QuestionKind::ALL[rng.random_range(0..QuestionKind::ALL.len())]
                });
                PlannedQuestion::new(entities[index].clone(), kind)
            })
            .collect();

        QuizPlan { questions }
    }
}
