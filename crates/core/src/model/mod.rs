mod config;
mod entity;
mod ids;
mod question;

pub use config::{
    AnswerMode, ConfigError, OrderingBias, QuestionKind, QuizConfig, QuizKind, TimerConfig,
};
pub use entity::{Entity, EntityError, KNOWN_ACADEMIES, Roster};
pub use ids::{EntityId, SessionId};
pub use question::{AnswerRecord, AnswerValue, PlannedQuestion, Submission};

pub(crate) use entity::is_unknown_marker;
