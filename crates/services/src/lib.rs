#![forbid(unsafe_code)]

pub mod dataset_service;
pub mod error;
pub mod sessions;

pub use quiz_core::Clock;
pub use sessions as session;

pub use dataset_service::{DatasetConfig, DatasetService, RosterSource, StaticRoster};
pub use error::{DatasetError, FetchError, SessionError};

pub use sessions::{
    Advance, CountdownUpdate, Feedback, QuestionView, QuizLoopService, QuizSession, QuizSummary,
    SessionPhase, StartError,
};
