mod countdown;
mod options;
mod plan;
mod progress;
mod service;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use countdown::{ClockState, ClockTick, SessionClock, Urgency};
pub use options::{AGE_RANGE, AnswerOptionBuilder, AnswerPrompt, InputRule, OPTION_COUNT};
pub use plan::{QuestionGenerator, QuizPlan};
pub use progress::SessionProgress;
pub use service::{QuizSession, SessionPhase};
pub use view::{Advance, CountdownUpdate, Feedback, QuestionView, QuizSummary};
pub use workflow::{QuizLoopService, StartError};
