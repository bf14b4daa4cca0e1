use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("timer duration must be > 0 seconds")]
    InvalidTimerDuration,

    #[error("unrecognized {field} value: {raw}")]
    UnknownValue { field: &'static str, raw: String },
}

//
// ─── QUESTION KINDS ────────────────────────────────────────────────────────────
//

/// Attribute a single question asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionKind {
    Age,
    Name,
    Academy,
}

impl QuestionKind {
    pub const ALL: [QuestionKind; 3] = [Self::Age, Self::Name, Self::Academy];

    /// Question text shown alongside the entity.
    #[must_use]
    pub fn prompt(self) -> &'static str {
        match self {
            QuestionKind::Age => "How old is this student?",
            QuestionKind::Name => "What is this student's name?",
            QuestionKind::Academy => "Which academy does this student attend?",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            QuestionKind::Age => "Age",
            QuestionKind::Name => "Name",
            QuestionKind::Academy => "Academy",
        }
    }
}

/// Kind selection for a whole quiz. `Mixed` resolves per question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuizKind {
    #[default]
    Age,
    Name,
    Academy,
    Mixed,
}

impl QuizKind {
    /// The fixed kind, or `None` for `Mixed`.
    #[must_use]
    pub fn fixed(self) -> Option<QuestionKind> {
        match self {
            QuizKind::Age => Some(QuestionKind::Age),
            QuizKind::Name => Some(QuestionKind::Name),
            QuizKind::Academy => Some(QuestionKind::Academy),
            QuizKind::Mixed => None,
        }
    }
}

/// How answers are collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnswerMode {
    #[default]
    MultipleChoice,
    FreeText,
}

/// Ordering applied to the roster before questions are drawn.
///
/// All variants shuffle. `FavorLast` additionally reverses the shuffled order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderingBias {
    #[default]
    Neutral,
    FavorFirst,
    FavorLast,
}

//
// ─── TIMER ─────────────────────────────────────────────────────────────────────
//

/// Per-question countdown settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    enabled: bool,
    duration_secs: u32,
}

impl TimerConfig {
    pub const DEFAULT_DURATION_SECS: u32 = 10;

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidTimerDuration` if `duration_secs` is zero.
    pub fn new(enabled: bool, duration_secs: u32) -> Result<Self, ConfigError> {
        if duration_secs == 0 {
            return Err(ConfigError::InvalidTimerDuration);
        }
        Ok(Self {
            enabled,
            duration_secs,
        })
    }

    /// An enabled countdown of `duration_secs`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidTimerDuration` if `duration_secs` is zero.
    pub fn enabled(duration_secs: u32) -> Result<Self, ConfigError> {
        Self::new(true, duration_secs)
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            duration_secs: Self::DEFAULT_DURATION_SECS,
        }
    }

    /// Returns whether questions are timed.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns seconds per question; meaningful only when enabled.
    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::disabled()
    }
}

//
// ─── QUIZ CONFIG ───────────────────────────────────────────────────────────────
//

/// User-chosen settings for one quiz.
///
/// `question_count` may be zero here; the session rejects such a plan at start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    kind: QuizKind,
    question_count: usize,
    answer_mode: AnswerMode,
    ordering: OrderingBias,
    timer: TimerConfig,
}

impl QuizConfig {
    pub const DEFAULT_QUESTION_COUNT: usize = 5;

    #[must_use]
    pub fn new(
        kind: QuizKind,
        question_count: usize,
        answer_mode: AnswerMode,
        ordering: OrderingBias,
        timer: TimerConfig,
    ) -> Self {
        Self {
            kind,
            question_count,
            answer_mode,
            ordering,
            timer,
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: QuizKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_question_count(mut self, question_count: usize) -> Self {
        self.question_count = question_count;
        self
    }

    #[must_use]
    pub fn with_answer_mode(mut self, answer_mode: AnswerMode) -> Self {
        self.answer_mode = answer_mode;
        self
    }

    #[must_use]
    pub fn with_ordering(mut self, ordering: OrderingBias) -> Self {
        self.ordering = ordering;
        self
    }

    #[must_use]
    pub fn with_timer(mut self, timer: TimerConfig) -> Self {
        self.timer = timer;
        self
    }

    /// Returns the requested question kind.
    #[must_use]
    pub fn kind(&self) -> QuizKind {
        self.kind
    }

    /// Returns the requested count, before capping at the roster size.
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.question_count
    }

    #[must_use]
    pub fn answer_mode(&self) -> AnswerMode {
        self.answer_mode
    }

    #[must_use]
    pub fn ordering(&self) -> OrderingBias {
        self.ordering
    }

    /// Returns the per-question countdown settings.
    #[must_use]
    pub fn timer(&self) -> TimerConfig {
        self.timer
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self::new(
            QuizKind::default(),
            Self::DEFAULT_QUESTION_COUNT,
            AnswerMode::default(),
            OrderingBias::default(),
            TimerConfig::disabled(),
        )
    }
}

// ─── Display / FromStr ─────────────────────────────────────────────────────────

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QuestionKind::Age => "age",
            QuestionKind::Name => "name",
            QuestionKind::Academy => "academy",
        })
    }
}

impl fmt::Display for QuizKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fixed() {
            Some(kind) => kind.fmt(f),
            None => f.write_str("mixed"),
        }
    }
}

impl fmt::Display for AnswerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AnswerMode::MultipleChoice => "multiple-choice",
            AnswerMode::FreeText => "free-text",
        })
    }
}

impl fmt::Display for OrderingBias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OrderingBias::Neutral => "neutral",
            OrderingBias::FavorFirst => "favor-first",
            OrderingBias::FavorLast => "favor-last",
        })
    }
}

impl FromStr for QuizKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "age" => Ok(Self::Age),
            "name" => Ok(Self::Name),
            "academy" => Ok(Self::Academy),
            "mixed" => Ok(Self::Mixed),
            _ => Err(ConfigError::UnknownValue {
                field: "question kind",
                raw: s.to_owned(),
            }),
        }
    }
}

impl FromStr for AnswerMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "multiple-choice" | "choice" | "mc" => Ok(Self::MultipleChoice),
            "free-text" | "type-in" | "text" => Ok(Self::FreeText),
            _ => Err(ConfigError::UnknownValue {
                field: "answer mode",
                raw: s.to_owned(),
            }),
        }
    }
}

impl FromStr for OrderingBias {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "neutral" | "random" => Ok(Self::Neutral),
            "favor-first" | "popular" => Ok(Self::FavorFirst),
            "favor-last" | "unpopular" => Ok(Self::FavorLast),
            _ => Err(ConfigError::UnknownValue {
                field: "ordering",
                raw: s.to_owned(),
            }),
        }
    }
}
