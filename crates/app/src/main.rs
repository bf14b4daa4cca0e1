use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use url::Url;

use quiz_core::model::{AnswerMode, OrderingBias, QuizConfig, QuizKind, TimerConfig};
use services::{Clock, DatasetConfig, DatasetService, QuizLoopService};

mod play;
mod render;

#[derive(Debug, Parser)]
#[command(name = "quiz", about = "Blue Archive student trivia in the terminal")]
#[command(version)]
struct Cli {
    /// Question kind: age, name, academy or mixed
    #[arg(long, env = "QUIZ_KIND", default_value_t = QuizKind::default())]
    kind: QuizKind,

    /// Number of questions, capped at the roster size
    #[arg(short = 'n', long, env = "QUIZ_QUESTION_COUNT", default_value_t = QuizConfig::DEFAULT_QUESTION_COUNT)]
    count: usize,

    /// Answer mode: multiple-choice or free-text
    #[arg(long, env = "QUIZ_ANSWER_MODE", default_value_t = AnswerMode::default())]
    mode: AnswerMode,

    /// Student order: neutral, favor-first or favor-last
    #[arg(long, env = "QUIZ_ORDERING", default_value_t = OrderingBias::default())]
    order: OrderingBias,

    /// Seconds per question; the timer is off when omitted
    #[arg(long, env = "QUIZ_TIMER_SECS")]
    timer: Option<u32>,

    /// Seed for a replayable quiz
    #[arg(long, env = "QUIZ_SEED")]
    seed: Option<u64>,

    /// Student dataset URL
    #[arg(long, env = "QUIZ_DATASET_URL")]
    dataset_url: Option<Url>,

    /// Base URL for student portraits
    #[arg(long, env = "QUIZ_PORTRAIT_BASE_URL")]
    portrait_base: Option<Url>,

    /// Dataset request timeout in seconds
    #[arg(long, env = "QUIZ_FETCH_TIMEOUT_SECS")]
    fetch_timeout: Option<u64>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn quiz_config(&self) -> Result<QuizConfig> {
        let timer = match self.timer {
            Some(secs) => TimerConfig::enabled(secs)?,
            None => TimerConfig::disabled(),
        };
        Ok(QuizConfig::default()
            .with_kind(self.kind)
            .with_question_count(self.count)
            .with_answer_mode(self.mode)
            .with_ordering(self.order)
            .with_timer(timer))
    }

    fn dataset_config(&self) -> DatasetConfig {
        let mut config = DatasetConfig::from_env();
        if let Some(url) = &self.dataset_url {
            config.dataset_url = url.clone();
        }
        if let Some(base) = &self.portrait_base {
            config.portrait_base = base.clone();
        }
        if let Some(secs) = self.fetch_timeout.filter(|secs| *secs > 0) {
            config.timeout = Duration::from_secs(secs);
        }
        config
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.quiz_config()?;
    let dataset = cli.dataset_config();
    let portrait_base = dataset.portrait_base.clone();

    let source = DatasetService::new(dataset).context("building HTTP client")?;
    let service = QuizLoopService::new(Clock::system(), Arc::new(source))
        .with_portrait_base(portrait_base)
        .with_seed(cli.seed);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let Some((session, first)) = play::start(&service, &config, &mut lines)
        .await
        .context("could not start the quiz")?
    else {
        return Ok(());
    };

    play::run(&mut lines, session, first, config).await
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("{err:#}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_build_quiz_config() {
        let cli = Cli::try_parse_from([
            "quiz", "--kind", "mixed", "-n", "8", "--mode", "text", "--order", "unpopular",
            "--timer", "15",
        ])
        .unwrap();
        let config = cli.quiz_config().unwrap();

        assert_eq!(config.kind(), QuizKind::Mixed);
        assert_eq!(config.question_count(), 8);
        assert_eq!(config.answer_mode(), AnswerMode::FreeText);
        assert_eq!(config.ordering(), OrderingBias::FavorLast);
        assert_eq!(config.timer().duration_secs(), 15);
        assert!(config.timer().is_enabled());
    }

    #[test]
    fn zero_second_timer_is_rejected() {
        let cli = Cli::try_parse_from(["quiz", "--timer", "0"]).unwrap();
        assert!(cli.quiz_config().is_err());
    }

    #[test]
    fn unknown_kind_fails_to_parse() {
        assert!(Cli::try_parse_from(["quiz", "--kind", "height"]).is_err());
    }

    #[test]
    fn dataset_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "quiz",
            "--dataset-url",
            "http://localhost:8080/students.json",
            "--fetch-timeout",
            "3",
        ])
        .unwrap();
        let config = cli.dataset_config();

        assert_eq!(
            config.dataset_url.as_str(),
            "http://localhost:8080/students.json"
        );
        assert_eq!(config.timeout, Duration::from_secs(3));
    }
}
