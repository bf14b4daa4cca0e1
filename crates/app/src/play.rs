//! Terminal quiz loop: stdin lines and a one-second ticker drive one session.

use std::io::Write as _;
use std::time::Duration;

use anyhow::Result;
use tokio::io::{AsyncBufRead, Lines};
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

use quiz_core::model::{AnswerValue, QuizConfig};
use services::session::AnswerPrompt;
use services::{Advance, QuestionView, QuizLoopService, QuizSession, SessionPhase};

use crate::render;

const TICK: Duration = Duration::from_secs(1);

/// Load the roster and start a quiz, offering a retry while the failure is
/// one a retry can fix.
///
/// Returns `None` when the user declines to retry or input closes.
///
/// # Errors
///
/// Returns the start error when retrying cannot help (an empty roster or
/// plan), or an I/O error from the terminal.
pub async fn start<R>(
    service: &QuizLoopService,
    config: &QuizConfig,
    lines: &mut Lines<R>,
) -> Result<Option<(QuizSession, QuestionView)>>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        show("Loading students...\n")?;
        let err = match service.start_quiz(config.clone()).await {
            Ok(started) => return Ok(Some(started)),
            Err(err) if err.is_retryable() => err,
            Err(err) => return Err(err.into()),
        };

        tracing::warn!(error = %err, "quiz start failed");
        show(&format!("{err}\nRetry? [Y/n] "))?;
        let Some(line) = lines.next_line().await? else {
            return Ok(None);
        };
        if line.trim().eq_ignore_ascii_case("n") {
            return Ok(None);
        }
    }
}

/// Play until the user declines another round or input closes.
pub async fn run<R>(
    lines: &mut Lines<R>,
    mut session: QuizSession,
    first: QuestionView,
    config: QuizConfig,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut ticker = new_ticker();
    show(&render::question(&first))?;

    loop {
        tokio::select! {
            _ = ticker.tick(), if session.countdown().is_running() => {
                let Some(update) = session.tick() else { continue };
                if let Some(feedback) = &update.timed_out {
                    show(&format!("\n{}", render::feedback(feedback)))?;
                } else if let Some(line) = render::countdown(&update) {
                    show(&format!("{line} "))?;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::debug!("input closed");
                    return Ok(());
                };
                match session.phase() {
                    SessionPhase::AwaitingAnswer => answer(&mut session, line.trim())?,
                    SessionPhase::ShowingFeedback => match session.advance() {
                        Some(Advance::Next(view)) => {
                            ticker = new_ticker();
                            show(&render::question(&view))?;
                        }
                        Some(Advance::Complete(summary)) => show(&render::summary(&summary))?,
                        None => {}
                    },
                    SessionPhase::Complete => {
                        if !line.trim().eq_ignore_ascii_case("y") {
                            return Ok(());
                        }
                        let view = session.start(config.clone())?;
                        ticker = new_ticker();
                        show(&render::question(&view))?;
                    }
                    SessionPhase::Configuring => return Ok(()),
                }
            }
        }
    }
}

/// Multiple-choice questions only take one of the listed options; free-text
/// questions take whatever was typed.
fn answer(session: &mut QuizSession, input: &str) -> Result<()> {
    let prompt = session.current_question().map(|view| view.answer);
    let feedback = match prompt {
        Some(AnswerPrompt::Choices(choices)) => match pick(&choices, input) {
            Some(index) => session.choose(index),
            None => {
                return show(&format!(
                    "Pick 1-{} or one of the listed answers: ",
                    choices.len()
                ));
            }
        },
        _ => session.submit(input),
    };
    match feedback {
        Some(feedback) => show(&render::feedback(&feedback)),
        None => show("Not a valid answer, try again: "),
    }
}

/// Index of the option `input` names: its 1-based number, or its value.
/// A number in range is always read as an index.
fn pick(choices: &[AnswerValue], input: &str) -> Option<usize> {
    let input = input.trim();
    if let Some(number) = input
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=choices.len()).contains(n))
    {
        return Some(number - 1);
    }
    choices
        .iter()
        .position(|choice| choice.to_string().eq_ignore_ascii_case(input))
}

fn new_ticker() -> Interval {
    let mut ticker = interval_at(Instant::now() + TICK, TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

fn show(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
