use anyhow::{Context, Result};
use docqa_pipeline::{ConversationSession, QueryPipeline};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{BufRead, Write};
use std::time::Duration;
use tracing::{debug, info};

use crate::output::{
    print_answer, print_error, print_goodbye, print_prompt, print_reset, print_welcome,
};

/// What a line typed at the prompt asks for
#[derive(Debug, PartialEq, Eq)]
pub enum ReplCommand<'a> {
    Exit,
    Reset,
    Ask(&'a str),
}

/// Classify one input line. Anything that is not a command goes to the pipeline,
/// blank lines included.
pub fn parse_line(line: &str) -> ReplCommand<'_> {
    let line = line.trim_end_matches(['\r', '\n']);
    let command = line.trim();

    if command.eq_ignore_ascii_case("exit") || command.eq_ignore_ascii_case("quit") {
        ReplCommand::Exit
    } else if command == "/reset" {
        ReplCommand::Reset
    } else {
        ReplCommand::Ask(line)
    }
}

fn spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner} {msg}")
    {
        spinner.set_style(style);
    }
    spinner.set_message("Searching the document...");
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Answer one question and return; a failure is passed back to the caller
pub async fn run_single_query<W: Write>(
    pipeline: &QueryPipeline,
    session: &mut ConversationSession,
    question: &str,
    out: &mut W,
) -> Result<()> {
    info!("Running single query");

    let spinner = spinner();
    let result = pipeline.ask(question, session).await;
    spinner.finish_and_clear();

    let answer = result.context("Failed to answer the question")?;
    print_answer(out, &answer).context("Failed to write answer")?;
    Ok(())
}

/// Read questions from `input` until `exit`, `quit` or end of input
pub async fn run_interactive_chat<R: BufRead, W: Write>(
    pipeline: &QueryPipeline,
    session: &mut ConversationSession,
    mut input: R,
    out: &mut W,
) -> Result<()> {
    print_welcome(out).context("Failed to write output")?;

    loop {
        print_prompt(out).context("Failed to flush output")?;

        let mut line = String::new();
        let read = input.read_line(&mut line).context("Failed to read input")?;
        if read == 0 {
            // End of input
            writeln!(out)?;
            print_goodbye(out)?;
            break;
        }

        match parse_line(&line) {
            ReplCommand::Exit => {
                print_goodbye(out)?;
                break;
            }
            ReplCommand::Reset => {
                let cleared = session.exchange_count();
                session.clear();
                debug!(session = %session.id, cleared, "Conversation reset");
                print_reset(out, cleared)?;
            }
            ReplCommand::Ask(question) => {
                debug!(session = %session.id, "Forwarding question to pipeline");
                let spinner = spinner();
                let result = pipeline.ask(question, session).await;
                spinner.finish_and_clear();

                match result {
                    Ok(answer) => print_answer(out, &answer)?,
                    // A failed question never ends the session
                    Err(e) => print_error(out, &e)?,
                }
            }
        }

        writeln!(out)?;
    }

    Ok(())
}
