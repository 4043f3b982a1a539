use colored::*;
use docqa_pipeline::RagError;
use std::io::{self, Write};

pub const PROMPT: &str = "Ask me anything--> ";

/// Print the answer to one question
pub fn print_answer<W: Write>(out: &mut W, answer: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "Answer:".blue().bold())?;
    writeln!(out, "{}", answer.trim_end())
}

/// Report a failed question; the session carries on
pub fn print_error<W: Write>(out: &mut W, error: &RagError) -> io::Result<()> {
    let label = if error.is_invalid_input() {
        "Invalid question:"
    } else {
        "Error:"
    };
    writeln!(out, "{} {}", label.red().bold(), error)
}

pub fn print_prompt<W: Write>(out: &mut W) -> io::Result<()> {
    write!(out, "{}", PROMPT.green().bold())?;
    out.flush()
}

pub fn print_welcome<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", "Ask questions about the indexed document.".cyan())?;
    writeln!(
        out,
        "Type 'exit' or 'quit' to leave, '/reset' to start a new conversation."
    )?;
    writeln!(out)
}

pub fn print_reset<W: Write>(out: &mut W, cleared: usize) -> io::Result<()> {
    writeln!(
        out,
        "{}",
        format!("Started a new conversation ({} exchanges cleared).", cleared).yellow()
    )
}

pub fn print_goodbye<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", "Exiting. Have a great day!".green())
}
