use clap::Parser;
use docqa_core::DocQaConfig;
use std::path::PathBuf;

/// Ask questions about an indexed PDF document
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Ask a single question and exit instead of starting the interactive prompt
    #[arg(index = 1)]
    pub question: Option<String>,

    /// Path to a TOML config file (default: ~/.config/docqa/config.toml)
    #[arg(short, long, env = "DOCQA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Number of chunks to retrieve per question
    #[arg(long)]
    pub top_k: Option<usize>,

    /// Deadline in seconds for each external call, 0 disables it
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Upper bound on the assembled context, in characters
    #[arg(long)]
    pub max_context_chars: Option<usize>,
}

impl Args {
    /// Settings given on the command line, to merge over file and environment
    pub fn overrides(&self) -> DocQaConfig {
        DocQaConfig {
            top_k: self.top_k,
            request_timeout_secs: self.timeout,
            max_context_chars: self.max_context_chars,
            ..DocQaConfig::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_become_overrides() {
        let args = Args::parse_from(["docqa", "--top-k", "5", "--timeout", "0", "What is a heap?"]);

        assert_eq!(args.question.as_deref(), Some("What is a heap?"));
        let overrides = args.overrides();
        assert_eq!(overrides.top_k, Some(5));
        assert_eq!(overrides.request_timeout_secs, Some(0));
        assert_eq!(overrides.gemini_api_key, None);
    }

    #[test]
    fn test_no_flags_override_nothing() {
        let args = Args::parse_from(["docqa"]);
        assert!(args.question.is_none());
        assert_eq!(args.overrides(), DocQaConfig::empty());
    }
}
