use anyhow::Context;
use clap::Parser;
use docqa_core::DocQaConfig;
use docqa_pipeline::{ConversationSession, QueryPipeline};
use std::io;
use tracing::info;

mod app;
mod cli;
mod logging;
mod output;

use crate::cli::Args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Credentials usually live in a .env next to the binary
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let config = DocQaConfig::load(args.config.as_deref())
        .context("Failed to load configuration")?
        .merge(&args.overrides());

    logging::init(&config, args.verbose);

    // Clients are built once here and reused for every question
    let pipeline = QueryPipeline::from_config(&config)
        .await
        .context("Failed to start the query pipeline")?;

    let mut session = ConversationSession::new();
    info!(session = %session.id, "Session started");

    let mut stdout = io::stdout();
    match args.question.as_deref() {
        Some(question) => {
            app::run_single_query(&pipeline, &mut session, question, &mut stdout).await
        }
        None => {
            app::run_interactive_chat(&pipeline, &mut session, io::stdin().lock(), &mut stdout)
                .await
        }
    }
}
