//! docvec CLI.
//!
//! One-shot operator commands over the configured gateways: run a
//! similarity query, trigger a backfill pass, or replay a file of change
//! events through the consumer.

use std::time::Duration;

use clap::{Parser, Subcommand};

use docvec_app::{AppConfig, AppState, BackfillRequest, SearchRequest};
use docvec_pipeline::TimeBudget;
use docvec_queue::{BatchReport, ChangeEvent, QueueRecord, RecordBatch};

#[derive(Parser)]
#[command(
    name = "docvec",
    about = "Document embedding backfill and vector query service"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rank stored documents against a free-text query.
    Search {
        /// Query text.
        query: String,
    },

    /// Select candidate documents and fan them into the queue.
    Backfill {
        /// Candidate read limit (positive integer).
        #[arg(long)]
        count: Option<i64>,
    },

    /// Replay change events from a JSON file through the consumer.
    Replay {
        /// Path to a JSON array of change events.
        #[arg(long)]
        events: std::path::PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    let state = AppState::new(config);

    match cli.command {
        Command::Search { query } => {
            let hits = state
                .handle_search(SearchRequest { query: Some(query) })
                .await?;
            println!("{}", serde_json::to_string_pretty(&hits)?);
        }
        Command::Backfill { count } => {
            let summary = state.handle_backfill(BackfillRequest { count }).await?;
            println!("{}", serde_json::to_string(&summary)?);
        }
        Command::Replay { events } => {
            let raw = tokio::fs::read_to_string(&events).await?;
            let events: Vec<ChangeEvent> = serde_json::from_str(&raw)?;

            let batch_size = state.config().pipeline.batch_size;
            let window = Duration::from_secs(state.config().visibility_timeout_secs);

            let mut records = Vec::with_capacity(events.len());
            for (index, event) in events.iter().enumerate() {
                records.push(QueueRecord::new(
                    format!("replay-{index}"),
                    serde_json::to_string(event)?,
                ));
            }

            let mut failed_message_ids = Vec::new();
            for chunk in records.chunks(batch_size) {
                let batch = RecordBatch::new(chunk.to_vec());
                let report = state
                    .handle_record_batch(&batch, TimeBudget::starting_now(window))
                    .await;
                failed_message_ids.extend(report.failed_message_ids);
            }

            let report = BatchReport { failed_message_ids };
            println!("{}", serde_json::to_string(&report)?);
        }
    }

    state.shutdown().await;
    Ok(())
}
