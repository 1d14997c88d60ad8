//! SupportBot CLI - serve the FAQ bot or try it from the terminal
//!
//! # Commands
//!
//! ```bash
//! # Serve the HTTP API and chat page
//! supportbot serve --document data/faq.txt --bind 0.0.0.0:5002
//!
//! # Batch demo with simulated feedback
//! supportbot run "How do I reset my password?" "What's the refund policy?"
//!
//! # One question
//! supportbot ask "How do I reset my password?"
//!
//! # Show how the document is split
//! supportbot sections --document data/faq.txt
//! ```

use std::fs::File;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use supportbot_lib::{
    api::{self, AppState, DynPipeline},
    document::DocumentStore,
    embed::MiniLmEmbedder,
    extract::{Extractor, HfExtractor, DEFAULT_QA_ENDPOINT, DEFAULT_QA_MODEL},
    feedback::{FeedbackLoop, RandomFeedback},
    pipeline::{AnswerPipeline, Thresholds, CONFIDENCE_THRESHOLD, SIMILARITY_THRESHOLD},
    retrieve::{Retriever, SectionRetriever},
    store::MemoryStore,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const SAMPLE_QUERIES: [&str; 3] = [
    "How do I reset my password?",
    "What's the refund policy?",
    "How do I fly to the moon?",
];

const DEFAULT_LOG_FILE: &str = "support_bot_log.txt";

const RULE: &str = "─────────────────────────────────";

#[derive(Parser)]
#[command(name = "supportbot")]
#[command(about = "Answer questions from an FAQ document")]
#[command(version)]
struct Cli {
    /// Log file, truncated on start
    #[arg(
        long,
        global = true,
        env = "SUPPORTBOT_LOG_FILE",
        default_value = DEFAULT_LOG_FILE
    )]
    log_file: PathBuf,

    /// Log to stderr instead of the log file
    #[arg(long, global = true)]
    log_stderr: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        #[command(flatten)]
        bot: BotArgs,

        /// Address to bind the HTTP server to (host:port)
        #[arg(long, env = "SUPPORTBOT_BIND", default_value = "0.0.0.0:5002")]
        bind: String,
    },

    /// Run queries through the bot with simulated feedback
    Run {
        #[command(flatten)]
        bot: BotArgs,

        /// Queries to ask (defaults to a few samples)
        queries: Vec<String>,

        /// Seed for the simulated feedback
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Ask a single question
    Ask {
        #[command(flatten)]
        bot: BotArgs,

        /// The question
        query: String,
    },

    /// Split the document into sections and show them
    Sections {
        /// FAQ document, paragraphs separated by a blank line
        #[arg(long, env = "SUPPORTBOT_DOCUMENT", default_value = "data/faq.txt")]
        document: PathBuf,
    },
}

#[derive(Args)]
struct BotArgs {
    /// FAQ document, paragraphs separated by a blank line
    #[arg(long, env = "SUPPORTBOT_DOCUMENT", default_value = "data/faq.txt")]
    document: PathBuf,

    /// Minimum section similarity before asking the QA model
    #[arg(long, env = "SUPPORTBOT_SIMILARITY_THRESHOLD", default_value_t = SIMILARITY_THRESHOLD)]
    similarity_threshold: f32,

    /// Minimum QA confidence before returning its answer
    #[arg(long, env = "SUPPORTBOT_CONFIDENCE_THRESHOLD", default_value_t = CONFIDENCE_THRESHOLD)]
    confidence_threshold: f32,

    /// Base URL of the question-answering inference service
    #[arg(long, env = "SUPPORTBOT_QA_ENDPOINT", default_value = DEFAULT_QA_ENDPOINT)]
    qa_endpoint: String,

    /// Question-answering model identifier
    #[arg(long, env = "SUPPORTBOT_QA_MODEL", default_value = DEFAULT_QA_MODEL)]
    qa_model: String,

    /// Bearer token for the inference service
    #[arg(long, env = "SUPPORTBOT_QA_TOKEN", hide_env_values = true)]
    qa_token: Option<String>,

    /// Seconds before QA requests time out
    #[arg(long, env = "SUPPORTBOT_QA_TIMEOUT_SECS", default_value_t = 30)]
    qa_timeout_secs: u64,
}

impl BotArgs {
    fn thresholds(&self) -> Thresholds {
        Thresholds {
            similarity: self.similarity_threshold,
            confidence: self.confidence_threshold,
        }
    }

    /// Load the document, embed it and connect the QA model.
    fn build_pipeline(&self) -> Result<DynPipeline> {
        info!("Initializing support bot...");
        let documents = DocumentStore::open(&self.document)
            .with_context(|| format!("failed to load {}", self.document.display()))?;

        println!("Loading MiniLM model (first run downloads ~90MB)...");
        let embedder = MiniLmEmbedder::new()?;
        let retriever = Retriever::from_document(embedder, MemoryStore::new(), &documents)?;

        let extractor = HfExtractor::new(
            &self.qa_endpoint,
            &self.qa_model,
            self.qa_token.as_deref(),
            Duration::from_secs(self.qa_timeout_secs.max(1)),
        )?;

        let retriever: Box<dyn SectionRetriever> = Box::new(retriever);
        let extractor: Box<dyn Extractor> = Box::new(extractor);
        println!("Bot initialized with {} sections.", documents.len());
        Ok(AnswerPipeline::with_thresholds(
            retriever,
            extractor,
            self.thresholds(),
        ))
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging((!cli.log_stderr).then_some(cli.log_file.as_path()))?;

    match cli.command {
        Commands::Serve { bot, bind } => {
            let addr: SocketAddr = bind
                .parse()
                .with_context(|| format!("invalid bind address {bind}"))?;
            // built before the runtime starts: the QA client is blocking
            let state = AppState::new(bot.build_pipeline()?);

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(api::serve(addr, state.clone()))?;
        }

        Commands::Run {
            bot,
            queries,
            seed,
        } => {
            let mut pipeline = bot.build_pipeline()?;
            let queries: Vec<String> = if queries.is_empty() {
                SAMPLE_QUERIES.iter().map(|q| q.to_string()).collect()
            } else {
                queries
            };
            let source = seed.map_or_else(RandomFeedback::new, RandomFeedback::with_seed);
            let mut feedback = FeedbackLoop::new(source);

            for query in &queries {
                println!("\n{RULE}\nQuery: '{query}'");
                let transcript = feedback.process(&mut pipeline, query)?;
                println!("Initial Response: {}", transcript.initial);
                if let Some(label) = transcript.feedback {
                    println!("Simulated Feedback: '{label}'");
                }
                if let Some(adjusted) = &transcript.adjusted {
                    println!("Adjusted Response (Attempt 1): {adjusted}");
                }
            }
            println!("\n{RULE}");
            println!("\nRun complete.");
        }

        Commands::Ask { bot, query } => {
            let mut pipeline = bot.build_pipeline()?;
            let outcome = pipeline.answer(&query)?;

            println!("\n{}", outcome.response);
            println!(
                "\n(section {}, similarity {:.4}, verdict {:?})",
                outcome.retrieval.section.position(),
                outcome.retrieval.score,
                outcome.verdict
            );
            if let Some(answer) = &outcome.answer {
                println!("(QA confidence {:.2})", answer.confidence);
            }
        }

        Commands::Sections { document } => {
            let documents = DocumentStore::open(&document)
                .with_context(|| format!("failed to load {}", document.display()))?;

            println!(
                "Split '{}' into {} sections:\n",
                document.display(),
                documents.len()
            );
            for section in documents.sections() {
                println!(
                    "--- Section {} ({}B, id: {}) ---",
                    section.position(),
                    section.content.len(),
                    &section.id[..section.id.len().min(8)]
                );
                // Show preview (first 200 chars)
                let preview: String = section.content.chars().take(200).collect();
                let ellipsis = if section.content.chars().count() > 200 { "..." } else { "" };
                println!("{preview}{ellipsis}\n");
            }
        }
    }

    Ok(())
}
