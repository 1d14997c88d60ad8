//! SupportBot - FAQ answering over a single document
//!
//! # Architecture
//!
//! ```text
//! Document -> Sectionizer -> Embedder -> Store
//!                                          |
//! Query -> Embedder -> Retriever <---------+
//!                         |
//!                  [similarity >= 0.3]
//!                         |
//!                     Extractor
//!                         |
//!                  [confidence >= 0.1]
//!                         |
//!                      Answer
//! ```
//!
//! # Example
//!
//! ```ignore
//! use supportbot_lib::{
//!     document::DocumentStore, embed::MiniLmEmbedder, extract::HfExtractor,
//!     pipeline::AnswerPipeline, retrieve::Retriever, store::MemoryStore,
//! };
//!
//! let documents = DocumentStore::open("data/faq.txt")?;
//! let retriever = Retriever::from_document(MiniLmEmbedder::new()?, MemoryStore::new(), &documents)?;
//! let mut pipeline = AnswerPipeline::new(retriever, extractor);
//!
//! let outcome = pipeline.answer("How do I reset my password?")?;
//! println!("{}", outcome.response);
//! ```

pub mod api;
pub mod conversation;
pub mod document;
pub mod embed;
pub mod error;
pub mod extract;
pub mod feedback;
pub mod pipeline;
pub mod retrieve;
pub mod section;
pub mod store;

pub use error::{Error, Result};
