//! # leafwise-core
//!
//! Information resolution engine for plant conditions. Given an entity name
//! like "Apple Scab Leaf" (and optionally image bytes), the engine consults
//! an ordered chain of providers and returns one normalized five-field
//! record: description, causes, effects, solutions, prevention.
//!
//! ## Architecture
//!
//! - **terms**: expands entity names into ordered lookup terms
//! - **providers**: adapters over Gemini, Google Custom Search, Wikipedia,
//!   PlantNet, and the local knowledge base, behind one trait
//! - **parse**: turns provider free text into normalized record fields
//! - **knowledge**: the embedded offline fallback table
//! - **resolve**: the fallback orchestration tying it all together
//!
//! ## Example
//!
//! ```no_run
//! use leafwise_core::{Config, ResolutionEngine};
//!
//! # async fn run() -> leafwise_core::Result<()> {
//! let config = Config::load()?;
//! let engine = ResolutionEngine::from_config(&config)?;
//! let record = engine.resolve("Apple Scab Leaf", None).await;
//! println!("{} (via {})", record.description, record.source);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod knowledge;
pub mod parse;
pub mod providers;
pub mod record;
pub mod resolve;
pub mod terms;

pub use config::{Config, ProviderCredentials};
pub use error::{LeafwiseError, Result};
pub use knowledge::{KnowledgeBase, KnowledgeEntry};
pub use parse::{parse_free_text, ParsedText, TextShape};
pub use providers::{InfoProvider, LookupQuery, RawContent};
pub use record::{InformationRecord, Variant};
pub use resolve::ResolutionEngine;
pub use terms::{QueryTermGenerator, SynonymTable};

/// Directory name under the platform config dir
pub const CONFIG_DIR_NAME: &str = "leafwise";
