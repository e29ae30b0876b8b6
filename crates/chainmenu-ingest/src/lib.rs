//! Fuzzy menu-name reconciliation engine.
//!
//! Given an operator-curated canonical target list and the noisy candidate
//! records a brand scraper harvested, this crate normalizes both sides,
//! scores every pair, assigns the best candidate per target, and merges
//! accepted matches into storage with idempotent create-or-update
//! semantics. One run produces exactly one ingest log row.

pub mod config;
pub mod matcher;
pub mod normalize;
pub mod runner;
pub mod scheduler;
pub mod score;

pub use config::AppConfig;
pub use matcher::{assign, MatchOutcome, TargetMatch};
pub use normalize::normalize;
pub use runner::{IngestError, IngestRunner};
pub use scheduler::maybe_start_scheduler;
pub use score::score;

pub const CRATE_NAME: &str = "chainmenu-ingest";
