//! Node query engine.
//!
//! Compiles selector strings (see [`query_selectors`]) into chains of
//! retrieval strategies and matchers, runs them against any tree exposed
//! through [`NodeAdapter`], and merges comma groups into one duplicate-free
//! result. Hosts that can match selectors themselves expose a
//! [`NativeMatcher`]; the engine tries it first for compatible selectors and
//! falls back to its own interpreter whenever the host refuses.
//!
//! ```text
//! selector ──split──▶ groups ──parse──▶ QueryParts ──compile──▶ (strategy, matcher)*
//!                                                                   │
//!           merge ◀── per-group results ◀── execute against context ◀┘
//! ```

mod adapter;
mod cache;
mod config;
mod engine;
mod error;
mod matcher;
mod merge;
mod native;
mod pseudo;
mod strategy;
#[cfg(test)]
mod test_tree;
pub mod traverse;

pub use adapter::{Capabilities, NativeMatcher, NodeAdapter};
pub use cache::CacheStats;
pub use config::EngineConfig;
pub use engine::SelectorEngine;
pub use error::{SelectError, UnsupportedSelector};
pub use matcher::{Criterion, Ignore, Matcher, MatcherCompiler};
pub use merge::{DedupToken, DedupTokens, merge_unique};
pub use native::{NativePlan, is_native_compatible};
pub use pseudo::{NthExpr, PseudoFactory, PseudoPredicate, PseudoRegistry};
pub use query_selectors;
pub use strategy::{CompiledPart, Relation, RetrievalStrategy};
