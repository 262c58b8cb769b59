//! Synthetic discussion network generation.
//!
//! Two generators feed the rest of the crate: [`NetworkBuilder`] produces
//! the directed weighted reply graph, [`PostingModel`] simulates posting
//! behaviour on top of it and emits the bipartite membership relation the
//! projection pipeline consumes. Both are deterministic under a fixed seed.

mod bipartite;
mod builder;

pub use bipartite::PostingModel;
pub use builder::{default_key_figures, InteractionNetwork, NetworkBuilder, NetworkStats};
