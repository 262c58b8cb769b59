//! Structural analysis of interaction and projection graphs.
//!
//! [`analyze_echo_chamber`] reads the projected user graph (components,
//! density, weighted clustering, weight distribution). The remaining
//! functions work on the directed interaction graph: degree and path
//! centralities, Freeman centralization, degree distributions, greedy
//! modularity communities, and the network value laws.

mod centrality;
mod community;
mod echo_chamber;
mod structure;
mod value;

pub use centrality::{
    betweenness_centrality, closeness_centrality, degree_centrality,
    normalized_degree_centrality, top_influencers, DegreeCentrality,
};
pub use community::{summarize_communities, CommunitySummary, GreedyModularity};
pub use echo_chamber::{
    analyze_echo_chamber, ClusteringEstimate, EchoChamberConfig, EchoChamberReport, WeightStats,
};
pub use structure::{
    degree_distribution, directed_density, freeman_centralization, interpret_centralization,
    interpret_density, DegreeKind,
};
pub use value::{metcalfe_value, reed_value, sarnoff_value};
