//! # echograph
//!
//! Simulation and structural analysis of a discussion network shaped like
//! r/WallStreetBets during the January 2021 squeeze. The centerpiece is the
//! bipartite projection pipeline: a user-post membership relation becomes a
//! dense incidence matrix, one integer matrix product (`S = I · Iᵗ`) yields
//! the shared-post counts for every user pair, and a minimum-shared-posts
//! threshold decides which pairs become edges of the weighted user-user
//! graph. The echo-chamber analyzer then reads that graph: connected
//! components, giant component share, density, weighted clustering.
//!
//! ## Pipeline
//!
//! ```text
//! Membership → IncidenceMatrix → SharedPostMatrix → UnGraph → EchoChamberReport
//!                (n × p, 0/1)       (n × n, S = I·Iᵗ)   (k-filtered)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use echograph::{analyze_echo_chamber, project, EchoChamberConfig,
//!     Membership, ProjectionConfig};
//!
//! let mut membership = Membership::new(
//!     vec!["alice".into(), "bob".into()],
//!     vec!["thread-1".into(), "thread-2".into()],
//! );
//! membership.push("alice", "thread-1");
//! membership.push("alice", "thread-2");
//! membership.push("bob", "thread-1");
//! membership.push("bob", "thread-2");
//!
//! let config = ProjectionConfig { k_threshold: 2, ..Default::default() };
//! let projection = project(&membership, &config).unwrap();
//! assert_eq!(projection.graph.edge_count(), 1);
//!
//! let report = analyze_echo_chamber(&projection.graph, &EchoChamberConfig::default()).unwrap();
//! assert_eq!(report.giant_size, 2);
//! assert!((report.giant_fraction - 1.0).abs() < 1e-12);
//! ```
//!
//! ## Features
//!
//! - `synthetic` (default): the scale-free network generator, the posting
//!   model, and the tit-for-tat cooperation simulation.
//! - `export` (default): binary serialization of the co-occurrence matrix
//!   and serde derives on the report types.

pub mod analysis;
pub mod error;
pub mod projection;

#[cfg(feature = "synthetic")]
pub mod dynamics;
#[cfg(feature = "synthetic")]
pub mod network;


pub use analysis::{
    analyze_echo_chamber, ClusteringEstimate, EchoChamberConfig, EchoChamberReport,
    GreedyModularity,
};
pub use error::{Error, Result};
pub use projection::{
    project, threshold_graph, IncidenceMatrix, Membership, Projection, ProjectionConfig,
    ProjectionInfo, SharedPostMatrix,
};

#[cfg(feature = "synthetic")]
pub use dynamics::{tipping_point, CooperationOutcome, TitForTat};
#[cfg(feature = "synthetic")]
pub use network::{InteractionNetwork, NetworkBuilder, PostingModel};
