//! Bipartite user-post projection.
//!
//! The pipeline turns a membership relation ("user u commented on post q")
//! into a weighted user-user graph in three stages:
//!
//! 1. [`IncidenceMatrix::build`] materializes the relation as a dense 0/1
//!    user × post matrix with fixed row and column orderings.
//! 2. [`SharedPostMatrix::from_incidence`] multiplies the incidence matrix by
//!    its own transpose. Entry (i, j) of the product counts the posts users
//!    i and j both commented on; the diagonal counts each user's own posts.
//! 3. [`threshold_graph`] keeps the pairs sharing at least `k` posts as
//!    weighted undirected edges.
//!
//! ## Why a matrix product
//!
//! The naive projection walks every user pair and intersects their post
//! sets, which is O(n² · p). Expressing the relation as an incidence matrix
//! `I` reduces the whole projection to `S = I · Iᵗ`, one dense integer
//! multiply, and the full `S` doubles as an exportable artifact.
//!
//! Every stage consumes an immutable input and produces a new value, so
//! rerunning the pipeline on the same membership and threshold yields an
//! identical graph. The dense representation is the scalability ceiling:
//! `S` is O(n²) cells, which is why both matrix builders take an explicit
//! cell budget and fail with `ResourceExhausted` instead of attempting the
//! allocation.
//!
//! ## Usage
//!
//! ```rust
//! use echograph::projection::{project, Membership, ProjectionConfig};
//!
//! let mut membership = Membership::new(
//!     vec!["alice".into(), "bob".into(), "carol".into()],
//!     vec!["gme-dd".into(), "yolo-update".into()],
//! );
//! membership.push("alice", "gme-dd");
//! membership.push("alice", "yolo-update");
//! membership.push("bob", "gme-dd");
//! membership.push("bob", "yolo-update");
//! membership.push("carol", "yolo-update");
//!
//! let config = ProjectionConfig {
//!     k_threshold: 2,
//!     ..Default::default()
//! };
//! let projection = project(&membership, &config).unwrap();
//!
//! // Only alice and bob share two posts.
//! assert_eq!(projection.graph.edge_count(), 1);
//! assert_eq!(projection.info.max_shared_posts, 2);
//! ```

mod cooccurrence;
mod filter;
mod incidence;

#[cfg(feature = "export")]
mod export;

pub use cooccurrence::SharedPostMatrix;
pub use filter::threshold_graph;
pub use incidence::IncidenceMatrix;

#[cfg(feature = "export")]
pub use export::{read_shared_matrix, write_shared_matrix, write_user_index};

use petgraph::graph::UnGraph;

use crate::error::Result;

/// Bipartite membership relation: which users commented on which posts.
///
/// Users and posts are declared up front. Row and column indices of the
/// derived matrices follow the declaration order, so the same `Membership`
/// always produces the same matrix layout and user identity stays
/// recoverable by index. Pairs may repeat; the incidence matrix clamps them
/// to presence/absence.
#[derive(Debug, Clone, Default)]
pub struct Membership {
    users: Vec<String>,
    posts: Vec<String>,
    pairs: Vec<(String, String)>,
}

impl Membership {
    /// Declare the user and post sets of the relation.
    pub fn new(users: Vec<String>, posts: Vec<String>) -> Self {
        Self {
            users,
            posts,
            pairs: Vec::new(),
        }
    }

    /// Record that `user` commented on `post`.
    ///
    /// Labels are validated against the declared sets when the incidence
    /// matrix is built, not here.
    pub fn push(&mut self, user: impl Into<String>, post: impl Into<String>) {
        self.pairs.push((user.into(), post.into()));
    }

    /// Declared users, in row order.
    pub fn users(&self) -> &[String] {
        &self.users
    }

    /// Declared posts, in column order.
    pub fn posts(&self) -> &[String] {
        &self.posts
    }

    /// Recorded (user, post) pairs, including any duplicates.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Number of declared users.
    pub fn n_users(&self) -> usize {
        self.users.len()
    }

    /// Number of declared posts.
    pub fn n_posts(&self) -> usize {
        self.posts.len()
    }
}

/// Configuration for one projection run.
#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    /// Minimum shared posts for a user pair to become an edge.
    pub k_threshold: usize,
    /// Ceiling on dense matrix cells, checked against both the n × p
    /// incidence matrix and the n × n co-occurrence matrix.
    pub max_dense_cells: usize,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            k_threshold: 2,
            max_dense_cells: 100_000_000,
        }
    }
}

/// Everything a projection run produces.
#[derive(Debug, Clone)]
pub struct Projection {
    /// Users sharing at least `k_threshold` posts; edge weight is the
    /// shared-post count. Every user is a node, connected or not.
    pub graph: UnGraph<String, u32>,
    /// Full dense co-occurrence matrix, untouched by the threshold.
    pub shared: SharedPostMatrix,
    /// Statistics of the run.
    pub info: ProjectionInfo,
}

/// Statistics describing a projection run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "export", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectionInfo {
    /// Users in the relation.
    pub n_users: usize,
    /// Posts in the relation.
    pub n_posts: usize,
    /// Threshold the graph was filtered with.
    pub k_threshold: usize,
    /// Distinct (user, post) memberships after clamping.
    pub total_memberships: u64,
    /// Edges surviving the threshold.
    pub edges_created: usize,
    /// `n · (n − 1) / 2`.
    pub possible_edges: usize,
    /// `edges_created / possible_edges`.
    pub density: f64,
    /// Mean of the co-occurrence diagonal.
    pub avg_posts_per_user: f64,
    /// Largest off-diagonal shared count.
    pub max_shared_posts: u32,
}

/// Run the full projection pipeline on a membership relation.
///
/// # Errors
///
/// Propagates [`Error::UnknownUser`] / [`Error::UnknownPost`] from the
/// incidence builder, [`Error::ResourceExhausted`] from either matrix stage,
/// and [`Error::InvalidThreshold`] from the filter.
///
/// [`Error::UnknownUser`]: crate::error::Error::UnknownUser
/// [`Error::UnknownPost`]: crate::error::Error::UnknownPost
/// [`Error::ResourceExhausted`]: crate::error::Error::ResourceExhausted
/// [`Error::InvalidThreshold`]: crate::error::Error::InvalidThreshold
pub fn project(membership: &Membership, config: &ProjectionConfig) -> Result<Projection> {
    let incidence = IncidenceMatrix::build(membership, config.max_dense_cells)?;
    let shared = SharedPostMatrix::from_incidence(&incidence, config.max_dense_cells)?;
    let graph = threshold_graph(&shared, config.k_threshold)?;

    let n = shared.n_users();
    let possible_edges = if n > 1 { n * (n - 1) / 2 } else { 0 };
    let edges_created = graph.edge_count();
    let post_counts = shared.post_counts();
    let avg_posts_per_user = if n > 0 {
        post_counts.iter().map(|&c| c as f64).sum::<f64>() / n as f64
    } else {
        0.0
    };

    let info = ProjectionInfo {
        n_users: n,
        n_posts: incidence.n_posts(),
        k_threshold: config.k_threshold,
        total_memberships: incidence.total_memberships(),
        edges_created,
        possible_edges,
        density: if possible_edges > 0 {
            edges_created as f64 / possible_edges as f64
        } else {
            0.0
        },
        avg_posts_per_user,
        max_shared_posts: shared.max_shared(),
    };

    Ok(Projection {
        graph,
        shared,
        info,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_project_reports_info() {
        let mut membership = Membership::new(labels(&["a", "b"]), labels(&["p", "q"]));
        membership.push("a", "p");
        membership.push("a", "q");
        membership.push("b", "p");

        let projection = project(&membership, &ProjectionConfig::default()).unwrap();
        assert_eq!(projection.info.n_users, 2);
        assert_eq!(projection.info.n_posts, 2);
        assert_eq!(projection.info.total_memberships, 3);
        assert_eq!(projection.info.possible_edges, 1);
        // One shared post, default k = 2: nothing survives.
        assert_eq!(projection.info.edges_created, 0);
        assert_eq!(projection.info.max_shared_posts, 1);
    }

    #[test]
    fn test_project_empty_relation() {
        let membership = Membership::default();
        let projection = project(&membership, &ProjectionConfig::default()).unwrap();
        assert_eq!(projection.graph.node_count(), 0);
        assert_eq!(projection.info.density, 0.0);
        assert_eq!(projection.info.avg_posts_per_user, 0.0);
    }
}
