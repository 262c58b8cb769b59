//! Structure metrics for the directed interaction graph.

use std::collections::HashMap;

use petgraph::graph::DiGraph;
use petgraph::Direction;

/// Which degree a score is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegreeKind {
    /// Incoming edges only.
    In,
    /// Outgoing edges only.
    Out,
    /// Both directions.
    Total,
}

/// Density of a directed graph: `m / (n · (n − 1))`.
pub fn directed_density<N, E>(graph: &DiGraph<N, E>) -> f64 {
    let n = graph.node_count();
    if n < 2 {
        return 0.0;
    }
    graph.edge_count() as f64 / (n * (n - 1)) as f64
}

/// Freeman centralization of the degree distribution.
///
/// `Σ(C_max − C_i) / ((n − 1)(n − 2))`. 0 means every node has the same
/// degree, 1 is a perfect star.
pub fn freeman_centralization<N, E>(graph: &DiGraph<N, E>, kind: DegreeKind) -> f64 {
    let n = graph.node_count();
    let denom = n.saturating_sub(1) * n.saturating_sub(2);
    if denom == 0 {
        return 0.0;
    }

    let degrees: Vec<usize> = graph
        .node_indices()
        .map(|v| match kind {
            DegreeKind::In => graph.edges_directed(v, Direction::Incoming).count(),
            DegreeKind::Out => graph.edges_directed(v, Direction::Outgoing).count(),
            DegreeKind::Total => {
                graph.edges_directed(v, Direction::Incoming).count()
                    + graph.edges_directed(v, Direction::Outgoing).count()
            }
        })
        .collect();

    let max = degrees.iter().copied().max().unwrap_or(0);
    let sum: usize = degrees.iter().map(|&d| max - d).sum();
    sum as f64 / denom as f64
}

/// Qualitative label for a centralization score.
pub fn interpret_centralization(score: f64) -> &'static str {
    if score > 0.6 {
        "highly centralized: leader-driven"
    } else if score > 0.4 {
        "moderately centralized: hybrid structure"
    } else if score > 0.2 {
        "somewhat centralized: leaders and grassroots"
    } else {
        "decentralized: grassroots movement"
    }
}

/// Qualitative label for a density score.
///
/// The sparse cutoffs scale with network size, since density falls with n
/// even in healthy communities.
pub fn interpret_density(density: f64, n_nodes: usize) -> &'static str {
    let expected_low = if n_nodes > 0 {
        1.0 / n_nodes as f64
    } else {
        0.0
    };
    if density > 0.1 {
        "dense: tight-knit community"
    } else if density > 0.01 {
        "moderate: connected but not tight"
    } else if density > expected_low * 2.0 {
        "sparse: loose community structure"
    } else {
        "very sparse: highly fragmented"
    }
}

/// Count nodes at each total degree, for degree-distribution inspection.
pub fn degree_distribution<N, E>(graph: &DiGraph<N, E>) -> HashMap<usize, usize> {
    let mut counts = HashMap::new();
    for v in graph.node_indices() {
        let degree = graph.edges_directed(v, Direction::Incoming).count()
            + graph.edges_directed(v, Direction::Outgoing).count();
        *counts.entry(degree).or_insert(0) += 1;
    }
    counts
}
