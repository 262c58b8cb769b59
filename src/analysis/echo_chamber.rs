//! Structural descriptors of the projected user graph.
//!
//! The "echo chamber" reading of a projection rests on a handful of
//! numbers: how much of the population sits in one connected component, how
//! dense the surviving graph is, and how clustered the giant component is.
//! The weighted clustering coefficient follows the geometric-mean local
//! formula (Onnela et al. 2005), with edge weights normalized by the
//! largest weight in the component. Clustering is super-linear in component
//! size, so the analyzer skips it above a configurable node ceiling rather
//! than stalling on a large component.

use std::collections::HashMap;

use petgraph::graph::UnGraph;
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;

use crate::error::{Error, Result};

/// Configuration for the echo-chamber analyzer.
#[derive(Debug, Clone)]
pub struct EchoChamberConfig {
    /// Skip the clustering coefficient when the giant component has more
    /// nodes than this.
    pub clustering_ceiling: usize,
}

impl Default for EchoChamberConfig {
    fn default() -> Self {
        Self {
            clustering_ceiling: 1000,
        }
    }
}

/// Weighted clustering outcome for the giant component.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "export", derive(serde::Serialize, serde::Deserialize))]
pub enum ClusteringEstimate {
    /// Average weighted clustering coefficient over the component.
    Computed(f64),
    /// Component exceeded the configured ceiling.
    Skipped {
        /// Nodes in the component that was skipped.
        nodes: usize,
    },
}

/// Summary of the surviving edge weights.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "export", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightStats {
    /// Mean shared-post count.
    pub mean: f64,
    /// Median shared-post count.
    pub median: f64,
    /// Largest shared-post count.
    pub max: u32,
}

/// Structural report over a projected graph.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "export", derive(serde::Serialize, serde::Deserialize))]
pub struct EchoChamberReport {
    /// Nodes in the graph.
    pub n_nodes: usize,
    /// Edges in the graph.
    pub n_edges: usize,
    /// Connected components.
    pub n_components: usize,
    /// Component sizes, largest first.
    pub component_sizes: Vec<usize>,
    /// Size of the largest component.
    pub giant_size: usize,
    /// `giant_size / n_nodes`.
    pub giant_fraction: f64,
    /// `n_edges / (n · (n − 1) / 2)`, 0 for graphs too small to have edges.
    pub density: f64,
    /// `None` when the giant component has 2 nodes or fewer.
    pub clustering: Option<ClusteringEstimate>,
    /// Edge weight summary, zeros when the graph is edgeless.
    pub weight_stats: WeightStats,
}

/// Compute components, density, clustering, and weight statistics.
///
/// # Errors
///
/// [`Error::EmptyGraph`] when the graph has no nodes. An edgeless graph is
/// fine: density and the weight summary come back as zeros.
pub fn analyze_echo_chamber(
    graph: &UnGraph<String, u32>,
    config: &EchoChamberConfig,
) -> Result<EchoChamberReport> {
    let n = graph.node_count();
    if n == 0 {
        return Err(Error::EmptyGraph);
    }

    // Union-find over the edge list, then group nodes by root.
    let mut uf = UnionFind::new(n);
    for edge in graph.edge_references() {
        uf.union(edge.source().index(), edge.target().index());
    }
    let mut size_by_root: HashMap<usize, usize> = HashMap::new();
    for node in 0..n {
        *size_by_root.entry(uf.find(node)).or_insert(0) += 1;
    }

    let mut component_sizes: Vec<usize> = size_by_root.values().copied().collect();
    component_sizes.sort_unstable_by(|a, b| b.cmp(a));
    let giant_size = component_sizes.first().copied().unwrap_or(0);
    let giant_root = size_by_root
        .iter()
        .max_by_key(|&(root, &size)| (size, std::cmp::Reverse(*root)))
        .map(|(&root, _)| root)
        .unwrap_or(0);

    let m = graph.edge_count();
    let possible = if n > 1 { n * (n - 1) / 2 } else { 0 };
    let density = if possible > 0 {
        m as f64 / possible as f64
    } else {
        0.0
    };

    let mut weights: Vec<u32> = graph.edge_references().map(|e| *e.weight()).collect();
    weights.sort_unstable();
    let weight_stats = summarize_weights(&weights);

    let clustering = if giant_size <= 2 {
        None
    } else if giant_size > config.clustering_ceiling {
        Some(ClusteringEstimate::Skipped { nodes: giant_size })
    } else {
        Some(ClusteringEstimate::Computed(weighted_average_clustering(
            graph, &uf, giant_root, giant_size,
        )))
    };

    Ok(EchoChamberReport {
        n_nodes: n,
        n_edges: m,
        n_components: component_sizes.len(),
        giant_fraction: giant_size as f64 / n as f64,
        giant_size,
        component_sizes,
        density,
        clustering,
        weight_stats,
    })
}

fn summarize_weights(sorted: &[u32]) -> WeightStats {
    if sorted.is_empty() {
        return WeightStats {
            mean: 0.0,
            median: 0.0,
            max: 0,
        };
    }
    let sum: u64 = sorted.iter().map(|&w| w as u64).sum();
    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0
    } else {
        sorted[mid] as f64
    };
    WeightStats {
        mean: sum as f64 / sorted.len() as f64,
        median,
        max: sorted.last().copied().unwrap_or(0),
    }
}

/// Average weighted clustering over one component.
///
/// Local coefficient per node u: sum over neighbor pairs (v, w) with a
/// closing edge of `(ŵ_uv · ŵ_uw · ŵ_vw)^(1/3)`, divided by
/// `deg(u) · (deg(u) − 1) / 2`, where ŵ is the weight divided by the
/// component's maximum. Nodes with fewer than two neighbors contribute 0.
fn weighted_average_clustering(
    graph: &UnGraph<String, u32>,
    uf: &UnionFind<usize>,
    root: usize,
    member_count: usize,
) -> f64 {
    let mut max_weight = 0u32;
    for edge in graph.edge_references() {
        if uf.find(edge.source().index()) == root {
            max_weight = max_weight.max(*edge.weight());
        }
    }
    if max_weight == 0 {
        return 0.0;
    }

    let mut adjacency: HashMap<usize, HashMap<usize, f64>> = HashMap::new();
    for edge in graph.edge_references() {
        let a = edge.source().index();
        let b = edge.target().index();
        if uf.find(a) != root {
            continue;
        }
        let normalized = *edge.weight() as f64 / max_weight as f64;
        adjacency.entry(a).or_default().insert(b, normalized);
        adjacency.entry(b).or_default().insert(a, normalized);
    }

    let empty = HashMap::new();
    let mut total = 0.0;
    for node in 0..graph.node_count() {
        if uf.find(node) != root {
            continue;
        }
        let neighbors = adjacency.get(&node).unwrap_or(&empty);
        let degree = neighbors.len();
        if degree < 2 {
            continue;
        }
        let ids: Vec<usize> = neighbors.keys().copied().collect();
        let mut triangles = 0.0;
        for (offset, &v) in ids.iter().enumerate() {
            for &w in &ids[offset + 1..] {
                if let Some(&closing) = adjacency.get(&v).and_then(|m| m.get(&w)) {
                    triangles += (neighbors[&v] * neighbors[&w] * closing).cbrt();
                }
            }
        }
        total += 2.0 * triangles / (degree as f64 * (degree - 1) as f64);
    }

    total / member_count as f64
}
