//! Synthetic interaction network construction.
//!
//! Builds a directed weighted reply graph shaped like the discussion
//! network around the January 2021 squeeze: a scale-free body of regular
//! users (Barabási-Albert preferential attachment) with a small set of
//! named key figures wired in afterwards, who draw far more replies than
//! they send.

use std::collections::HashMap;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use rand::prelude::*;

use crate::error::{Error, Result};

// Half-open reply weight ranges.
const MIN_WEIGHT: u32 = 1;
const MAX_WEIGHT_REGULAR: u32 = 20;
const MAX_WEIGHT_TO_FIGURE: u32 = 50;
const MIN_WEIGHT_FROM_FIGURE: u32 = 1;
const MAX_WEIGHT_FROM_FIGURE: u32 = 10;

// Key figure wiring.
const FIGURE_MIN_CONNECTIONS: usize = 50;
const FIGURE_MAX_CONNECTIONS: usize = 200;
const LEAD_FIGURE_CONNECTIONS: usize = 300;
const FIGURE_REPLY_RATE: f64 = 0.3;
const FIGURE_LINK_PROBABILITY: f64 = 0.7;
const HIGH_DEGREE_POOL: usize = 100;

/// The accounts that anchored the original discussion, catalyst first.
pub fn default_key_figures() -> Vec<String> {
    [
        "DeepFuckingValue",
        "zjz",
        "OPINION_IS_UNPOPULAR",
        "Stylux",
        "bawse1",
        "ITradeBaconFutures",
        "VisualMod",
        "AutoModerator",
        "wsbgod",
        "SIR_JACK_A_LOT",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Builder for the synthetic interaction network.
#[derive(Debug, Clone)]
pub struct NetworkBuilder {
    n_users: usize,
    attachment: usize,
    reply_probability: f64,
    preferential_ratio: f64,
    key_figures: Vec<String>,
    seed: Option<u64>,
}

impl NetworkBuilder {
    /// Create a builder with the study defaults: 1000 users, 3 attachment
    /// edges per new node, the historical key figure list.
    pub fn new() -> Self {
        Self {
            n_users: 1000,
            attachment: 3,
            reply_probability: 0.7,
            preferential_ratio: 0.7,
            key_figures: default_key_figures(),
            seed: None,
        }
    }

    /// Set the total user count, key figures included.
    pub fn with_users(mut self, n_users: usize) -> Self {
        self.n_users = n_users;
        self
    }

    /// Set the number of attachment edges per new node.
    pub fn with_attachment(mut self, attachment: usize) -> Self {
        self.attachment = attachment;
        self
    }

    /// Set the probability of a reply edge in the opposite direction.
    pub fn with_reply_probability(mut self, reply_probability: f64) -> Self {
        self.reply_probability = reply_probability;
        self
    }

    /// Replace the key figure list.
    pub fn with_key_figures(mut self, key_figures: Vec<String>) -> Self {
        self.key_figures = key_figures;
        self
    }

    /// Set the random seed for a reproducible network.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Generate the network.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] when the configuration cannot produce a
    /// network: no room for regular users, a zero attachment count, or a
    /// probability outside [0, 1].
    pub fn build(&self) -> Result<InteractionNetwork> {
        if self.attachment == 0 {
            return Err(Error::InvalidParameter {
                name: "attachment",
                message: "must be at least 1",
            });
        }
        if self.n_users <= self.key_figures.len() + self.attachment {
            return Err(Error::InvalidParameter {
                name: "n_users",
                message: "must exceed key figures plus attachment count",
            });
        }
        if !(0.0..=1.0).contains(&self.reply_probability) {
            return Err(Error::InvalidParameter {
                name: "reply_probability",
                message: "must be within [0, 1]",
            });
        }
        if !(0.0..=1.0).contains(&self.preferential_ratio) {
            return Err(Error::InvalidParameter {
                name: "preferential_ratio",
                message: "must be within [0, 1]",
            });
        }

        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };

        let mut graph = DiGraph::with_capacity(self.n_users, 0);
        let figures: Vec<NodeIndex> = self
            .key_figures
            .iter()
            .map(|name| graph.add_node(name.clone()))
            .collect();

        let n_regular = self.n_users - self.key_figures.len();
        let regular: Vec<NodeIndex> = (0..n_regular)
            .map(|i| graph.add_node(format!("user_{i:04}")))
            .collect();

        for (u, v) in barabasi_albert_edges(n_regular, self.attachment, &mut rng) {
            let weight = rng.random_range(MIN_WEIGHT..MAX_WEIGHT_REGULAR);
            graph.update_edge(regular[u], regular[v], weight);
            if rng.random::<f64>() < self.reply_probability {
                let back = rng.random_range(MIN_WEIGHT..MAX_WEIGHT_REGULAR - 5);
                graph.update_edge(regular[v], regular[u], back);
            }
        }

        self.connect_figures(&mut graph, &figures, &regular, &mut rng);
        self.interconnect_figures(&mut graph, &figures, &mut rng);

        Ok(InteractionNetwork {
            graph,
            key_figures: self.key_figures.clone(),
        })
    }

    /// Wire key figures in: mostly incoming replies, preferring the users
    /// that already collected the most edges.
    fn connect_figures<R: Rng>(
        &self,
        graph: &mut DiGraph<String, u32>,
        figures: &[NodeIndex],
        regular: &[NodeIndex],
        rng: &mut R,
    ) {
        let mut by_degree: Vec<NodeIndex> = regular.to_vec();
        by_degree.sort_by_key(|&v| std::cmp::Reverse(graph.neighbors_undirected(v).count()));
        let high_degree: Vec<NodeIndex> = by_degree.into_iter().take(HIGH_DEGREE_POOL).collect();

        for (rank, &figure) in figures.iter().enumerate() {
            let wanted = if rank == 0 {
                LEAD_FIGURE_CONNECTIONS
            } else {
                rng.random_range(FIGURE_MIN_CONNECTIONS..FIGURE_MAX_CONNECTIONS)
            };
            let wanted = wanted.min(regular.len());
            let n_preferential = ((wanted as f64) * self.preferential_ratio) as usize;

            let mut pool = high_degree.clone();
            pool.shuffle(rng);
            let mut targets: Vec<NodeIndex> = pool.into_iter().take(n_preferential).collect();

            let mut rest: Vec<NodeIndex> = regular
                .iter()
                .copied()
                .filter(|v| !targets.contains(v))
                .collect();
            rest.shuffle(rng);
            let missing = wanted.saturating_sub(targets.len());
            targets.extend(rest.into_iter().take(missing));

            for target in targets {
                let incoming = rng.random_range(MIN_WEIGHT..MAX_WEIGHT_TO_FIGURE);
                graph.update_edge(target, figure, incoming);
                if rng.random::<f64>() < FIGURE_REPLY_RATE {
                    let outgoing =
                        rng.random_range(MIN_WEIGHT_FROM_FIGURE..MAX_WEIGHT_FROM_FIGURE);
                    graph.update_edge(figure, target, outgoing);
                }
            }
        }
    }

    fn interconnect_figures<R: Rng>(
        &self,
        graph: &mut DiGraph<String, u32>,
        figures: &[NodeIndex],
        rng: &mut R,
    ) {
        for (i, &first) in figures.iter().enumerate() {
            for &second in &figures[i + 1..] {
                if rng.random::<f64>() < FIGURE_LINK_PROBABILITY {
                    let there = rng.random_range(3..25);
                    let back = rng.random_range(3..25);
                    graph.update_edge(first, second, there);
                    graph.update_edge(second, first, back);
                }
            }
        }
    }
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Barabási-Albert preferential attachment edge list over `n` nodes.
///
/// Repeated-endpoints sampling: a node's chance of being picked as a target
/// is proportional to how often it already appears as an endpoint.
fn barabasi_albert_edges<R: Rng>(n: usize, m: usize, rng: &mut R) -> Vec<(usize, usize)> {
    let mut edges = Vec::new();
    let m = m.min(n.saturating_sub(1));
    if n == 0 || m == 0 {
        return edges;
    }

    let mut repeated: Vec<usize> = Vec::new();
    let mut targets: Vec<usize> = (0..m).collect();

    for source in m..n {
        for &target in &targets {
            edges.push((source, target));
        }
        repeated.extend(targets.iter().copied());
        repeated.extend(std::iter::repeat(source).take(m));

        // m distinct degree-proportional targets for the next node.
        let mut next: Vec<usize> = Vec::with_capacity(m);
        while next.len() < m {
            let candidate = repeated.choose(rng).copied().unwrap_or(0);
            if !next.contains(&candidate) {
                next.push(candidate);
            }
        }
        targets = next;
    }

    edges
}

/// A generated interaction network plus its key figure labels.
#[derive(Debug, Clone)]
pub struct InteractionNetwork {
    /// Directed reply graph; node weights are user labels, edge weights
    /// reply volumes.
    pub graph: DiGraph<String, u32>,
    /// Key figure labels, catalyst first.
    pub key_figures: Vec<String>,
}

/// Basic statistics of an interaction graph.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkStats {
    /// Nodes in the graph.
    pub n_nodes: usize,
    /// Edges in the graph.
    pub n_edges: usize,
    /// Directed density, `m / (n · (n − 1))`.
    pub density: f64,
    /// Weakly connected components.
    pub n_weak_components: usize,
    /// Largest weak component size.
    pub largest_weak_component: usize,
    /// Largest strongly connected component size.
    pub largest_strong_component: usize,
}

impl InteractionNetwork {
    /// Node and edge counts, density, and weak component structure.
    pub fn stats(&self) -> NetworkStats {
        let n = self.graph.node_count();
        let m = self.graph.edge_count();

        let mut uf = UnionFind::new(n);
        for edge in self.graph.edge_references() {
            uf.union(edge.source().index(), edge.target().index());
        }
        let mut sizes: HashMap<usize, usize> = HashMap::new();
        for node in 0..n {
            *sizes.entry(uf.find(node)).or_insert(0) += 1;
        }

        let largest_strong_component = tarjan_scc(&self.graph)
            .iter()
            .map(|c| c.len())
            .max()
            .unwrap_or(0);

        NetworkStats {
            n_nodes: n,
            n_edges: m,
            density: if n > 1 {
                m as f64 / (n * (n - 1)) as f64
            } else {
                0.0
            },
            n_weak_components: sizes.len(),
            largest_weak_component: sizes.values().copied().max().unwrap_or(0),
            largest_strong_component,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_has_requested_users() {
        let network = NetworkBuilder::new()
            .with_users(80)
            .with_seed(42)
            .build()
            .unwrap();
        assert_eq!(network.graph.node_count(), 80);
        assert!(network.graph.edge_count() > 0);
    }

    #[test]
    fn test_seeded_builds_are_identical() {
        let build = || {
            NetworkBuilder::new()
                .with_users(60)
                .with_seed(7)
                .build()
                .unwrap()
        };
        let first = build();
        let second = build();

        assert_eq!(first.graph.node_count(), second.graph.node_count());
        assert_eq!(first.graph.edge_count(), second.graph.edge_count());
        let edges = |network: &InteractionNetwork| -> Vec<(usize, usize, u32)> {
            network
                .graph
                .edge_references()
                .map(|e| (e.source().index(), e.target().index(), *e.weight()))
                .collect()
        };
        assert_eq!(edges(&first), edges(&second));
    }

    #[test]
    fn test_key_figures_attract_replies() {
        let network = NetworkBuilder::new()
            .with_users(200)
            .with_seed(42)
            .build()
            .unwrap();
        let graph = &network.graph;

        // The catalyst (node 0) should collect far more incoming edges
        // than a typical regular user.
        let catalyst_in = graph
            .edges_directed(petgraph::graph::NodeIndex::new(0), petgraph::Direction::Incoming)
            .count();
        assert!(catalyst_in >= 100, "catalyst has {catalyst_in} replies");
    }

    #[test]
    fn test_too_few_users_rejected() {
        let err = NetworkBuilder::new().with_users(10).build().unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "n_users", .. }));
    }

    #[test]
    fn test_zero_attachment_rejected() {
        let err = NetworkBuilder::new().with_attachment(0).build().unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidParameter {
                name: "attachment",
                ..
            }
        ));
    }

    #[test]
    fn test_stats_cover_all_nodes() {
        let network = NetworkBuilder::new()
            .with_users(60)
            .with_seed(3)
            .build()
            .unwrap();
        let stats = network.stats();
        assert_eq!(stats.n_nodes, 60);
        assert!(stats.largest_weak_component <= stats.n_nodes);
        assert!(stats.largest_strong_component <= stats.largest_weak_component);
        assert!(stats.density > 0.0);
    }

    #[test]
    fn test_ba_edges_shape() {
        let mut rng = StdRng::seed_from_u64(1);
        let edges = barabasi_albert_edges(20, 3, &mut rng);
        // Each node beyond the seed set contributes exactly m edges.
        assert_eq!(edges.len(), (20 - 3) * 3);
        for (u, v) in edges {
            assert_ne!(u, v);
            assert!(u < 20 && v < 20);
        }
    }
}
