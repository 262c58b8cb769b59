//! Centrality measures for the directed interaction graph.
//!
//! Betweenness uses Brandes' accumulation over unweighted shortest paths
//! (Brandes 2001). Closeness follows the original analysis convention for
//! directed graphs that are not strongly connected: it is computed inside
//! the largest strongly connected component, and nodes outside it score 0.

use std::collections::VecDeque;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

/// Degree tallies per node, indexed like the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct DegreeCentrality {
    /// Incoming edge count per node.
    pub in_degree: Vec<usize>,
    /// Outgoing edge count per node.
    pub out_degree: Vec<usize>,
    /// Sum of incoming edge weights per node.
    pub weighted_in: Vec<u64>,
    /// Sum of outgoing edge weights per node.
    pub weighted_out: Vec<u64>,
}

/// Raw and weighted degree tallies for every node.
pub fn degree_centrality(graph: &DiGraph<String, u32>) -> DegreeCentrality {
    let n = graph.node_count();
    let mut tallies = DegreeCentrality {
        in_degree: vec![0; n],
        out_degree: vec![0; n],
        weighted_in: vec![0; n],
        weighted_out: vec![0; n],
    };

    for edge in graph.edge_references() {
        let weight = *edge.weight() as u64;
        let source = edge.source().index();
        let target = edge.target().index();
        tallies.out_degree[source] += 1;
        tallies.weighted_out[source] += weight;
        tallies.in_degree[target] += 1;
        tallies.weighted_in[target] += weight;
    }

    tallies
}

/// Freeman-normalized total degree centrality: `deg(v) / (n − 1)`.
pub fn normalized_degree_centrality(graph: &DiGraph<String, u32>) -> Vec<f64> {
    let n = graph.node_count();
    if n <= 1 {
        return vec![0.0; n];
    }
    let norm = (n - 1) as f64;
    graph
        .node_indices()
        .map(|v| {
            let degree = graph.edges_directed(v, Direction::Incoming).count()
                + graph.edges_directed(v, Direction::Outgoing).count();
            degree as f64 / norm
        })
        .collect()
}

/// Betweenness centrality via Brandes' algorithm, unweighted shortest paths.
pub fn betweenness_centrality(graph: &DiGraph<String, u32>) -> Vec<f64> {
    let n = graph.node_count();
    let mut centrality = vec![0.0; n];

    for source in graph.node_indices() {
        let partial = brandes_from_source(graph, source);
        for (i, score) in partial.into_iter().enumerate() {
            centrality[i] += score;
        }
    }

    centrality
}

fn brandes_from_source(graph: &DiGraph<String, u32>, source: NodeIndex) -> Vec<f64> {
    let n = graph.node_count();
    let mut stack = Vec::new();
    let mut paths = vec![0u64; n];
    let mut distance = vec![usize::MAX; n];
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut dependency = vec![0.0; n];

    paths[source.index()] = 1;
    distance[source.index()] = 0;
    let mut queue = VecDeque::new();
    queue.push_back(source);

    while let Some(v) = queue.pop_front() {
        stack.push(v.index());
        for w in graph.neighbors_directed(v, Direction::Outgoing) {
            let wi = w.index();
            if distance[wi] == usize::MAX {
                distance[wi] = distance[v.index()] + 1;
                queue.push_back(w);
            }
            if distance[wi] == distance[v.index()] + 1 {
                paths[wi] = paths[wi].saturating_add(paths[v.index()]);
                predecessors[wi].push(v.index());
            }
        }
    }

    while let Some(w) = stack.pop() {
        for &v in &predecessors[w] {
            let contribution = (paths[v] as f64 / paths[w] as f64) * (1.0 + dependency[w]);
            dependency[v] += contribution;
        }
    }

    // A source accumulates no dependency on itself.
    dependency[source.index()] = 0.0;
    dependency
}

/// Closeness centrality: reachable nodes over summed distances.
///
/// On graphs that are not strongly connected the scores are computed inside
/// the largest strongly connected component only.
pub fn closeness_centrality(graph: &DiGraph<String, u32>) -> Vec<f64> {
    let n = graph.node_count();
    let mut centrality = vec![0.0; n];
    if n == 0 {
        return centrality;
    }

    let components = tarjan_scc(graph);
    let largest = components
        .iter()
        .max_by_key(|c| c.len())
        .cloned()
        .unwrap_or_default();
    let mut in_scc = vec![false; n];
    for &v in &largest {
        in_scc[v.index()] = true;
    }

    for &v in &largest {
        let distances = bfs_distances(graph, v, &in_scc);
        let sum: usize = distances
            .iter()
            .filter(|&&d| d != usize::MAX && d > 0)
            .sum();
        let reachable = distances
            .iter()
            .filter(|&&d| d != usize::MAX && d > 0)
            .count();
        if sum > 0 {
            centrality[v.index()] = reachable as f64 / sum as f64;
        }
    }

    centrality
}

fn bfs_distances(graph: &DiGraph<String, u32>, source: NodeIndex, allowed: &[bool]) -> Vec<usize> {
    let mut distances = vec![usize::MAX; graph.node_count()];
    distances[source.index()] = 0;

    let mut queue = VecDeque::new();
    queue.push_back(source);
    while let Some(v) = queue.pop_front() {
        for w in graph.neighbors_directed(v, Direction::Outgoing) {
            let wi = w.index();
            if allowed[wi] && distances[wi] == usize::MAX {
                distances[wi] = distances[v.index()] + 1;
                queue.push_back(w);
            }
        }
    }

    distances
}

/// Users ranked by weighted in-degree, heaviest first.
pub fn top_influencers(graph: &DiGraph<String, u32>, limit: usize) -> Vec<(String, u64)> {
    let tallies = degree_centrality(graph);
    let mut ranked: Vec<(String, u64)> = graph
        .node_indices()
        .map(|v| (graph[v].clone(), tallies.weighted_in[v.index()]))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);
    ranked
}
