//! Stage three of the projection: the k-threshold filter.

use petgraph::graph::UnGraph;

use super::SharedPostMatrix;
use crate::error::{Error, Result};

/// Keep user pairs sharing at least `k` posts as weighted undirected edges.
///
/// Every user becomes a node, connected or not, so downstream component
/// analysis can report isolated users. The diagonal never becomes an edge,
/// whatever `k` is. Edges are inserted in ascending `(i, j)` order, making
/// the edge list canonical for a given matrix and threshold. The matrix is
/// only read; the caller keeps the full `S` for export.
///
/// # Errors
///
/// [`Error::InvalidThreshold`] when `k` is 0.
pub fn threshold_graph(shared: &SharedPostMatrix, k: usize) -> Result<UnGraph<String, u32>> {
    if k < 1 {
        return Err(Error::InvalidThreshold { requested: k });
    }

    let n = shared.n_users();
    let mut graph = UnGraph::with_capacity(n, 0);
    let nodes: Vec<_> = shared
        .users()
        .iter()
        .map(|user| graph.add_node(user.clone()))
        .collect();

    for i in 0..n {
        for j in (i + 1)..n {
            let weight = shared.get(i, j);
            if weight as usize >= k {
                graph.add_edge(nodes[i], nodes[j], weight);
            }
        }
    }

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{IncidenceMatrix, Membership};
    use petgraph::visit::EdgeRef;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn shared(membership: &Membership) -> SharedPostMatrix {
        let incidence = IncidenceMatrix::build(membership, usize::MAX).unwrap();
        SharedPostMatrix::from_incidence(&incidence, usize::MAX).unwrap()
    }

    fn pair_membership() -> Membership {
        let mut membership = Membership::new(labels(&["a", "b", "c"]), labels(&["p", "q"]));
        membership.push("a", "p");
        membership.push("a", "q");
        membership.push("b", "p");
        membership.push("b", "q");
        membership.push("c", "q");
        membership
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let s = shared(&pair_membership());
        let err = threshold_graph(&s, 0).unwrap_err();
        assert_eq!(err, Error::InvalidThreshold { requested: 0 });
    }

    #[test]
    fn test_all_users_become_nodes() {
        let s = shared(&pair_membership());
        let graph = threshold_graph(&s, 2).unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_no_self_loops() {
        let s = shared(&pair_membership());
        // k = 1 keeps every sharing pair, still no loops.
        let graph = threshold_graph(&s, 1).unwrap();
        for edge in graph.edge_references() {
            assert_ne!(edge.source(), edge.target());
        }
    }

    #[test]
    fn test_edge_weight_is_shared_count() {
        let s = shared(&pair_membership());
        let graph = threshold_graph(&s, 2).unwrap();
        let edge = graph.edge_references().next().unwrap();
        assert_eq!(*edge.weight(), 2);
        assert_eq!(graph[edge.source()], "a");
        assert_eq!(graph[edge.target()], "b");
    }

    #[test]
    fn test_larger_k_prunes_edges() {
        let s = shared(&pair_membership());
        let loose = threshold_graph(&s, 1).unwrap();
        let strict = threshold_graph(&s, 2).unwrap();
        assert!(strict.edge_count() <= loose.edge_count());
        assert_eq!(loose.edge_count(), 3);
        assert_eq!(strict.edge_count(), 1);
    }
}
