//! Tit-for-tat cooperation dynamics on the interaction graph.
//!
//! A crude contagion model of "holding": each step, every user polls the
//! neighbors it interacts with (repliers and replied-to alike) and keeps
//! cooperating while the influence-weighted share of cooperating neighbors
//! stays high enough. Key figures count several times over and never stop
//! cooperating themselves; recent cooperators are sticky and defect only
//! when support falls well below the adoption threshold.

use std::collections::HashSet;

use petgraph::graph::DiGraph;
use petgraph::Direction;
use rand::prelude::*;

use crate::error::{Error, Result};

/// Tit-for-tat cooperation simulation.
#[derive(Debug, Clone)]
pub struct TitForTat {
    time_steps: usize,
    initial_cooperation: f64,
    influencer_multiplier: f64,
    cooperation_threshold: f64,
    sticky_threshold: f64,
    seed: Option<u64>,
}

impl TitForTat {
    /// Create a simulation with the study defaults: 10 steps, 15% early
    /// adopters, key figures weighted threefold.
    pub fn new() -> Self {
        Self {
            time_steps: 10,
            initial_cooperation: 0.15,
            influencer_multiplier: 3.0,
            cooperation_threshold: 0.5,
            sticky_threshold: 0.4,
            seed: None,
        }
    }

    /// Set the number of simulated steps.
    pub fn with_time_steps(mut self, time_steps: usize) -> Self {
        self.time_steps = time_steps;
        self
    }

    /// Set the initial share of cooperating regular users.
    pub fn with_initial_cooperation(mut self, initial_cooperation: f64) -> Self {
        self.initial_cooperation = initial_cooperation;
        self
    }

    /// Set the influence weight of key figures.
    pub fn with_influencer_multiplier(mut self, influencer_multiplier: f64) -> Self {
        self.influencer_multiplier = influencer_multiplier;
        self
    }

    /// Set the random seed for a reproducible run.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Run the simulation.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyGraph`] when the graph has no nodes,
    /// [`Error::InvalidParameter`] when a rate leaves [0, 1].
    pub fn simulate(
        &self,
        graph: &DiGraph<String, u32>,
        key_figures: &[String],
    ) -> Result<CooperationOutcome> {
        let n = graph.node_count();
        if n == 0 {
            return Err(Error::EmptyGraph);
        }
        if !(0.0..=1.0).contains(&self.initial_cooperation) {
            return Err(Error::InvalidParameter {
                name: "initial_cooperation",
                message: "must be within [0, 1]",
            });
        }
        if !(0.0..=1.0).contains(&self.cooperation_threshold) {
            return Err(Error::InvalidParameter {
                name: "cooperation_threshold",
                message: "must be within [0, 1]",
            });
        }
        if !(0.0..=1.0).contains(&self.sticky_threshold) {
            return Err(Error::InvalidParameter {
                name: "sticky_threshold",
                message: "must be within [0, 1]",
            });
        }

        let figure_set: HashSet<&str> = key_figures.iter().map(|s| s.as_str()).collect();
        let is_figure: Vec<bool> = graph
            .node_indices()
            .map(|v| figure_set.contains(graph[v].as_str()))
            .collect();

        // Key figures hold from the start; early adopters are drawn from
        // the rest.
        let mut cooperating = is_figure.clone();
        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };
        let mut candidates: Vec<usize> = (0..n).filter(|&i| !is_figure[i]).collect();
        candidates.shuffle(&mut rng);
        let n_early = ((n as f64) * self.initial_cooperation) as usize;
        for &i in candidates.iter().take(n_early) {
            cooperating[i] = true;
        }

        let mut history = Vec::with_capacity(self.time_steps);
        for _step in 0..self.time_steps {
            cooperating = self.step(graph, &cooperating, &is_figure);
            let rate = cooperating.iter().filter(|&&c| c).count() as f64 / n as f64;
            history.push(rate);
        }

        let cooperators = graph
            .node_indices()
            .filter(|v| cooperating[v.index()])
            .map(|v| graph[v].clone())
            .collect();

        Ok(CooperationOutcome {
            history,
            cooperators,
        })
    }

    fn step(
        &self,
        graph: &DiGraph<String, u32>,
        cooperating: &[bool],
        is_figure: &[bool],
    ) -> Vec<bool> {
        let mut next = vec![false; cooperating.len()];

        for v in graph.node_indices() {
            let i = v.index();
            let mut supporting = 0.0;
            let mut total = 0.0;

            // Both directions: who the user reads and who replies to them.
            // A mutual pair is counted once per direction, weighting close
            // ties double.
            for direction in [Direction::Incoming, Direction::Outgoing] {
                for u in graph.neighbors_directed(v, direction) {
                    let weight = if is_figure[u.index()] {
                        self.influencer_multiplier
                    } else {
                        1.0
                    };
                    total += weight;
                    if cooperating[u.index()] {
                        supporting += weight;
                    }
                }
            }

            if total == 0.0 {
                // Isolated user: no signal, keep the current position.
                next[i] = cooperating[i];
                continue;
            }

            let ratio = supporting / total;
            next[i] = ratio > self.cooperation_threshold
                || is_figure[i]
                || (ratio > self.sticky_threshold && cooperating[i]);
        }

        next
    }
}

impl Default for TitForTat {
    fn default() -> Self {
        Self::new()
    }
}

/// Cooperation trajectory and final holders.
#[derive(Debug, Clone, PartialEq)]
pub struct CooperationOutcome {
    /// Cooperating share of all users after each step.
    pub history: Vec<f64>,
    /// Users still cooperating at the end, in graph node order.
    pub cooperators: Vec<String>,
}

/// First step (1-indexed) where cooperation exceeds one half, `None` if it
/// never does.
pub fn tipping_point(history: &[f64]) -> Option<usize> {
    history.iter().position(|&rate| rate > 0.5).map(|i| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_camp_graph() -> (DiGraph<String, u32>, Vec<String>) {
        // One key figure with heavy reach, a few followers wired to it.
        let mut graph = DiGraph::new();
        let figure = graph.add_node("catalyst".to_string());
        let followers: Vec<_> = (0..4)
            .map(|i| graph.add_node(format!("user_{i:04}")))
            .collect();
        for &f in &followers {
            graph.add_edge(f, figure, 10);
            graph.add_edge(figure, f, 2);
        }
        (graph, vec!["catalyst".to_string()])
    }

    #[test]
    fn test_empty_graph_rejected() {
        let graph = DiGraph::<String, u32>::new();
        let err = TitForTat::new().simulate(&graph, &[]).unwrap_err();
        assert_eq!(err, Error::EmptyGraph);
    }

    #[test]
    fn test_bad_rate_rejected() {
        let (graph, figures) = two_camp_graph();
        let err = TitForTat::new()
            .with_initial_cooperation(2.0)
            .simulate(&graph, &figures)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidParameter {
                name: "initial_cooperation",
                ..
            }
        ));
    }

    #[test]
    fn test_figures_never_defect() {
        let (graph, figures) = two_camp_graph();
        let outcome = TitForTat::new()
            .with_seed(42)
            .with_initial_cooperation(0.0)
            .simulate(&graph, &figures)
            .unwrap();
        assert!(outcome.cooperators.contains(&"catalyst".to_string()));
    }

    #[test]
    fn test_star_converges_to_full_cooperation() {
        // Every follower's only neighbor is the always-cooperating figure,
        // so everyone should hold after one step.
        let (graph, figures) = two_camp_graph();
        let outcome = TitForTat::new()
            .with_seed(42)
            .with_initial_cooperation(0.0)
            .simulate(&graph, &figures)
            .unwrap();
        assert_eq!(outcome.cooperators.len(), 5);
        assert!((outcome.history.last().copied().unwrap_or(0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_history_length_matches_steps() {
        let (graph, figures) = two_camp_graph();
        let outcome = TitForTat::new()
            .with_time_steps(4)
            .with_seed(1)
            .simulate(&graph, &figures)
            .unwrap();
        assert_eq!(outcome.history.len(), 4);
    }

    #[test]
    fn test_tipping_point() {
        assert_eq!(tipping_point(&[0.2, 0.4, 0.6, 0.9]), Some(3));
        assert_eq!(tipping_point(&[0.1, 0.2]), None);
        assert_eq!(tipping_point(&[]), None);
    }
}
