//! Posting behaviour simulation.
//!
//! Produces the bipartite membership relation the projection pipeline
//! consumes: a handful of viral posts authored by the leading key figures
//! soak up most comments, the long tail of regular posts gets the rest.

use rand::prelude::*;

use super::builder::InteractionNetwork;
use crate::error::{Error, Result};
use crate::projection::Membership;

// Intended comments per user, half-open ranges.
const FIGURE_COMMENT_RANGE: (usize, usize) = (20, 50);
const REGULAR_COMMENT_RANGE: (usize, usize) = (1, 15);
// Leading key figures who author one viral post each.
const VIRAL_AUTHORS: usize = 5;

/// Simulates which users comment on which posts.
#[derive(Debug, Clone)]
pub struct PostingModel {
    n_posts: usize,
    viral_ratio: f64,
    seed: Option<u64>,
}

impl PostingModel {
    /// Create a model with the study defaults: 200 posts, 70% of comments
    /// landing on viral posts.
    pub fn new() -> Self {
        Self {
            n_posts: 200,
            viral_ratio: 0.7,
            seed: None,
        }
    }

    /// Set the total post count.
    pub fn with_posts(mut self, n_posts: usize) -> Self {
        self.n_posts = n_posts;
        self
    }

    /// Set the share of comments aimed at viral posts.
    pub fn with_viral_ratio(mut self, viral_ratio: f64) -> Self {
        self.viral_ratio = viral_ratio;
        self
    }

    /// Set the random seed for reproducible posting behaviour.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Simulate posting and return the membership relation.
    ///
    /// User order follows the interaction graph's node order, post order is
    /// creation order, so a seeded run always produces the same relation.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] when `viral_ratio` leaves [0, 1] or the
    /// post count is zero.
    pub fn generate(&self, network: &InteractionNetwork) -> Result<Membership> {
        if !(0.0..=1.0).contains(&self.viral_ratio) {
            return Err(Error::InvalidParameter {
                name: "viral_ratio",
                message: "must be within [0, 1]",
            });
        }
        if self.n_posts == 0 {
            return Err(Error::InvalidParameter {
                name: "n_posts",
                message: "must be at least 1",
            });
        }

        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };

        let n_viral = VIRAL_AUTHORS
            .min(network.key_figures.len())
            .min(self.n_posts);
        let mut posts = Vec::with_capacity(self.n_posts);
        for (i, author) in network.key_figures.iter().take(n_viral).enumerate() {
            posts.push(format!("POST_{author}_{i}"));
        }
        for i in 0..self.n_posts - n_viral {
            posts.push(format!("POST_{i:04}"));
        }

        let users: Vec<String> = network.graph.node_weights().cloned().collect();
        let mut membership = Membership::new(users.clone(), posts.clone());

        for user in &users {
            let is_figure = network.key_figures.contains(user);
            let (lo, hi) = if is_figure {
                FIGURE_COMMENT_RANGE
            } else {
                REGULAR_COMMENT_RANGE
            };
            let intended = rng.random_range(lo..hi);
            let viral_comments = ((intended as f64) * self.viral_ratio) as usize;
            let regular_comments = intended - viral_comments;

            // Viral posts draw with replacement; a repeat hit is one comment
            // thread, not a new membership.
            let mut seen: Vec<usize> = Vec::new();
            for _ in 0..viral_comments.min(n_viral) {
                let q = rng.random_range(0..n_viral);
                if !seen.contains(&q) {
                    seen.push(q);
                    membership.push(user.clone(), posts[q].clone());
                }
            }

            // Regular posts without replacement.
            if self.n_posts > n_viral {
                let mut regular_posts: Vec<usize> = (n_viral..self.n_posts).collect();
                regular_posts.shuffle(&mut rng);
                for &q in regular_posts.iter().take(regular_comments) {
                    membership.push(user.clone(), posts[q].clone());
                }
            }
        }

        Ok(membership)
    }
}

impl Default for PostingModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkBuilder;

    fn small_network() -> InteractionNetwork {
        NetworkBuilder::new()
            .with_users(50)
            .with_seed(42)
            .build()
            .unwrap()
    }

    #[test]
    fn test_generate_covers_all_users() {
        let network = small_network();
        let membership = PostingModel::new()
            .with_posts(40)
            .with_seed(42)
            .generate(&network)
            .unwrap();

        assert_eq!(membership.n_users(), 50);
        assert_eq!(membership.n_posts(), 40);
        assert!(!membership.pairs().is_empty());
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let network = small_network();
        let model = PostingModel::new().with_posts(40).with_seed(9);
        let first = model.generate(&network).unwrap();
        let second = model.generate(&network).unwrap();
        assert_eq!(first.pairs(), second.pairs());
    }

    #[test]
    fn test_pairs_reference_declared_labels() {
        let network = small_network();
        let membership = PostingModel::new()
            .with_posts(30)
            .with_seed(5)
            .generate(&network)
            .unwrap();

        for (user, post) in membership.pairs() {
            assert!(membership.users().contains(user));
            assert!(membership.posts().contains(post));
        }
    }

    #[test]
    fn test_bad_viral_ratio_rejected() {
        let network = small_network();
        let err = PostingModel::new()
            .with_viral_ratio(1.5)
            .generate(&network)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidParameter {
                name: "viral_ratio",
                ..
            }
        ));
    }

    #[test]
    fn test_zero_posts_rejected() {
        let network = small_network();
        let err = PostingModel::new()
            .with_posts(0)
            .generate(&network)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidParameter { name: "n_posts", .. }
        ));
    }
}
