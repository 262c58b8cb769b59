//! Stage one of the projection: the dense user × post incidence matrix.

use std::collections::HashMap;

use ndarray::Array2;

use super::Membership;
use crate::error::{Error, Result};

/// Dense user × post membership matrix.
///
/// Row `u` corresponds to `users()[u]` and column `q` to `posts()[q]`,
/// following the declaration order of the [`Membership`]. Entries are 1
/// where the relation holds and 0 elsewhere; repeated pairs clamp to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct IncidenceMatrix {
    users: Vec<String>,
    posts: Vec<String>,
    cells: Array2<u32>,
}

impl IncidenceMatrix {
    /// Materialize a membership relation.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownUser`] or [`Error::UnknownPost`] when a pair names a
    /// label outside the declared sets, [`Error::ResourceExhausted`] when
    /// the dense matrix would exceed `max_cells`.
    pub fn build(membership: &Membership, max_cells: usize) -> Result<Self> {
        let users = membership.users().to_vec();
        let posts = membership.posts().to_vec();
        let n = users.len();
        let p = posts.len();

        check_dense_budget(n, p, max_cells)?;

        let user_index: HashMap<&str, usize> = users
            .iter()
            .enumerate()
            .map(|(i, u)| (u.as_str(), i))
            .collect();
        let post_index: HashMap<&str, usize> = posts
            .iter()
            .enumerate()
            .map(|(i, q)| (q.as_str(), i))
            .collect();

        let mut cells = Array2::zeros((n, p));
        for (user, post) in membership.pairs() {
            let u = *user_index
                .get(user.as_str())
                .ok_or_else(|| Error::UnknownUser {
                    label: user.clone(),
                })?;
            let q = *post_index
                .get(post.as_str())
                .ok_or_else(|| Error::UnknownPost {
                    label: post.clone(),
                })?;
            cells[[u, q]] = 1;
        }

        Ok(Self {
            users,
            posts,
            cells,
        })
    }

    /// Number of users (rows).
    pub fn n_users(&self) -> usize {
        self.users.len()
    }

    /// Number of posts (columns).
    pub fn n_posts(&self) -> usize {
        self.posts.len()
    }

    /// Ordered user labels; row `u` is `users()[u]`.
    pub fn users(&self) -> &[String] {
        &self.users
    }

    /// Ordered post labels; column `q` is `posts()[q]`.
    pub fn posts(&self) -> &[String] {
        &self.posts
    }

    /// The 0/1 matrix itself.
    pub fn cells(&self) -> &Array2<u32> {
        &self.cells
    }

    /// Distinct memberships recorded, after clamping.
    pub fn total_memberships(&self) -> u64 {
        self.cells.iter().map(|&c| c as u64).sum()
    }
}

/// Reject dense allocations beyond the configured cell budget.
pub(crate) fn check_dense_budget(rows: usize, cols: usize, max_cells: usize) -> Result<()> {
    let requested = rows.checked_mul(cols).unwrap_or(usize::MAX);
    if requested > max_cells {
        return Err(Error::ResourceExhausted {
            requested_cells: requested,
            limit_cells: max_cells,
        });
    }
    Ok(())
}
