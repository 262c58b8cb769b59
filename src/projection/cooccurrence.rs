//! Stage two of the projection: the symmetric shared-post count matrix.

use ndarray::Array2;

use super::incidence::{check_dense_budget, IncidenceMatrix};
use crate::error::Result;

/// Symmetric user × user matrix of shared-post counts, `S = I · Iᵗ`.
///
/// `S[i][j]` (i ≠ j) counts the posts users i and j both commented on;
/// `S[i][i]` counts user i's own posts. Every entry is bounded above by the
/// number of posts and by `min(S[i][i], S[j][j])` off the diagonal. The
/// ordered user labels ride along so row and column indices stay mappable
/// to identities after export.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "export", derive(serde::Serialize, serde::Deserialize))]
pub struct SharedPostMatrix {
    users: Vec<String>,
    counts: Array2<u32>,
}

impl SharedPostMatrix {
    /// Project an incidence matrix onto its users.
    ///
    /// Integer accumulation keeps the counts exact; threshold comparisons
    /// downstream never see rounding.
    ///
    /// # Errors
    ///
    /// [`Error::ResourceExhausted`] when the n × n product would exceed
    /// `max_cells`.
    ///
    /// [`Error::ResourceExhausted`]: crate::error::Error::ResourceExhausted
    pub fn from_incidence(incidence: &IncidenceMatrix, max_cells: usize) -> Result<Self> {
        let n = incidence.n_users();
        check_dense_budget(n, n, max_cells)?;

        let cells = incidence.cells();
        let counts = cells.dot(&cells.t());

        Ok(Self {
            users: incidence.users().to_vec(),
            counts,
        })
    }

    /// Number of users (matrix dimension).
    pub fn n_users(&self) -> usize {
        self.counts.nrows()
    }

    /// Ordered user labels; index `i` of the matrix is `users()[i]`.
    pub fn users(&self) -> &[String] {
        &self.users
    }

    /// Shared-post count between users `i` and `j`.
    pub fn get(&self, i: usize, j: usize) -> u32 {
        self.counts[[i, j]]
    }

    /// Posts each user participated in (the diagonal).
    pub fn post_counts(&self) -> Vec<u32> {
        self.counts.diag().to_vec()
    }

    /// Largest off-diagonal entry, 0 for matrices smaller than 2 × 2.
    pub fn max_shared(&self) -> u32 {
        let n = self.n_users();
        let mut max = 0;
        for i in 0..n {
            for j in (i + 1)..n {
                max = max.max(self.counts[[i, j]]);
            }
        }
        max
    }

    /// The raw count matrix.
    pub fn counts(&self) -> &Array2<u32> {
        &self.counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::Membership;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn shared(membership: &Membership) -> SharedPostMatrix {
        let incidence = IncidenceMatrix::build(membership, usize::MAX).unwrap();
        SharedPostMatrix::from_incidence(&incidence, usize::MAX).unwrap()
    }

    #[test]
    fn test_symmetry() {
        let mut membership = Membership::new(labels(&["a", "b", "c"]), labels(&["p", "q"]));
        membership.push("a", "p");
        membership.push("b", "p");
        membership.push("b", "q");
        membership.push("c", "q");

        let s = shared(&membership);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(s.get(i, j), s.get(j, i));
            }
        }
    }

    #[test]
    fn test_diagonal_counts_own_posts() {
        let mut membership = Membership::new(labels(&["a", "b"]), labels(&["p", "q", "r"]));
        membership.push("a", "p");
        membership.push("a", "q");
        membership.push("a", "r");
        membership.push("b", "r");

        let s = shared(&membership);
        assert_eq!(s.post_counts(), vec![3, 1]);
        assert_eq!(s.get(0, 1), 1);
    }

    #[test]
    fn test_off_diagonal_bounded_by_diagonal() {
        let mut membership = Membership::new(labels(&["a", "b", "c"]), labels(&["p", "q", "r"]));
        membership.push("a", "p");
        membership.push("a", "q");
        membership.push("b", "p");
        membership.push("b", "q");
        membership.push("b", "r");
        membership.push("c", "r");

        let s = shared(&membership);
        for i in 0..3 {
            for j in 0..3 {
                if i != j {
                    assert!(s.get(i, j) <= s.get(i, i).min(s.get(j, j)));
                }
            }
        }
    }

    #[test]
    fn test_square_budget_enforced() {
        let membership = Membership::new(labels(&["a", "b", "c", "d"]), labels(&["p"]));
        let incidence = IncidenceMatrix::build(&membership, usize::MAX).unwrap();
        // 4 users fit the 4 x 1 incidence budget but not the 4 x 4 product.
        assert!(SharedPostMatrix::from_incidence(&incidence, 15).is_err());
    }
}
