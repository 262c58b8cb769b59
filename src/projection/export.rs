//! Binary export of the co-occurrence matrix.
//!
//! The persisted artifact is the full dense count matrix, bincoded, plus a
//! plain-text sidecar listing the ordered user labels. The matrix file alone
//! carries no identities; consumers cross-reference row and column indices
//! against the sidecar, whose line order equals the matrix row order.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use ndarray::Array2;

use super::SharedPostMatrix;
use crate::error::{Error, Result};

/// Write the dense shared-post matrix to `path`.
pub fn write_shared_matrix(path: &Path, shared: &SharedPostMatrix) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::Export(e.to_string()))?;
    let writer = BufWriter::new(file);
    bincode::serialize_into(writer, shared.counts()).map_err(|e| Error::Export(e.to_string()))
}

/// Load a matrix previously written with [`write_shared_matrix`].
pub fn read_shared_matrix(path: &Path) -> Result<Array2<u32>> {
    let file = File::open(path).map_err(|e| Error::Export(e.to_string()))?;
    let reader = BufReader::new(file);
    bincode::deserialize_from(reader).map_err(|e| Error::Export(e.to_string()))
}

/// Write the ordered user labels, one per line, matching matrix row order.
pub fn write_user_index(path: &Path, shared: &SharedPostMatrix) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::Export(e.to_string()))?;
    let mut writer = BufWriter::new(file);
    for user in shared.users() {
        writeln!(writer, "{user}").map_err(|e| Error::Export(e.to_string()))?;
    }
    writer.flush().map_err(|e| Error::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{IncidenceMatrix, Membership};

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn sample_matrix() -> SharedPostMatrix {
        let mut membership = Membership::new(labels(&["a", "b"]), labels(&["p", "q"]));
        membership.push("a", "p");
        membership.push("a", "q");
        membership.push("b", "q");
        let incidence = IncidenceMatrix::build(&membership, usize::MAX).unwrap();
        SharedPostMatrix::from_incidence(&incidence, usize::MAX).unwrap()
    }

    #[test]
    fn test_matrix_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shared_posts.bin");

        let shared = sample_matrix();
        write_shared_matrix(&path, &shared).unwrap();
        let loaded = read_shared_matrix(&path).unwrap();

        assert_eq!(loaded.shape(), &[2, 2]);
        assert_eq!(&loaded, shared.counts());
    }

    #[test]
    fn test_user_index_matches_row_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.txt");

        let shared = sample_matrix();
        write_user_index(&path, &shared).unwrap();
        let lines: Vec<String> = std::fs::read_to_string(&path)
            .unwrap()
            .lines()
            .map(|l| l.to_string())
            .collect();

        assert_eq!(lines, shared.users());
    }

    #[test]
    fn test_missing_file_is_export_error() {
        let err = read_shared_matrix(Path::new("/nonexistent/shared_posts.bin")).unwrap_err();
        assert!(matches!(err, Error::Export(_)));
    }
}
