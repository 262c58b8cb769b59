use core::fmt;

/// Result alias for `echograph`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the projection pipeline and analyzers.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Analyzer input graph has no nodes.
    EmptyGraph,

    /// A membership pair names a user outside the declared user set.
    UnknownUser {
        /// Offending user label.
        label: String,
    },

    /// A membership pair names a post outside the declared post set.
    UnknownPost {
        /// Offending post label.
        label: String,
    },

    /// Shared-post threshold must be at least 1.
    InvalidThreshold {
        /// Requested threshold.
        requested: usize,
    },

    /// A dense matrix would exceed the configured cell budget.
    ResourceExhausted {
        /// Cells the allocation would need.
        requested_cells: usize,
        /// Configured ceiling.
        limit_cells: usize,
    },

    /// Invalid parameter value.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// Artifact export or import failed (I/O or encoding).
    Export(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyGraph => write!(f, "graph has no nodes"),
            Error::UnknownUser { label } => {
                write!(f, "membership references unknown user '{label}'")
            }
            Error::UnknownPost { label } => {
                write!(f, "membership references unknown post '{label}'")
            }
            Error::InvalidThreshold { requested } => {
                write!(f, "shared-post threshold must be >= 1, got {requested}")
            }
            Error::ResourceExhausted {
                requested_cells,
                limit_cells,
            } => {
                write!(
                    f,
                    "dense matrix needs {requested_cells} cells, budget is {limit_cells}"
                )
            }
            Error::InvalidParameter { name, message } => {
                write!(f, "invalid parameter '{name}': {message}")
            }
            Error::Export(msg) => write!(f, "export failed: {msg}"),
        }
    }
}

impl std::error::Error for Error {}
