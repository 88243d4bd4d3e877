/// Errors surfaced by the matcher
///
/// Only configuration problems and API misuse are errors.
/// Empty collections, strings without tokens and rows without any
/// shared term are all valid and simply produce empty output.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FuzzRushError {
    /// A configuration value is out of its valid range.
    /// Raised before any tokenization or vectorization work starts.
    #[error("invalid configuration for `{field}`: {reason}")]
    InvalidConfiguration {
        field: &'static str,
        reason: String,
    },

    /// `match_names` was called before `tokenize` built a vocabulary
    #[error("no vocabulary available, call `tokenize` before matching")]
    NotTokenized,

    /// The source matrix column space does not line up with the
    /// transposed target matrix row space.
    #[error("dimension mismatch: left has {left} columns, right has {right} rows")]
    DimensionMismatch {
        left: usize,
        right: usize,
    },

    /// CSR parts break a structural invariant: `indptr` not starting at 0,
    /// decreasing or not ending at `nnz`, or a row whose columns are
    /// unsorted or past `n_cols`.
    #[error("malformed sparse matrix: {reason}")]
    MalformedMatrix {
        reason: String,
    },

    /// Name collections do not line up with the result matrix shape
    #[error("result matrix is {rows}x{cols} but {sources} source and {targets} target names were given")]
    ShapeMismatch {
        rows: usize,
        cols: usize,
        sources: usize,
        targets: usize,
    },
}

impl FuzzRushError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        tracing::warn!(field, %reason, "rejecting configuration");
        FuzzRushError::InvalidConfiguration { field, reason }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        tracing::warn!(%reason, "rejecting sparse matrix");
        FuzzRushError::MalformedMatrix { reason }
    }

    /// Whether the error came from a bad configuration value
    #[inline]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidConfiguration { .. })
    }
}

pub type Result<T> = std::result::Result<T, FuzzRushError>;
