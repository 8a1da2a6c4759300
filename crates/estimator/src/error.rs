use thiserror::Error;

/// Failure to decode an uploaded payload into a triangle mesh.
///
/// This is the only caller-visible hard failure in the whole estimation
/// pipeline; everything downstream of a successful parse degrades gracefully.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("payload too small to contain a triangle mesh ({0} bytes)")]
    TooSmall(usize),
    #[error("invalid mesh payload: {0}")]
    Invalid(String),
    #[error("mesh contains no triangles")]
    NoTriangles,
}

impl ParseError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        ParseError::Invalid(reason.into())
    }
}
