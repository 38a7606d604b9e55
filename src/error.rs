//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;
use crate::model::{LoaderError, ModelHandle};

/// A capability that this orchestration layer does not implement.
///
/// Distinct from invalid input: callers can branch on it to tell "not
/// available here" apart from "you passed something wrong".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedOperation {
    /// Name of the unsupported capability.
    pub capability: &'static str,
}

impl UnsupportedOperation {
    /// Create a new unsupported-operation marker for `capability`.
    #[must_use]
    pub const fn new(capability: &'static str) -> Self {
        Self { capability }
    }
}

impl fmt::Display for UnsupportedOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is not supported in this layer", self.capability)
    }
}

impl std::error::Error for UnsupportedOperation {}

/// Errors produced by the vantage crate.
#[derive(Debug)]
pub enum ViewportError {
    /// Capability not implemented by the viewport layer.
    Unsupported(UnsupportedOperation),
    /// The handle was never issued by this controller's registry.
    InvalidHandle(ModelHandle),
    /// An unsupported construction option was requested. Raised before any
    /// resource is allocated.
    ConstructionRejected(UnsupportedOperation),
    /// The model loader failed to produce a model.
    Load(LoaderError),
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl ViewportError {
    /// Whether this error belongs to the unsupported-operation class
    /// (including rejected construction options).
    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_) | Self::ConstructionRejected(_))
    }
}

impl fmt::Display for ViewportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported(op) => write!(f, "unsupported operation: {op}"),
            Self::InvalidHandle(handle) => {
                write!(f, "unknown model handle {handle}")
            }
            Self::ConstructionRejected(op) => {
                write!(f, "construction rejected: {op}")
            }
            Self::Load(e) => write!(f, "model load error: {e}"),
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for ViewportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Unsupported(op) | Self::ConstructionRejected(op) => Some(op),
            Self::Load(e) => Some(e),
            Self::Gpu(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<UnsupportedOperation> for ViewportError {
    fn from(op: UnsupportedOperation) -> Self {
        Self::Unsupported(op)
    }
}

impl From<LoaderError> for ViewportError {
    fn from(e: LoaderError) -> Self {
        Self::Load(e)
    }
}

impl From<RenderContextError> for ViewportError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for ViewportError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelKind;

    #[test]
    fn construction_rejection_is_unsupported_class() {
        let err = ViewportError::ConstructionRejected(
            UnsupportedOperation::new("caching"),
        );
        assert!(err.is_unsupported());
        assert!(err.to_string().contains("caching"));
    }

    #[test]
    fn invalid_handle_is_not_unsupported() {
        let err = ViewportError::InvalidHandle(ModelHandle::new(
            7,
            ModelKind::Cad,
        ));
        assert!(!err.is_unsupported());
        assert!(err.to_string().contains('7'));
    }
}
