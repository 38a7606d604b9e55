//! Renderable models attached to the viewport.
//!
//! Payload decoding and network access are owned by a [`ModelLoader`]; this
//! module wraps what the loader produces, hands out copyable
//! [`ModelHandle`]s, and owns the models until they are disposed.

/// Loader seam, change signals and an in-memory loader.
pub mod loader;
/// Registry owning attached models and aggregating their bounds.
pub mod registry;
/// CAD and point-cloud model wrappers.
pub mod wrappers;

use std::fmt;

pub use loader::{
    ChangeSignal, InMemoryLoader, LoaderError, ModelData, ModelLoader,
    ModelPayload, ReleaseHook,
};
pub use registry::ModelRegistry;
pub use wrappers::{CadModel, Model, PointCloudModel, Renderable};

/// The two recognized model discriminants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    /// Chunked mesh geometry.
    Cad,
    /// Octree-paged point data with a point budget.
    PointCloud,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cad => f.write_str("CAD"),
            Self::PointCloud => f.write_str("point cloud"),
        }
    }
}

/// Opaque reference to a model owned by a [`ModelRegistry`].
///
/// Handles are cheap to copy and never own the underlying resources. Ids
/// are never reused within a registry, so a stale handle can always be told
/// apart from one that was never issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelHandle {
    id: u64,
    kind: ModelKind,
}

impl ModelHandle {
    /// Sentinel returned by a disposed controller.
    pub const INVALID: Self = Self {
        id: u64::MAX,
        kind: ModelKind::Cad,
    };

    /// Create a handle. Only registries issue meaningful ones.
    #[must_use]
    pub const fn new(id: u64, kind: ModelKind) -> Self {
        Self { id, kind }
    }

    /// Registry-unique id.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Model kind.
    #[must_use]
    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    /// Whether this is the [`INVALID`](Self::INVALID) sentinel.
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        *self == Self::INVALID
    }
}

impl fmt::Display for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_invalid() {
            f.write_str("#invalid")
        } else {
            write!(f, "#{} ({})", self.id, self.kind)
        }
    }
}
