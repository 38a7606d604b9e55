//! Boundary to the geometry-loading collaborator.
//!
//! The loader resolves numeric model/revision ids into payloads. Streaming
//! loaders keep the [`ChangeSignal`] they were given and raise it from any
//! thread when new data lands; the scheduler consumes it on the next tick.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::ModelKind;
use crate::math::{Aabb, Transform};

/// "Something changed, please redraw" flag shared with loader tasks.
#[derive(Debug, Clone, Default)]
pub struct ChangeSignal(Arc<AtomicBool>);

impl ChangeSignal {
    /// Create a lowered signal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the signal. Safe to call from any thread.
    pub fn notify(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Lower the signal, returning whether it was raised.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }

    /// Whether the signal is raised, without consuming it.
    #[must_use]
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Called exactly once when a model is disposed, to free loader-side
/// resources (GPU buffers, paging caches, ...).
pub type ReleaseHook = Box<dyn FnOnce() + Send>;

/// Kind-specific payload data.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelData {
    /// CAD model.
    Cad {
        /// Model-space bounding box.
        bounds: Aabb,
    },
    /// Point-cloud model.
    PointCloud {
        /// Model-space bounding box.
        bounds: Aabb,
        /// Initial maximum number of points drawn per frame.
        point_budget: u64,
    },
}

impl ModelData {
    /// Discriminant of this payload.
    #[must_use]
    pub fn kind(&self) -> ModelKind {
        match self {
            Self::Cad { .. } => ModelKind::Cad,
            Self::PointCloud { .. } => ModelKind::PointCloud,
        }
    }
}

/// What a loader hands over for one model.
pub struct ModelPayload {
    /// Kind-specific data.
    pub data: ModelData,
    /// Model → world transform the loader recommends (e.g. a CDF → viewer
    /// axis swap).
    pub transform: Transform,
    /// Loader-side cleanup run on dispose.
    pub release: Option<ReleaseHook>,
}

impl fmt::Debug for ModelPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelPayload")
            .field("data", &self.data)
            .field("transform", &self.transform)
            .field("release", &self.release.is_some())
            .finish()
    }
}

impl ModelPayload {
    /// Payload with identity transform and no release hook.
    #[must_use]
    pub fn new(data: ModelData) -> Self {
        Self {
            data,
            transform: Transform::IDENTITY,
            release: None,
        }
    }
}

/// Errors reported by a loader, once per model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderError {
    /// No model exists for the given ids.
    NotFound {
        /// Requested model id.
        model_id: u64,
        /// Requested revision id.
        revision_id: u64,
    },
    /// The revision has no output in a format this viewer can display.
    UnsupportedFormat {
        /// Requested model id.
        model_id: u64,
        /// Requested revision id.
        revision_id: u64,
    },
    /// Any other loader failure (network, parse, ...).
    Failed(String),
}

impl fmt::Display for LoaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound {
                model_id,
                revision_id,
            } => write!(f, "model {model_id} revision {revision_id} not found"),
            Self::UnsupportedFormat {
                model_id,
                revision_id,
            } => write!(
                f,
                "model {model_id} revision {revision_id} has no supported output"
            ),
            Self::Failed(msg) => write!(f, "load failed: {msg}"),
        }
    }
}

impl std::error::Error for LoaderError {}

/// The geometry-loading collaborator.
pub trait ModelLoader {
    /// Which kind of model a revision resolves to.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError`] if the revision is unknown or has no
    /// displayable output.
    fn determine_model_type(
        &self,
        model_id: u64,
        revision_id: u64,
    ) -> Result<ModelKind, LoaderError>;

    /// Resolve a revision into a payload. `signal` stays valid for the
    /// model's lifetime; raise it whenever streamed data changes what should
    /// be on screen.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError`] if the payload cannot be produced.
    fn load(
        &mut self,
        model_id: u64,
        revision_id: u64,
        signal: ChangeSignal,
    ) -> Result<ModelPayload, LoaderError>;
}

impl<L: ModelLoader + ?Sized> ModelLoader for Box<L> {
    fn determine_model_type(
        &self,
        model_id: u64,
        revision_id: u64,
    ) -> Result<ModelKind, LoaderError> {
        (**self).determine_model_type(model_id, revision_id)
    }

    fn load(
        &mut self,
        model_id: u64,
        revision_id: u64,
        signal: ChangeSignal,
    ) -> Result<ModelPayload, LoaderError> {
        (**self).load(model_id, revision_id, signal)
    }
}

/// Loader backed by a fixed table of payloads.
///
/// Used for headless hosts, demos and tests. It remembers the signal handed
/// to each load so callers can simulate streamed updates, and counts how many
/// of its models have been released.
#[derive(Debug, Default)]
pub struct InMemoryLoader {
    entries: FxHashMap<(u64, u64), ModelData>,
    signals: FxHashMap<(u64, u64), ChangeSignal>,
    released: Arc<AtomicUsize>,
    loads: usize,
}

impl InMemoryLoader {
    /// Create an empty loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a payload for `(model_id, revision_id)`.
    pub fn insert(&mut self, model_id: u64, revision_id: u64, data: ModelData) {
        let _ = self.entries.insert((model_id, revision_id), data);
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with_model(mut self, model_id: u64, revision_id: u64, data: ModelData) -> Self {
        self.insert(model_id, revision_id, data);
        self
    }

    /// Signal handed out by the most recent load of these ids.
    #[must_use]
    pub fn signal(&self, model_id: u64, revision_id: u64) -> Option<ChangeSignal> {
        self.signals.get(&(model_id, revision_id)).cloned()
    }

    /// Shared counter of released models.
    #[must_use]
    pub fn release_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.released)
    }

    /// Number of successful loads.
    #[must_use]
    pub fn load_count(&self) -> usize {
        self.loads
    }
}

impl ModelLoader for InMemoryLoader {
    fn determine_model_type(
        &self,
        model_id: u64,
        revision_id: u64,
    ) -> Result<ModelKind, LoaderError> {
        self.entries
            .get(&(model_id, revision_id))
            .map(ModelData::kind)
            .ok_or(LoaderError::NotFound {
                model_id,
                revision_id,
            })
    }

    fn load(
        &mut self,
        model_id: u64,
        revision_id: u64,
        signal: ChangeSignal,
    ) -> Result<ModelPayload, LoaderError> {
        let data = self
            .entries
            .get(&(model_id, revision_id))
            .cloned()
            .ok_or(LoaderError::NotFound {
                model_id,
                revision_id,
            })?;
        let _ = self.signals.insert((model_id, revision_id), signal);
        self.loads += 1;

        let released = Arc::clone(&self.released);
        Ok(ModelPayload {
            release: Some(Box::new(move || {
                let _ = released.fetch_add(1, Ordering::AcqRel);
            })),
            ..ModelPayload::new(data)
        })
    }
}
