use std::fmt;

use super::loader::{ModelData, ModelPayload, ReleaseHook};
use super::ModelKind;
use crate::error::UnsupportedOperation;
use crate::math::{Aabb, Transform};

/// Capabilities every attached model offers regardless of kind.
pub trait Renderable {
    /// World-space bounding box, or [`Aabb::EMPTY`] once disposed.
    fn bounding_box(&self) -> Aabb;

    /// Release loader-side resources. Idempotent.
    fn dispose(&mut self);

    /// Whether [`dispose`](Self::dispose) has run.
    fn is_disposed(&self) -> bool;
}

/// Loader-side resources a wrapper releases exactly once.
#[derive(Default)]
struct Resources {
    release: Option<ReleaseHook>,
    disposed: bool,
}

impl Resources {
    fn new(release: Option<ReleaseHook>) -> Self {
        Self {
            release,
            disposed: false,
        }
    }

    fn release(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        if let Some(hook) = self.release.take() {
            hook();
        }
    }
}

impl fmt::Debug for Resources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resources")
            .field("release", &self.release.is_some())
            .field("disposed", &self.disposed)
            .finish()
    }
}

/// Chunked CAD geometry.
#[derive(Debug)]
pub struct CadModel {
    /// Source model id.
    pub model_id: u64,
    /// Source revision id.
    pub revision_id: u64,
    local_bounds: Aabb,
    transform: Transform,
    resources: Resources,
}

/// Paged point-cloud geometry.
#[derive(Debug)]
pub struct PointCloudModel {
    /// Source model id.
    pub model_id: u64,
    /// Source revision id.
    pub revision_id: u64,
    local_bounds: Aabb,
    transform: Transform,
    point_budget: u64,
    resources: Resources,
}

impl CadModel {
    /// Model-space bounds as reported by the loader.
    #[must_use]
    pub fn local_bounds(&self) -> Aabb {
        self.local_bounds
    }
}

impl PointCloudModel {
    /// Maximum number of points drawn per frame.
    #[must_use]
    pub fn point_budget(&self) -> u64 {
        self.point_budget
    }

    /// Model-space bounds as reported by the loader.
    #[must_use]
    pub fn local_bounds(&self) -> Aabb {
        self.local_bounds
    }
}

fn world_bounds(local: Aabb, transform: &Transform, disposed: bool) -> Aabb {
    if disposed {
        Aabb::EMPTY
    } else {
        local.transformed(&transform.matrix())
    }
}

impl Renderable for CadModel {
    fn bounding_box(&self) -> Aabb {
        world_bounds(self.local_bounds, &self.transform, self.resources.disposed)
    }

    fn dispose(&mut self) {
        self.resources.release();
    }

    fn is_disposed(&self) -> bool {
        self.resources.disposed
    }
}

impl Renderable for PointCloudModel {
    fn bounding_box(&self) -> Aabb {
        world_bounds(self.local_bounds, &self.transform, self.resources.disposed)
    }

    fn dispose(&mut self) {
        self.resources.release();
    }

    fn is_disposed(&self) -> bool {
        self.resources.disposed
    }
}

/// An attached model of either kind.
#[derive(Debug)]
pub enum Model {
    /// CAD model.
    Cad(CadModel),
    /// Point-cloud model.
    PointCloud(PointCloudModel),
}

impl Model {
    /// Wrap a loader payload.
    #[must_use]
    pub fn from_payload(model_id: u64, revision_id: u64, payload: ModelPayload) -> Self {
        let resources = Resources::new(payload.release);
        match payload.data {
            ModelData::Cad { bounds } => Self::Cad(CadModel {
                model_id,
                revision_id,
                local_bounds: bounds,
                transform: payload.transform,
                resources,
            }),
            ModelData::PointCloud {
                bounds,
                point_budget,
            } => Self::PointCloud(PointCloudModel {
                model_id,
                revision_id,
                local_bounds: bounds,
                transform: payload.transform,
                point_budget,
                resources,
            }),
        }
    }

    /// Discriminant.
    #[must_use]
    pub fn kind(&self) -> ModelKind {
        match self {
            Self::Cad(_) => ModelKind::Cad,
            Self::PointCloud(_) => ModelKind::PointCloud,
        }
    }

    /// Model → world transform.
    #[must_use]
    pub fn transform(&self) -> Transform {
        match self {
            Self::Cad(m) => m.transform,
            Self::PointCloud(m) => m.transform,
        }
    }

    /// Replace the model → world transform.
    pub fn set_transform(&mut self, transform: Transform) {
        match self {
            Self::Cad(m) => m.transform = transform,
            Self::PointCloud(m) => m.transform = transform,
        }
    }

    /// Point budget of a point cloud.
    ///
    /// # Errors
    ///
    /// CAD models have no point budget.
    pub fn point_budget(&self) -> Result<u64, UnsupportedOperation> {
        match self {
            Self::Cad(_) => Err(UnsupportedOperation::new("point budget on CAD models")),
            Self::PointCloud(m) => Ok(m.point_budget),
        }
    }

    /// Set the point budget of a point cloud.
    ///
    /// # Errors
    ///
    /// CAD models have no point budget.
    pub fn set_point_budget(&mut self, budget: u64) -> Result<(), UnsupportedOperation> {
        match self {
            Self::Cad(_) => Err(UnsupportedOperation::new("point budget on CAD models")),
            Self::PointCloud(m) => {
                m.point_budget = budget;
                Ok(())
            }
        }
    }
}

impl Renderable for Model {
    fn bounding_box(&self) -> Aabb {
        match self {
            Self::Cad(m) => m.bounding_box(),
            Self::PointCloud(m) => m.bounding_box(),
        }
    }

    fn dispose(&mut self) {
        match self {
            Self::Cad(m) => m.dispose(),
            Self::PointCloud(m) => m.dispose(),
        }
    }

    fn is_disposed(&self) -> bool {
        match self {
            Self::Cad(m) => m.is_disposed(),
            Self::PointCloud(m) => m.is_disposed(),
        }
    }
}
