use std::path::PathBuf;

use super::ViewportController;
use crate::error::{UnsupportedOperation, ViewportError};
use crate::math::{Aabb, Transform};
use crate::model::{ChangeSignal, ModelData, ModelHandle, ModelKind};

/// Extended arguments for [`ViewportController::add_model_with`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddModelOptions {
    /// Model id.
    pub model_id: u64,
    /// Revision id.
    pub revision_id: u64,
    /// Load from a local directory instead of the loader. Unsupported.
    pub local_path: Option<PathBuf>,
    /// Restrict CAD geometry to this model-space box. Unsupported for point
    /// clouds.
    pub geometry_filter: Option<Aabb>,
}

impl AddModelOptions {
    /// Plain model/revision request.
    #[must_use]
    pub fn new(model_id: u64, revision_id: u64) -> Self {
        Self {
            model_id,
            revision_id,
            ..Self::default()
        }
    }
}

impl ViewportController {
    /// Load a model through the loader and attach it.
    ///
    /// Once disposed this returns [`ModelHandle::INVALID`] without calling
    /// the loader.
    ///
    /// # Errors
    ///
    /// [`ViewportError::Load`] if the loader fails.
    pub fn add_model(
        &mut self,
        model_id: u64,
        revision_id: u64,
    ) -> Result<ModelHandle, ViewportError> {
        self.add_model_with(AddModelOptions::new(model_id, revision_id))
    }

    /// [`add_model`](Self::add_model) with extended options.
    ///
    /// # Errors
    ///
    /// [`ViewportError::Unsupported`] for local paths and for geometry
    /// filters on point clouds, [`ViewportError::Load`] if the loader fails.
    pub fn add_model_with(
        &mut self,
        options: AddModelOptions,
    ) -> Result<ModelHandle, ViewportError> {
        if self.is_disposed() {
            log::warn!(
                "add_model({}, {}) on a disposed viewport",
                options.model_id,
                options.revision_id
            );
            return Ok(ModelHandle::INVALID);
        }
        let AddModelOptions {
            model_id,
            revision_id,
            local_path,
            geometry_filter,
        } = options;
        if local_path.is_some() {
            return Err(Self::report(
                UnsupportedOperation::new("loading models from a local path").into(),
            ));
        }
        if geometry_filter.is_some()
            && self.loader.determine_model_type(model_id, revision_id)? == ModelKind::PointCloud
        {
            return Err(Self::report(
                UnsupportedOperation::new("geometry filters on point clouds").into(),
            ));
        }

        let signal = ChangeSignal::new();
        let mut payload = self.loader.load(model_id, revision_id, signal.clone())?;
        if let (Some(filter), ModelData::Cad { bounds }) = (geometry_filter, &mut payload.data) {
            *bounds = bounds.intersection(filter);
        }
        let handle = self.registry.add(model_id, revision_id, payload, signal);
        self.scheduler.request_redraw();
        log::info!("added model {model_id}/{revision_id} as {handle}");
        Ok(handle)
    }

    /// Which kind of model a revision resolves to, per the loader.
    ///
    /// Once disposed the loader is not consulted and the kind of
    /// [`ModelHandle::INVALID`] is returned.
    ///
    /// # Errors
    ///
    /// [`ViewportError::Load`] if the loader cannot tell.
    pub fn determine_model_type(
        &self,
        model_id: u64,
        revision_id: u64,
    ) -> Result<ModelKind, ViewportError> {
        if self.is_disposed() {
            return Ok(ModelHandle::INVALID.kind());
        }
        Ok(self.loader.determine_model_type(model_id, revision_id)?)
    }

    /// Detach a model and release its resources. Disposing the same handle
    /// twice is a no-op.
    ///
    /// # Errors
    ///
    /// [`ViewportError::InvalidHandle`] for handles this controller never
    /// issued.
    pub fn dispose_model(&mut self, handle: ModelHandle) -> Result<(), ViewportError> {
        if self.is_disposed() {
            return Ok(());
        }
        if self.registry.dispose(handle).map_err(Self::report)? {
            self.scheduler.request_redraw();
            log::info!("disposed model {handle}");
        }
        Ok(())
    }

    /// Handles of all attached models, in attach order.
    #[must_use]
    pub fn models(&self) -> Vec<ModelHandle> {
        self.registry.handles()
    }

    /// World-space bounds of one model, or empty once disposed.
    ///
    /// # Errors
    ///
    /// [`ViewportError::InvalidHandle`] if the handle is not live.
    pub fn bounding_box(&self, handle: ModelHandle) -> Result<Aabb, ViewportError> {
        if self.is_disposed() {
            return Ok(Aabb::EMPTY);
        }
        self.registry.bounding_box(handle).map_err(Self::report)
    }

    /// Union of all model bounds.
    pub fn scene_bounding_box(&mut self) -> Aabb {
        if self.is_disposed() {
            return Aabb::EMPTY;
        }
        self.registry.scene_bounding_box()
    }

    /// Model → world transform.
    ///
    /// # Errors
    ///
    /// [`ViewportError::InvalidHandle`] if the handle is not live.
    pub fn model_transform(&self, handle: ModelHandle) -> Result<Transform, ViewportError> {
        if self.is_disposed() {
            return Ok(Transform::IDENTITY);
        }
        self.registry.transform(handle).map_err(Self::report)
    }

    /// Move, rotate or scale a model.
    ///
    /// # Errors
    ///
    /// [`ViewportError::InvalidHandle`] if the handle is not live.
    pub fn set_model_transform(
        &mut self,
        handle: ModelHandle,
        transform: Transform,
    ) -> Result<(), ViewportError> {
        if self.is_disposed() {
            return Ok(());
        }
        self.registry
            .set_transform(handle, transform)
            .map_err(Self::report)
    }

    /// Point budget of a point cloud.
    ///
    /// # Errors
    ///
    /// [`ViewportError::InvalidHandle`] if the handle is not live,
    /// [`ViewportError::Unsupported`] for CAD models.
    pub fn point_budget(&self, handle: ModelHandle) -> Result<u64, ViewportError> {
        if self.is_disposed() {
            return Ok(0);
        }
        self.registry.point_budget(handle).map_err(Self::report)
    }

    /// Change the point budget of a point cloud.
    ///
    /// # Errors
    ///
    /// [`ViewportError::InvalidHandle`] if the handle is not live,
    /// [`ViewportError::Unsupported`] for CAD models.
    pub fn set_point_budget(
        &mut self,
        handle: ModelHandle,
        budget: u64,
    ) -> Result<(), ViewportError> {
        if self.is_disposed() {
            return Ok(());
        }
        self.registry
            .set_point_budget(handle, budget)
            .map_err(Self::report)
    }

    /// Model caches live in the loader layer.
    ///
    /// # Errors
    ///
    /// [`ViewportError::Unsupported`] unless the viewport is disposed.
    pub fn clear_cache(&mut self) -> Result<(), ViewportError> {
        if self.is_disposed() {
            return Ok(());
        }
        Err(Self::report(
            UnsupportedOperation::new("clearing the model cache").into(),
        ))
    }
}
