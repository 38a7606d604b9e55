use rustc_hash::FxHashMap;

use super::loader::{ChangeSignal, ModelPayload};
use super::wrappers::{Model, Renderable};
use super::{ModelHandle, ModelKind};
use crate::error::ViewportError;
use crate::math::{Aabb, Transform};

struct Entry {
    model: Model,
    signal: ChangeSignal,
}

/// Owns every attached model.
///
/// Ids increase monotonically and are never reused, so a handle is either
/// live, previously disposed (tolerated as a no-op where that makes sense),
/// or was never issued here ([`ViewportError::InvalidHandle`]).
pub struct ModelRegistry {
    models: FxHashMap<u64, Entry>,
    next_id: u64,
    /// Set by attach, detach and transform changes.
    structure_changed: bool,
    /// Cached union of model bounds; `None` once invalidated.
    scene_bounds: Option<Aabb>,
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            models: FxHashMap::default(),
            next_id: 0,
            structure_changed: false,
            scene_bounds: Some(Aabb::EMPTY),
        }
    }

    /// Number of live models.
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether no models are attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Take ownership of a loaded payload and issue a handle for it.
    /// `signal` is the change signal that was given to the loader.
    pub fn add(
        &mut self,
        model_id: u64,
        revision_id: u64,
        payload: ModelPayload,
        signal: ChangeSignal,
    ) -> ModelHandle {
        let model = Model::from_payload(model_id, revision_id, payload);
        let handle = ModelHandle::new(self.next_id, model.kind());
        self.next_id += 1;
        let _ = self.models.insert(handle.id(), Entry { model, signal });
        self.invalidate();
        log::debug!("attached model {model_id}/{revision_id} as {handle}");
        handle
    }

    /// Handles of all live models, in attach order.
    #[must_use]
    pub fn handles(&self) -> Vec<ModelHandle> {
        let mut handles: Vec<_> = self
            .models
            .iter()
            .map(|(&id, entry)| ModelHandle::new(id, entry.model.kind()))
            .collect();
        handles.sort_unstable_by_key(ModelHandle::id);
        handles
    }

    fn was_issued(&self, handle: ModelHandle) -> bool {
        !handle.is_invalid() && handle.id() < self.next_id
    }

    fn entry(&self, handle: ModelHandle) -> Result<&Entry, ViewportError> {
        self.models
            .get(&handle.id())
            .filter(|entry| entry.model.kind() == handle.kind())
            .ok_or(ViewportError::InvalidHandle(handle))
    }

    fn entry_mut(&mut self, handle: ModelHandle) -> Result<&mut Entry, ViewportError> {
        self.models
            .get_mut(&handle.id())
            .filter(|entry| entry.model.kind() == handle.kind())
            .ok_or(ViewportError::InvalidHandle(handle))
    }

    /// Borrow a live model.
    ///
    /// # Errors
    ///
    /// [`ViewportError::InvalidHandle`] if the handle is not live.
    pub fn get(&self, handle: ModelHandle) -> Result<&Model, ViewportError> {
        self.entry(handle).map(|entry| &entry.model)
    }

    /// Detach a model and run its release hook. Returns `Ok(true)` if the
    /// model was live and `Ok(false)` if it had already been disposed.
    ///
    /// # Errors
    ///
    /// [`ViewportError::InvalidHandle`] for handles this registry never
    /// issued.
    pub fn dispose(&mut self, handle: ModelHandle) -> Result<bool, ViewportError> {
        if !self.was_issued(handle) {
            return Err(ViewportError::InvalidHandle(handle));
        }
        match self.models.get(&handle.id()) {
            None => return Ok(false),
            Some(entry) if entry.model.kind() != handle.kind() => {
                return Err(ViewportError::InvalidHandle(handle));
            }
            Some(_) => {}
        }
        if let Some(mut entry) = self.models.remove(&handle.id()) {
            entry.model.dispose();
        }
        self.invalidate();
        log::debug!("disposed model {handle}");
        Ok(true)
    }

    /// Dispose every live model. Returns how many were released.
    pub fn dispose_all(&mut self) -> usize {
        let count = self.models.len();
        for (_, mut entry) in self.models.drain() {
            entry.model.dispose();
        }
        if count > 0 {
            self.invalidate();
        }
        count
    }

    /// World-space bounds of one model.
    ///
    /// # Errors
    ///
    /// [`ViewportError::InvalidHandle`] if the handle is not live.
    pub fn bounding_box(&self, handle: ModelHandle) -> Result<Aabb, ViewportError> {
        self.get(handle).map(Renderable::bounding_box)
    }

    /// Union of the bounds of every live model, recomputed lazily after a
    /// model is attached, detached or moved.
    pub fn scene_bounding_box(&mut self) -> Aabb {
        if let Some(bounds) = self.scene_bounds {
            return bounds;
        }
        let bounds = self
            .models
            .values()
            .map(|entry| entry.model.bounding_box())
            .fold(Aabb::EMPTY, Aabb::union);
        self.scene_bounds = Some(bounds);
        bounds
    }

    /// Model → world transform of a model.
    ///
    /// # Errors
    ///
    /// [`ViewportError::InvalidHandle`] if the handle is not live.
    pub fn transform(&self, handle: ModelHandle) -> Result<Transform, ViewportError> {
        self.get(handle).map(Model::transform)
    }

    /// Replace the model → world transform of a model.
    ///
    /// # Errors
    ///
    /// [`ViewportError::InvalidHandle`] if the handle is not live.
    pub fn set_transform(
        &mut self,
        handle: ModelHandle,
        transform: Transform,
    ) -> Result<(), ViewportError> {
        self.entry_mut(handle)?.model.set_transform(transform);
        self.invalidate();
        Ok(())
    }

    /// Point budget of a point-cloud model.
    ///
    /// # Errors
    ///
    /// [`ViewportError::InvalidHandle`] if the handle is not live, or
    /// [`ViewportError::Unsupported`] for CAD models.
    pub fn point_budget(&self, handle: ModelHandle) -> Result<u64, ViewportError> {
        Ok(self.get(handle)?.point_budget()?)
    }

    /// Set the point budget of a point-cloud model.
    ///
    /// # Errors
    ///
    /// [`ViewportError::InvalidHandle`] if the handle is not live, or
    /// [`ViewportError::Unsupported`] for CAD models.
    pub fn set_point_budget(
        &mut self,
        handle: ModelHandle,
        budget: u64,
    ) -> Result<(), ViewportError> {
        self.entry_mut(handle)?.model.set_point_budget(budget)?;
        self.structure_changed = true;
        Ok(())
    }

    /// Number of live models of `kind`.
    #[must_use]
    pub fn count_of(&self, kind: ModelKind) -> usize {
        self.models
            .values()
            .filter(|entry| entry.model.kind() == kind)
            .count()
    }

    /// Consume all pending change notifications. Returns `true` if any model
    /// signalled new data or the set of models changed since the last call.
    pub fn take_changed(&mut self) -> bool {
        let mut changed = std::mem::take(&mut self.structure_changed);
        for entry in self.models.values() {
            // Every signal must be lowered, so no short-circuit here.
            changed |= entry.signal.take();
        }
        changed
    }

    fn invalidate(&mut self) {
        self.structure_changed = true;
        self.scene_bounds = None;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use glam::Vec3;

    use super::*;
    use crate::model::loader::{InMemoryLoader, ModelData, ModelLoader};

    fn cad(min: f32, max: f32) -> ModelData {
        ModelData::Cad {
            bounds: Aabb::new(Vec3::splat(min), Vec3::splat(max)),
        }
    }

    fn attach(
        registry: &mut ModelRegistry,
        loader: &mut InMemoryLoader,
        model_id: u64,
    ) -> ModelHandle {
        let signal = ChangeSignal::new();
        let payload = loader.load(model_id, 1, signal.clone()).unwrap();
        registry.add(model_id, 1, payload, signal)
    }

    #[test]
    fn handles_are_unique_and_never_reused() {
        let mut loader = InMemoryLoader::new()
            .with_model(1, 1, cad(0.0, 1.0))
            .with_model(2, 1, cad(0.0, 1.0));
        let mut registry = ModelRegistry::new();
        let a = attach(&mut registry, &mut loader, 1);
        assert_eq!(registry.dispose(a).unwrap(), true);
        let b = attach(&mut registry, &mut loader, 2);
        assert_ne!(a, b);
        assert_eq!(registry.handles(), vec![b]);
    }

    #[test]
    fn scene_bounds_is_union_of_live_models() {
        let mut loader = InMemoryLoader::new()
            .with_model(1, 1, cad(0.0, 1.0))
            .with_model(2, 1, cad(5.0, 10.0));
        let mut registry = ModelRegistry::new();
        assert!(registry.scene_bounding_box().is_empty());

        let a = attach(&mut registry, &mut loader, 1);
        let b = attach(&mut registry, &mut loader, 2);
        assert_eq!(
            registry.scene_bounding_box(),
            Aabb::new(Vec3::ZERO, Vec3::splat(10.0))
        );

        let _ = registry.dispose(b).unwrap();
        assert_eq!(registry.scene_bounding_box(), registry.bounding_box(a).unwrap());
    }

    #[test]
    fn dispose_twice_is_noop_and_releases_once() {
        let mut loader = InMemoryLoader::new().with_model(1, 1, cad(0.0, 1.0));
        let counter = loader.release_counter();
        let mut registry = ModelRegistry::new();
        let a = attach(&mut registry, &mut loader, 1);
        assert_eq!(registry.dispose(a).unwrap(), true);
        assert_eq!(registry.dispose(a).unwrap(), false);
        assert_eq!(counter.load(Ordering::Acquire), 1);
        assert!(matches!(
            registry.bounding_box(a),
            Err(ViewportError::InvalidHandle(_))
        ));
    }

    #[test]
    fn foreign_handle_is_invalid() {
        let mut registry = ModelRegistry::new();
        let foreign = ModelHandle::new(42, ModelKind::Cad);
        assert!(matches!(
            registry.dispose(foreign),
            Err(ViewportError::InvalidHandle(h)) if h == foreign
        ));
        assert!(matches!(
            registry.dispose(ModelHandle::INVALID),
            Err(ViewportError::InvalidHandle(_))
        ));
    }

    #[test]
    fn take_changed_drains_all_signals() {
        let mut loader = InMemoryLoader::new()
            .with_model(1, 1, cad(0.0, 1.0))
            .with_model(2, 1, cad(0.0, 1.0));
        let mut registry = ModelRegistry::new();
        let _ = attach(&mut registry, &mut loader, 1);
        let _ = attach(&mut registry, &mut loader, 2);
        assert!(registry.take_changed());
        assert!(!registry.take_changed());

        let s1 = loader.signal(1, 1).unwrap();
        let s2 = loader.signal(2, 1).unwrap();
        s1.notify();
        s2.notify();
        assert!(registry.take_changed());
        assert!(!s1.is_raised());
        assert!(!s2.is_raised());
        assert!(!registry.take_changed());
    }

    #[test]
    fn point_budget_rejected_for_cad() {
        let mut loader = InMemoryLoader::new().with_model(1, 1, cad(0.0, 1.0));
        let mut registry = ModelRegistry::new();
        let a = attach(&mut registry, &mut loader, 1);
        let err = registry.set_point_budget(a, 10).unwrap_err();
        assert!(err.is_unsupported());
        assert_eq!(registry.count_of(ModelKind::Cad), 1);
    }

    #[test]
    fn dispose_all_releases_every_model() {
        let mut loader = InMemoryLoader::new()
            .with_model(1, 1, cad(0.0, 1.0))
            .with_model(2, 1, cad(0.0, 1.0));
        let counter = loader.release_counter();
        let mut registry = ModelRegistry::new();
        let _ = attach(&mut registry, &mut loader, 1);
        let _ = attach(&mut registry, &mut loader, 2);
        assert_eq!(registry.dispose_all(), 2);
        assert!(registry.is_empty());
        assert_eq!(counter.load(Ordering::Acquire), 2);
    }
}
