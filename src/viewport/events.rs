use glam::Vec3;

/// Identifies a registered camera-change listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Id handed out when nothing was registered. Never issued by a
    /// listener list.
    pub const DETACHED: Self = Self(u64::MAX);
}

/// Returned by a listener to stay subscribed or remove itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListenerAction {
    /// Keep receiving notifications.
    #[default]
    Keep,
    /// Remove this listener once the current notification finishes.
    Unsubscribe,
}

/// Callback receiving `(position, target)` after the camera moved.
pub type CameraListener = Box<dyn FnMut(Vec3, Vec3) -> ListenerAction>;

/// Camera-change listeners with deferred self-removal.
///
/// Listeners that unsubscribe during a notification are collected and
/// removed after every listener has been called, so the list is never
/// mutated while it is being walked.
#[derive(Default)]
pub struct CameraChangeListeners {
    listeners: Vec<(ListenerId, CameraListener)>,
    next_id: u64,
}

impl CameraChangeListeners {
    /// Empty listener list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener.
    pub fn add(&mut self, listener: CameraListener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(other, _)| *other != id);
        self.listeners.len() != before
    }

    /// Drop every listener.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Call every listener once, then drop those that asked to unsubscribe.
    pub fn notify(&mut self, position: Vec3, target: Vec3) {
        let mut unsubscribed = Vec::new();
        for (id, listener) in &mut self.listeners {
            if listener(position, target) == ListenerAction::Unsubscribe {
                unsubscribed.push(*id);
            }
        }
        if !unsubscribed.is_empty() {
            self.listeners.retain(|(id, _)| !unsubscribed.contains(id));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn listener_can_unsubscribe_itself_mid_notify() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = CameraChangeListeners::new();

        let log = Rc::clone(&calls);
        let _ = listeners.add(Box::new(move |_, _| {
            log.borrow_mut().push("once");
            ListenerAction::Unsubscribe
        }));
        let log = Rc::clone(&calls);
        let _ = listeners.add(Box::new(move |_, _| {
            log.borrow_mut().push("always");
            ListenerAction::Keep
        }));

        listeners.notify(Vec3::ZERO, Vec3::ONE);
        listeners.notify(Vec3::ZERO, Vec3::ONE);
        assert_eq!(*calls.borrow(), vec!["once", "always", "always"]);
        assert_eq!(listeners.len(), 1);
    }

    #[test]
    fn remove_by_id() {
        let mut listeners = CameraChangeListeners::new();
        let a = listeners.add(Box::new(|_, _| ListenerAction::Keep));
        let b = listeners.add(Box::new(|_, _| ListenerAction::Keep));
        assert_ne!(a, b);
        assert!(listeners.remove(a));
        assert!(!listeners.remove(a));
        assert_eq!(listeners.len(), 1);
        listeners.clear();
        assert!(listeners.is_empty());
    }
}
