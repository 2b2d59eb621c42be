//! Local broadcast channel
//!
//! Named, fire-and-forget notifications with any number of observers. There
//! is no delivery guarantee beyond "every observer registered at post time is
//! called once".

use crate::room::RoomState;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

pub const SCENE_DID_ENTER_BACKGROUND: &str = "sceneDidEnterBackground";
pub const ON_ROOM_STATE_CHANGED: &str = "onRoomStateChanged";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPayload {
    Empty,
    RoomState(RoomState),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub name: String,
    pub payload: NotificationPayload,
}

impl Notification {
    pub fn new(name: impl Into<String>, payload: NotificationPayload) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }
}

/// Identifies a registered observer for removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverToken(u64);

type Callback = Arc<dyn Fn(&Notification) + Send + Sync>;

struct Observer {
    token: ObserverToken,
    name: Option<String>,
    callback: Callback,
}

#[derive(Default)]
pub struct NotificationCenter {
    observers: Mutex<Vec<Observer>>,
    next_token: AtomicU64,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for notifications called `name`, or for all of them
    pub fn add_observer(
        &self,
        name: Option<&str>,
        callback: impl Fn(&Notification) + Send + Sync + 'static,
    ) -> ObserverToken {
        let token = ObserverToken(self.next_token.fetch_add(1, Ordering::Relaxed));
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Observer {
                token,
                name: name.map(str::to_string),
                callback: Arc::new(callback),
            });
        token
    }

    pub fn remove_observer(&self, token: ObserverToken) {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|o| o.token != token);
    }

    pub fn post(&self, notification: Notification) {
        // Callbacks run unlocked so they may post or (un)register themselves
        let callbacks: Vec<Callback> = self
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|o| o.name.as_deref().map_or(true, |n| n == notification.name))
            .map(|o| Arc::clone(&o.callback))
            .collect();

        log::debug!(
            "Posting {} to {} observer(s)",
            notification.name,
            callbacks.len()
        );

        for callback in callbacks {
            callback(&notification);
        }
    }

    pub fn post_name(&self, name: &str, payload: NotificationPayload) {
        self.post(Notification::new(name, payload));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter(center: &NotificationCenter, name: Option<&str>) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        center.add_observer(name, move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        count
    }

    #[test]
    fn test_observers_filtered_by_name() {
        let center = NotificationCenter::new();
        let background = counter(&center, Some(SCENE_DID_ENTER_BACKGROUND));
        let room = counter(&center, Some(ON_ROOM_STATE_CHANGED));
        let all = counter(&center, None);

        center.post_name(SCENE_DID_ENTER_BACKGROUND, NotificationPayload::Empty);

        assert_eq!(background.load(Ordering::SeqCst), 1);
        assert_eq!(room.load(Ordering::SeqCst), 0);
        assert_eq!(all.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_remove_observer() {
        let center = NotificationCenter::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let token = center.add_observer(None, move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        center.remove_observer(token);
        center.post_name(ON_ROOM_STATE_CHANGED, NotificationPayload::Empty);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_payload_reaches_observer() {
        let center = NotificationCenter::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        center.add_observer(Some(ON_ROOM_STATE_CHANGED), move |n| {
            s.lock().unwrap().push(n.payload);
        });

        center.post_name(
            ON_ROOM_STATE_CHANGED,
            NotificationPayload::RoomState(RoomState::Joined),
        );
        assert_eq!(
            *seen.lock().unwrap(),
            vec![NotificationPayload::RoomState(RoomState::Joined)]
        );
    }

    #[test]
    fn test_callback_may_post_reentrantly() {
        let center = Arc::new(NotificationCenter::new());
        let inner = counter(&center, Some("inner"));
        let c = Arc::clone(&center);
        center.add_observer(Some("outer"), move |_| {
            c.post_name("inner", NotificationPayload::Empty);
        });

        center.post_name("outer", NotificationPayload::Empty);
        assert_eq!(inner.load(Ordering::SeqCst), 1);
    }
}
