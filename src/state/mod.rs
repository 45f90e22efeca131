//! Reactive state containers. Each store wraps an [`Observable`] so views (and
//! the CLI) can read a snapshot or subscribe to changes. Async actions follow one
//! pattern: mark loading and clear the error, await the flow, then record the
//! outcome. Flow failures land in `error`; nothing is propagated.

pub mod auth;
pub mod expiry;
pub mod profile;
pub mod toast;
pub mod transition;

pub use auth::{AuthState, AuthStore};
pub use expiry::SessionExpiryReaction;
pub use profile::{ProfileData, ProfileState, ProfileStore};
pub use toast::{Toast, ToastKind, ToastStore};
pub use transition::{
    GotoOptions, Navigator, PageTransitionStore, RouteHistory, TransitionKind, TransitionState,
};

use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::watch;

/// Shared value with change notification. Clones observe the same value.
#[derive(Debug)]
pub struct Observable<T> {
    sender: Arc<watch::Sender<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            sender: Arc::clone(&self.sender),
        }
    }
}

impl<T: Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Observable<T> {
    #[must_use]
    pub fn new(initial: T) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Replaces the value and notifies subscribers.
    pub fn set(&self, value: T) {
        self.sender.send_replace(value);
    }

    /// Mutates the value in place and notifies subscribers.
    pub fn update(&self, modify: impl FnOnce(&mut T)) {
        self.sender.send_modify(modify);
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.sender.subscribe()
    }

    /// Reads a projection of the current value without cloning all of it.
    pub fn with<R>(&self, read: impl FnOnce(&T) -> R) -> R {
        read(&*self.sender.borrow())
    }
}

impl<T: Clone> Observable<T> {
    #[must_use]
    pub fn get(&self) -> T {
        self.sender.borrow().clone()
    }
}

/// Shallow merge of `patch` into a JSON object. A missing or non-object target
/// starts from an empty object.
pub(crate) fn merge_object(target: Option<Value>, patch: Map<String, Value>) -> Value {
    let mut object = match target {
        Some(Value::Object(object)) => object,
        _ => Map::new(),
    };
    object.extend(patch);
    Value::Object(object)
}

#[cfg(test)]
mod tests {
    use super::{Observable, merge_object};
    use serde_json::{Map, json};

    #[test]
    fn clones_share_the_value() {
        let observable = Observable::new(1);
        let other = observable.clone();
        other.set(2);
        assert_eq!(observable.get(), 2);
        observable.update(|value| *value += 1);
        assert_eq!(other.get(), 3);
        assert_eq!(other.with(|value| value * 10), 30);
    }

    #[tokio::test]
    async fn subscribers_see_changes() -> anyhow::Result<()> {
        let observable = Observable::new("a".to_string());
        let mut receiver = observable.subscribe();
        observable.set("b".to_string());
        receiver.changed().await?;
        assert_eq!(*receiver.borrow_and_update(), "b");
        Ok(())
    }

    #[test]
    fn merge_is_shallow() {
        let mut patch = Map::new();
        patch.insert("name".to_string(), json!("Ana"));
        patch.insert("prefs".to_string(), json!({ "lang": "es" }));

        let merged = merge_object(Some(json!({ "id": 1, "prefs": { "theme": "x" } })), patch.clone());
        assert_eq!(merged, json!({ "id": 1, "name": "Ana", "prefs": { "lang": "es" } }));

        assert_eq!(
            merge_object(None, patch),
            json!({ "name": "Ana", "prefs": { "lang": "es" } })
        );
    }
}
