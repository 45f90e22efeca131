//! Transient notifications. A toast removes itself after its duration through a
//! detached timer task; a zero duration keeps it until removed by hand.

use crate::state::Observable;
use std::{fmt, time::Duration};
use tokio::runtime::Handle;
use tracing::debug;
use ulid::Ulid;

pub const DEFAULT_DURATION: Duration = Duration::from_secs(5);
pub const ERROR_DURATION: Duration = Duration::from_secs(7);
pub const WARNING_DURATION: Duration = Duration::from_secs(6);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for ToastKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            ToastKind::Info => "info",
            ToastKind::Success => "success",
            ToastKind::Warning => "warning",
            ToastKind::Error => "error",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub id: Ulid,
    pub message: String,
    pub kind: ToastKind,
    pub duration: Duration,
}

#[derive(Clone, Debug, Default)]
pub struct ToastStore {
    toasts: Observable<Vec<Toast>>,
}

impl ToastStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.get()
    }

    #[must_use]
    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<Vec<Toast>> {
        self.toasts.subscribe()
    }

    pub fn add(&self, message: impl Into<String>, kind: ToastKind) -> Ulid {
        self.add_with_duration(message, kind, DEFAULT_DURATION)
    }

    /// Queues a toast and schedules its removal. Outside a tokio runtime no
    /// timer is scheduled and the toast stays until removed.
    pub fn add_with_duration(
        &self,
        message: impl Into<String>,
        kind: ToastKind,
        duration: Duration,
    ) -> Ulid {
        let toast = Toast {
            id: Ulid::new(),
            message: message.into(),
            kind,
            duration,
        };
        let id = toast.id;
        debug!(%id, %kind, "toast queued");
        self.toasts.update(|toasts| toasts.push(toast));

        if !duration.is_zero() {
            if let Ok(handle) = Handle::try_current() {
                let store = self.clone();
                handle.spawn(async move {
                    tokio::time::sleep(duration).await;
                    store.remove(id);
                });
            }
        }

        id
    }

    /// Removes a toast; unknown ids are ignored.
    pub fn remove(&self, id: Ulid) {
        self.toasts.update(|toasts| toasts.retain(|toast| toast.id != id));
    }

    pub fn clear(&self) {
        self.toasts.set(Vec::new());
    }

    /// Removes and returns every pending toast.
    #[must_use]
    pub fn drain(&self) -> Vec<Toast> {
        let mut drained = Vec::new();
        self.toasts
            .update(|toasts| drained = std::mem::take(toasts));
        drained
    }

    pub fn success(&self, message: impl Into<String>) -> Ulid {
        self.add_with_duration(message, ToastKind::Success, DEFAULT_DURATION)
    }

    pub fn error(&self, message: impl Into<String>) -> Ulid {
        self.add_with_duration(message, ToastKind::Error, ERROR_DURATION)
    }

    pub fn warning(&self, message: impl Into<String>) -> Ulid {
        self.add_with_duration(message, ToastKind::Warning, WARNING_DURATION)
    }

    pub fn info(&self, message: impl Into<String>) -> Ulid {
        self.add_with_duration(message, ToastKind::Info, DEFAULT_DURATION)
    }
}
