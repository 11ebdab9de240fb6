use std::{
    fmt,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tracing::debug;

use crate::sink::BannerSink;

/// Visual weight of a banner, named after the Bootstrap alert classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BannerKind {
    #[default]
    Info,
    Success,
    Warning,
    Danger,
}

impl BannerKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

impl fmt::Display for BannerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle for one banner, unique per [`NotificationBoard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BannerId(pub u64);

/// A dismissible notification currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub id: BannerId,
    pub kind: BannerKind,
    pub message: String,
}

struct BoardInner {
    sink: Arc<dyn BannerSink>,
    timeout: Duration,
    next_id: AtomicU64,
    active: Mutex<Vec<Banner>>,
}

/// Shows transient banners and takes each one down after a fixed delay.
///
/// The removal timer is not cancellable. Dismissing a banner early just makes
/// the later timed removal a no-op.
#[derive(Clone)]
pub struct NotificationBoard {
    inner: Arc<BoardInner>,
}

impl fmt::Debug for NotificationBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationBoard")
            .field("timeout", &self.inner.timeout)
            .field("active", &self.lock_active().len())
            .finish_non_exhaustive()
    }
}

impl NotificationBoard {
    pub fn new(sink: Arc<dyn BannerSink>, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(BoardInner {
                sink,
                timeout,
                next_id: AtomicU64::new(1),
                active: Mutex::new(Vec::new()),
            }),
        }
    }

    fn lock_active(&self) -> MutexGuard<'_, Vec<Banner>> {
        self.inner
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a banner and schedule its removal.
    ///
    /// Must be called from within a Tokio runtime; the removal runs on a
    /// spawned task.
    pub fn show(&self, message: impl Into<String>, kind: BannerKind) -> BannerId {
        let banner = Banner {
            id: BannerId(self.inner.next_id.fetch_add(1, Ordering::Relaxed)),
            kind,
            message: message.into(),
        };
        let id = banner.id;

        self.lock_active().push(banner.clone());
        self.inner.sink.show_banner(&banner);

        let board = self.clone();
        let timeout = self.inner.timeout;
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            if board.remove(id) {
                debug!(banner = id.0, "notification expired");
            }
        });

        id
    }

    /// Remove a banner before its timer fires. Returns `false` if it was already gone.
    pub fn dismiss(&self, id: BannerId) -> bool {
        self.remove(id)
    }

    /// Snapshot of the banners currently shown, oldest first.
    #[must_use]
    pub fn active(&self) -> Vec<Banner> {
        self.lock_active().clone()
    }

    fn remove(&self, id: BannerId) -> bool {
        let removed = {
            let mut active = self.lock_active();
            active
                .iter()
                .position(|banner| banner.id == id)
                .map(|index| active.remove(index))
        };
        if removed.is_some() {
            self.inner.sink.remove_banner(id);
        }
        removed.is_some()
    }
}
