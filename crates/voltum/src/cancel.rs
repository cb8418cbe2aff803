use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation handle shared between a host and a running parse.
///
/// Clones observe the same flag; a [`child`](CancelToken::child) is cancelled
/// together with its parent but can also be cancelled on its own.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<CancelState>,
}

#[derive(Debug, Default)]
struct CancelState {
    local: AtomicBool,
    parent: Option<Arc<CancelState>>,
}

impl CancelState {
    fn is_cancelled(&self) -> bool {
        if self.local.load(Ordering::SeqCst) {
            return true;
        }
        self.parent
            .as_ref()
            .is_some_and(|parent| parent.is_cancelled())
    }
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn child(&self) -> Self {
        Self {
            inner: Arc::new(CancelState {
                local: AtomicBool::new(false),
                parent: Some(self.inner.clone()),
            }),
        }
    }

    pub fn cancel(&self) {
        self.inner.local.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled()
    }
}
