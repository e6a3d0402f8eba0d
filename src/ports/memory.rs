//! In-process implementations of the host ports, used by the headless
//! driver and the tests.

use std::{
    collections::{BTreeSet, VecDeque},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex, MutexGuard,
    },
    time::Duration,
};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::{BodyClasses, ContentRegion, LocationPort, NativeTransition, SwapFuture, Viewport};
use crate::error::TransitionError;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Location hash with a queue of pending route-change events.
#[derive(Default)]
pub struct MemoryLocation {
    hash: Mutex<String>,
    pending: Mutex<VecDeque<String>>,
}

impl MemoryLocation {
    pub fn new(hash: &str) -> Self {
        Self {
            hash: Mutex::new(hash.to_string()),
            pending: Mutex::new(VecDeque::new()),
        }
    }

    /// Next queued route change, oldest first.
    pub fn take_pending(&self) -> Option<String> {
        lock(&self.pending).pop_front()
    }
}

impl LocationPort for MemoryLocation {
    fn hash(&self) -> String {
        lock(&self.hash).clone()
    }

    fn set_hash(&self, hash: &str) {
        let hash = if hash.starts_with('#') {
            hash.to_string()
        } else {
            format!("#{hash}")
        };
        *lock(&self.hash) = hash.clone();
        lock(&self.pending).push_back(hash);
    }
}

#[derive(Default)]
pub struct MemoryContent {
    markup: Mutex<String>,
    writes: AtomicUsize,
}

impl MemoryContent {
    pub fn markup(&self) -> String {
        lock(&self.markup).clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl ContentRegion for MemoryContent {
    fn set_markup(&self, markup: String) {
        *lock(&self.markup) = markup;
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct MemoryBodyClasses {
    classes: Mutex<BTreeSet<String>>,
}

impl MemoryBodyClasses {
    pub fn classes(&self) -> Vec<String> {
        lock(&self.classes).iter().cloned().collect()
    }

    pub fn contains(&self, class: &str) -> bool {
        lock(&self.classes).contains(class)
    }
}

impl BodyClasses for MemoryBodyClasses {
    fn remove(&self, classes: &[&str]) {
        let mut guard = lock(&self.classes);
        for class in classes {
            guard.remove(*class);
        }
    }

    fn add(&self, class: &str) {
        lock(&self.classes).insert(class.to_string());
    }
}

#[derive(Default)]
pub struct MemoryViewport {
    resets: AtomicUsize,
    focused: Mutex<Vec<String>>,
    no_items: bool,
}

impl MemoryViewport {
    /// Viewport with no story cards on screen; every focus attempt misses.
    pub fn without_items() -> Self {
        Self {
            no_items: true,
            ..Self::default()
        }
    }

    pub fn reset_count(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }

    pub fn focused(&self) -> Vec<String> {
        lock(&self.focused).clone()
    }
}

impl Viewport for MemoryViewport {
    fn scroll_to_top(&self) {
        self.resets.fetch_add(1, Ordering::SeqCst);
    }

    fn focus_item(&self, item_id: &str) -> bool {
        if self.no_items {
            return false;
        }
        lock(&self.focused).push(item_id.to_string());
        true
    }
}

/// View transition that applies the swap immediately and then settles
/// after `settle`, unless cancelled first.
pub struct SimulatedTransition {
    available: bool,
    settle: Duration,
    runs: AtomicUsize,
}

impl SimulatedTransition {
    pub fn new(available: bool, settle: Duration) -> Self {
        Self {
            available,
            settle,
            runs: AtomicUsize::new(0),
        }
    }

    pub fn unavailable() -> Self {
        Self::new(false, Duration::ZERO)
    }

    /// Number of swaps that went through the transition.
    pub fn run_count(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NativeTransition for SimulatedTransition {
    fn has_native_transition(&self) -> bool {
        self.available
    }

    async fn run_transition(
        &self,
        swap: SwapFuture<'_>,
        cancel: CancellationToken,
    ) -> Result<(), TransitionError> {
        if !self.available {
            return Err(TransitionError::Aborted(
                "view transitions are not supported".into(),
            ));
        }

        self.runs.fetch_add(1, Ordering::SeqCst);
        swap.await?;

        tokio::select! {
            _ = cancel.cancelled() => Err(TransitionError::Aborted(
                "superseded by a newer navigation".into(),
            )),
            _ = tokio::time::sleep(self.settle) => Ok(()),
        }
    }
}
