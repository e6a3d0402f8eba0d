//! Host capabilities the shell drives.
//!
//! Each capability is injected once at startup; handlers hold these
//! references instead of rediscovering host objects on every navigation.

pub mod memory;

use std::{future::Future, pin::Pin};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::{ShellError, TransitionError};

pub use memory::{
    MemoryBodyClasses, MemoryContent, MemoryLocation, MemoryViewport, SimulatedTransition,
};

/// The location hash (`#/story/abc`).
pub trait LocationPort: Send + Sync {
    fn hash(&self) -> String;
    /// Navigates by replacing the hash. Hosts fire a new route-change event.
    fn set_hash(&self, hash: &str);
}

/// The main content region pages render into.
pub trait ContentRegion: Send + Sync {
    fn set_markup(&self, markup: String);
}

/// Class list of the document body.
pub trait BodyClasses: Send + Sync {
    fn remove(&self, classes: &[&str]);
    fn add(&self, class: &str);
}

pub trait Viewport: Send + Sync {
    fn scroll_to_top(&self);
    /// Scrolls to and highlights the card for `item_id`. `false` if it is not on screen.
    fn focus_item(&self, item_id: &str) -> bool;
}

/// Content mutation handed to the native transition.
pub type SwapFuture<'a> = Pin<Box<dyn Future<Output = Result<(), ShellError>> + Send + 'a>>;

/// Host view-transition capability. Queried, never polyfilled.
#[async_trait]
pub trait NativeTransition: Send + Sync {
    fn has_native_transition(&self) -> bool;

    /// Runs `swap` inside a view transition and resolves once the transition
    /// is ready. Cancelling `cancel` aborts the animation; a swap that has
    /// already been applied stays applied.
    async fn run_transition(
        &self,
        swap: SwapFuture<'_>,
        cancel: CancellationToken,
    ) -> Result<(), TransitionError>;
}
