pub mod state;
pub mod storage;

pub use state::{ContinuitySnapshot, NavigationContinuityStore, DEFAULT_PAGE};
pub use storage::{MemorySessionStorage, SessionStorage};
