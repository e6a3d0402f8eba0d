pub mod store;

pub use store::{ArchiveStore, Notice, NoticeLevel, ToggleOutcome};
