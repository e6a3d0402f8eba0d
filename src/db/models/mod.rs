pub mod saved_item;

pub use saved_item::{SavedItem, StoryRecord};
