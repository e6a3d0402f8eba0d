use std::sync::Arc;

use log::debug;
use serde::Serialize;

use crate::routes::page_number;

use super::storage::SessionStorage;

const LAST_VIEWED_PAGE: &str = "lastViewedPage";
const LAST_VIEWED_STORY_ID: &str = "lastViewedStoryId";

pub const DEFAULT_PAGE: &str = "1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinuitySnapshot {
    pub last_viewed_page: Option<String>,
    pub last_viewed_story_id: Option<String>,
}

/// Remembers which listing page led to a story so returning from the story
/// lands on that page, focused on that story.
#[derive(Clone)]
pub struct NavigationContinuityStore {
    storage: Arc<dyn SessionStorage>,
}

impl NavigationContinuityStore {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    pub fn last_viewed_page(&self) -> Option<String> {
        self.storage.get_item(LAST_VIEWED_PAGE)
    }

    pub fn last_viewed_story_id(&self) -> Option<String> {
        self.storage.get_item(LAST_VIEWED_STORY_ID)
    }

    pub fn snapshot(&self) -> ContinuitySnapshot {
        ContinuitySnapshot {
            last_viewed_page: self.last_viewed_page(),
            last_viewed_story_id: self.last_viewed_story_id(),
        }
    }

    /// Records the story being opened and the page to return to.
    ///
    /// The page comes from `current_hash` if it is paginated, else from
    /// `referrer_hash`, else the page already stored, else page one. The
    /// last tier covers stories opened from routes without a page number,
    /// such as a map popup.
    pub fn record_detail_entry(&self, id: &str, current_hash: &str, referrer_hash: Option<&str>) {
        self.storage.set_item(LAST_VIEWED_STORY_ID, id);

        let page = page_number(current_hash)
            .or_else(|| referrer_hash.and_then(page_number))
            .map(|page| page.to_string())
            .or_else(|| self.last_viewed_page())
            .unwrap_or_else(|| DEFAULT_PAGE.to_string());

        debug!("Recorded detail entry for story {id} from page {page}");
        self.storage.set_item(LAST_VIEWED_PAGE, &page);
    }

    /// Records the listing page currently on screen.
    pub fn record_listing_page(&self, page: u32) {
        self.storage.set_item(LAST_VIEWED_PAGE, &page.to_string());
    }

    /// Story waiting to be focused on `current_page`, without clearing it.
    ///
    /// `None` when nothing is pending or when the pending story belongs to a
    /// different page (the controller redirects there first).
    pub fn pending_return_focus(&self, current_page: u32) -> Option<String> {
        let story_id = self.last_viewed_story_id()?;

        if let Some(page) = self.last_viewed_page() {
            if page.parse::<u32>().ok() != Some(current_page) {
                debug!("Return focus for story {story_id} waits for page {page}");
                return None;
            }
        }

        Some(story_id)
    }

    /// Focuses the pending story through `focus` and clears it once focus
    /// lands. A miss keeps the story pending for the next render of the page.
    pub fn consume_return_focus(
        &self,
        current_page: u32,
        focus: impl FnOnce(&str) -> bool,
    ) -> Option<String> {
        let story_id = self.pending_return_focus(current_page)?;

        if !focus(&story_id) {
            debug!("Story {story_id} not found on page {current_page}");
            return None;
        }

        self.storage.remove_item(LAST_VIEWED_STORY_ID);
        Some(story_id)
    }

    /// Page to redirect to when a story is left for the bare root route.
    pub fn root_redirect_page(&self) -> Option<String> {
        self.last_viewed_page()
            .filter(|page| page != DEFAULT_PAGE && page.parse::<u32>().is_ok())
    }
}
