use std::sync::Arc;

use serde::Serialize;

use crate::{ports::NativeTransition, routes::ConcreteRoute};

use super::kind::{TransitionKind, ARCHIVE};

/// Body class that selects the outgoing animation style. At most one is
/// active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarkerClass {
    #[serde(rename = "from-settings")]
    FromSettings,
    #[serde(rename = "from-about")]
    FromAbout,
    #[serde(rename = "from-archive")]
    FromArchive,
    #[serde(rename = "from-detail")]
    FromDetail,
    #[serde(rename = "from-archive-to-detail")]
    FromArchiveToDetail,
    #[serde(rename = "from-detail-to-archive")]
    FromDetailToArchive,
}

impl MarkerClass {
    pub const ALL: [MarkerClass; 6] = [
        MarkerClass::FromSettings,
        MarkerClass::FromAbout,
        MarkerClass::FromArchive,
        MarkerClass::FromDetail,
        MarkerClass::FromArchiveToDetail,
        MarkerClass::FromDetailToArchive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerClass::FromSettings => "from-settings",
            MarkerClass::FromAbout => "from-about",
            MarkerClass::FromArchive => "from-archive",
            MarkerClass::FromDetail => "from-detail",
            MarkerClass::FromArchiveToDetail => "from-archive-to-detail",
            MarkerClass::FromDetailToArchive => "from-detail-to-archive",
        }
    }

    pub fn all_names() -> [&'static str; 6] {
        Self::ALL.map(|marker| marker.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ScrollPolicy {
    ResetToTop,
    /// Keep the list position so the user lands where they left off.
    Preserve,
}

impl From<TransitionKind> for ScrollPolicy {
    fn from(kind: TransitionKind) -> Self {
        match kind {
            TransitionKind::DetailExit | TransitionKind::PaginationMove => ScrollPolicy::Preserve,
            _ => ScrollPolicy::ResetToTop,
        }
    }
}

/// Decisions for one navigation. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionPlan {
    pub kind: TransitionKind,
    pub use_native_transition: bool,
    pub marker: Option<MarkerClass>,
    pub scroll: ScrollPolicy,
    pub is_pagination_move: bool,
    pub is_detail_entry: bool,
    pub is_detail_exit: bool,
}

/// Pages that animate in from a listing and back out to one.
const ANIMATED_SECTIONS: [&str; 4] = ["/settings", "/about", ARCHIVE, "/create-story"];

const AUTH_PAGES: [&str; 2] = ["/login", "/register"];

/// Classifies route changes and decides how the content swap is presented.
#[derive(Clone)]
pub struct TransitionCoordinator {
    native: Arc<dyn NativeTransition>,
}

impl TransitionCoordinator {
    pub fn new(native: Arc<dyn NativeTransition>) -> Self {
        Self { native }
    }

    pub fn native(&self) -> &Arc<dyn NativeTransition> {
        &self.native
    }

    pub fn plan(&self, previous: Option<&ConcreteRoute>, current: &ConcreteRoute) -> TransitionPlan {
        let kind = TransitionKind::classify(previous, current);
        TransitionPlan {
            kind,
            use_native_transition: self.should_animate(previous, current),
            marker: marker_class(previous, current),
            scroll: ScrollPolicy::from(kind),
            is_pagination_move: kind == TransitionKind::PaginationMove,
            is_detail_entry: kind == TransitionKind::DetailEntry,
            is_detail_exit: kind == TransitionKind::DetailExit,
        }
    }

    /// Closed whitelist; anything not listed swaps instantly.
    pub fn should_animate(&self, previous: Option<&ConcreteRoute>, current: &ConcreteRoute) -> bool {
        if !self.native.has_native_transition() {
            return false;
        }
        let Some(previous) = previous else {
            return false;
        };

        match TransitionKind::classify(Some(previous), current) {
            TransitionKind::DetailEntry
            | TransitionKind::DetailExit
            | TransitionKind::ArchiveDetailEntry
            | TransitionKind::DetailArchiveExit => return true,
            TransitionKind::PaginationMove | TransitionKind::Plain => {}
        }

        if current.is_listing() && AUTH_PAGES.iter().any(|page| previous.is(page)) {
            return true;
        }

        ANIMATED_SECTIONS.iter().any(|section| {
            (previous.is_listing() && current.is(section))
                || (previous.is(section) && current.is_listing())
        })
    }
}

/// First match wins, in this order.
pub fn marker_class(previous: Option<&ConcreteRoute>, current: &ConcreteRoute) -> Option<MarkerClass> {
    let previous = previous?;
    let to_listing = current.is_listing();

    if previous.is("/settings") && to_listing {
        return Some(MarkerClass::FromSettings);
    }
    if previous.is("/about") && to_listing {
        return Some(MarkerClass::FromAbout);
    }
    if previous.is(ARCHIVE) && to_listing {
        return Some(MarkerClass::FromArchive);
    }

    match TransitionKind::classify(Some(previous), current) {
        TransitionKind::DetailExit => Some(MarkerClass::FromDetail),
        TransitionKind::ArchiveDetailEntry => Some(MarkerClass::FromArchiveToDetail),
        TransitionKind::DetailArchiveExit => Some(MarkerClass::FromDetailToArchive),
        _ => None,
    }
}
