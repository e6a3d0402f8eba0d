use std::{collections::HashMap, sync::Arc};

use crate::lifecycle::Page;

use super::parser::NormalizedRoute;

/// The closed route vocabulary of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownRoute {
    Home,
    Paginated,
    StoryDetail,
    Login,
    Register,
    Settings,
    About,
    Archive,
    CreateStory,
    GuestStory,
    NotFound,
}

impl KnownRoute {
    pub const ALL: [KnownRoute; 11] = [
        KnownRoute::Home,
        KnownRoute::Paginated,
        KnownRoute::StoryDetail,
        KnownRoute::Login,
        KnownRoute::Register,
        KnownRoute::Settings,
        KnownRoute::About,
        KnownRoute::Archive,
        KnownRoute::CreateStory,
        KnownRoute::GuestStory,
        KnownRoute::NotFound,
    ];

    pub fn pattern(&self) -> &'static str {
        match self {
            KnownRoute::Home => "/",
            KnownRoute::Paginated => "/page/:page",
            KnownRoute::StoryDetail => "/story/:id",
            KnownRoute::Login => "/login",
            KnownRoute::Register => "/register",
            KnownRoute::Settings => "/settings",
            KnownRoute::About => "/about",
            KnownRoute::Archive => "/archive",
            KnownRoute::CreateStory => "/create-story",
            KnownRoute::GuestStory => "/guest-story",
            KnownRoute::NotFound => "/not-found",
        }
    }

    pub fn from_normalized(route: &NormalizedRoute) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|known| known.pattern() == route.as_str())
    }

    /// Routes reachable without signing in.
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            KnownRoute::Login | KnownRoute::Register | KnownRoute::GuestStory | KnownRoute::NotFound
        )
    }

    pub fn normalized(&self) -> NormalizedRoute {
        NormalizedRoute::from(self.pattern())
    }
}

/// Static dispatch table from normalized route to page handler.
///
/// The same handler may be registered under several patterns (home and its
/// paginated form share one page).
#[derive(Default, Clone)]
pub struct RouteTable {
    entries: HashMap<NormalizedRoute, Arc<dyn Page>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, route: KnownRoute, page: Arc<dyn Page>) -> Self {
        self.entries.insert(route.normalized(), page);
        self
    }

    pub fn resolve(&self, route: &NormalizedRoute) -> Option<Arc<dyn Page>> {
        self.entries.get(route).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
