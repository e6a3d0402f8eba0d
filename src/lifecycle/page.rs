use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::routes::{ConcreteRoute, KnownRoute, NormalizedRoute, Segments};

/// What a page sees of the navigation that is rendering it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    pub route: ConcreteRoute,
    pub normalized: NormalizedRoute,
    pub segments: Segments,
}

impl PageContext {
    /// Listing page number; `/` counts as page one.
    pub fn page_number(&self) -> Option<u32> {
        if self.route.is_root() {
            Some(1)
        } else {
            self.route.page_number()
        }
    }
}

/// Lifecycle hooks of a routed page.
///
/// `destroy` runs before the page is swapped out and must release anything
/// `after_render` acquired (camera streams, map instances).
#[async_trait]
pub trait Page: Send + Sync {
    async fn render(&self, ctx: &PageContext) -> Result<String>;

    async fn after_render(&self, _ctx: &PageContext) -> Result<()> {
        Ok(())
    }

    fn destroy(&self) {}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    pub name: String,
}

/// Session knowledge owned by the authentication collaborator.
pub trait AuthGate: Send + Sync {
    fn is_authenticated(&self) -> bool;

    fn current_user(&self) -> Option<UserProfile>;

    /// Everything except the sign-in pages, the guest story form and the
    /// not-found page needs a session. Unknown routes do too.
    fn requires_auth(&self, route: &NormalizedRoute) -> bool {
        KnownRoute::from_normalized(route)
            .map(|known| !known.is_public())
            .unwrap_or(true)
    }
}

/// Auth gate backed by an in-process user slot.
#[derive(Default)]
pub struct SessionAuth {
    user: RwLock<Option<UserProfile>>,
}

impl SessionAuth {
    pub fn signed_in(user: UserProfile) -> Self {
        Self {
            user: RwLock::new(Some(user)),
        }
    }

    pub fn sign_in(&self, user: UserProfile) {
        match self.user.write() {
            Ok(mut guard) => *guard = Some(user),
            Err(poisoned) => *poisoned.into_inner() = Some(user),
        }
    }

    pub fn sign_out(&self) {
        match self.user.write() {
            Ok(mut guard) => *guard = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }
}

impl AuthGate for SessionAuth {
    fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    fn current_user(&self) -> Option<UserProfile> {
        match self.user.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_routes_skip_auth() {
        let auth = SessionAuth::default();
        assert!(!auth.requires_auth(&NormalizedRoute::from("/login")));
        assert!(!auth.requires_auth(&NormalizedRoute::from("/guest-story")));
        assert!(auth.requires_auth(&NormalizedRoute::from("/archive")));
        assert!(auth.requires_auth(&NormalizedRoute::from("/story/:id")));
        assert!(auth.requires_auth(&NormalizedRoute::from("/unknown")));
    }

    #[test]
    fn sign_in_and_out() {
        let auth = SessionAuth::default();
        assert!(!auth.is_authenticated());

        auth.sign_in(UserProfile {
            user_id: "user-1".into(),
            name: "Rina".into(),
        });
        assert_eq!(auth.current_user().map(|u| u.name).as_deref(), Some("Rina"));

        auth.sign_out();
        assert!(auth.current_user().is_none());
    }
}
