use serde::Serialize;

use crate::{continuity::ContinuitySnapshot, routes::ConcreteRoute, transition::TransitionPlan};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum LifecycleState {
    #[default]
    Idle,
    Rendering,
    Transitioning,
    Settled,
}

/// How one navigation cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    Rendered {
        route: ConcreteRoute,
        plan: TransitionPlan,
    },
    /// No page handles the route; the not-found state is showing.
    NotFound(ConcreteRoute),
    /// Navigation was redirected to this hash; the host will fire a new cycle.
    Redirected(String),
    /// A newer navigation took over before this one finished.
    Superseded,
    /// The cycle failed and the generic failure state is showing.
    Failed,
}

/// Read-only view of the controller for pages that build their own
/// back-navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationSnapshot {
    pub state: LifecycleState,
    pub current_route: Option<ConcreteRoute>,
    pub previous_route: Option<ConcreteRoute>,
    pub continuity: ContinuitySnapshot,
}
