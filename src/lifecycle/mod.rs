pub mod controller;
pub mod page;
pub mod state;

pub use controller::{
    PageLifecycleController, ShellPorts, FAILURE_MARKUP, LOGIN_HASH, NOT_FOUND_MARKUP,
};
pub use page::{AuthGate, Page, PageContext, SessionAuth, UserProfile};
pub use state::{CycleOutcome, LifecycleState, NavigationSnapshot};
