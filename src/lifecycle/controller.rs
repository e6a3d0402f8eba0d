use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc, Mutex as StdMutex,
};

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::{
    continuity::{NavigationContinuityStore, DEFAULT_PAGE},
    error::{ShellError, TransitionError},
    ports::{BodyClasses, ContentRegion, LocationPort, Viewport},
    routes::{normalize_route, parse_segments, raw_path, ConcreteRoute, RouteTable},
    transition::{MarkerClass, ScrollPolicy, TransitionCoordinator, TransitionPlan},
};
use crate::{log_debug, log_error, log_info, log_warn};

use super::{
    page::{AuthGate, Page, PageContext},
    state::{CycleOutcome, LifecycleState, NavigationSnapshot},
};

const ENABLE_LOGS: bool = true;

pub const NOT_FOUND_MARKUP: &str = r#"<div class="container"><h2>404 - Page Not Found</h2></div>"#;
pub const FAILURE_MARKUP: &str =
    r#"<div class="container"><h2>Something went wrong</h2><p>Please try again later</p></div>"#;
pub const LOGIN_HASH: &str = "#/login";

/// Host capabilities the controller writes to.
#[derive(Clone)]
pub struct ShellPorts {
    pub location: Arc<dyn LocationPort>,
    pub content: Arc<dyn ContentRegion>,
    pub body: Arc<dyn BodyClasses>,
    pub viewport: Arc<dyn Viewport>,
}

#[derive(Default)]
struct ControllerState {
    lifecycle: LifecycleState,
    current_page: Option<Arc<dyn Page>>,
    last_route: Option<ConcreteRoute>,
    route_before_last: Option<ConcreteRoute>,
    /// Route the open story was entered from.
    detail_referrer: Option<ConcreteRoute>,
}

/// Runs one render cycle per route change.
///
/// Every cycle takes a fresh epoch. A cycle that resumes after an await and
/// finds a newer epoch stops without touching content, markers, continuity
/// or the page slot, so the latest navigation always wins.
pub struct PageLifecycleController {
    routes: RouteTable,
    auth: Arc<dyn AuthGate>,
    coordinator: TransitionCoordinator,
    continuity: NavigationContinuityStore,
    ports: ShellPorts,
    epoch: AtomicU64,
    in_flight: StdMutex<Option<CancellationToken>>,
    state: Mutex<ControllerState>,
}

impl PageLifecycleController {
    pub fn new(
        routes: RouteTable,
        auth: Arc<dyn AuthGate>,
        coordinator: TransitionCoordinator,
        continuity: NavigationContinuityStore,
        ports: ShellPorts,
    ) -> Self {
        Self {
            routes,
            auth,
            coordinator,
            continuity,
            ports,
            epoch: AtomicU64::new(0),
            in_flight: StdMutex::new(None),
            state: Mutex::new(ControllerState::default()),
        }
    }

    pub fn continuity(&self) -> &NavigationContinuityStore {
        &self.continuity
    }

    /// Handles the route currently in the location hash. Never fails: errors
    /// render the failure state and the controller stays usable.
    pub async fn handle_navigation(&self) -> CycleOutcome {
        let (epoch, cancel) = self.begin_cycle();

        match self.run_cycle(epoch, &cancel).await {
            Ok(outcome) => outcome,
            Err(err) => {
                if !self.is_current(epoch) {
                    return CycleOutcome::Superseded;
                }
                log_error!("Error rendering page: {err}");
                self.ports.content.set_markup(FAILURE_MARKUP.to_string());
                self.state.lock().await.lifecycle = LifecycleState::Settled;
                CycleOutcome::Failed
            }
        }
    }

    pub async fn snapshot(&self) -> NavigationSnapshot {
        let state = self.state.lock().await;
        NavigationSnapshot {
            state: state.lifecycle,
            current_route: state.last_route.clone(),
            previous_route: state.route_before_last.clone(),
            continuity: self.continuity.snapshot(),
        }
    }

    /// Hash the open story's "back" action should lead to.
    pub async fn back_target(&self) -> String {
        let state = self.state.lock().await;
        if state
            .detail_referrer
            .as_ref()
            .is_some_and(|referrer| referrer.is("/archive"))
        {
            return "#/archive".to_string();
        }

        match self.continuity.last_viewed_page() {
            Some(page) if page != DEFAULT_PAGE => format!("#/page/{page}"),
            _ => "#/".to_string(),
        }
    }

    fn begin_cycle(&self) -> (u64, CancellationToken) {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let token = CancellationToken::new();

        let mut in_flight = match self.in_flight.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(previous) = in_flight.replace(token.clone()) {
            previous.cancel();
        }

        (epoch, token)
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.epoch.load(Ordering::SeqCst) == epoch
    }

    async fn run_cycle(
        &self,
        epoch: u64,
        cancel: &CancellationToken,
    ) -> Result<CycleOutcome, ShellError> {
        let path = raw_path(&self.ports.location.hash());
        let route = ConcreteRoute::new(path.clone());
        let segments = parse_segments(&path);
        let normalized = normalize_route(&segments);

        let Some(page) = self.routes.resolve(&normalized) else {
            log_warn!("{}", ShellError::RouteUnresolved(normalized.to_string()));
            self.ports.content.set_markup(NOT_FOUND_MARKUP.to_string());
            self.state.lock().await.lifecycle = LifecycleState::Settled;
            return Ok(CycleOutcome::NotFound(route));
        };

        if self.auth.requires_auth(&normalized) && !self.auth.is_authenticated() {
            log_info!("Route {route} needs a session; redirecting to login");
            self.ports.location.set_hash(LOGIN_HASH);
            return Ok(CycleOutcome::Redirected(LOGIN_HASH.to_string()));
        }

        let previous = self.state.lock().await.last_route.clone();
        let plan = self.coordinator.plan(previous.as_ref(), &route);

        if plan.is_detail_exit && route.is_root() {
            if let Some(page) = self.continuity.root_redirect_page() {
                let target = format!("#/page/{page}");
                log_info!("Returning from story to listing page {page}");
                self.ports.location.set_hash(&target);
                return Ok(CycleOutcome::Redirected(target));
            }
        }

        {
            let mut state = self.state.lock().await;
            if !self.is_current(epoch) {
                return Ok(CycleOutcome::Superseded);
            }
            if let Some(outgoing) = state.current_page.take() {
                log_debug!("Tearing down page before {route}");
                outgoing.destroy();
            }
            state.current_page = Some(page.clone());
            state.lifecycle = if plan.use_native_transition {
                LifecycleState::Transitioning
            } else {
                LifecycleState::Rendering
            };
        }

        let ctx = PageContext {
            route: route.clone(),
            normalized,
            segments,
        };
        let applied = AtomicBool::new(false);

        if plan.use_native_transition {
            let swap = self.swap_content(epoch, &page, &ctx, &applied);
            match self
                .coordinator
                .native()
                .run_transition(Box::pin(swap), cancel.clone())
                .await
            {
                Ok(()) => {}
                Err(TransitionError::Swap(err)) => return Err(err),
                Err(abort @ TransitionError::Aborted(_)) => {
                    log_warn!("View transition failed: {abort}");
                    if self.is_current(epoch) && !applied.load(Ordering::SeqCst) {
                        self.swap_content(epoch, &page, &ctx, &applied).await?;
                    }
                }
            }
        } else {
            self.swap_content(epoch, &page, &ctx, &applied).await?;
        }

        if !self.is_current(epoch) {
            log_debug!("Navigation to {route} superseded");
            return Ok(CycleOutcome::Superseded);
        }

        self.settle(&route, &plan).await;
        Ok(CycleOutcome::Rendered { route, plan })
    }

    async fn swap_content(
        &self,
        epoch: u64,
        page: &Arc<dyn Page>,
        ctx: &PageContext,
        applied: &AtomicBool,
    ) -> Result<(), ShellError> {
        let markup = page
            .render(ctx)
            .await
            .map_err(|source| ShellError::PageRender {
                route: ctx.route.to_string(),
                source,
            })?;

        // A newer navigation owns the content region now.
        if !self.is_current(epoch) {
            return Ok(());
        }

        self.ports.content.set_markup(markup);
        applied.store(true, Ordering::SeqCst);

        let result = page
            .after_render(ctx)
            .await
            .map_err(|source| ShellError::PageRender {
                route: ctx.route.to_string(),
                source,
            });

        if !self.is_current(epoch) {
            self.release_discarded(page).await;
        }
        result
    }

    /// Tears down a page whose `after_render` finished after a newer
    /// navigation took over. A page still in the slot is left for the
    /// cycle that replaces it.
    async fn release_discarded(&self, page: &Arc<dyn Page>) {
        let state = self.state.lock().await;
        let still_mounted = state
            .current_page
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, page));
        if !still_mounted {
            log_debug!("Releasing page superseded during after_render");
            page.destroy();
        }
    }

    async fn settle(&self, route: &ConcreteRoute, plan: &TransitionPlan) {
        self.ports.body.remove(&MarkerClass::all_names());
        if let Some(marker) = plan.marker {
            self.ports.body.add(marker.as_str());
        }

        if plan.scroll == ScrollPolicy::ResetToTop {
            self.ports.viewport.scroll_to_top();
        }

        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        if let Some(story_id) = route.story_id() {
            let referrer = state.last_route.as_ref().map(ConcreteRoute::as_str);
            self.continuity
                .record_detail_entry(story_id, route.as_str(), referrer);
            state.detail_referrer = state.last_route.clone();
        } else if route.is_listing() {
            let page = route.page_number().unwrap_or(1);
            let viewport = &self.ports.viewport;
            if let Some(story_id) = self
                .continuity
                .consume_return_focus(page, |id| viewport.focus_item(id))
            {
                log_info!("Focused on story {story_id} on page {page}");
            }
            self.continuity.record_listing_page(page);
        }

        state.route_before_last = state.last_route.replace(route.clone());
        state.lifecycle = LifecycleState::Settled;
    }
}
