use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use anyhow::{bail, Result};
use async_trait::async_trait;
use tokio::sync::Notify;

use storyshell_lib::{
    continuity::{MemorySessionStorage, NavigationContinuityStore},
    lifecycle::{
        CycleOutcome, LifecycleState, Page, PageContext, PageLifecycleController, SessionAuth,
        ShellPorts, UserProfile, FAILURE_MARKUP, NOT_FOUND_MARKUP,
    },
    ports::{
        LocationPort, MemoryBodyClasses, MemoryContent, MemoryLocation, MemoryViewport,
        SimulatedTransition,
    },
    routes::{ConcreteRoute, KnownRoute, RouteTable},
    transition::{MarkerClass, TransitionCoordinator, TransitionKind},
};

type EventLog = Arc<Mutex<Vec<String>>>;

/// Renders its route and records every lifecycle hook.
struct RecordingPage {
    name: &'static str,
    events: EventLog,
}

impl RecordingPage {
    fn push(&self, event: &str) {
        self.events
            .lock()
            .unwrap()
            .push(format!("{event}:{}", self.name));
    }
}

#[async_trait]
impl Page for RecordingPage {
    async fn render(&self, ctx: &PageContext) -> Result<String> {
        self.push("render");
        Ok(format!("<main>{} {}</main>", self.name, ctx.route))
    }

    async fn after_render(&self, _ctx: &PageContext) -> Result<()> {
        self.push("after_render");
        Ok(())
    }

    fn destroy(&self) {
        self.push("destroy");
    }
}

struct BrokenPage;

#[async_trait]
impl Page for BrokenPage {
    async fn render(&self, _ctx: &PageContext) -> Result<String> {
        bail!("remote story API unreachable")
    }
}

/// Blocks in `render` until released.
struct SlowPage {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

#[async_trait]
impl Page for SlowPage {
    async fn render(&self, _ctx: &PageContext) -> Result<String> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok("<main>slow</main>".into())
    }
}

/// Story form whose camera comes up once `started` is notified.
struct CameraPage {
    entered: Arc<Notify>,
    started: Arc<Notify>,
    camera_open: Arc<AtomicBool>,
}

#[async_trait]
impl Page for CameraPage {
    async fn render(&self, _ctx: &PageContext) -> Result<String> {
        Ok("<form>camera</form>".into())
    }

    async fn after_render(&self, _ctx: &PageContext) -> Result<()> {
        self.entered.notify_one();
        self.started.notified().await;
        self.camera_open.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn destroy(&self) {
        self.camera_open.store(false, Ordering::SeqCst);
    }
}

struct Harness {
    controller: Arc<PageLifecycleController>,
    location: Arc<MemoryLocation>,
    content: Arc<MemoryContent>,
    body: Arc<MemoryBodyClasses>,
    viewport: Arc<MemoryViewport>,
    transition: Arc<SimulatedTransition>,
    events: EventLog,
}

impl Harness {
    fn build(
        auth: SessionAuth,
        viewport: MemoryViewport,
        customize: impl FnOnce(RouteTable, &EventLog) -> RouteTable,
    ) -> Self {
        let events: EventLog = Arc::default();
        let page = |name| -> Arc<dyn Page> {
            Arc::new(RecordingPage {
                name,
                events: events.clone(),
            })
        };
        let listing = page("listing");

        let routes = RouteTable::new()
            .route(KnownRoute::Home, listing.clone())
            .route(KnownRoute::Paginated, listing)
            .route(KnownRoute::StoryDetail, page("story"))
            .route(KnownRoute::Archive, page("archive"))
            .route(KnownRoute::Settings, page("settings"))
            .route(KnownRoute::About, page("about"))
            .route(KnownRoute::Login, page("login"))
            .route(KnownRoute::CreateStory, page("create"));
        let routes = customize(routes, &events);

        let location = Arc::new(MemoryLocation::new("#/"));
        let content = Arc::new(MemoryContent::default());
        let body = Arc::new(MemoryBodyClasses::default());
        let viewport = Arc::new(viewport);
        let transition = Arc::new(SimulatedTransition::new(true, Duration::ZERO));

        let controller = PageLifecycleController::new(
            routes,
            Arc::new(auth),
            TransitionCoordinator::new(transition.clone()),
            NavigationContinuityStore::new(Arc::new(MemorySessionStorage::new())),
            ShellPorts {
                location: location.clone(),
                content: content.clone(),
                body: body.clone(),
                viewport: viewport.clone(),
            },
        );

        Self {
            controller: Arc::new(controller),
            location,
            content,
            body,
            viewport,
            transition,
            events,
        }
    }

    fn signed_in() -> Self {
        Self::build(reader(), MemoryViewport::default(), |routes, _| routes)
    }

    /// Sets the hash and handles every route change it causes. Returns the
    /// outcome of each cycle in order.
    async fn go(&self, hash: &str) -> Vec<CycleOutcome> {
        self.location.set_hash(hash);
        let mut outcomes = Vec::new();
        while self.location.take_pending().is_some() {
            outcomes.push(self.controller.handle_navigation().await);
        }
        outcomes
    }

    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

fn reader() -> SessionAuth {
    SessionAuth::signed_in(UserProfile {
        user_id: "user-1".into(),
        name: "Rina".into(),
    })
}

fn rendered_route(outcome: &CycleOutcome) -> Option<&str> {
    match outcome {
        CycleOutcome::Rendered { route, .. } => Some(route.as_str()),
        _ => None,
    }
}

#[tokio::test]
async fn returning_to_root_restores_listing_page_and_focus() {
    let shell = Harness::signed_in();

    shell.go("#/page/3").await;
    shell.go("#/story/abc").await;

    let snapshot = shell.controller.snapshot().await;
    assert_eq!(snapshot.continuity.last_viewed_page.as_deref(), Some("3"));
    assert_eq!(snapshot.continuity.last_viewed_story_id.as_deref(), Some("abc"));

    let outcomes = shell.go("#/").await;
    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0], CycleOutcome::Redirected("#/page/3".into()));
    match &outcomes[1] {
        CycleOutcome::Rendered { route, plan } => {
            assert_eq!(route.as_str(), "/page/3");
            assert_eq!(plan.kind, TransitionKind::DetailExit);
            assert_eq!(plan.marker, Some(MarkerClass::FromDetail));
        }
        other => panic!("expected page 3 to render, got {other:?}"),
    }

    assert_eq!(shell.viewport.focused(), vec!["abc".to_string()]);
    assert_eq!(shell.location.hash(), "#/page/3");

    // Focus is handed out once.
    shell.go("#/page/3").await;
    assert_eq!(shell.viewport.focused().len(), 1);
    assert_eq!(shell.controller.continuity().last_viewed_story_id(), None);
}

#[tokio::test]
async fn leaving_story_for_page_one_root_stays_on_root() {
    let shell = Harness::signed_in();

    shell.go("#/").await;
    shell.go("#/story/s1").await;
    let outcomes = shell.go("#/").await;

    assert_eq!(outcomes.len(), 1);
    assert_eq!(rendered_route(&outcomes[0]), Some("/"));
    assert_eq!(shell.viewport.focused(), vec!["s1".to_string()]);
}

#[tokio::test]
async fn outgoing_page_is_destroyed_before_next_renders() {
    let shell = Harness::signed_in();

    shell.go("#/create-story").await;
    shell.go("#/about").await;

    assert_eq!(
        shell.events(),
        vec![
            "render:create",
            "after_render:create",
            "destroy:create",
            "render:about",
            "after_render:about",
        ]
    );
}

#[tokio::test]
async fn unknown_route_shows_not_found() {
    let shell = Harness::signed_in();

    let outcomes = shell.go("#/nowhere/at/all").await;

    assert_eq!(
        outcomes,
        vec![CycleOutcome::NotFound(ConcreteRoute::from("/nowhere/at/all"))]
    );
    assert_eq!(shell.content.markup(), NOT_FOUND_MARKUP);
    assert!(shell.events().is_empty());
}

#[tokio::test]
async fn protected_route_redirects_to_login() {
    let shell = Harness::build(SessionAuth::default(), MemoryViewport::default(), |routes, _| routes);

    let outcomes = shell.go("#/archive").await;

    assert_eq!(outcomes[0], CycleOutcome::Redirected("#/login".into()));
    assert_eq!(rendered_route(&outcomes[1]), Some("/login"));
    assert!(!shell.events().contains(&"render:archive".to_string()));
}

#[tokio::test]
async fn render_failure_shows_error_and_next_navigation_recovers() {
    let shell = Harness::build(reader(), MemoryViewport::default(), |routes, _| {
        routes.route(KnownRoute::About, Arc::new(BrokenPage))
    });

    let outcomes = shell.go("#/about").await;
    assert_eq!(outcomes, vec![CycleOutcome::Failed]);
    assert_eq!(shell.content.markup(), FAILURE_MARKUP);

    let outcomes = shell.go("#/settings").await;
    assert_eq!(rendered_route(&outcomes[0]), Some("/settings"));
    assert_eq!(shell.content.markup(), "<main>settings /settings</main>");
    assert_eq!(
        shell.controller.snapshot().await.state,
        LifecycleState::Settled
    );
}

#[tokio::test]
async fn stale_navigation_never_overwrites_newer_content() {
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let slow = Arc::new(SlowPage {
        entered: entered.clone(),
        release: release.clone(),
    });
    let shell = Harness::build(reader(), MemoryViewport::default(), move |routes, _| {
        routes.route(KnownRoute::About, slow)
    });

    shell.location.set_hash("#/about");
    shell.location.take_pending();
    let controller = shell.controller.clone();
    let stale = tokio::spawn(async move { controller.handle_navigation().await });
    entered.notified().await;

    let outcomes = shell.go("#/settings").await;
    assert_eq!(rendered_route(&outcomes[0]), Some("/settings"));

    release.notify_one();
    assert_eq!(stale.await.unwrap(), CycleOutcome::Superseded);

    assert_eq!(shell.content.markup(), "<main>settings /settings</main>");
    let snapshot = shell.controller.snapshot().await;
    assert_eq!(
        snapshot.current_route.as_ref().map(ConcreteRoute::as_str),
        Some("/settings")
    );
}

#[tokio::test]
async fn marker_classes_are_replaced_on_every_navigation() {
    let shell = Harness::signed_in();

    shell.go("#/").await;
    shell.go("#/settings").await;
    assert!(shell.body.classes().is_empty());

    shell.go("#/").await;
    assert_eq!(shell.body.classes(), vec!["from-settings".to_string()]);

    shell.go("#/archive").await;
    assert!(shell.body.classes().is_empty());

    shell.go("#/story/a9").await;
    assert_eq!(shell.body.classes(), vec!["from-archive-to-detail".to_string()]);

    shell.go("#/archive").await;
    assert_eq!(shell.body.classes(), vec!["from-detail-to-archive".to_string()]);
}

#[tokio::test]
async fn scroll_resets_except_for_pagination_and_detail_exit() {
    let shell = Harness::signed_in();

    shell.go("#/").await;
    assert_eq!(shell.viewport.reset_count(), 1);

    shell.go("#/page/2").await;
    assert_eq!(shell.viewport.reset_count(), 1);

    shell.go("#/story/x").await;
    assert_eq!(shell.viewport.reset_count(), 2);

    shell.go("#/page/2").await;
    assert_eq!(shell.viewport.reset_count(), 2);

    shell.go("#/about").await;
    assert_eq!(shell.viewport.reset_count(), 3);
}

#[tokio::test]
async fn whitelisted_moves_use_native_transition() {
    let shell = Harness::signed_in();

    shell.go("#/").await;
    assert_eq!(shell.transition.run_count(), 0);

    shell.go("#/story/x").await;
    assert_eq!(shell.transition.run_count(), 1);

    shell.go("#/about").await;
    shell.go("#/settings").await;
    assert_eq!(shell.transition.run_count(), 1);

    shell.go("#/").await;
    assert_eq!(shell.transition.run_count(), 2);
}

#[tokio::test]
async fn back_target_follows_where_the_story_was_opened() {
    let shell = Harness::signed_in();

    shell.go("#/page/4").await;
    shell.go("#/story/s4").await;
    assert_eq!(shell.controller.back_target().await, "#/page/4");

    shell.go("#/archive").await;
    shell.go("#/story/s5").await;
    assert_eq!(shell.controller.back_target().await, "#/archive");
}

#[tokio::test]
async fn page_superseded_during_after_render_is_released() {
    let entered = Arc::new(Notify::new());
    let started = Arc::new(Notify::new());
    let camera_open = Arc::new(AtomicBool::new(false));
    let camera = Arc::new(CameraPage {
        entered: entered.clone(),
        started: started.clone(),
        camera_open: camera_open.clone(),
    });
    let shell = Harness::build(reader(), MemoryViewport::default(), move |routes, _| {
        routes.route(KnownRoute::CreateStory, camera)
    });

    shell.location.set_hash("#/create-story");
    shell.location.take_pending();
    let controller = shell.controller.clone();
    let stale = tokio::spawn(async move { controller.handle_navigation().await });
    entered.notified().await;

    let outcomes = shell.go("#/about").await;
    assert_eq!(rendered_route(&outcomes[0]), Some("/about"));

    started.notify_one();
    assert_eq!(stale.await.unwrap(), CycleOutcome::Superseded);

    assert!(!camera_open.load(Ordering::SeqCst));
    assert_eq!(shell.content.markup(), "<main>about /about</main>");
}

#[tokio::test]
async fn page_kept_in_slot_is_not_released_by_stale_cycle() {
    let entered = Arc::new(Notify::new());
    let started = Arc::new(Notify::new());
    let camera_open = Arc::new(AtomicBool::new(false));
    let camera = Arc::new(CameraPage {
        entered: entered.clone(),
        started: started.clone(),
        camera_open: camera_open.clone(),
    });
    let shell = Harness::build(reader(), MemoryViewport::default(), move |routes, _| {
        routes.route(KnownRoute::CreateStory, camera)
    });

    shell.location.set_hash("#/create-story");
    shell.location.take_pending();
    let controller = shell.controller.clone();
    let stale = tokio::spawn(async move { controller.handle_navigation().await });
    entered.notified().await;

    // Not-found leaves the mounted page in place.
    let outcomes = shell.go("#/nowhere").await;
    assert!(matches!(outcomes[0], CycleOutcome::NotFound(_)));

    started.notify_one();
    assert_eq!(stale.await.unwrap(), CycleOutcome::Superseded);
    assert!(camera_open.load(Ordering::SeqCst));

    shell.go("#/about").await;
    assert!(!camera_open.load(Ordering::SeqCst));
}

#[tokio::test]
async fn missed_focus_keeps_story_for_next_visit() {
    let shell = Harness::build(reader(), MemoryViewport::without_items(), |routes, _| routes);

    shell.go("#/page/2").await;
    shell.go("#/story/abc").await;
    shell.go("#/page/2").await;

    assert!(shell.viewport.focused().is_empty());
    assert_eq!(
        shell.controller.continuity().last_viewed_story_id().as_deref(),
        Some("abc")
    );
}
