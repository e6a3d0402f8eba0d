mod demo_pages;

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Result;
use log::{info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};

use storyshell_lib::{
    archive::ArchiveStore,
    config::ShellConfig,
    db::StoryRecord,
    init_logging,
    lifecycle::{CycleOutcome, SessionAuth, ShellPorts, UserProfile},
    ports::{
        LocationPort, MemoryBodyClasses, MemoryContent, MemoryLocation, MemoryViewport,
        SimulatedTransition,
    },
    StoryShell,
};

/// Headless driver: reads hashes (`#/page/2`) or commands (`save`, `back`,
/// `quit`) from stdin and prints what the shell renders.
#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = ShellConfig::load(config_path.as_deref())?;
    init_logging(config.debug);

    info!("Storyshell starting up...");

    let location = Arc::new(MemoryLocation::new("#/"));
    let content = Arc::new(MemoryContent::default());
    let body = Arc::new(MemoryBodyClasses::default());
    let ports = ShellPorts {
        location: location.clone(),
        content: content.clone(),
        body: body.clone(),
        viewport: Arc::new(MemoryViewport::default()),
    };
    let native = Arc::new(if config.native_transitions {
        SimulatedTransition::new(true, Duration::from_millis(config.transition_settle_ms))
    } else {
        SimulatedTransition::unavailable()
    });

    let feed = demo_pages::sample_feed();
    let archive = Arc::new(ArchiveStore::new(config.database_path()));
    let routes = demo_pages::route_table(feed.clone(), archive.clone());
    let auth = Arc::new(SessionAuth::signed_in(UserProfile {
        user_id: "local".into(),
        name: "Local reader".into(),
    }));

    let shell = StoryShell::new(&config, archive, routes, auth, ports, native)?;

    if let Some(settings) = shell.settings() {
        let current = settings.current();
        info!(
            "Language {}, theme {}, map tiles {}",
            current.language,
            current.theme,
            current.map_style.tile_style()
        );
    }

    navigate(&shell, &location, &content, &body, "#/").await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            "" => continue,
            "quit" | "exit" => break,
            "back" => {
                let target = shell.controller().back_target().await;
                navigate(&shell, &location, &content, &body, &target).await;
            }
            "save" => toggle_current(&shell, &feed).await,
            hash if hash.starts_with('#') || hash.starts_with('/') => {
                navigate(&shell, &location, &content, &body, hash).await;
            }
            other => warn!("Unknown command: {other}"),
        }
    }

    shell.shutdown().await;
    Ok(())
}

async fn navigate(
    shell: &StoryShell,
    location: &MemoryLocation,
    content: &MemoryContent,
    body: &MemoryBodyClasses,
    hash: &str,
) {
    location.set_hash(hash);

    // Redirects queue further route changes; drain them like hashchange events.
    while location.take_pending().is_some() {
        let outcome = shell.controller().handle_navigation().await;
        match &outcome {
            CycleOutcome::Rendered { route, plan } => {
                println!("[{route}] {:?} classes={:?}", plan.kind, body.classes());
                println!("{}", content.markup());
            }
            CycleOutcome::Redirected(target) => println!("-> {target}"),
            CycleOutcome::NotFound(route) => {
                println!("[{route}] not found");
                println!("{}", content.markup());
            }
            CycleOutcome::Superseded => {}
            CycleOutcome::Failed => println!("{}", content.markup()),
        }
    }
}

async fn toggle_current(shell: &StoryShell, feed: &[StoryRecord]) {
    let snapshot = shell.controller().snapshot().await;
    let Some(story_id) = snapshot
        .current_route
        .as_ref()
        .and_then(|route| route.story_id())
    else {
        warn!("Open a story before saving it");
        return;
    };

    let record = match feed.iter().find(|story| story.id == story_id) {
        Some(story) => story.clone(),
        None => {
            warn!("Story {story_id} is not in the feed");
            return;
        }
    };

    let notice = shell.archive().toggle(record).await.notice();
    println!("{:?}: {}", notice.level, notice.message);
}
