use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use log::info;
use uuid::Uuid;

use storyshell_lib::{
    archive::ArchiveStore,
    db::StoryRecord,
    lifecycle::{Page, PageContext},
    routes::{KnownRoute, RouteTable},
};

const PAGE_SIZE: usize = 10;

/// Stand-in for the remote story API.
pub fn sample_feed() -> Arc<Vec<StoryRecord>> {
    let places = [
        ("Bandung", -6.9175, 107.6191),
        ("Yogyakarta", -7.7956, 110.3695),
        ("Denpasar", -8.6705, 115.2126),
    ];
    let now = Utc::now();

    let stories = (1..=25)
        .map(|n| {
            let place = places.get(n % 4);
            StoryRecord {
                id: format!("story-{n}"),
                title: format!("Story {n}"),
                description: format!("Notes from day {n}"),
                photo_ref: format!("https://photos.example/story-{n}.jpg"),
                created_at: now - Duration::hours(n as i64),
                lat: place.map(|p| p.1),
                lon: place.map(|p| p.2),
                location_label: place.map(|p| p.0.to_string()),
            }
        })
        .collect();

    Arc::new(stories)
}

fn story_card(story: &StoryRecord) -> String {
    format!(
        r#"<article data-story-id="{}"><h3>{}</h3><p>{}</p></article>"#,
        story.id, story.title, story.description
    )
}

struct ListingPage {
    feed: Arc<Vec<StoryRecord>>,
}

#[async_trait]
impl Page for ListingPage {
    async fn render(&self, ctx: &PageContext) -> Result<String> {
        let page = ctx.page_number().unwrap_or(1) as usize;
        let cards: String = self
            .feed
            .iter()
            .skip((page - 1) * PAGE_SIZE)
            .take(PAGE_SIZE)
            .map(story_card)
            .collect();
        let pages = self.feed.len().div_ceil(PAGE_SIZE);

        Ok(format!(
            r#"<section class="story-list"><h2>Page {page} of {pages}</h2>{cards}</section>"#
        ))
    }
}

struct StoryPage {
    feed: Arc<Vec<StoryRecord>>,
    archive: Arc<ArchiveStore>,
}

#[async_trait]
impl Page for StoryPage {
    async fn render(&self, ctx: &PageContext) -> Result<String> {
        let id = ctx
            .segments
            .id
            .as_deref()
            .ok_or_else(|| anyhow!("story route without an id"))?;

        let story = match self.feed.iter().find(|story| story.id == id) {
            Some(story) => story.clone(),
            // Offline: fall back to the archived copy.
            None => self
                .archive
                .get(id)
                .await
                .map(StoryRecord::from)
                .ok_or_else(|| anyhow!("story {id} not found"))?,
        };

        let action = if self.archive.is_saved(&story.id).await {
            "Remove from archive"
        } else {
            "Save for offline"
        };
        let location = match (&story.location_label, story.has_location()) {
            (Some(label), _) => label.clone(),
            (None, true) => format!(
                "{:.4}, {:.4}",
                story.lat.unwrap_or_default(),
                story.lon.unwrap_or_default()
            ),
            (None, false) => "Unknown place".to_string(),
        };

        Ok(format!(
            r#"<section class="story-detail"><h2>{}</h2><p>{}</p><p>{location}</p><button>{action}</button></section>"#,
            story.title, story.description
        ))
    }
}

struct ArchivePage {
    archive: Arc<ArchiveStore>,
}

#[async_trait]
impl Page for ArchivePage {
    async fn render(&self, _ctx: &PageContext) -> Result<String> {
        let saved = self.archive.saved_newest_first().await;
        if saved.is_empty() {
            return Ok(r#"<section class="archive"><p>No saved stories yet</p></section>"#.into());
        }

        let cards: String = saved
            .iter()
            .map(|item| story_card(&StoryRecord::from(item.clone())))
            .collect();
        Ok(format!(r#"<section class="archive">{cards}</section>"#))
    }
}

/// Story form that holds a camera stream while mounted.
#[derive(Default)]
struct CreateStoryPage {
    camera_open: AtomicBool,
}

#[async_trait]
impl Page for CreateStoryPage {
    async fn render(&self, _ctx: &PageContext) -> Result<String> {
        let draft = Uuid::new_v4();
        Ok(format!(
            r#"<form class="create-story" data-draft-id="{draft}"><textarea></textarea></form>"#
        ))
    }

    async fn after_render(&self, _ctx: &PageContext) -> Result<()> {
        self.camera_open.store(true, Ordering::SeqCst);
        info!("Camera stream started");
        Ok(())
    }

    fn destroy(&self) {
        if self.camera_open.swap(false, Ordering::SeqCst) {
            info!("Camera stream stopped");
        }
    }
}

struct StaticPage {
    title: &'static str,
}

#[async_trait]
impl Page for StaticPage {
    async fn render(&self, _ctx: &PageContext) -> Result<String> {
        Ok(format!(r#"<div class="container"><h2>{}</h2></div>"#, self.title))
    }
}

fn static_page(title: &'static str) -> Arc<dyn Page> {
    Arc::new(StaticPage { title })
}

pub fn route_table(feed: Arc<Vec<StoryRecord>>, archive: Arc<ArchiveStore>) -> RouteTable {
    let listing: Arc<dyn Page> = Arc::new(ListingPage { feed: feed.clone() });
    let create: Arc<dyn Page> = Arc::new(CreateStoryPage::default());

    RouteTable::new()
        .route(KnownRoute::Home, listing.clone())
        .route(KnownRoute::Paginated, listing)
        .route(
            KnownRoute::StoryDetail,
            Arc::new(StoryPage {
                feed,
                archive: archive.clone(),
            }),
        )
        .route(KnownRoute::Archive, Arc::new(ArchivePage { archive }))
        .route(KnownRoute::CreateStory, create.clone())
        .route(KnownRoute::GuestStory, create)
        .route(KnownRoute::Login, static_page("Sign in"))
        .route(KnownRoute::Register, static_page("Create an account"))
        .route(KnownRoute::Settings, static_page("Settings"))
        .route(KnownRoute::About, static_page("About"))
        .route(KnownRoute::NotFound, static_page("404 - Page Not Found"))
}
