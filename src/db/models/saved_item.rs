//! Archive records.
//!
//! `StoryRecord` is the shape pages receive from the remote story service;
//! `SavedItem` is the same record once the archive has stamped `saved_at`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A story as displayed by a page, before it is archived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub photo_ref: String,
    pub created_at: DateTime<Utc>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub location_label: Option<String>,
}

impl StoryRecord {
    pub fn has_location(&self) -> bool {
        self.lat.is_some() && self.lon.is_some()
    }
}

/// A story persisted in the offline archive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub photo_ref: String,
    pub created_at: DateTime<Utc>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub location_label: Option<String>,
    pub saved_at: DateTime<Utc>,
}

impl SavedItem {
    pub fn stamped(record: StoryRecord, saved_at: DateTime<Utc>) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            photo_ref: record.photo_ref,
            created_at: record.created_at,
            lat: record.lat,
            lon: record.lon,
            location_label: record.location_label,
            saved_at,
        }
    }
}

impl From<SavedItem> for StoryRecord {
    fn from(item: SavedItem) -> Self {
        Self {
            id: item.id,
            title: item.title,
            description: item.description,
            photo_ref: item.photo_ref,
            created_at: item.created_at,
            lat: item.lat,
            lon: item.lon,
            location_label: item.location_label,
        }
    }
}
