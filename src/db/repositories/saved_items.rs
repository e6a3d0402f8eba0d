use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension, Row};

use crate::db::{connection::Database, helpers::parse_datetime, models::SavedItem};

fn row_to_saved_item(row: &Row) -> Result<SavedItem> {
    let created_at: String = row.get("created_at")?;
    let saved_at: String = row.get("saved_at")?;

    Ok(SavedItem {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        photo_ref: row.get("photo_ref")?,
        created_at: parse_datetime(&created_at, "created_at")?,
        lat: row.get("lat")?,
        lon: row.get("lon")?,
        location_label: row.get("location_label")?,
        saved_at: parse_datetime(&saved_at, "saved_at")?,
    })
}

impl Database {
    /// Insert or fully replace the record with `item.id` in one statement.
    pub async fn put_saved_item(&self, item: SavedItem) -> Result<()> {
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO saved_items (id, title, description, photo_ref, created_at, lat, lon, location_label, saved_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                 ON CONFLICT(id) DO UPDATE SET
                     title = excluded.title,
                     description = excluded.description,
                     photo_ref = excluded.photo_ref,
                     created_at = excluded.created_at,
                     lat = excluded.lat,
                     lon = excluded.lon,
                     location_label = excluded.location_label,
                     saved_at = excluded.saved_at",
                params![
                    item.id,
                    item.title,
                    item.description,
                    item.photo_ref,
                    item.created_at.to_rfc3339(),
                    item.lat,
                    item.lon,
                    item.location_label,
                    item.saved_at.to_rfc3339(),
                ],
            )
            .with_context(|| format!("failed to save item {}", item.id))?;
            Ok(())
        })
        .await
    }

    pub async fn get_all_saved_items(&self) -> Result<Vec<SavedItem>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, description, photo_ref, created_at, lat, lon, location_label, saved_at
                 FROM saved_items",
            )?;

            let mut rows = stmt.query([])?;
            let mut items = Vec::new();
            while let Some(row) = rows.next()? {
                items.push(row_to_saved_item(row)?);
            }

            Ok(items)
        })
        .await
    }

    pub async fn get_saved_item(&self, id: &str) -> Result<Option<SavedItem>> {
        let id = id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, description, photo_ref, created_at, lat, lon, location_label, saved_at
                 FROM saved_items
                 WHERE id = ?1",
            )?;

            let mut rows = stmt.query(params![id])?;
            match rows.next()? {
                Some(row) => Ok(Some(row_to_saved_item(row)?)),
                None => Ok(None),
            }
        })
        .await
    }

    pub async fn saved_item_exists(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        self.execute(move |conn| {
            let found = conn
                .query_row(
                    "SELECT 1 FROM saved_items WHERE id = ?1",
                    params![id],
                    |row| row.get::<_, i64>(0),
                )
                .optional()?;
            Ok(found.is_some())
        })
        .await
    }

    /// Removes the record if present. Missing ids are not an error.
    pub async fn delete_saved_item(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.execute(move |conn| {
            conn.execute("DELETE FROM saved_items WHERE id = ?1", params![id])
                .with_context(|| format!("failed to delete item {id}"))?;
            Ok(())
        })
        .await
    }
}
