//! Hash-path parsing.
//!
//! A location hash such as `#/story/abc` yields a *concrete* route
//! (`/story/abc`) used for transition classification, and a *normalized*
//! route (`/story/:id`) used for route-table dispatch. None of these
//! functions fail: unknown resources normalize to `/{resource}` and simply
//! miss in the table.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ports::LocationPort;

/// Path segments extracted from a raw hash path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segments {
    pub resource: Option<String>,
    pub id: Option<String>,
    pub page: Option<String>,
}

/// Route pattern with parameters collapsed to placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NormalizedRoute(String);

impl NormalizedRoute {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NormalizedRoute {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Route with literal parameter values, e.g. `/page/3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConcreteRoute(String);

impl ConcreteRoute {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    pub fn is_paginated(&self) -> bool {
        self.0.starts_with("/page/")
    }

    /// Home or one of its pages.
    pub fn is_listing(&self) -> bool {
        self.is_root() || self.is_paginated()
    }

    pub fn is_detail(&self) -> bool {
        self.0.starts_with("/story/")
    }

    pub fn is(&self, path: &str) -> bool {
        self.0 == path
    }

    /// Page number carried by a `/page/N` route.
    pub fn page_number(&self) -> Option<u32> {
        page_number(&self.0)
    }

    /// Story id carried by a `/story/:id` route.
    pub fn story_id(&self) -> Option<&str> {
        self.0
            .strip_prefix("/story/")
            .and_then(|rest| rest.split('/').next())
            .filter(|id| !id.is_empty())
    }
}

impl fmt::Display for ConcreteRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConcreteRoute {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Strips the leading hash marker; an empty hash is the root path.
pub fn raw_path(hash: &str) -> String {
    let path = hash.strip_prefix('#').unwrap_or(hash);
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

pub fn active_raw_path(location: &dyn LocationPort) -> String {
    raw_path(&location.hash())
}

pub fn parse_segments(path: &str) -> Segments {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let mut parts = trimmed.split('/').map(|part| {
        if part.is_empty() {
            None
        } else {
            Some(part.to_string())
        }
    });

    let resource = parts.next().flatten();
    let second = parts.next().flatten();

    if resource.as_deref() == Some("page") {
        Segments {
            resource,
            id: None,
            page: second,
        }
    } else {
        Segments {
            resource,
            id: second,
            page: None,
        }
    }
}

pub fn normalize_route(segments: &Segments) -> NormalizedRoute {
    // Pagination has a fixed pattern and must win over the generic id suffix.
    if segments.resource.as_deref() == Some("page") && segments.page.is_some() {
        return NormalizedRoute::from("/page/:page");
    }

    let mut pathname = String::new();
    if let Some(resource) = &segments.resource {
        pathname.push('/');
        pathname.push_str(resource);
    }
    if segments.id.is_some() {
        pathname.push_str("/:id");
    }

    if pathname.is_empty() {
        NormalizedRoute::from("/")
    } else {
        NormalizedRoute::new(pathname)
    }
}

/// Normalized route for an arbitrary path.
pub fn route_for(path: &str) -> NormalizedRoute {
    normalize_route(&parse_segments(path))
}

pub fn active_route(location: &dyn LocationPort) -> NormalizedRoute {
    route_for(&active_raw_path(location))
}

pub fn active_concrete_route(location: &dyn LocationPort) -> ConcreteRoute {
    ConcreteRoute::new(active_raw_path(location))
}

/// Positive page number from a `/page/N` path or `#/page/N` hash.
pub fn page_number(path_or_hash: &str) -> Option<u32> {
    let path = raw_path(path_or_hash);
    let segments = parse_segments(&path);
    if segments.resource.as_deref() != Some("page") {
        return None;
    }
    segments
        .page
        .and_then(|page| page.parse::<u32>().ok())
        .filter(|page| *page > 0)
}
