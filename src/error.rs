use thiserror::Error;

/// Failures of the offline archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The host offers no durable storage location.
    #[error("durable local storage is unavailable: {0}")]
    StorageUnavailable(String),
    /// A single archive operation failed.
    #[error("archive {operation} failed: {source:#}")]
    StorageIo {
        operation: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

/// Failures reported by the native view-transition capability.
#[derive(Debug, Error)]
pub enum TransitionError {
    /// The transition was superseded by a newer navigation or rejected by the host.
    #[error("view transition aborted: {0}")]
    Aborted(String),
    /// The content swap inside the transition failed.
    #[error(transparent)]
    Swap(#[from] ShellError),
}

/// Failures of one navigation cycle.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("no page registered for route {0}")]
    RouteUnresolved(String),
    #[error("page {route} failed to render: {source:#}")]
    PageRender {
        route: String,
        #[source]
        source: anyhow::Error,
    },
}
