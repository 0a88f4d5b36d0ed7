//! Shared application state for the pull API server.
//!
//! [`AppState`] bundles everything a handler needs: the simulation slot
//! consulted per request, the event cache filled by the diff engine, the
//! command queue client, and the pagination limits. Handlers never hold
//! long-lived references into the simulation; every request materializes
//! its own response data.

use std::sync::Arc;

use chronicle_commands::CommandClient;
use chronicle_events::EventCache;
use chronicle_sim::{SimulationHandle, SimulationSlot};
use serde::{Deserialize, Serialize};

use crate::error::ObserverError;

/// Pagination limits applied to the paginated list endpoints.
#[derive(Debug, Clone, Copy)]
pub struct PageLimits {
    /// Limit applied when the request does not name one.
    pub default_limit: usize,
    /// Hard cap on the requested limit.
    pub max_limit: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_limit: 100,
            max_limit: 1000,
        }
    }
}

/// Query parameters accepted by the paginated list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// Number of items to skip.
    pub offset: Option<usize>,
    /// Maximum number of items to return.
    pub limit: Option<usize>,
}

/// One page of a listed collection.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Offset the page starts at.
    pub offset: usize,
    /// Limit applied after clamping.
    pub limit: usize,
    /// Size of the whole collection.
    pub total: usize,
    /// Whether items exist past this page.
    pub has_more: bool,
}

impl PageLimits {
    /// Slice one page out of a fully materialized collection.
    ///
    /// An out-of-range offset yields an empty item slice with
    /// `hasMore = false`, never an error.
    pub fn paginate<T>(&self, items: Vec<T>, query: &PageQuery) -> Page<T> {
        let offset = query.offset.unwrap_or(0);
        let limit = query.limit.unwrap_or(self.default_limit).min(self.max_limit);
        let total = items.len();
        let items: Vec<T> = items.into_iter().skip(offset).take(limit).collect();
        Page {
            items,
            offset,
            limit,
            total,
            has_more: offset.saturating_add(limit) < total,
        }
    }
}

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
pub struct AppState {
    /// The slot the host installs its simulation into.
    pub simulation: Arc<SimulationSlot>,
    /// Latest turn events per category.
    pub events: Arc<EventCache>,
    /// Submit handle for the command queue.
    pub commands: CommandClient,
    /// Pagination limits for the paginated endpoints.
    pub pages: PageLimits,
}

impl AppState {
    /// Create application state with default pagination limits.
    pub fn new(
        simulation: Arc<SimulationSlot>,
        events: Arc<EventCache>,
        commands: CommandClient,
    ) -> Self {
        Self {
            simulation,
            events,
            commands,
            pages: PageLimits::default(),
        }
    }

    /// The installed simulation, or the 503 error when none is.
    pub fn require_simulation(&self) -> Result<SimulationHandle, ObserverError> {
        self.simulation.get().ok_or(ObserverError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_clamps_and_slices() {
        let limits = PageLimits::default();
        let items: Vec<u32> = (0..25).collect();

        let page = limits.paginate(
            items.clone(),
            &PageQuery {
                offset: Some(0),
                limit: Some(10),
            },
        );
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.total, 25);
        assert!(page.has_more);

        let page = limits.paginate(
            items.clone(),
            &PageQuery {
                offset: Some(20),
                limit: Some(10),
            },
        );
        assert_eq!(page.items.len(), 5);
        assert!(!page.has_more);

        // Out-of-range offset: empty slice, no error.
        let page = limits.paginate(
            items.clone(),
            &PageQuery {
                offset: Some(4000),
                limit: Some(10),
            },
        );
        assert!(page.items.is_empty());
        assert!(!page.has_more);

        // Requested limit is capped.
        let page = limits.paginate(
            items,
            &PageQuery {
                offset: None,
                limit: Some(1_000_000),
            },
        );
        assert_eq!(page.limit, 1000);
    }
}
