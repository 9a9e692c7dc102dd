//! # Slice State
//!
//! The snapshot a slice owns and publishes after every change.

use crate::entity::SliceEntity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Server-side paging information for paginated slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total_items: u64) -> Self {
        let mut pagination = Self {
            page,
            limit,
            total_items,
            total_pages: 0,
        };
        pagination.recount_pages();
        pagination
    }

    /// Recomputes `total_pages` from `total_items` and `limit`.
    ///
    /// A zero limit means the server did not page the result; the page count is left alone.
    pub(crate) fn recount_pages(&mut self) {
        if self.limit > 0 {
            let pages = self.total_items.div_ceil(u64::from(self.limit));
            self.total_pages = u32::try_from(pages).unwrap_or(u32::MAX);
        }
    }
}

/// State of one resource slice.
///
/// Consumers read this through [`SliceClient::current`](crate::SliceClient::current) or a
/// subscription; only the owning [`SliceActor`](crate::SliceActor) mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceState<T: SliceEntity> {
    /// Rows in display order. Ids are unique.
    pub items: Vec<T>,
    /// The entity behind the currently open detail view.
    pub selected: Option<T>,
    /// True while at least one request on this slice is in flight.
    pub loading: bool,
    /// Human-readable message of the last failed request.
    pub error: Option<String>,
    /// Structured per-field messages of the last failed request, when the server sent any.
    pub field_errors: BTreeMap<String, String>,
    /// Present for server-paginated slices once a page has been loaded.
    pub pagination: Option<Pagination>,
    /// Filters of the last list request, passed through to the server verbatim.
    pub filters: BTreeMap<String, String>,
    /// Derived totals, recomputed after every fold.
    pub summary: T::Summary,
    pub(crate) in_flight: usize,
}

impl<T: SliceEntity> Default for SliceState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            selected: None,
            loading: false,
            error: None,
            field_errors: BTreeMap::new(),
            pagination: None,
            filters: BTreeMap::new(),
            summary: T::Summary::default(),
            in_flight: 0,
        }
    }
}

impl<T: SliceEntity> SliceState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a settled state holding `items`, with the summary already derived.
    pub fn with_items(items: Vec<T>) -> Self {
        let mut state = Self::default();
        crate::fold::Fold::replace_all(items).apply(&mut state);
        state
    }

    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: &T::Id) -> bool {
        self.get(id).is_some()
    }

    /// Looks an entity up in the list first, then in `selected`.
    pub fn find(&self, id: &T::Id) -> Option<&T> {
        self.get(id)
            .or_else(|| self.selected.as_ref().filter(|item| item.id() == id))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of requests currently awaiting a response.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Total rows on the server for paginated slices, the local row count otherwise.
    pub fn total_items(&self) -> u64 {
        self.pagination
            .map(|p| p.total_items)
            .unwrap_or(self.items.len() as u64)
    }
}
