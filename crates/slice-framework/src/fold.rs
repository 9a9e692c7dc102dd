//! # Folds
//!
//! A fold is the rule by which the result of an operation is merged into slice state.
//! Each call site picks the fold matching its intent (list, create, update, delete);
//! the framework never infers it.
//!
//! Every fold leaves the state normalized:
//! - ids in `items` are unique,
//! - rows rejected by [`SliceEntity::is_retained`] are gone,
//! - `selected` mirrors the row with the same id,
//! - `summary` is recomputed from `items`.

use crate::entity::SliceEntity;
use crate::state::{Pagination, SliceState};

/// How an operation result is folded into a [`SliceState`].
#[derive(Debug, Clone)]
pub enum Fold<T: SliceEntity> {
    /// Replace the whole list (fetch). Duplicate ids are absorbed into the first row.
    ReplaceAll {
        items: Vec<T>,
        pagination: Option<Pagination>,
    },
    /// Insert at the front (create). Bumps `total_items` on paginated slices.
    Prepend(T),
    /// Absorb into the row with the same id, or append (cart add, favorites add).
    Merge(T),
    /// Replace the row with the same id and `selected` if it is the same entity (update).
    Splice(T),
    /// Drop the row with this id (delete). Decrements `total_items` on paginated slices.
    Remove(T::Id),
    /// Replace `selected` (fetch by id).
    Select(Option<T>),
    /// Empty the list.
    Clear,
    /// The call succeeded but carries nothing to fold.
    Keep,
}

impl<T: SliceEntity> Fold<T> {
    pub fn replace_all(items: Vec<T>) -> Self {
        Fold::ReplaceAll {
            items,
            pagination: None,
        }
    }

    pub fn page(items: Vec<T>, pagination: Pagination) -> Self {
        Fold::ReplaceAll {
            items,
            pagination: Some(pagination),
        }
    }

    /// Short name used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Fold::ReplaceAll { .. } => "replace_all",
            Fold::Prepend(_) => "prepend",
            Fold::Merge(_) => "merge",
            Fold::Splice(_) => "splice",
            Fold::Remove(_) => "remove",
            Fold::Select(_) => "select",
            Fold::Clear => "clear",
            Fold::Keep => "keep",
        }
    }

    /// Applies this fold to `state` and re-normalizes it.
    pub fn apply(self, state: &mut SliceState<T>) {
        match self {
            Fold::ReplaceAll { items, pagination } => {
                state.items.clear();
                for item in items {
                    merge_into(&mut state.items, item);
                }
                if pagination.is_some() {
                    state.pagination = pagination;
                }
                if let Some(selected) = state.selected.take() {
                    let refreshed = state.items.iter().find(|i| i.id() == selected.id()).cloned();
                    state.selected = Some(refreshed.unwrap_or(selected));
                }
            }
            Fold::Prepend(item) => {
                let before = state.items.len();
                state.items.retain(|existing| existing.id() != item.id());
                let is_new = state.items.len() == before;
                sync_selected(state, &item);
                state.items.insert(0, item);
                if is_new {
                    adjust_total(state, 1);
                }
            }
            Fold::Merge(item) => {
                merge_into(&mut state.items, item);
                if let Some(selected) = state.selected.as_mut() {
                    if let Some(row) = state.items.iter().find(|i| i.id() == selected.id()) {
                        *selected = row.clone();
                    }
                }
            }
            Fold::Splice(item) => {
                if let Some(row) = state.items.iter_mut().find(|i| i.id() == item.id()) {
                    *row = item.clone();
                }
                sync_selected(state, &item);
            }
            Fold::Remove(id) => {
                state.items.retain(|item| item.id() != &id);
                adjust_total(state, -1);
                if state.selected.as_ref().is_some_and(|s| s.id() == &id) {
                    state.selected = None;
                }
            }
            Fold::Select(item) => {
                if let Some(item) = &item {
                    if let Some(row) = state.items.iter_mut().find(|i| i.id() == item.id()) {
                        *row = item.clone();
                    }
                }
                state.selected = item;
            }
            Fold::Clear => {
                state.items.clear();
                if let Some(pagination) = state.pagination.as_mut() {
                    pagination.total_items = 0;
                    pagination.recount_pages();
                }
            }
            Fold::Keep => {}
        }
        normalize(state);
    }
}

/// The inverse of one optimistic fold, limited to the rows that fold touched.
///
/// Reverting puts those rows back where they were and drops the ones the fold introduced.
/// Rows that other folds added or changed in the meantime are left alone.
pub(crate) struct Undo<T: SliceEntity> {
    /// Touched rows as they were before, with their positions.
    restore: Vec<(usize, T)>,
    /// Touched ids that did not exist before.
    discard: Vec<T::Id>,
    /// Previous `selected`, when the fold changed it.
    selected: Option<Option<T>>,
    /// Previous paging of whole-list folds.
    pagination: Option<Option<Pagination>>,
    /// Change of `total_items` to undo on paginated slices.
    total_delta: i64,
}

impl<T: SliceEntity> Fold<T> {
    /// Ids this fold may change, `None` for folds that rewrite the whole list.
    fn touched_ids(&self) -> Option<Vec<T::Id>> {
        match self {
            Fold::Prepend(item) | Fold::Merge(item) | Fold::Splice(item) => {
                Some(vec![item.id().clone()])
            }
            Fold::Remove(id) => Some(vec![id.clone()]),
            Fold::Select(item) => Some(item.iter().map(|i| i.id().clone()).collect()),
            Fold::Keep => Some(Vec::new()),
            Fold::ReplaceAll { .. } | Fold::Clear => None,
        }
    }

    /// Applies this fold and returns what reverts it.
    pub(crate) fn apply_undoable(self, state: &mut SliceState<T>) -> Undo<T> {
        let touched = self.touched_ids();
        let whole_list = touched.is_none();
        let is_select = matches!(self, Fold::Select(_));
        let is_touched = |id: &T::Id| touched.as_ref().map_or(true, |ids| ids.contains(id));

        let restore: Vec<(usize, T)> = state
            .items
            .iter()
            .enumerate()
            .filter(|(_, row)| is_touched(row.id()))
            .map(|(index, row)| (index, row.clone()))
            .collect();
        let selected_before = state.selected.clone();
        let pagination_before = state.pagination;
        let total_before = pagination_before.map(|p| p.total_items);

        self.apply(state);

        let mut discard = Vec::new();
        for row in &state.items {
            let existed = restore.iter().any(|(_, old)| old.id() == row.id());
            if is_touched(row.id()) && !existed {
                discard.push(row.id().clone());
            }
        }
        let selection_touched = is_select
            || [&selected_before, &state.selected]
                .iter()
                .any(|s| s.as_ref().is_some_and(|s| is_touched(s.id())));
        let total_delta = match (total_before, state.pagination) {
            (Some(before), Some(after)) => after.total_items as i64 - before as i64,
            _ => 0,
        };

        Undo {
            restore,
            discard,
            selected: selection_touched.then_some(selected_before),
            pagination: whole_list.then_some(pagination_before),
            total_delta,
        }
    }
}

impl<T: SliceEntity> Undo<T> {
    /// Reverts the fold this was recorded for and re-normalizes `state`.
    pub(crate) fn revert(self, state: &mut SliceState<T>) {
        state.items.retain(|row| !self.discard.contains(row.id()));
        for (index, row) in self.restore {
            match state.items.iter_mut().find(|current| current.id() == row.id()) {
                Some(current) => *current = row,
                None => {
                    let at = index.min(state.items.len());
                    state.items.insert(at, row);
                }
            }
        }
        if let Some(selected) = self.selected {
            state.selected = selected;
        }
        match self.pagination {
            Some(pagination) => state.pagination = pagination,
            None => adjust_total(state, -self.total_delta),
        }
        normalize(state);
    }
}

fn merge_into<T: SliceEntity>(items: &mut Vec<T>, item: T) {
    match items.iter_mut().find(|existing| existing.id() == item.id()) {
        Some(existing) => existing.absorb(item),
        None => items.push(item),
    }
}

fn sync_selected<T: SliceEntity>(state: &mut SliceState<T>, item: &T) {
    if state.selected.as_ref().is_some_and(|s| s.id() == item.id()) {
        state.selected = Some(item.clone());
    }
}

fn adjust_total<T: SliceEntity>(state: &mut SliceState<T>, delta: i64) {
    if let Some(pagination) = state.pagination.as_mut() {
        pagination.total_items = pagination.total_items.saturating_add_signed(delta);
        pagination.recount_pages();
    }
}

fn normalize<T: SliceEntity>(state: &mut SliceState<T>) {
    state.items.retain(SliceEntity::is_retained);
    if state.selected.as_ref().is_some_and(|s| !s.is_retained()) {
        state.selected = None;
    }
    state.summary = T::summarize(&state.items);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Line {
        id: String,
        price: u64,
        quantity: u32,
    }

    #[derive(Clone, Debug, Default, PartialEq)]
    struct LineSummary {
        count: u64,
        total: u64,
    }

    impl Line {
        fn new(id: &str, price: u64, quantity: u32) -> Self {
            Self {
                id: id.to_string(),
                price,
                quantity,
            }
        }
    }

    impl SliceEntity for Line {
        type Id = String;
        type Summary = LineSummary;
        type Context = ();

        fn id(&self) -> &String {
            &self.id
        }

        fn absorb(&mut self, incoming: Self) {
            self.quantity += incoming.quantity;
        }

        fn is_retained(&self) -> bool {
            self.quantity > 0
        }

        fn summarize(items: &[Self]) -> LineSummary {
            LineSummary {
                count: items.iter().map(|i| u64::from(i.quantity)).sum(),
                total: items.iter().map(|i| i.price * u64::from(i.quantity)).sum(),
            }
        }
    }

    fn paged(items: Vec<Line>, total: u64) -> SliceState<Line> {
        let mut state = SliceState::new();
        Fold::page(items, Pagination::new(1, 2, total)).apply(&mut state);
        state
    }

    #[test]
    fn test_merge_accumulates_instead_of_duplicating() {
        let mut state = SliceState::new();
        Fold::Merge(Line::new("1", 1000, 1)).apply(&mut state);
        Fold::Merge(Line::new("1", 1000, 2)).apply(&mut state);
        Fold::Merge(Line::new("2", 500, 1)).apply(&mut state);

        assert_eq!(state.len(), 2);
        assert_eq!(state.items[0].quantity, 3);
        assert_eq!(state.summary, LineSummary { count: 4, total: 3500 });
    }

    #[test]
    fn test_replace_all_dedupes_and_recomputes() {
        let mut state = SliceState::new();
        Fold::replace_all(vec![
            Line::new("1", 1000, 1),
            Line::new("2", 2000, 2),
            Line::new("1", 1000, 1),
        ])
        .apply(&mut state);

        assert_eq!(state.len(), 2);
        assert_eq!(state.summary.total, 6000);
    }

    #[test]
    fn test_zero_quantity_rows_are_dropped() {
        let mut state = SliceState::with_items(vec![Line::new("1", 1000, 1)]);
        Fold::Splice(Line::new("1", 1000, 0)).apply(&mut state);

        assert!(state.is_empty());
        assert_eq!(state.summary, LineSummary::default());
    }

    #[test]
    fn test_prepend_bumps_total_once() {
        let mut state = paged(vec![Line::new("1", 10, 1), Line::new("2", 10, 1)], 3);

        Fold::Prepend(Line::new("9", 10, 1)).apply(&mut state);
        assert_eq!(state.items[0].id, "9");
        assert_eq!(state.total_items(), 4);
        assert_eq!(state.pagination.map(|p| p.total_pages), Some(2));

        // Re-prepending an existing id moves it instead of counting it twice.
        Fold::Prepend(Line::new("2", 20, 1)).apply(&mut state);
        assert_eq!(state.len(), 3);
        assert_eq!(state.items[0].price, 20);
        assert_eq!(state.total_items(), 4);
    }

    #[test]
    fn test_remove_decrements_total_and_clears_selection() {
        let mut state = paged(vec![Line::new("1", 10, 1), Line::new("2", 10, 1)], 5);
        Fold::Select(Some(Line::new("2", 10, 1))).apply(&mut state);

        Fold::Remove("2".to_string()).apply(&mut state);

        assert_eq!(state.total_items(), 4);
        assert!(!state.contains(&"2".to_string()));
        assert!(state.selected.is_none());
    }

    #[test]
    fn test_splice_keeps_selected_in_sync() {
        let mut state = SliceState::with_items(vec![Line::new("1", 10, 1)]);
        Fold::Select(Some(Line::new("1", 10, 1))).apply(&mut state);

        Fold::Splice(Line::new("1", 99, 1)).apply(&mut state);

        assert_eq!(state.items[0].price, 99);
        assert_eq!(state.selected.as_ref().map(|s| s.price), Some(99));
    }

    #[test]
    fn test_splice_of_unknown_id_only_touches_selection() {
        let mut state = SliceState::with_items(vec![Line::new("1", 10, 1)]);
        Fold::Select(Some(Line::new("7", 10, 1))).apply(&mut state);

        Fold::Splice(Line::new("7", 70, 1)).apply(&mut state);

        assert_eq!(state.len(), 1);
        assert_eq!(state.selected.as_ref().map(|s| s.price), Some(70));
    }

    #[test]
    fn test_undo_restores_removed_row_next_to_later_changes() {
        let mut state = paged(vec![Line::new("1", 10, 1), Line::new("2", 20, 1)], 5);
        let undo = Fold::Remove("1".to_string()).apply_undoable(&mut state);
        assert_eq!(state.total_items(), 4);

        Fold::Merge(Line::new("3", 30, 1)).apply(&mut state);
        undo.revert(&mut state);

        let ids: Vec<&str> = state.items.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(state.total_items(), 5);
        assert_eq!(state.summary.total, 60);
    }

    #[test]
    fn test_undo_drops_only_the_row_it_introduced() {
        let mut state = SliceState::with_items(vec![Line::new("1", 10, 1)]);
        let undo = Fold::Prepend(Line::new("9", 90, 1)).apply_undoable(&mut state);
        Fold::Splice(Line::new("1", 11, 1)).apply(&mut state);

        undo.revert(&mut state);

        assert_eq!(state.items, vec![Line::new("1", 11, 1)]);
    }

    #[test]
    fn test_undo_of_selection() {
        let mut state = SliceState::with_items(vec![Line::new("1", 10, 1)]);
        let undo = Fold::Select(Some(Line::new("1", 10, 1))).apply_undoable(&mut state);
        assert!(state.selected.is_some());

        undo.revert(&mut state);
        assert!(state.selected.is_none());
    }

    #[test]
    fn test_clear_resets_paged_total() {
        let mut state = paged(vec![Line::new("1", 10, 1)], 9);
        Fold::Clear.apply(&mut state);

        assert!(state.is_empty());
        assert_eq!(state.total_items(), 0);
        assert_eq!(state.summary.total, 0);
    }
}
