//! # SliceEntity Trait
//!
//! The `SliceEntity` trait defines the contract every resource (cart line, product, order, …)
//! must satisfy to be held by the generic [`SliceActor`](crate::SliceActor). It names the
//! identifier type, the derived summary recomputed after every mutation, and the runtime
//! context (usually the remote API) injected when the slice starts.
//!
//! # Provided Methods (Hooks)
//! - [`SliceEntity::absorb`]: how a row with an already-present id is merged.
//! - [`SliceEntity::is_retained`]: whether a row may stay in the collection.
//! - [`SliceEntity::summarize`]: derived totals over the whole collection.
//!
//! The defaults replace on merge, retain everything, and produce `Summary::default()`.

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any entity must implement to live inside a slice.
///
/// # Context
/// `Context` is handed to every remote call the slice runs. It is bound late, through
/// [`SliceActor::run`](crate::SliceActor::run), so slices can be created before the
/// API client they talk to.
pub trait SliceEntity: Clone + Debug + Send + Sync + 'static {
    /// Identity of a row. Two rows with equal ids never coexist in a slice.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + 'static;

    /// Derived state computed from the full item list (counts, money totals).
    /// Use `()` when the slice has nothing to derive.
    type Summary: Default + Clone + Debug + PartialEq + Send + Sync + 'static;

    /// Dependencies handed to remote calls (typically a REST client).
    type Context: Send + Sync + 'static;

    /// Returns the identity of this row.
    fn id(&self) -> &Self::Id;

    /// Merges `incoming` into a row that already has the same id.
    ///
    /// Called by [`Fold::Merge`](crate::Fold::Merge) and when a replacement list carries
    /// duplicate ids. Quantity-bearing entities override this to accumulate.
    fn absorb(&mut self, incoming: Self) {
        *self = incoming;
    }

    /// Whether this row may remain in the collection after a fold.
    ///
    /// Rows that return `false` (e.g. a zero-quantity cart line) are dropped.
    fn is_retained(&self) -> bool {
        true
    }

    /// Computes the derived summary for the current item list.
    fn summarize(_items: &[Self]) -> Self::Summary {
        Self::Summary::default()
    }
}
