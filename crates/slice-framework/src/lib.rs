//! # Slice Framework
//!
//! Building blocks for client-side resource state: a collection of entities, a selected
//! entity, a loading flag, an error message and optional pagination, kept consistent while
//! remote calls resolve in any order.
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`SliceEntity`]) - identity, merge rule and derived summary of a row
//! 2. **Runtime Layer** ([`SliceActor`]) - the async operation runner owning one [`SliceState`]
//! 3. **Interface Layer** ([`SliceClient`], [`StorePort`]) - dispatching operations and
//!    reading snapshots
//!
//! An [`Operation`] describes one remote call. The call resolves to a [`Fold`], the rule for
//! merging its result into the state, chosen at the call site (replace the list, prepend,
//! splice by id, remove by id, select). The runner owns everything else:
//!
//! - `loading` is true while any request is in flight and `error` is cleared on dispatch.
//! - Failures are normalized to one human-readable message ([`ApiError::user_message`]).
//! - Each request is tagged. A response that a newer request on the same [`Target`]
//!   superseded is discarded instead of overwriting fresher data.
//! - Operations are [`Strategy::Pessimistic`] unless marked optimistic, in which case the
//!   fold is applied at dispatch and rolled back if the server refuses.
//!
//! ## Concurrency Model
//!
//! - Each slice runs in its own Tokio task and processes messages sequentially.
//! - Remote calls run in spawned tasks and post their result back to the slice mailbox.
//! - Snapshots are published through a `watch` channel; readers never block the slice.
//!
//! ## Testing
//!
//! The [`mock`] module provides [`mock::MockSlice`], a scripted stand-in for a slice, and
//! raw channel helpers for inspecting individual requests.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod fold;
pub mod message;
pub mod mock;
pub mod state;
pub mod tracing;

// Re-export core types for convenience
pub use actor::SliceActor;
pub use client::SliceClient;
pub use client_trait::StorePort;
pub use entity::SliceEntity;
pub use error::{
    ApiError, FrameworkError, NO_CONNECTION_MESSAGE, SESSION_EXPIRED_MESSAGE,
    UNKNOWN_ERROR_MESSAGE,
};
pub use fold::Fold;
pub use message::{OpFuture, Operation, Outcome, Response, SliceRequest, Strategy, Target};
pub use state::{Pagination, SliceState};
