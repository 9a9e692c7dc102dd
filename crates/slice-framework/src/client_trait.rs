//! # StorePort Trait
//!
//! The interface consumers (views, orchestration code, tests) depend on instead of a
//! concrete slice. Typed clients implement it by exposing their inner [`SliceClient`] and
//! mapping framework errors into their own error type; reading state, subscribing and
//! clearing the error come for free.
use crate::{FrameworkError, SliceClient, SliceEntity, SliceState};
use async_trait::async_trait;
use tokio::sync::watch;

/// Read side and housekeeping shared by every typed slice client.
///
/// # Example
///
/// ```rust
/// use slice_framework::{FrameworkError, SliceActor, SliceClient, SliceEntity, StorePort};
///
/// #[derive(Clone, Debug)]
/// struct Note { id: u32 }
///
/// impl SliceEntity for Note {
///     type Id = u32;
///     type Summary = ();
///     type Context = ();
///     fn id(&self) -> &u32 { &self.id }
/// }
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("note error: {0}")]
/// struct NoteError(String);
///
/// struct NoteClient { inner: SliceClient<Note> }
///
/// impl StorePort<Note> for NoteClient {
///     type Error = NoteError;
///     fn inner(&self) -> &SliceClient<Note> { &self.inner }
///     fn map_error(e: FrameworkError) -> NoteError { NoteError(e.to_string()) }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, inner) = SliceActor::<Note>::new(10);
///     tokio::spawn(actor.run(()));
///     let notes = NoteClient { inner };
///
///     // state() and clear_error() are provided automatically
///     assert!(notes.state().is_empty());
///     notes.clear_error().await.unwrap();
/// }
/// ```
#[async_trait]
pub trait StorePort<T: SliceEntity>: Send + Sync {
    /// The resource-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic SliceClient.
    fn inner(&self) -> &SliceClient<T>;

    /// Map framework errors to the specific resource error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Latest published state, without waiting on the slice.
    fn state(&self) -> SliceState<T> {
        self.inner().current()
    }

    /// Change notifications for re-rendering.
    fn subscribe(&self) -> watch::Receiver<SliceState<T>> {
        self.inner().subscribe()
    }

    /// State once every earlier request has been processed by the slice.
    #[tracing::instrument(skip(self))]
    async fn snapshot(&self) -> Result<SliceState<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().snapshot().await.map_err(Self::map_error)
    }

    /// Dismisses the error currently shown for this slice.
    #[tracing::instrument(skip(self))]
    async fn clear_error(&self) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().clear_error().await.map_err(Self::map_error)
    }
}
