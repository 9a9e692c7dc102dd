//! # Slice Client
//!
//! The cloneable handle consumers use to talk to a [`SliceActor`](crate::SliceActor).

use crate::entity::SliceEntity;
use crate::error::FrameworkError;
use crate::fold::Fold;
use crate::message::{Operation, Outcome, SliceRequest};
use crate::state::SliceState;
use std::collections::BTreeMap;
use tokio::sync::{mpsc, oneshot, watch};

/// A type-safe handle to one slice.
///
/// Holds the mailbox sender and a `watch` receiver of the published state, so cloning is
/// cheap and reading the latest snapshot never waits on the actor.
pub struct SliceClient<T: SliceEntity> {
    sender: mpsc::Sender<SliceRequest<T>>,
    watcher: watch::Receiver<SliceState<T>>,
}

impl<T: SliceEntity> Clone for SliceClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            watcher: self.watcher.clone(),
        }
    }
}

impl<T: SliceEntity> SliceClient<T> {
    pub fn new(
        sender: mpsc::Sender<SliceRequest<T>>,
        watcher: watch::Receiver<SliceState<T>>,
    ) -> Self {
        Self { sender, watcher }
    }

    /// Runs a remote operation through the slice and waits for it to settle.
    pub async fn dispatch(&self, operation: Operation<T>) -> Result<Outcome<T>, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(SliceRequest::Dispatch {
                operation,
                respond_to,
            })
            .await
            .map_err(|_| FrameworkError::SliceClosed)?;
        response.await.map_err(|_| FrameworkError::SliceDropped)?
    }

    /// Applies a fold locally, without a remote call.
    pub async fn apply(&self, fold: Fold<T>) -> Result<SliceState<T>, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(SliceRequest::Apply { fold, respond_to })
            .await
            .map_err(|_| FrameworkError::SliceClosed)?;
        response.await.map_err(|_| FrameworkError::SliceDropped)?
    }

    /// State as seen by the actor once every earlier request has been processed.
    pub async fn snapshot(&self) -> Result<SliceState<T>, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(SliceRequest::Snapshot { respond_to })
            .await
            .map_err(|_| FrameworkError::SliceClosed)?;
        response.await.map_err(|_| FrameworkError::SliceDropped)?
    }

    pub async fn set_filters(
        &self,
        filters: BTreeMap<String, String>,
    ) -> Result<(), FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(SliceRequest::SetFilters {
                filters,
                respond_to,
            })
            .await
            .map_err(|_| FrameworkError::SliceClosed)?;
        response.await.map_err(|_| FrameworkError::SliceDropped)?
    }

    pub async fn clear_error(&self) -> Result<(), FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(SliceRequest::ClearError { respond_to })
            .await
            .map_err(|_| FrameworkError::SliceClosed)?;
        response.await.map_err(|_| FrameworkError::SliceDropped)?
    }

    /// Empties the slice. Calls still in flight settle as superseded.
    pub async fn reset(&self) -> Result<(), FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(SliceRequest::Reset { respond_to })
            .await
            .map_err(|_| FrameworkError::SliceClosed)?;
        response.await.map_err(|_| FrameworkError::SliceDropped)?
    }

    /// Latest published snapshot.
    pub fn current(&self) -> SliceState<T> {
        self.watcher.borrow().clone()
    }

    /// A receiver that is notified on every published change.
    pub fn subscribe(&self) -> watch::Receiver<SliceState<T>> {
        self.watcher.clone()
    }
}
