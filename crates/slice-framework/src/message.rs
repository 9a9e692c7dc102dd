//! # Slice Messages
//!
//! Everything a [`SliceClient`](crate::SliceClient) can ask of a
//! [`SliceActor`](crate::SliceActor), plus the description of a remote operation.
//!
//! An [`Operation`] bundles three decisions that are made at the call site and never
//! inferred by the framework:
//! - the remote call itself, which resolves to the [`Fold`] to apply,
//! - the [`Target`] it writes, used to discard responses that a newer request superseded,
//! - the [`Strategy`], i.e. whether state changes before or after the server answers.

use crate::entity::SliceEntity;
use crate::error::{ApiError, FrameworkError};
use crate::fold::Fold;
use crate::state::SliceState;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::oneshot;

/// One-shot response channel used by slices.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Future produced by a remote call.
pub type OpFuture<T> = Pin<Box<dyn Future<Output = Result<Fold<T>, ApiError>> + Send + 'static>>;

/// Boxed remote call. Receives the slice's injected context.
pub type RemoteCall<T> =
    Box<dyn FnOnce(Arc<<T as SliceEntity>::Context>) -> OpFuture<T> + Send + 'static>;

/// Which part of the slice an operation writes.
///
/// Two requests with the same target race; only the most recently dispatched one may
/// fold its response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target<Id> {
    /// The list as a whole (fetch, clear).
    Collection,
    /// The `selected` pointer (fetch by id).
    Selection,
    /// A single row (update, delete, status change).
    Entity(Id),
    /// Never superseded (create, add, anything whose effects accumulate).
    Independent,
}

/// When an operation's fold is applied.
#[derive(Debug, Clone)]
pub enum Strategy<T: SliceEntity> {
    /// Fold after the server answers. Failures leave the state untouched.
    Pessimistic,
    /// Fold this immediately at dispatch, then fold the server's answer on success.
    /// On failure the rows this fold touched are put back; changes other operations made
    /// in the meantime are kept.
    Optimistic(Fold<T>),
}

impl<T: SliceEntity> Default for Strategy<T> {
    fn default() -> Self {
        Strategy::Pessimistic
    }
}

/// A remote operation ready to be dispatched to a slice.
pub struct Operation<T: SliceEntity> {
    pub(crate) label: &'static str,
    pub(crate) target: Target<T::Id>,
    pub(crate) strategy: Strategy<T>,
    pub(crate) call: RemoteCall<T>,
}

impl<T: SliceEntity> Operation<T> {
    pub fn new<F, Fut>(label: &'static str, target: Target<T::Id>, call: F) -> Self
    where
        F: FnOnce(Arc<T::Context>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Fold<T>, ApiError>> + Send + 'static,
    {
        Self {
            label,
            target,
            strategy: Strategy::Pessimistic,
            call: Box::new(move |context| -> OpFuture<T> { Box::pin(call(context)) }),
        }
    }

    /// Switches this operation to [`Strategy::Optimistic`].
    pub fn optimistic(mut self, fold: Fold<T>) -> Self {
        self.strategy = Strategy::Optimistic(fold);
        self
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn target(&self) -> &Target<T::Id> {
        &self.target
    }

    pub fn strategy(&self) -> &Strategy<T> {
        &self.strategy
    }

    /// Runs the remote call directly, bypassing any slice.
    pub fn execute(self, context: Arc<T::Context>) -> OpFuture<T> {
        (self.call)(context)
    }
}

impl<T: SliceEntity> fmt::Debug for Operation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("label", &self.label)
            .field("target", &self.target)
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

/// What a successful dispatch hands back to its caller.
#[derive(Debug, Clone)]
pub struct Outcome<T: SliceEntity> {
    /// The fold the server's answer produced.
    pub fold: Fold<T>,
    /// Slice state right after the fold was applied.
    pub state: SliceState<T>,
}

impl<T: SliceEntity> Outcome<T> {
    /// The single entity carried by the fold, if it carries one.
    pub fn entity(&self) -> Option<&T> {
        match &self.fold {
            Fold::Prepend(item) | Fold::Merge(item) | Fold::Splice(item) => Some(item),
            Fold::Select(item) => item.as_ref(),
            _ => None,
        }
    }

    pub fn into_entity(self) -> Option<T> {
        match self.fold {
            Fold::Prepend(item) | Fold::Merge(item) | Fold::Splice(item) => Some(item),
            Fold::Select(item) => item,
            _ => None,
        }
    }
}

/// Internal message type sent to a slice.
///
/// `Dispatch` runs a remote [`Operation`]; `Settle` is posted back by the spawned call
/// and is not meant to be sent by clients. The remaining variants are local and never
/// touch the network.
pub enum SliceRequest<T: SliceEntity> {
    Dispatch {
        operation: Operation<T>,
        respond_to: Response<Outcome<T>>,
    },
    Settle {
        tag: u64,
        result: Result<Fold<T>, ApiError>,
    },
    Apply {
        fold: Fold<T>,
        respond_to: Response<SliceState<T>>,
    },
    Snapshot {
        respond_to: Response<SliceState<T>>,
    },
    SetFilters {
        filters: BTreeMap<String, String>,
        respond_to: Response<()>,
    },
    ClearError {
        respond_to: Response<()>,
    },
    Reset {
        respond_to: Response<()>,
    },
}

impl<T: SliceEntity> fmt::Debug for SliceRequest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SliceRequest::Dispatch { operation, .. } => {
                f.debug_tuple("Dispatch").field(operation).finish()
            }
            SliceRequest::Settle { tag, result } => f
                .debug_struct("Settle")
                .field("tag", tag)
                .field("ok", &result.is_ok())
                .finish(),
            SliceRequest::Apply { fold, .. } => {
                f.debug_tuple("Apply").field(&fold.label()).finish()
            }
            SliceRequest::Snapshot { .. } => f.write_str("Snapshot"),
            SliceRequest::SetFilters { filters, .. } => {
                f.debug_tuple("SetFilters").field(filters).finish()
            }
            SliceRequest::ClearError { .. } => f.write_str("ClearError"),
            SliceRequest::Reset { .. } => f.write_str("Reset"),
        }
    }
}
