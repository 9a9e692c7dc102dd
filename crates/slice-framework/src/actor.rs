//! # Slice Actor
//!
//! The `SliceActor` is the async operation runner. It owns one [`SliceState`] and
//! processes requests sequentially, so the state needs no locks.
//!
//! Remote calls do not block the loop. A dispatch spawns the call as its own task and the
//! task posts a `Settle` message back into this actor's mailbox when the call resolves.
//! Responses therefore interleave freely while every state change still happens here, one
//! message at a time.

use crate::client::SliceClient;
use crate::entity::SliceEntity;
use crate::error::{ApiError, FrameworkError};
use crate::fold::{Fold, Undo};
use crate::message::{Operation, Outcome, Response, SliceRequest, Strategy, Target};
use crate::state::SliceState;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

struct Pending<T: SliceEntity> {
    label: &'static str,
    target: Target<T::Id>,
    respond_to: Response<Outcome<T>>,
    rollback: Option<Undo<T>>,
}

/// The generic actor that owns one resource slice.
///
/// # Lifecycle of a dispatch
///
/// 1. The operation gets the next request tag, which becomes the latest for its target.
/// 2. `in_flight` goes up, `loading` becomes true, `error` and `field_errors` are cleared.
///    An optimistic fold is applied now.
/// 3. The remote call runs in a spawned task and posts `Settle { tag, result }` back.
/// 4. On settle `in_flight` goes down. If the tag is no longer the latest for its target
///    the response is discarded and the caller gets [`FrameworkError::Superseded`].
///    Otherwise the fold is applied, or the error is normalized into `error` (and an
///    optimistic fold is rolled back).
///
/// Every change is published to subscribers through a `watch` channel.
///
/// ```rust
/// use slice_framework::{Fold, Operation, SliceActor, SliceEntity, Target};
///
/// #[derive(Clone, Debug)]
/// struct Tag { id: u32 }
///
/// impl SliceEntity for Tag {
///     type Id = u32;
///     type Summary = ();
///     type Context = ();
///     fn id(&self) -> &u32 { &self.id }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = SliceActor::<Tag>::new(10);
///     tokio::spawn(actor.run(()));
///
///     let fetch = Operation::new("fetch", Target::Collection, |_ctx| async {
///         Ok(Fold::replace_all(vec![Tag { id: 1 }, Tag { id: 2 }]))
///     });
///     let outcome = client.dispatch(fetch).await.unwrap();
///     assert_eq!(outcome.state.len(), 2);
///     assert!(!client.current().loading);
/// }
/// ```
pub struct SliceActor<T: SliceEntity> {
    name: &'static str,
    receiver: mpsc::Receiver<SliceRequest<T>>,
    loopback: mpsc::WeakSender<SliceRequest<T>>,
    publisher: watch::Sender<SliceState<T>>,
    state: SliceState<T>,
    next_tag: u64,
    /// Requests tagged below this were issued before the last reset.
    reset_floor: u64,
    latest: HashMap<Target<T::Id>, u64>,
    pending: HashMap<u64, Pending<T>>,
}

impl<T: SliceEntity> SliceActor<T> {
    /// Creates a new `SliceActor` and its associated `SliceClient`.
    ///
    /// `buffer_size` is the mailbox capacity; callers wait when it is full.
    /// The actor does nothing until [`run`](Self::run) is spawned.
    pub fn new(buffer_size: usize) -> (Self, SliceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (publisher, watcher) = watch::channel(SliceState::default());
        let name = std::any::type_name::<T>()
            .rsplit("::")
            .next()
            .unwrap_or("Unknown");
        let actor = Self {
            name,
            receiver,
            loopback: sender.downgrade(),
            publisher,
            state: SliceState::default(),
            next_tag: 1,
            reset_floor: 0,
            latest: HashMap::new(),
            pending: HashMap::new(),
        };
        (actor, SliceClient::new(sender, watcher))
    }

    /// Runs the event loop until every client is dropped and no call is in flight.
    ///
    /// # Context Injection
    /// `context` is handed to every remote call. Binding it here rather than in `new`
    /// lets slices be created before the API client they use.
    pub async fn run(mut self, context: T::Context) {
        let context = Arc::new(context);
        info!(slice = self.name, "Slice started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                SliceRequest::Dispatch {
                    operation,
                    respond_to,
                } => self.dispatch(operation, respond_to, &context),
                SliceRequest::Settle { tag, result } => self.settle(tag, result),
                SliceRequest::Apply { fold, respond_to } => {
                    debug!(slice = self.name, fold = fold.label(), "Apply");
                    fold.apply(&mut self.state);
                    self.publish();
                    let _ = respond_to.send(Ok(self.state.clone()));
                }
                SliceRequest::Snapshot { respond_to } => {
                    let _ = respond_to.send(Ok(self.state.clone()));
                }
                SliceRequest::SetFilters {
                    filters,
                    respond_to,
                } => {
                    debug!(slice = self.name, ?filters, "Set filters");
                    self.state.filters = filters;
                    self.publish();
                    let _ = respond_to.send(Ok(()));
                }
                SliceRequest::ClearError { respond_to } => {
                    self.state.error = None;
                    self.state.field_errors.clear();
                    self.publish();
                    let _ = respond_to.send(Ok(()));
                }
                SliceRequest::Reset { respond_to } => {
                    // Calls still in flight settle as superseded.
                    self.latest.clear();
                    self.reset_floor = self.next_tag;
                    let in_flight = self.state.in_flight;
                    self.state = SliceState {
                        in_flight,
                        loading: in_flight > 0,
                        ..SliceState::default()
                    };
                    for pending in self.pending.values_mut() {
                        pending.rollback = None;
                    }
                    info!(slice = self.name, in_flight, "Reset");
                    self.publish();
                    let _ = respond_to.send(Ok(()));
                }
            }
        }

        info!(slice = self.name, size = self.state.len(), "Shutdown");
    }

    fn dispatch(
        &mut self,
        operation: Operation<T>,
        respond_to: Response<Outcome<T>>,
        context: &Arc<T::Context>,
    ) {
        let Operation {
            label,
            target,
            strategy,
            call,
        } = operation;

        let Some(loopback) = self.loopback.upgrade() else {
            let _ = respond_to.send(Err(FrameworkError::SliceClosed));
            return;
        };

        let tag = self.next_tag;
        self.next_tag += 1;
        if target != Target::Independent {
            self.latest.insert(target.clone(), tag);
        }
        debug!(slice = self.name, tag, label, ?target, "Dispatch");

        self.state.in_flight += 1;
        self.state.loading = true;
        self.state.error = None;
        self.state.field_errors.clear();

        let rollback = match strategy {
            Strategy::Pessimistic => None,
            Strategy::Optimistic(fold) => Some(fold.apply_undoable(&mut self.state)),
        };
        self.publish();

        self.pending.insert(
            tag,
            Pending {
                label,
                target,
                respond_to,
                rollback,
            },
        );

        let call = call(Arc::clone(context));
        tokio::spawn(async move {
            let result = call.await;
            let _ = loopback.send(SliceRequest::Settle { tag, result }).await;
        });
    }

    fn settle(&mut self, tag: u64, result: Result<Fold<T>, ApiError>) {
        let Some(pending) = self.pending.remove(&tag) else {
            warn!(slice = self.name, tag, "Settle for unknown request");
            return;
        };
        let Pending {
            label,
            target,
            respond_to,
            rollback,
        } = pending;

        self.state.in_flight = self.state.in_flight.saturating_sub(1);
        self.state.loading = self.state.in_flight > 0;

        let is_latest = tag >= self.reset_floor
            && match target {
                Target::Independent => true,
                _ => self.latest.get(&target) == Some(&tag),
            };
        if !is_latest {
            warn!(slice = self.name, tag, label, ?target, "Discarding superseded response");
            self.publish();
            let _ = respond_to.send(Err(FrameworkError::Superseded(tag)));
            return;
        }
        self.latest.remove(&target);

        match result {
            Ok(fold) => {
                info!(slice = self.name, tag, label, fold = fold.label(), "Settled");
                fold.clone().apply(&mut self.state);
                self.state.error = None;
                self.state.field_errors.clear();
                self.publish();
                let _ = respond_to.send(Ok(Outcome {
                    fold,
                    state: self.state.clone(),
                }));
            }
            Err(e) => {
                warn!(slice = self.name, tag, label, error = %e, "Request failed");
                if let Some(rollback) = rollback {
                    self.roll_back(label, rollback);
                }
                self.state.error = Some(e.user_message());
                self.state.field_errors = e.field_errors();
                self.publish();
                let _ = respond_to.send(Err(FrameworkError::Api(e)));
            }
        }
    }

    fn roll_back(&mut self, label: &'static str, undo: Undo<T>) {
        undo.revert(&mut self.state);
        debug!(slice = self.name, label, "Rolled back optimistic update");
    }

    fn publish(&self) {
        self.publisher.send_replace(self.state.clone());
    }
}
