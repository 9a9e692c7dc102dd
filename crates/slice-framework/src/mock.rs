//! # Mock Slices & Testing Guide
//!
//! Typed clients are thin: they validate arguments, build an [`Operation`] and pick its
//! fold. That logic can be tested without any server by putting a mock behind the
//! [`SliceClient`].
//!
//! | | [`MockSlice`] | [`create_mock_client`] | Real [`SliceActor`](crate::SliceActor) |
//! |---|---|---|---|
//! | **Remote call** | never run | never run | run against the context |
//! | **State** | folds you script | none | real |
//! | **Use case** | "which operations did the client send?" | inspecting one request in detail | the runner itself, full flows |
//!
//! ## Fluent expectations
//!
//! ```rust
//! use slice_framework::mock::MockSlice;
//! use slice_framework::{Fold, Operation, SliceEntity, Target};
//!
//! #[derive(Clone, Debug)]
//! struct Item { id: u32 }
//! impl SliceEntity for Item {
//!     type Id = u32;
//!     type Summary = ();
//!     type Context = ();
//!     fn id(&self) -> &u32 { &self.id }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockSlice::<Item>::new();
//!     mock.expect_dispatch("fetch").return_ok(Fold::replace_all(vec![Item { id: 1 }]));
//!
//!     let client = mock.client();
//!     let op = Operation::new("fetch", Target::Collection, |_| async { Ok(Fold::Keep) });
//!     let outcome = client.dispatch(op).await.unwrap();
//!
//!     // The scripted fold is what lands in the state, not the operation's own call.
//!     assert_eq!(outcome.state.len(), 1);
//!     assert_eq!(mock.dispatched(), vec!["fetch"]);
//!     mock.verify();
//! }
//! ```
//!
//! ## Raw channel
//!
//! [`create_mock_client`] returns the receiving end of the mailbox so a test can take a
//! request apart and answer it by hand with [`expect_dispatch`] or [`expect_apply`].

use crate::client::SliceClient;
use crate::entity::SliceEntity;
use crate::error::{ApiError, FrameworkError};
use crate::fold::Fold;
use crate::message::{Operation, Outcome, Response, SliceRequest};
use crate::state::SliceState;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, watch};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

struct Expectation<T: SliceEntity> {
    label: &'static str,
    response: Result<Fold<T>, FrameworkError>,
}

#[derive(Default)]
struct Journal {
    dispatched: Vec<&'static str>,
    mismatches: Vec<String>,
}

/// A mock slice answering dispatches from a queue of scripted results.
///
/// Successful results are folded into the mock's own state and published, so code that
/// reads `current()` after a dispatch sees the scripted effect. Local requests (`apply`,
/// `snapshot`, `set_filters`, `clear_error`, `reset`) are served against that state
/// without expectations.
pub struct MockSlice<T: SliceEntity> {
    client: SliceClient<T>,
    expectations: Arc<Mutex<VecDeque<Expectation<T>>>>,
    journal: Arc<Mutex<Journal>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: SliceEntity> Default for MockSlice<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SliceEntity> MockSlice<T> {
    /// Creates a mock with an empty state and no expectations.
    pub fn new() -> Self {
        Self::with_state(SliceState::default())
    }

    /// Creates a mock whose state starts as `state`.
    pub fn with_state(state: SliceState<T>) -> Self {
        let (sender, mut receiver) = mpsc::channel::<SliceRequest<T>>(100);
        let (publisher, watcher) = watch::channel(state);
        let expectations: Arc<Mutex<VecDeque<Expectation<T>>>> =
            Arc::new(Mutex::new(VecDeque::new()));
        let journal = Arc::new(Mutex::new(Journal::default()));

        let expectations_clone = expectations.clone();
        let journal_clone = journal.clone();
        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                match request {
                    SliceRequest::Dispatch {
                        operation,
                        respond_to,
                    } => {
                        let label = operation.label();
                        let expectation = expectations_clone.lock().unwrap().pop_front();
                        let response = {
                            let mut journal = journal_clone.lock().unwrap();
                            journal.dispatched.push(label);
                            match expectation {
                                Some(expected) if expected.label == label => expected.response,
                                Some(expected) => {
                                    journal.mismatches.push(format!(
                                        "expected dispatch `{}`, got `{}`",
                                        expected.label, label
                                    ));
                                    Err(unexpected(label))
                                }
                                None => {
                                    journal
                                        .mismatches
                                        .push(format!("unexpected dispatch `{label}`"));
                                    Err(unexpected(label))
                                }
                            }
                        };

                        let reply = response.map(|fold| {
                            publisher.send_modify(|state| fold.clone().apply(state));
                            Outcome {
                                fold,
                                state: publisher.borrow().clone(),
                            }
                        });
                        let _ = respond_to.send(reply);
                    }
                    SliceRequest::Settle { .. } => {}
                    SliceRequest::Apply { fold, respond_to } => {
                        publisher.send_modify(|state| fold.apply(state));
                        let _ = respond_to.send(Ok(publisher.borrow().clone()));
                    }
                    SliceRequest::Snapshot { respond_to } => {
                        let _ = respond_to.send(Ok(publisher.borrow().clone()));
                    }
                    SliceRequest::SetFilters {
                        filters,
                        respond_to,
                    } => {
                        publisher.send_modify(|state| state.filters = filters);
                        let _ = respond_to.send(Ok(()));
                    }
                    SliceRequest::ClearError { respond_to } => {
                        publisher.send_modify(|state| {
                            state.error = None;
                            state.field_errors.clear();
                        });
                        let _ = respond_to.send(Ok(()));
                    }
                    SliceRequest::Reset { respond_to } => {
                        publisher.send_replace(SliceState::default());
                        let _ = respond_to.send(Ok(()));
                    }
                }
            }
        });

        Self {
            client: SliceClient::new(sender, watcher),
            expectations,
            journal,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> SliceClient<T> {
        self.client.clone()
    }

    /// Expects the next dispatch to carry `label`.
    pub fn expect_dispatch(&self, label: &'static str) -> DispatchExpectationBuilder<T> {
        DispatchExpectationBuilder {
            label,
            expectations: self.expectations.clone(),
        }
    }

    /// Labels of every dispatch received so far, in order.
    pub fn dispatched(&self) -> Vec<&'static str> {
        self.journal.lock().unwrap().dispatched.clone()
    }

    /// Verifies that all expectations were met and nothing unexpected arrived.
    pub fn verify(&self) {
        let journal = self.journal.lock().unwrap();
        if !journal.mismatches.is_empty() {
            panic!("Unexpected requests: {:?}", journal.mismatches);
        }
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

fn unexpected(label: &str) -> FrameworkError {
    FrameworkError::Api(ApiError::Rejected(format!("unexpected dispatch `{label}`")))
}

/// Builder for dispatch expectations.
pub struct DispatchExpectationBuilder<T: SliceEntity> {
    label: &'static str,
    expectations: Arc<Mutex<VecDeque<Expectation<T>>>>,
}

impl<T: SliceEntity> DispatchExpectationBuilder<T> {
    /// Answers the dispatch with `fold`, as if the server had succeeded.
    pub fn return_ok(self, fold: Fold<T>) {
        self.push(Ok(fold));
    }

    /// Answers the dispatch with a server failure.
    pub fn return_api_err(self, error: ApiError) {
        self.push(Err(FrameworkError::Api(error)));
    }

    /// Answers the dispatch with an arbitrary framework failure.
    pub fn return_err(self, error: FrameworkError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<Fold<T>, FrameworkError>) {
        self.expectations.lock().unwrap().push_back(Expectation {
            label: self.label,
            response,
        });
    }
}

// =============================================================================
// RAW CHANNEL HELPERS
// =============================================================================

/// Creates a client whose requests land in the returned receiver.
///
/// The published state stays at `SliceState::default()`; the test decides what each
/// responder receives.
pub fn create_mock_client<T: SliceEntity>(
    buffer_size: usize,
) -> (SliceClient<T>, mpsc::Receiver<SliceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    let (_, watcher) = watch::channel(SliceState::default());
    (SliceClient::new(sender, watcher), receiver)
}

/// Helper to verify that the next message is a Dispatch request.
pub async fn expect_dispatch<T: SliceEntity>(
    receiver: &mut mpsc::Receiver<SliceRequest<T>>,
) -> Option<(Operation<T>, Response<Outcome<T>>)> {
    match receiver.recv().await {
        Some(SliceRequest::Dispatch {
            operation,
            respond_to,
        }) => Some((operation, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Apply request.
pub async fn expect_apply<T: SliceEntity>(
    receiver: &mut mpsc::Receiver<SliceRequest<T>>,
) -> Option<(Fold<T>, Response<SliceState<T>>)> {
    match receiver.recv().await {
        Some(SliceRequest::Apply { fold, respond_to }) => Some((fold, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Target;

    #[derive(Clone, Debug, PartialEq)]
    struct Favorite {
        id: String,
    }

    impl SliceEntity for Favorite {
        type Id = String;
        type Summary = ();
        type Context = ();

        fn id(&self) -> &String {
            &self.id
        }
    }

    fn favorite(id: &str) -> Favorite {
        Favorite { id: id.to_string() }
    }

    fn add(id: &str) -> Operation<Favorite> {
        let item = favorite(id);
        Operation::new("add", Target::Independent, move |_| async move {
            Ok(Fold::Merge(item))
        })
    }

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<Favorite>(10);

        let task = tokio::spawn(async move { client.dispatch(add("p1")).await });

        let (operation, responder) = expect_dispatch(&mut receiver)
            .await
            .expect("Expected Dispatch request");
        assert_eq!(operation.label(), "add");
        assert_eq!(operation.target(), &Target::Independent);

        // Running the call directly yields the fold the slice would apply.
        let fold = operation.execute(Arc::new(())).await.unwrap();
        let mut state = SliceState::new();
        fold.clone().apply(&mut state);
        responder.send(Ok(Outcome { fold, state })).unwrap();

        let outcome = task.await.unwrap().unwrap();
        assert_eq!(outcome.entity(), Some(&favorite("p1")));
    }

    #[tokio::test]
    async fn test_mock_slice_with_expectations() {
        let mock = MockSlice::<Favorite>::new();
        mock.expect_dispatch("add").return_ok(Fold::Merge(favorite("p1")));
        mock.expect_dispatch("add")
            .return_api_err(ApiError::Network("offline".into()));

        let client = mock.client();
        let first = client.dispatch(add("p1")).await.unwrap();
        assert_eq!(first.state.len(), 1);
        assert_eq!(client.current().len(), 1);

        let second = client.dispatch(add("p2")).await;
        assert!(matches!(
            second,
            Err(FrameworkError::Api(ApiError::Network(_)))
        ));
        assert_eq!(client.current().len(), 1);

        assert_eq!(mock.dispatched(), vec!["add", "add"]);
        mock.verify();
    }

    #[tokio::test]
    #[should_panic(expected = "Unexpected requests")]
    async fn test_mock_slice_flags_unexpected_dispatch() {
        let mock = MockSlice::<Favorite>::new();
        let client = mock.client();

        let result = client.dispatch(add("p1")).await;
        assert!(result.is_err());
        mock.verify();
    }
}
