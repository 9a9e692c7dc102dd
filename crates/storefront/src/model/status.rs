//! Status lifecycles.
//!
//! Status changes are restricted updates: each status enum lists the statuses it may move
//! to, and clients refuse anything else before sending a request.

use serde::Serialize;
use std::fmt::Debug;

/// A status enum with an enumerated set of allowed transitions.
pub trait StatusTransition: Copy + PartialEq + Debug + Serialize + Send + Sync + 'static {
    /// Statuses reachable from `self` in one step.
    fn allowed_targets(self) -> &'static [Self];

    fn can_transition_to(self, next: Self) -> bool {
        self.allowed_targets().contains(&next)
    }

    /// No further status change is possible.
    fn is_terminal(self) -> bool {
        self.allowed_targets().is_empty()
    }
}

/// An entity governed by a [`StatusTransition`] lifecycle.
pub trait HasStatus {
    type Status: StatusTransition;

    fn status(&self) -> Self::Status;
}

/// A status change refused locally because the lifecycle does not allow it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Cannot change status from {from} to {to}")]
pub struct InvalidTransition {
    pub from: String,
    pub to: String,
}

impl InvalidTransition {
    pub fn new<S: StatusTransition>(from: S, to: S) -> Self {
        Self {
            from: status_name(from),
            to: status_name(to),
        }
    }
}

/// Wire name of a status, e.g. `"cancelled"`.
pub fn status_name<S: StatusTransition>(status: S) -> String {
    match serde_json::to_value(status) {
        Ok(serde_json::Value::String(name)) => name,
        _ => format!("{status:?}").to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OrderStatus, ReviewStatus};

    #[test]
    fn test_refusal_uses_wire_names() {
        let refused = InvalidTransition::new(OrderStatus::Delivered, OrderStatus::Cancelled);
        assert_eq!(refused.to_string(), "Cannot change status from delivered to cancelled");
        assert!(ReviewStatus::Rejected.can_transition_to(ReviewStatus::Approved));
        assert!(!ReviewStatus::Approved.can_transition_to(ReviewStatus::Pending));
    }
}
