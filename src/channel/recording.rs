// SPDX-License-Identifier: MPL-2.0

use super::{ElementId, OutboundEvent, RemoteChannel};
use std::cell::RefCell;

/// One recorded send, with the element it was scoped to (if any).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPush {
    pub target: Option<ElementId>,
    pub event: OutboundEvent,
}

/// A channel that keeps every push in memory. Available to tests and behind
/// the `testing` feature.
#[derive(Debug, Default)]
pub struct RecordingChannel {
    pushes: RefCell<Vec<RecordedPush>>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events in send order, without targets.
    pub fn events(&self) -> Vec<OutboundEvent> {
        self.pushes
            .borrow()
            .iter()
            .map(|p| p.event.clone())
            .collect()
    }

    pub fn pushes(&self) -> Vec<RecordedPush> {
        self.pushes.borrow().clone()
    }

    /// Drain everything recorded so far.
    pub fn take(&self) -> Vec<OutboundEvent> {
        self.pushes
            .borrow_mut()
            .drain(..)
            .map(|p| p.event)
            .collect()
    }

    pub fn last(&self) -> Option<OutboundEvent> {
        self.pushes.borrow().last().map(|p| p.event.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.pushes.borrow().is_empty()
    }
}

impl RemoteChannel for RecordingChannel {
    fn push(&self, event: OutboundEvent) {
        self.pushes.borrow_mut().push(RecordedPush {
            target: None,
            event,
        });
    }

    fn push_to(&self, target: &ElementId, event: OutboundEvent) {
        self.pushes.borrow_mut().push(RecordedPush {
            target: Some(target.clone()),
            event,
        });
    }
}
