// SPDX-License-Identifier: MPL-2.0

mod events;
pub mod loopback;
mod mpsc;
#[cfg(any(test, feature = "testing"))]
mod recording;

pub use events::{ElementId, InboundEvent, OutboundEvent, WireMessage};
pub use mpsc::{InboundReceiver, InboundSender, MpscChannel};
#[cfg(any(test, feature = "testing"))]
pub use recording::{RecordedPush, RecordingChannel};

use std::rc::Rc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("unknown event: {0}")]
    UnknownEvent(String),
    #[error("invalid payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("channel closed")]
    Closed,
}

/// Outbound half of the transport to the server-side controller.
///
/// Sends are fire-and-forget: ordering follows call order, and discarding
/// stale replies is the controller's job.
pub trait RemoteChannel {
    fn push(&self, event: OutboundEvent);

    /// Push an event scoped to one element. Transports without element
    /// routing treat it like [`RemoteChannel::push`].
    fn push_to(&self, target: &ElementId, event: OutboundEvent) {
        let _ = target;
        self.push(event);
    }
}

impl<T: RemoteChannel + ?Sized> RemoteChannel for Rc<T> {
    fn push(&self, event: OutboundEvent) {
        (**self).push(event);
    }

    fn push_to(&self, target: &ElementId, event: OutboundEvent) {
        (**self).push_to(target, event);
    }
}
