// SPDX-License-Identifier: MPL-2.0

//! Tokio-backed transport halves.
//!
//! The UI thread pushes onto an unbounded sender (never blocks) and polls the
//! inbound receiver from its own event loop, the same way the GTK side polls
//! `std::sync::mpsc` receivers from a timeout.

use super::{ChannelError, ElementId, OutboundEvent, RemoteChannel, WireMessage};
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{trace, warn};

/// Outbound channel that forwards wire messages to a controller task.
#[derive(Debug, Clone)]
pub struct MpscChannel {
    tx: UnboundedSender<WireMessage>,
}

impl MpscChannel {
    /// Create the channel along with the receiver the controller reads from.
    pub fn pair() -> (Self, UnboundedReceiver<WireMessage>) {
        let (tx, rx) = unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, message: WireMessage) {
        trace!("push {}", message.event);
        if self.tx.send(message).is_err() {
            warn!("remote channel closed; dropping outbound event");
        }
    }
}

impl RemoteChannel for MpscChannel {
    fn push(&self, event: OutboundEvent) {
        self.send(event.to_wire());
    }

    fn push_to(&self, target: &ElementId, event: OutboundEvent) {
        self.send(event.to_wire().with_target(target.clone()));
    }
}

/// Controller-side sender for messages bound to mounted hooks.
#[derive(Debug, Clone)]
pub struct InboundSender {
    tx: UnboundedSender<WireMessage>,
}

impl InboundSender {
    pub fn send(&self, message: WireMessage) -> Result<(), ChannelError> {
        self.tx.send(message).map_err(|_| ChannelError::Closed)
    }
}

/// UI-side receiver for inbound messages.
#[derive(Debug)]
pub struct InboundReceiver {
    pub(crate) rx: UnboundedReceiver<WireMessage>,
}

impl InboundReceiver {
    pub fn pair() -> (InboundSender, InboundReceiver) {
        let (tx, rx) = unbounded_channel();
        (InboundSender { tx }, InboundReceiver { rx })
    }

    /// Take everything that has arrived, in arrival order.
    ///
    /// Returns [`ChannelError::Closed`] once the sender is gone and the queue
    /// is empty, so pollers know to stop.
    pub fn drain(&mut self) -> Result<Vec<WireMessage>, ChannelError> {
        let mut messages = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(message) => messages.push(message),
                Err(TryRecvError::Empty) => return Ok(messages),
                Err(TryRecvError::Disconnected) => {
                    if messages.is_empty() {
                        return Err(ChannelError::Closed);
                    }
                    return Ok(messages);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::InboundEvent;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_push_preserves_order() {
        let (channel, mut rx) = MpscChannel::pair();
        channel.push(OutboundEvent::MentionLookup {
            query: "jo".to_string(),
        });
        channel.push(OutboundEvent::DismissMentions);

        assert_eq!(rx.recv().await.unwrap().event, "mention_lookup");
        assert_eq!(rx.recv().await.unwrap().event, "dismiss_mentions");
    }

    #[tokio::test]
    async fn test_push_to_carries_target() {
        let (channel, mut rx) = MpscChannel::pair();
        channel.push_to(&ElementId::new("copy"), OutboundEvent::ResetCopied);

        let msg = rx.recv().await.unwrap();
        assert_eq!(msg.target, Some(ElementId::new("copy")));
    }

    #[test]
    fn test_push_after_close_is_silent() {
        let (channel, rx) = MpscChannel::pair();
        drop(rx);
        channel.push(OutboundEvent::DismissMentions);
    }

    #[test]
    fn test_drain_then_closed() {
        let (tx, mut rx) = InboundReceiver::pair();
        let pinned = InboundEvent::ContactPinned {
            label: "Amy".to_string(),
        };
        tx.send(pinned.to_wire()).unwrap();

        assert_eq!(rx.drain().unwrap(), vec![pinned.to_wire()]);
        assert!(rx.drain().unwrap().is_empty());

        drop(tx);
        assert!(matches!(rx.drain(), Err(ChannelError::Closed)));
    }
}
