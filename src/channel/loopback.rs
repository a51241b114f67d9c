// SPDX-License-Identifier: MPL-2.0

//! In-process stand-in for the server controller.
//!
//! Answers `mention_lookup` with `contact_pinned` when the query names exactly
//! one contact. Everything else is only logged. The demo window runs against
//! this so the input assistant can be exercised without a server.

use super::{InboundEvent, InboundReceiver, MpscChannel, OutboundEvent, WireMessage};
use crate::runtime;
use tracing::{debug, warn};

/// Reply the controller would send for one outbound message, if any.
pub fn respond(contacts: &[String], message: &WireMessage) -> Option<WireMessage> {
    let event = match OutboundEvent::from_wire(message) {
        Ok(event) => event,
        Err(e) => {
            warn!("loopback: {e}");
            return None;
        }
    };

    match event {
        OutboundEvent::MentionLookup { query } => {
            let query = query.to_lowercase();
            let mut matches = contacts
                .iter()
                .filter(|c| c.to_lowercase().starts_with(&query));
            let first = matches.next()?;
            if matches.next().is_some() {
                debug!("loopback: '{query}' is ambiguous");
                return None;
            }
            Some(
                InboundEvent::ContactPinned {
                    label: first.clone(),
                }
                .to_wire(),
            )
        }
        OutboundEvent::SubmitQuestion { question } => {
            debug!("loopback: question submitted: {question}");
            None
        }
        other => {
            debug!("loopback: {}", other.name());
            None
        }
    }
}

/// Spawn a loopback controller on the shared runtime.
///
/// Returns the channel hooks push to and the receiver the UI polls for replies.
pub fn spawn_loopback(contacts: Vec<String>) -> (MpscChannel, InboundReceiver) {
    let (channel, mut outbound) = MpscChannel::pair();
    let (inbound_tx, inbound_rx) = InboundReceiver::pair();

    runtime::spawn(async move {
        while let Some(message) = outbound.recv().await {
            if let Some(reply) = respond(&contacts, &message)
                && inbound_tx.send(reply).is_err()
            {
                break;
            }
        }
        debug!("loopback controller stopped");
    });

    (channel, inbound_rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::RemoteChannel;
    use pretty_assertions::assert_eq;

    fn contacts() -> Vec<String> {
        vec!["John".to_string(), "Joanna".to_string(), "Amy".to_string()]
    }

    fn lookup(query: &str) -> WireMessage {
        OutboundEvent::MentionLookup {
            query: query.to_string(),
        }
        .to_wire()
    }

    #[test]
    fn test_unique_prefix_pins_contact() {
        let reply = respond(&contacts(), &lookup("am")).unwrap();
        assert_eq!(
            InboundEvent::from_wire(&reply).unwrap(),
            InboundEvent::ContactPinned {
                label: "Amy".to_string()
            }
        );
    }

    #[test]
    fn test_ambiguous_prefix_has_no_reply() {
        assert!(respond(&contacts(), &lookup("jo")).is_none());
        assert!(respond(&contacts(), &lookup("joh")).is_some());
    }

    #[test]
    fn test_other_events_have_no_reply() {
        assert!(respond(&contacts(), &OutboundEvent::DismissMentions.to_wire()).is_none());
        assert!(respond(&contacts(), &WireMessage::new("bogus", serde_json::json!({}))).is_none());
    }

    #[test]
    fn test_spawned_loopback_replies() {
        let (channel, mut inbound) = spawn_loopback(contacts());
        channel.push(OutboundEvent::DismissMentions);
        channel.push(OutboundEvent::MentionLookup {
            query: "amy".to_string(),
        });

        let reply = inbound.rx.blocking_recv().unwrap();
        assert_eq!(reply.event, "contact_pinned");
        assert_eq!(reply.payload, serde_json::json!({ "label": "Amy" }));
    }
}
