// SPDX-License-Identifier: MPL-2.0

//! Named messages exchanged with the server-side controller.
//!
//! On the wire every message is `{"event": <name>, "payload": {...}}`, with an
//! optional `target` naming the element a reply is scoped to. Hooks only see
//! the typed [`OutboundEvent`] / [`InboundEvent`] forms.

use super::ChannelError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the host element a hook is mounted on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A message as it travels over the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    pub event: String,
    #[serde(default = "empty_payload")]
    pub payload: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<ElementId>,
}

fn empty_payload() -> serde_json::Value {
    serde_json::json!({})
}

impl WireMessage {
    pub fn new(event: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            event: event.into(),
            payload,
            target: None,
        }
    }

    pub fn with_target(mut self, target: ElementId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn to_json(&self) -> Result<String, ChannelError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ChannelError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Messages hooks send to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundEvent {
    /// A trailing `@word` token at the caret; `query` excludes the `@`.
    MentionLookup { query: String },
    DismissMentions,
    SubmitQuestion { question: String },
    CopiedToClipboard { text: String },
    ResetCopied,
}

impl OutboundEvent {
    pub const MENTION_LOOKUP: &'static str = "mention_lookup";
    pub const DISMISS_MENTIONS: &'static str = "dismiss_mentions";
    pub const SUBMIT_QUESTION: &'static str = "submit_question";
    pub const COPIED_TO_CLIPBOARD: &'static str = "copied-to-clipboard";
    pub const RESET_COPIED: &'static str = "reset-copied";

    pub fn name(&self) -> &'static str {
        match self {
            OutboundEvent::MentionLookup { .. } => Self::MENTION_LOOKUP,
            OutboundEvent::DismissMentions => Self::DISMISS_MENTIONS,
            OutboundEvent::SubmitQuestion { .. } => Self::SUBMIT_QUESTION,
            OutboundEvent::CopiedToClipboard { .. } => Self::COPIED_TO_CLIPBOARD,
            OutboundEvent::ResetCopied => Self::RESET_COPIED,
        }
    }

    pub fn payload(&self) -> serde_json::Value {
        match self {
            OutboundEvent::MentionLookup { query } => serde_json::json!({ "query": query }),
            OutboundEvent::SubmitQuestion { question } => {
                serde_json::json!({ "question": question })
            }
            OutboundEvent::CopiedToClipboard { text } => serde_json::json!({ "text": text }),
            OutboundEvent::DismissMentions | OutboundEvent::ResetCopied => empty_payload(),
        }
    }

    pub fn to_wire(&self) -> WireMessage {
        WireMessage::new(self.name(), self.payload())
    }

    /// Inverse of [`OutboundEvent::to_wire`], used by the controller side.
    pub fn from_wire(message: &WireMessage) -> Result<Self, ChannelError> {
        let payload = message.payload.clone();
        match message.event.as_str() {
            Self::MENTION_LOOKUP => {
                let MentionLookupPayload { query } = serde_json::from_value(payload)?;
                Ok(OutboundEvent::MentionLookup { query })
            }
            Self::DISMISS_MENTIONS => Ok(OutboundEvent::DismissMentions),
            Self::SUBMIT_QUESTION => {
                let SubmitQuestionPayload { question } = serde_json::from_value(payload)?;
                Ok(OutboundEvent::SubmitQuestion { question })
            }
            Self::COPIED_TO_CLIPBOARD => {
                let TextPayload { text } = serde_json::from_value(payload)?;
                Ok(OutboundEvent::CopiedToClipboard { text })
            }
            Self::RESET_COPIED => Ok(OutboundEvent::ResetCopied),
            other => Err(ChannelError::UnknownEvent(other.to_string())),
        }
    }
}

/// Messages the server pushes to mounted hooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// The server resolved a mention to a contact; splice `@label ` at the caret.
    ContactPinned { label: String },
    CopyToClipboard { text: String },
}

impl InboundEvent {
    pub const CONTACT_PINNED: &'static str = "contact_pinned";
    pub const COPY_TO_CLIPBOARD: &'static str = "copy-to-clipboard";

    pub fn name(&self) -> &'static str {
        match self {
            InboundEvent::ContactPinned { .. } => Self::CONTACT_PINNED,
            InboundEvent::CopyToClipboard { .. } => Self::COPY_TO_CLIPBOARD,
        }
    }

    pub fn decode(name: &str, payload: serde_json::Value) -> Result<Self, ChannelError> {
        match name {
            Self::CONTACT_PINNED => {
                let ContactPinnedPayload { label } = serde_json::from_value(payload)?;
                Ok(InboundEvent::ContactPinned { label })
            }
            Self::COPY_TO_CLIPBOARD => {
                let TextPayload { text } = serde_json::from_value(payload)?;
                Ok(InboundEvent::CopyToClipboard { text })
            }
            other => Err(ChannelError::UnknownEvent(other.to_string())),
        }
    }

    pub fn from_wire(message: &WireMessage) -> Result<Self, ChannelError> {
        Self::decode(&message.event, message.payload.clone())
    }

    pub fn to_wire(&self) -> WireMessage {
        let payload = match self {
            InboundEvent::ContactPinned { label } => serde_json::json!({ "label": label }),
            InboundEvent::CopyToClipboard { text } => serde_json::json!({ "text": text }),
        };
        WireMessage::new(self.name(), payload)
    }
}

#[derive(Deserialize)]
struct MentionLookupPayload {
    query: String,
}

#[derive(Deserialize)]
struct SubmitQuestionPayload {
    question: String,
}

#[derive(Deserialize)]
struct ContactPinnedPayload {
    label: String,
}

#[derive(Deserialize)]
struct TextPayload {
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_outbound_payload_shapes() {
        let lookup = OutboundEvent::MentionLookup {
            query: "jo".to_string(),
        };
        assert_eq!(
            lookup.to_wire().to_json().unwrap(),
            r#"{"event":"mention_lookup","payload":{"query":"jo"}}"#
        );
        assert_eq!(
            OutboundEvent::DismissMentions.to_wire().to_json().unwrap(),
            r#"{"event":"dismiss_mentions","payload":{}}"#
        );
    }

    #[test]
    fn test_targeted_message_serializes_target() {
        let msg = OutboundEvent::ResetCopied
            .to_wire()
            .with_target(ElementId::new("copy-btn"));
        assert_eq!(
            msg.to_json().unwrap(),
            r#"{"event":"reset-copied","payload":{},"target":"copy-btn"}"#
        );
    }

    #[test]
    fn test_decode_contact_pinned() {
        let msg = WireMessage::from_json(r#"{"event":"contact_pinned","payload":{"label":"John"}}"#)
            .unwrap();
        assert_eq!(
            InboundEvent::from_wire(&msg).unwrap(),
            InboundEvent::ContactPinned {
                label: "John".to_string()
            }
        );
    }

    #[test]
    fn test_missing_payload_defaults_to_empty_object() {
        let msg = WireMessage::from_json(r#"{"event":"dismiss_mentions"}"#).unwrap();
        assert_eq!(msg.payload, serde_json::json!({}));
        assert_eq!(
            OutboundEvent::from_wire(&msg).unwrap(),
            OutboundEvent::DismissMentions
        );
    }

    #[test]
    fn test_unknown_inbound_event() {
        let err = InboundEvent::decode("mystery", serde_json::json!({})).unwrap_err();
        assert!(matches!(err, ChannelError::UnknownEvent(name) if name == "mystery"));
    }

    #[test]
    fn test_malformed_payload() {
        let err = InboundEvent::decode("contact_pinned", serde_json::json!({ "name": "x" }))
            .unwrap_err();
        assert!(matches!(err, ChannelError::Payload(_)));
    }

    #[test]
    fn test_controller_side_decodes_submission() {
        let wire = OutboundEvent::SubmitQuestion {
            question: "hello".to_string(),
        }
        .to_wire();
        assert_eq!(
            OutboundEvent::from_wire(&wire).unwrap(),
            OutboundEvent::SubmitQuestion {
                question: "hello".to_string()
            }
        );
    }
}
