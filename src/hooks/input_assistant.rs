// SPDX-License-Identifier: MPL-2.0

//! Chat input assistant.
//!
//! Mediates between one text control and the remote controller:
//!
//! - auto-grows the control up to a maximum height on every edit,
//! - reports the `@mention` being typed (or its absence) after every edit,
//! - submits on Enter (Shift+Enter keeps the newline) or on a send signal,
//! - inserts `@` on request and splices pinned contacts in at the caret.
//!
//! The text control owns the buffer. Each handler reads an [`InputState`]
//! snapshot, transforms it, and writes it back.

use super::Hook;
use super::host::{Height, HostSignal, InputHost, Key, KeyDisposition, KeyPress, TextControl};
use super::mention::{InputState, mention_query};
use crate::channel::{ElementId, InboundEvent, OutboundEvent, RemoteChannel};
use crate::state::HookSettings;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, trace};

pub struct InputAssistant<H: InputHost> {
    id: ElementId,
    /// `None` when the host had no text control, and after detach.
    control: RefCell<Option<H::Control>>,
    channel: Rc<dyn RemoteChannel>,
    max_height: u32,
}

impl<H: InputHost> InputAssistant<H>
where
    H::Control: Clone,
{
    /// Bind to the text control nested in `host`.
    ///
    /// A host without a text control yields an inert assistant: every handler
    /// is a no-op and [`InputAssistant::detach`] is still safe.
    pub fn attach(host: &H, channel: Rc<dyn RemoteChannel>, settings: &HookSettings) -> Self {
        let id = host.id();
        let control = host.text_control();
        let max_height = settings.max_input_height;

        match &control {
            Some(control) => {
                auto_grow(control, max_height);
                debug!("input assistant attached to {id}");
            }
            None => debug!("no text control in {id}; input assistant is inert"),
        }

        Self {
            id,
            control: RefCell::new(control),
            channel,
            max_height,
        }
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn is_inert(&self) -> bool {
        self.control.borrow().is_none()
    }

    fn control(&self) -> Option<H::Control> {
        self.control.borrow().clone()
    }

    /// The control's value changed (typing, paste, cut...).
    pub fn on_input(&self) {
        let Some(control) = self.control() else {
            return;
        };
        auto_grow(&control, self.max_height);

        let state = read_state(&control);
        let event = match mention_query(&state.buffer, state.caret) {
            Some(query) => OutboundEvent::MentionLookup {
                query: query.to_string(),
            },
            None => OutboundEvent::DismissMentions,
        };
        trace!("{}: {}", self.id, event.name());
        self.channel.push(event);
    }

    /// Enter without Shift submits and swallows the newline.
    pub fn on_key_down(&self, key: KeyPress) -> KeyDisposition {
        let Some(control) = self.control() else {
            return KeyDisposition::Proceed;
        };
        if key.key != Key::Enter || key.shift || !control.has_focus() {
            return KeyDisposition::Proceed;
        }
        self.submit();
        KeyDisposition::PreventDefault
    }

    pub fn on_signal(&self, signal: HostSignal) {
        match signal {
            HostSignal::DispatchQuestion => {
                self.submit();
            }
            HostSignal::InsertAtSymbol => self.insert_marker(),
        }
    }

    /// Send the trimmed input as a question and reset the control.
    ///
    /// Returns `false` (and touches nothing) when the input is blank.
    pub fn submit(&self) -> bool {
        let Some(control) = self.control() else {
            return false;
        };
        let value = control.value();
        let question = value.trim();
        if question.is_empty() {
            return false;
        }

        debug!("{}: submitting question", self.id);
        self.channel.push(OutboundEvent::SubmitQuestion {
            question: question.to_string(),
        });
        control.set_value("");
        control.set_height(Height::Auto);
        self.channel.push(OutboundEvent::DismissMentions);
        true
    }

    /// Insert `@` at the caret. Does not trigger a mention lookup by itself.
    pub fn insert_marker(&self) {
        let Some(control) = self.control() else {
            return;
        };
        let state = read_state(&control).with_marker();
        self.apply(&control, &state);
    }

    /// Splice `@label ` over the partial mention at the caret.
    pub fn pin_contact(&self, label: &str) {
        let Some(control) = self.control() else {
            return;
        };
        trace!("{}: pinning {label}", self.id);
        let state = read_state(&control).with_pinned(label);
        self.apply(&control, &state);
    }

    fn apply(&self, control: &H::Control, state: &InputState) {
        control.set_value(&state.buffer);
        control.set_selection(state.caret, state.caret);
        control.focus();
        auto_grow(control, self.max_height);
    }

    /// Release the control. Safe to call repeatedly.
    pub fn detach(&self) {
        if self.control.borrow_mut().take().is_some() {
            debug!("input assistant detached from {}", self.id);
        }
    }
}

impl<H: InputHost> Hook for InputAssistant<H>
where
    H::Control: Clone,
{
    fn name(&self) -> &'static str {
        "InputAssistant"
    }

    fn is_attached(&self) -> bool {
        !self.is_inert()
    }

    fn handle_event(&self, event: &InboundEvent) {
        if let InboundEvent::ContactPinned { label } = event {
            self.pin_contact(label);
        }
    }

    fn detach(&self) {
        InputAssistant::detach(self);
    }
}

fn read_state<C: TextControl>(control: &C) -> InputState {
    let value = control.value();
    match control.caret() {
        Some(caret) => InputState::new(value, caret),
        None => InputState::at_end(value),
    }
}

/// Collapse to zero first so the content height reflects shrinking text,
/// then grow to fit, capped at `max_height`.
fn auto_grow<C: TextControl>(control: &C, max_height: u32) {
    control.set_height(Height::Px(0));
    let natural = control.content_height();
    control.set_height(Height::Px(natural.min(max_height)));
}
