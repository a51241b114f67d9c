// SPDX-License-Identifier: MPL-2.0

//! Wires an [`InputAssistant`] to a GTK `TextView`.

use super::host::{GtkInputHost, GtkTextControl};
use crate::channel::{InboundEvent, RemoteChannel};
use crate::hooks::host::{HostSignal, InputHost, Key, KeyDisposition, KeyPress};
use crate::hooks::{Hook, InputAssistant};
use crate::state::HookSettings;
use gtk4::prelude::*;
use gtk4::{gdk, glib};
use std::cell::RefCell;
use std::rc::Rc;

struct Listeners {
    view: gtk4::TextView,
    buffer: gtk4::TextBuffer,
    changed: glib::SignalHandlerId,
    keys: gtk4::EventControllerKey,
}

pub struct GtkInputAssistant {
    assistant: Rc<InputAssistant<GtkInputHost>>,
    listeners: RefCell<Option<Listeners>>,
}

impl GtkInputAssistant {
    pub fn attach(
        host: &GtkInputHost,
        channel: Rc<dyn RemoteChannel>,
        settings: &HookSettings,
    ) -> Self {
        let assistant = Rc::new(InputAssistant::attach(host, channel, settings));
        let listeners = if assistant.is_inert() {
            None
        } else {
            host.text_control()
                .map(|control| install(&assistant, &control))
        };

        Self {
            assistant,
            listeners: RefCell::new(listeners),
        }
    }

    /// Raise a host signal, as a send or "add context" button does.
    pub fn signal(&self, signal: HostSignal) {
        self.assistant.on_signal(signal);
    }
}

fn install(assistant: &Rc<InputAssistant<GtkInputHost>>, control: &GtkTextControl) -> Listeners {
    let view = control.view().clone();
    let buffer = view.buffer();

    let weak = Rc::downgrade(assistant);
    let watched = control.clone();
    let changed = buffer.connect_changed(move |_| {
        if watched.is_programmatic() {
            return;
        }
        if let Some(assistant) = weak.upgrade() {
            assistant.on_input();
        }
    });

    // Capture phase, so Enter is seen before the view inserts a newline.
    let keys = gtk4::EventControllerKey::new();
    keys.set_propagation_phase(gtk4::PropagationPhase::Capture);
    let weak = Rc::downgrade(assistant);
    keys.connect_key_pressed(move |_, keyval, _keycode, state| {
        let Some(assistant) = weak.upgrade() else {
            return glib::Propagation::Proceed;
        };
        let key = if keyval == gdk::Key::Return || keyval == gdk::Key::KP_Enter {
            Key::Enter
        } else {
            Key::Other
        };
        let press = KeyPress {
            key,
            shift: state.contains(gdk::ModifierType::SHIFT_MASK),
        };
        match assistant.on_key_down(press) {
            KeyDisposition::PreventDefault => glib::Propagation::Stop,
            KeyDisposition::Proceed => glib::Propagation::Proceed,
        }
    });
    view.add_controller(keys.clone());

    Listeners {
        view,
        buffer,
        changed,
        keys,
    }
}

impl Hook for GtkInputAssistant {
    fn name(&self) -> &'static str {
        self.assistant.name()
    }

    fn is_attached(&self) -> bool {
        self.assistant.is_attached()
    }

    fn handle_event(&self, event: &InboundEvent) {
        self.assistant.handle_event(event);
    }

    fn detach(&self) {
        if let Some(listeners) = self.listeners.borrow_mut().take() {
            listeners.buffer.disconnect(listeners.changed);
            listeners.view.remove_controller(&listeners.keys);
        }
        self.assistant.detach();
    }
}
