// SPDX-License-Identifier: MPL-2.0

//! Mounted hooks, keyed by element, and routing of inbound messages to them.

use super::Hook;
use crate::channel::{ChannelError, ElementId, InboundEvent, WireMessage};
use tracing::{debug, trace};

#[derive(Default)]
pub struct HookRegistry {
    /// Mount order is delivery order.
    mounted: Vec<(ElementId, Box<dyn Hook>)>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount `hook` on `id`. A hook already mounted there is detached first.
    pub fn mount(&mut self, id: ElementId, hook: Box<dyn Hook>) {
        self.destroy(&id);
        debug!("mounted {} on {id}", hook.name());
        self.mounted.push((id, hook));
    }

    /// Forward a re-render of `id`. Returns `false` if nothing is mounted there.
    pub fn update(&self, id: &ElementId) -> bool {
        match self.get(id) {
            Some(hook) => {
                hook.updated();
                true
            }
            None => false,
        }
    }

    /// Detach and drop the hook on `id`. Unknown ids are ignored.
    pub fn destroy(&mut self, id: &ElementId) -> bool {
        let Some(index) = self.mounted.iter().position(|(mounted, _)| mounted == id) else {
            return false;
        };
        let (id, hook) = self.mounted.remove(index);
        hook.detach();
        debug!("destroyed {} on {id}", hook.name());
        true
    }

    pub fn destroy_all(&mut self) {
        for (_, hook) in self.mounted.drain(..) {
            hook.detach();
        }
    }

    pub fn get(&self, id: &ElementId) -> Option<&dyn Hook> {
        self.mounted
            .iter()
            .find(|(mounted, _)| mounted == id)
            .map(|(_, hook)| hook.as_ref())
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.mounted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounted.is_empty()
    }

    /// Decode a wire message and hand it to its target, or to every mounted
    /// hook when it has none.
    ///
    /// Events no hook understands are dropped; malformed payloads are errors.
    pub fn deliver(&self, message: &WireMessage) -> Result<(), ChannelError> {
        let event = match InboundEvent::from_wire(message) {
            Ok(event) => event,
            Err(ChannelError::UnknownEvent(name)) => {
                debug!("no hook handles '{name}'");
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        self.dispatch(&event, message.target.as_ref());
        Ok(())
    }

    pub fn dispatch(&self, event: &InboundEvent, target: Option<&ElementId>) {
        for (id, hook) in &self.mounted {
            if target.is_some_and(|target| target != id) {
                continue;
            }
            trace!("{} -> {} on {id}", event.name(), hook.name());
            hook.handle_event(event);
        }
    }
}

impl Drop for HookRegistry {
    fn drop(&mut self) {
        self.destroy_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::RecordingChannel;
    use crate::hooks::host::TextControl;
    use crate::hooks::testing::{
        FakeClipboard, FakeInputHost, FakeScrollContainer, FakeTextControl, ManualScheduler,
    };
    use crate::hooks::{AutoScroller, ClipboardHook, InputAssistant};
    use crate::state::HookSettings;
    use pretty_assertions::assert_eq;
    use std::rc::Rc;

    fn mount_input(registry: &mut HookRegistry, id: &str, value: &str) -> FakeTextControl {
        let control = FakeTextControl::new();
        control.set_value(value);
        let host = FakeInputHost::new(id, Some(control.clone()));
        let assistant = InputAssistant::attach(
            &host,
            Rc::new(RecordingChannel::new()),
            &HookSettings::default(),
        );
        registry.mount(ElementId::new(id), Box::new(assistant));
        control
    }

    fn pinned(label: &str) -> WireMessage {
        InboundEvent::ContactPinned {
            label: label.to_string(),
        }
        .to_wire()
    }

    #[test]
    fn test_broadcast_reaches_every_hook() {
        let mut registry = HookRegistry::new();
        let a = mount_input(&mut registry, "a", "hi @jo");
        let b = mount_input(&mut registry, "b", "");

        registry.deliver(&pinned("John")).unwrap();
        assert_eq!(a.value(), "hi @John ");
        assert_eq!(b.value(), "@John ");
    }

    #[test]
    fn test_targeted_delivery() {
        let mut registry = HookRegistry::new();
        let a = mount_input(&mut registry, "a", "@am");
        let b = mount_input(&mut registry, "b", "@am");

        registry
            .deliver(&pinned("Amy").with_target(ElementId::new("b")))
            .unwrap();
        assert_eq!(a.value(), "@am");
        assert_eq!(b.value(), "@Amy ");
    }

    #[test]
    fn test_unknown_event_is_dropped() {
        let mut registry = HookRegistry::new();
        mount_input(&mut registry, "a", "");
        let message = WireMessage::new("refresh", serde_json::json!({}));
        assert!(registry.deliver(&message).is_ok());
    }

    #[test]
    fn test_malformed_payload_is_an_error() {
        let registry = HookRegistry::new();
        let message = WireMessage::new("copy-to-clipboard", serde_json::json!({ "txt": 1 }));
        assert!(matches!(
            registry.deliver(&message),
            Err(ChannelError::Payload(_))
        ));
    }

    #[test]
    fn test_destroy_detaches() {
        let mut registry = HookRegistry::new();
        let control = mount_input(&mut registry, "a", "@jo");

        assert!(registry.destroy(&ElementId::new("a")));
        assert!(!registry.destroy(&ElementId::new("a")));
        assert!(registry.is_empty());

        registry.deliver(&pinned("John")).unwrap();
        assert_eq!(control.value(), "@jo");
    }

    #[test]
    fn test_remount_replaces_previous_hook() {
        let mut registry = HookRegistry::new();
        let container = FakeScrollContainer::new("log");
        let scheduler = Rc::new(ManualScheduler::new());

        for _ in 0..2 {
            let scroller = AutoScroller::attach(
                container.clone(),
                scheduler.clone(),
                &HookSettings::default(),
            );
            registry.mount(ElementId::new("log"), Box::new(scroller));
        }

        assert_eq!(registry.len(), 1);
        assert_eq!(container.observer_count(), 1);

        assert!(registry.update(&ElementId::new("log")));
        assert!(!registry.update(&ElementId::new("missing")));
        scheduler.run_frame();
        assert_eq!(container.scrolls().len(), 1);
    }

    #[test]
    fn test_mixed_hooks() {
        let mut registry = HookRegistry::new();
        let input = mount_input(&mut registry, "input", "hey ");
        let clipboard = Rc::new(FakeClipboard::new());
        let channel = Rc::new(RecordingChannel::new());
        let copy = ClipboardHook::attach(
            ElementId::new("copy"),
            clipboard.clone(),
            channel.clone(),
            Rc::new(ManualScheduler::new()),
            &HookSettings::default(),
        );
        registry.mount(ElementId::new("copy"), Box::new(copy));

        let message = InboundEvent::CopyToClipboard {
            text: "hello".to_string(),
        }
        .to_wire();
        registry.deliver(&message).unwrap();

        assert_eq!(clipboard.contents().as_deref(), Some("hello"));
        assert_eq!(input.value(), "hey ");
        assert_eq!(channel.events().len(), 1);
    }

    #[test]
    fn test_drop_detaches_everything() {
        let container = FakeScrollContainer::new("log");
        {
            let mut registry = HookRegistry::new();
            let scroller = AutoScroller::attach(
                container.clone(),
                Rc::new(ManualScheduler::new()),
                &HookSettings::default(),
            );
            registry.mount(ElementId::new("log"), Box::new(scroller));
            assert!(registry.contains(&ElementId::new("log")));
        }
        assert_eq!(container.observer_count(), 0);
    }
}
