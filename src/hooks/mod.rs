// SPDX-License-Identifier: MPL-2.0

mod auto_scroller;
mod clipboard;
pub mod host;
mod input_assistant;
pub mod mention;
mod registry;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use auto_scroller::AutoScroller;
pub use clipboard::ClipboardHook;
pub use input_assistant::InputAssistant;
pub use mention::{InputState, MentionToken};
pub use registry::HookRegistry;

use crate::channel::InboundEvent;

/// A behavior attached to one host element.
///
/// Hooks are created attached (see each hook's `attach`) and stay attached
/// until [`Hook::detach`], which must be idempotent.
pub trait Hook {
    fn name(&self) -> &'static str;

    fn is_attached(&self) -> bool;

    /// The server re-rendered the host element.
    fn updated(&self) {}

    /// An inbound message from the server. Hooks ignore events they do not
    /// handle.
    fn handle_event(&self, event: &InboundEvent);

    /// Release every listener, observer and timer the hook installed.
    fn detach(&self);
}

/// Lets a hook be shared between the registry and toolkit callbacks.
impl<T: Hook + ?Sized> Hook for std::rc::Rc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn is_attached(&self) -> bool {
        (**self).is_attached()
    }

    fn updated(&self) {
        (**self).updated();
    }

    fn handle_event(&self, event: &InboundEvent) {
        (**self).handle_event(event);
    }

    fn detach(&self) {
        (**self).detach();
    }
}
