// SPDX-License-Identifier: MPL-2.0

//! What a hook needs from the element it is mounted on.
//!
//! Implementations are cheap handles (reference-counted widgets, or the
//! in-memory doubles behind the `testing` feature), so every method takes
//! `&self`.

use crate::channel::ElementId;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HostError {
    #[error("clipboard unavailable: {0}")]
    Clipboard(String),
}

/// Explicit height of a text control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Height {
    Px(u32),
    /// Back to the control's default sizing
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// The nested text-entry control of an input host.
pub trait TextControl {
    fn value(&self) -> String;
    fn set_value(&self, value: &str);
    /// Selection start as a character offset, if the control knows one.
    fn caret(&self) -> Option<usize>;
    fn set_selection(&self, start: usize, end: usize);
    fn has_focus(&self) -> bool;
    fn focus(&self);
    /// Height the content would need under the current constraints, in pixels.
    fn content_height(&self) -> u32;
    fn set_height(&self, height: Height);
}

/// Container element an input assistant is mounted on.
pub trait InputHost {
    type Control: TextControl;

    fn id(&self) -> ElementId;
    /// The nested text control, if the element has one.
    fn text_control(&self) -> Option<Self::Control>;
}

/// Identifies a child-list observer installed on a [`ScrollContainer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub u64);

/// A scrollable element whose children change over time.
pub trait ScrollContainer {
    fn id(&self) -> ElementId;
    fn scroll_height(&self) -> f64;
    fn scroll_to(&self, top: f64, behavior: ScrollBehavior);
    /// Call `on_change` whenever children are added or removed anywhere below
    /// this element.
    fn observe_children(&self, on_change: Box<dyn Fn()>) -> ObserverId;
    fn disconnect(&self, observer: ObserverId);
}

pub trait ClipboardWriter {
    fn write_text(&self, text: &str) -> Result<(), HostError>;
}

/// Handle to a scheduled callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

/// Runs deferred callbacks on the UI thread.
pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TaskId;

    /// Run `task` before the next frame is drawn.
    fn request_frame(&self, task: Box<dyn FnOnce()>) -> TaskId {
        self.schedule(Duration::ZERO, task)
    }

    /// Cancelling a task that already ran is a no-op.
    fn cancel(&self, task: TaskId);
}

/// Key press as seen by the input control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub shift: bool,
}

impl KeyPress {
    pub fn enter() -> Self {
        Self {
            key: Key::Enter,
            shift: false,
        }
    }

    pub fn shift_enter() -> Self {
        Self {
            key: Key::Enter,
            shift: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Other,
}

/// Whether the control should still run its default key handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    PreventDefault,
    Proceed,
}

/// Signals sibling UI raises on an input host element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostSignal {
    /// A send button asked for the current input to be submitted.
    DispatchQuestion,
    /// An "add context" button asked for an `@` at the caret.
    InsertAtSymbol,
}

impl HostSignal {
    pub fn name(self) -> &'static str {
        match self {
            HostSignal::DispatchQuestion => "dispatch-question",
            HostSignal::InsertAtSymbol => "insert-at-symbol",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "dispatch-question" => Some(HostSignal::DispatchQuestion),
            "insert-at-symbol" => Some(HostSignal::InsertAtSymbol),
            _ => None,
        }
    }
}
