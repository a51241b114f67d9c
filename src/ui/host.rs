// SPDX-License-Identifier: MPL-2.0

//! GTK implementations of the hook host traits.

use crate::channel::ElementId;
use crate::hooks::host::{
    ClipboardWriter, Height, HostError, InputHost, ObserverId, ScrollBehavior, ScrollContainer,
    Scheduler, TaskId, TextControl,
};
use gtk4::glib;
use gtk4::prelude::*;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

fn element_id(widget: &impl IsA<gtk4::Widget>) -> ElementId {
    ElementId::new(widget.widget_name().as_str())
}

/// Depth-first search for the first `TextView` below `widget`.
fn find_text_view(widget: &gtk4::Widget) -> Option<gtk4::TextView> {
    let mut child = widget.first_child();
    while let Some(current) = child {
        if let Some(view) = current.downcast_ref::<gtk4::TextView>() {
            return Some(view.clone());
        }
        if let Some(view) = find_text_view(&current) {
            return Some(view);
        }
        child = current.next_sibling();
    }
    None
}

/// A `TextView`, sized through its enclosing `ScrolledWindow` when it has one.
#[derive(Clone)]
pub struct GtkTextControl {
    view: gtk4::TextView,
    sized: gtk4::Widget,
    /// Set while the buffer is being rewritten by a hook, so the change
    /// handler can tell edits from splices.
    programmatic: Rc<Cell<bool>>,
}

impl GtkTextControl {
    pub fn view(&self) -> &gtk4::TextView {
        &self.view
    }

    pub fn is_programmatic(&self) -> bool {
        self.programmatic.get()
    }
}

impl TextControl for GtkTextControl {
    fn value(&self) -> String {
        let buffer = self.view.buffer();
        let (start, end) = buffer.bounds();
        buffer.text(&start, &end, false).to_string()
    }

    fn set_value(&self, value: &str) {
        self.programmatic.set(true);
        self.view.buffer().set_text(value);
        self.programmatic.set(false);
    }

    fn caret(&self) -> Option<usize> {
        let buffer = self.view.buffer();
        let offset = match buffer.selection_bounds() {
            Some((start, _)) => start.offset(),
            None => buffer.cursor_position(),
        };
        usize::try_from(offset).ok()
    }

    fn set_selection(&self, start: usize, end: usize) {
        let buffer = self.view.buffer();
        let start = buffer.iter_at_offset(i32::try_from(start).unwrap_or(i32::MAX));
        let end = buffer.iter_at_offset(i32::try_from(end).unwrap_or(i32::MAX));
        buffer.select_range(&start, &end);
    }

    fn has_focus(&self) -> bool {
        self.view.has_focus()
    }

    fn focus(&self) {
        self.view.grab_focus();
    }

    fn content_height(&self) -> u32 {
        let width = self.view.width();
        let for_size = if width > 0 { width } else { -1 };
        let (_, natural, _, _) = self.view.measure(gtk4::Orientation::Vertical, for_size);
        u32::try_from(natural).unwrap_or(0)
    }

    fn set_height(&self, height: Height) {
        match height {
            Height::Px(px) => self
                .sized
                .set_size_request(-1, i32::try_from(px).unwrap_or(i32::MAX)),
            Height::Auto => self.sized.set_size_request(-1, -1),
        }
    }
}

/// Container widget hosting an input assistant. Its widget name is the
/// element id.
#[derive(Clone)]
pub struct GtkInputHost {
    container: gtk4::Widget,
    programmatic: Rc<Cell<bool>>,
}

impl GtkInputHost {
    pub fn new(container: &impl IsA<gtk4::Widget>) -> Self {
        Self {
            container: container.clone().upcast(),
            programmatic: Rc::new(Cell::new(false)),
        }
    }
}

impl InputHost for GtkInputHost {
    type Control = GtkTextControl;

    fn id(&self) -> ElementId {
        element_id(&self.container)
    }

    fn text_control(&self) -> Option<GtkTextControl> {
        let view = find_text_view(&self.container)?;
        let sized = view
            .parent()
            .filter(|parent| parent.is::<gtk4::ScrolledWindow>())
            .unwrap_or_else(|| view.clone().upcast());
        Some(GtkTextControl {
            view,
            sized,
            programmatic: self.programmatic.clone(),
        })
    }
}

/// A `ScrolledWindow` whose content growth counts as a child-list change.
#[derive(Clone)]
pub struct GtkScrollContainer {
    scrolled: gtk4::ScrolledWindow,
    adjustment: gtk4::Adjustment,
    handlers: Rc<RefCell<HashMap<u64, glib::SignalHandlerId>>>,
    next_handler: Rc<Cell<u64>>,
}

impl GtkScrollContainer {
    pub fn new(scrolled: &gtk4::ScrolledWindow) -> Self {
        Self {
            scrolled: scrolled.clone(),
            adjustment: scrolled.vadjustment(),
            handlers: Rc::default(),
            next_handler: Rc::default(),
        }
    }
}

impl ScrollContainer for GtkScrollContainer {
    fn id(&self) -> ElementId {
        element_id(&self.scrolled)
    }

    fn scroll_height(&self) -> f64 {
        self.adjustment.upper()
    }

    // GTK adjustments have no animated scroll, so both behaviors jump.
    fn scroll_to(&self, top: f64, _behavior: ScrollBehavior) {
        let max = (self.adjustment.upper() - self.adjustment.page_size()).max(0.0);
        self.adjustment.set_value(top.min(max));
    }

    fn observe_children(&self, on_change: Box<dyn Fn()>) -> ObserverId {
        let handler = self.adjustment.connect_changed(move |_| on_change());
        let id = self.next_handler.get();
        self.next_handler.set(id + 1);
        self.handlers.borrow_mut().insert(id, handler);
        ObserverId(id)
    }

    fn disconnect(&self, observer: ObserverId) {
        let handler = self.handlers.borrow_mut().remove(&observer.0);
        if let Some(handler) = handler {
            self.adjustment.disconnect(handler);
        }
    }
}

/// Clipboard of the display a widget lives on.
pub struct GdkClipboard {
    widget: gtk4::Widget,
}

impl GdkClipboard {
    pub fn new(widget: &impl IsA<gtk4::Widget>) -> Self {
        Self {
            widget: widget.clone().upcast(),
        }
    }
}

impl ClipboardWriter for GdkClipboard {
    fn write_text(&self, text: &str) -> Result<(), HostError> {
        self.widget.display().clipboard().set_text(text);
        Ok(())
    }
}

/// Runs hook callbacks on the GLib main loop.
#[derive(Default)]
pub struct GlibScheduler {
    sources: Rc<RefCell<HashMap<u64, glib::SourceId>>>,
    next_id: Cell<u64>,
}

impl GlibScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    /// Wrap `task` so it forgets its source before running; removing a
    /// source that already fired is a GLib error.
    fn tracked(&self, id: u64, task: Box<dyn FnOnce()>) -> impl FnOnce() + 'static {
        let sources = self.sources.clone();
        move || {
            sources.borrow_mut().remove(&id);
            task();
        }
    }
}

impl Scheduler for GlibScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TaskId {
        let id = self.next_id();
        let source = glib::timeout_add_local_once(delay, self.tracked(id, task));
        self.sources.borrow_mut().insert(id, source);
        TaskId(id)
    }

    fn request_frame(&self, task: Box<dyn FnOnce()>) -> TaskId {
        let id = self.next_id();
        let source = glib::idle_add_local_once(self.tracked(id, task));
        self.sources.borrow_mut().insert(id, source);
        TaskId(id)
    }

    fn cancel(&self, task: TaskId) {
        let source = self.sources.borrow_mut().remove(&task.0);
        if let Some(source) = source {
            source.remove();
        }
    }
}
