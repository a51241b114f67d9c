// SPDX-License-Identifier: MPL-2.0

//! In-memory hosts and a manually driven scheduler.
//!
//! Built for the crate's own tests and, with the `testing` feature, for
//! downstream crates that drive hooks without a toolkit. The text
//! control models intrinsic sizing the way a browser textarea does: its
//! reported content height never drops below its current explicit height.

use super::host::{
    ClipboardWriter, Height, HostError, InputHost, ObserverId, ScrollBehavior, ScrollContainer,
    Scheduler, TaskId, TextControl,
};
use crate::channel::ElementId;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

/// Pixel height of one line in [`FakeTextControl`].
pub const LINE_HEIGHT: u32 = 20;
/// Vertical padding added to the content height of [`FakeTextControl`].
pub const TEXT_PADDING: u32 = 8;

#[derive(Debug, Default)]
struct TextState {
    value: String,
    selection: Option<(usize, usize)>,
    focused: bool,
    height: Option<Height>,
    height_history: Vec<Height>,
}

/// Textarea double. Clones share state, like widget handles.
#[derive(Debug, Clone, Default)]
pub struct FakeTextControl {
    state: Rc<RefCell<TextState>>,
}

impl FakeTextControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Type `text` at the caret, replacing any selection.
    pub fn type_text(&self, text: &str) {
        let mut state = self.state.borrow_mut();
        let len = state.value.chars().count();
        let (start, end) = state.selection.unwrap_or((len, len));
        let mut chars: Vec<char> = state.value.chars().collect();
        chars.splice(start.min(len)..end.min(len), text.chars());
        state.value = chars.into_iter().collect();
        let caret = start.min(len) + text.chars().count();
        state.selection = Some((caret, caret));
    }

    pub fn set_caret(&self, caret: usize) {
        self.set_selection(caret, caret);
    }

    pub fn clear_caret(&self) {
        self.state.borrow_mut().selection = None;
    }

    pub fn selection(&self) -> Option<(usize, usize)> {
        self.state.borrow().selection
    }

    pub fn set_focused(&self, focused: bool) {
        self.state.borrow_mut().focused = focused;
    }

    pub fn height(&self) -> Option<Height> {
        self.state.borrow().height
    }

    pub fn height_history(&self) -> Vec<Height> {
        self.state.borrow().height_history.clone()
    }
}

impl TextControl for FakeTextControl {
    fn value(&self) -> String {
        self.state.borrow().value.clone()
    }

    /// Like a textarea, assigning the value moves the caret to the end.
    fn set_value(&self, value: &str) {
        let mut state = self.state.borrow_mut();
        state.value = value.to_string();
        let end = value.chars().count();
        state.selection = Some((end, end));
    }

    fn caret(&self) -> Option<usize> {
        self.state.borrow().selection.map(|(start, _)| start)
    }

    fn set_selection(&self, start: usize, end: usize) {
        let mut state = self.state.borrow_mut();
        let len = state.value.chars().count();
        state.selection = Some((start.min(len), end.min(len)));
    }

    fn has_focus(&self) -> bool {
        self.state.borrow().focused
    }

    fn focus(&self) {
        self.state.borrow_mut().focused = true;
    }

    fn content_height(&self) -> u32 {
        let state = self.state.borrow();
        let lines = state.value.split('\n').count() as u32;
        let natural = lines * LINE_HEIGHT + TEXT_PADDING;
        match state.height {
            Some(Height::Px(px)) => natural.max(px),
            _ => natural,
        }
    }

    fn set_height(&self, height: Height) {
        let mut state = self.state.borrow_mut();
        state.height = Some(height);
        state.height_history.push(height);
    }
}

/// Input host element with an optional nested [`FakeTextControl`].
#[derive(Debug, Clone)]
pub struct FakeInputHost {
    id: ElementId,
    control: Option<FakeTextControl>,
}

impl FakeInputHost {
    pub fn new(id: &str, control: Option<FakeTextControl>) -> Self {
        Self {
            id: ElementId::new(id),
            control,
        }
    }
}

impl InputHost for FakeInputHost {
    type Control = FakeTextControl;

    fn id(&self) -> ElementId {
        self.id.clone()
    }

    fn text_control(&self) -> Option<FakeTextControl> {
        self.control.clone()
    }
}

#[derive(Default)]
struct ScrollState {
    scroll_height: f64,
    scrolls: Vec<(f64, ScrollBehavior)>,
    observers: BTreeMap<u64, Rc<dyn Fn()>>,
    next_observer: u64,
}

/// Scrollable container double. Clones share state.
#[derive(Clone)]
pub struct FakeScrollContainer {
    id: ElementId,
    state: Rc<RefCell<ScrollState>>,
}

impl FakeScrollContainer {
    pub fn new(id: &str) -> Self {
        Self {
            id: ElementId::new(id),
            state: Rc::default(),
        }
    }

    /// Append a child of the given height and notify observers.
    pub fn append_child(&self, height: f64) {
        self.state.borrow_mut().scroll_height += height;
        // Collect first: observers may call back into this container.
        let observers: Vec<Rc<dyn Fn()>> =
            self.state.borrow().observers.values().cloned().collect();
        for observer in observers {
            observer();
        }
    }

    pub fn scrolls(&self) -> Vec<(f64, ScrollBehavior)> {
        self.state.borrow().scrolls.clone()
    }

    pub fn observer_count(&self) -> usize {
        self.state.borrow().observers.len()
    }
}

impl ScrollContainer for FakeScrollContainer {
    fn id(&self) -> ElementId {
        self.id.clone()
    }

    fn scroll_height(&self) -> f64 {
        self.state.borrow().scroll_height
    }

    fn scroll_to(&self, top: f64, behavior: ScrollBehavior) {
        self.state.borrow_mut().scrolls.push((top, behavior));
    }

    fn observe_children(&self, on_change: Box<dyn Fn()>) -> ObserverId {
        let mut state = self.state.borrow_mut();
        let id = state.next_observer;
        state.next_observer += 1;
        state.observers.insert(id, Rc::from(on_change));
        ObserverId(id)
    }

    fn disconnect(&self, observer: ObserverId) {
        self.state.borrow_mut().observers.remove(&observer.0);
    }
}

/// Clipboard double that can be told to fail.
#[derive(Debug, Default)]
pub struct FakeClipboard {
    contents: RefCell<Option<String>>,
    unavailable: Cell<bool>,
}

impl FakeClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }
}

impl ClipboardWriter for FakeClipboard {
    fn write_text(&self, text: &str) -> Result<(), HostError> {
        if self.unavailable.get() {
            return Err(HostError::Clipboard("no display".to_string()));
        }
        self.contents.replace(Some(text.to_string()));
        Ok(())
    }
}

struct PendingTask {
    due: Duration,
    task: Box<dyn FnOnce()>,
}

/// Scheduler driven by explicit calls to [`ManualScheduler::advance`].
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<Duration>,
    next_id: Cell<u64>,
    /// Keyed by id, so equal due times run in scheduling order
    tasks: RefCell<BTreeMap<u64, PendingTask>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Move the clock forward, running every task that comes due, including
    /// tasks scheduled by other tasks.
    pub fn advance(&self, by: Duration) {
        let now = self.now.get() + by;
        self.now.set(now);
        loop {
            let next = self
                .tasks
                .borrow()
                .iter()
                .filter(|(_, t)| t.due <= now)
                .min_by_key(|(id, t)| (t.due, **id))
                .map(|(id, _)| *id);
            let Some(id) = next else {
                break;
            };
            let task = self.tasks.borrow_mut().remove(&id);
            if let Some(pending) = task {
                (pending.task)();
            }
        }
    }

    /// Run everything requested for the next frame.
    pub fn run_frame(&self) {
        self.advance(Duration::ZERO);
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TaskId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.tasks.borrow_mut().insert(
            id,
            PendingTask {
                due: self.now.get() + delay,
                task,
            },
        );
        TaskId(id)
    }

    fn cancel(&self, task: TaskId) {
        self.tasks.borrow_mut().remove(&task.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_type_text_advances_caret() {
        let control = FakeTextControl::new();
        control.type_text("ac");
        control.set_caret(1);
        control.type_text("b");
        assert_eq!(control.value(), "abc");
        assert_eq!(control.caret(), Some(2));
    }

    #[test]
    fn test_content_height_sticks_to_explicit_height() {
        let control = FakeTextControl::new();
        control.set_value("one");
        control.set_height(Height::Px(100));
        assert_eq!(control.content_height(), 100);
        control.set_height(Height::Px(0));
        assert_eq!(control.content_height(), LINE_HEIGHT + TEXT_PADDING);
    }

    #[test]
    fn test_scheduler_runs_due_tasks_in_order() {
        let scheduler = Rc::new(ManualScheduler::new());
        let log = Rc::new(RefCell::new(Vec::new()));

        for (delay, label) in [(20, "late"), (10, "early"), (10, "early-2")] {
            let log = log.clone();
            scheduler.schedule(
                Duration::from_millis(delay),
                Box::new(move || log.borrow_mut().push(label)),
            );
        }

        scheduler.advance(Duration::from_millis(15));
        assert_eq!(*log.borrow(), vec!["early", "early-2"]);
        scheduler.advance(Duration::from_millis(5));
        assert_eq!(*log.borrow(), vec!["early", "early-2", "late"]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_scheduler_cancel() {
        let scheduler = ManualScheduler::new();
        let ran = Rc::new(Cell::new(false));
        let flag = ran.clone();
        let id = scheduler.schedule(Duration::ZERO, Box::new(move || flag.set(true)));
        scheduler.cancel(id);
        scheduler.run_frame();
        assert!(!ran.get());
        // Cancelling again is fine
        scheduler.cancel(id);
    }

    #[test]
    fn test_tasks_can_schedule_tasks() {
        let scheduler = Rc::new(ManualScheduler::new());
        let ran = Rc::new(Cell::new(0));

        let inner_scheduler = scheduler.clone();
        let counter = ran.clone();
        scheduler.request_frame(Box::new(move || {
            counter.set(counter.get() + 1);
            let counter = counter.clone();
            inner_scheduler.request_frame(Box::new(move || counter.set(counter.get() + 1)));
        }));

        scheduler.run_frame();
        assert_eq!(ran.get(), 2);
    }
}
