// SPDX-License-Identifier: MPL-2.0

//! Keeps a container scrolled to the bottom as children are added.
//!
//! Child changes and explicit updates request a jump on the next frame; a
//! burst of changes inside one frame collapses into a single scroll.

use super::Hook;
use super::host::{ObserverId, ScrollBehavior, ScrollContainer, Scheduler, TaskId};
use crate::channel::{ElementId, InboundEvent};
use crate::state::HookSettings;
use std::cell::Cell;
use std::rc::{Rc, Weak};
use tracing::{debug, trace};

struct ScrollCore<S> {
    container: S,
    scheduler: Rc<dyn Scheduler>,
    behavior: ScrollBehavior,
    pending_frame: Cell<Option<TaskId>>,
}

impl<S: ScrollContainer + 'static> ScrollCore<S> {
    fn jump_to_end(self: &Rc<Self>) {
        self.cancel_frame();

        let core: Weak<Self> = Rc::downgrade(self);
        let task = self.scheduler.request_frame(Box::new(move || {
            let Some(core) = core.upgrade() else {
                return;
            };
            core.pending_frame.set(None);
            let top = core.container.scroll_height();
            trace!("{}: scrolling to {top}", core.container.id());
            core.container.scroll_to(top, core.behavior);
        }));
        self.pending_frame.set(Some(task));
    }

    fn cancel_frame(&self) {
        if let Some(task) = self.pending_frame.take() {
            self.scheduler.cancel(task);
        }
    }
}

pub struct AutoScroller<S: ScrollContainer + 'static> {
    id: ElementId,
    core: Rc<ScrollCore<S>>,
    observer: Cell<Option<ObserverId>>,
}

impl<S: ScrollContainer + 'static> AutoScroller<S> {
    /// Start watching `container` and jump to its end right away.
    pub fn attach(container: S, scheduler: Rc<dyn Scheduler>, settings: &HookSettings) -> Self {
        let id = container.id();
        let core = Rc::new(ScrollCore {
            container,
            scheduler,
            behavior: settings.scroll_behavior(),
            pending_frame: Cell::new(None),
        });

        let weak = Rc::downgrade(&core);
        let observer = core.container.observe_children(Box::new(move || {
            if let Some(core) = weak.upgrade() {
                core.jump_to_end();
            }
        }));
        core.jump_to_end();
        debug!("auto scroller attached to {id}");

        Self {
            id,
            core,
            observer: Cell::new(Some(observer)),
        }
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    /// The server re-rendered the container.
    pub fn updated(&self) {
        if self.observer.get().is_some() {
            self.core.jump_to_end();
        }
    }

    pub fn detach(&self) {
        if let Some(observer) = self.observer.take() {
            self.core.container.disconnect(observer);
            self.core.cancel_frame();
            debug!("auto scroller detached from {}", self.id);
        }
    }
}

impl<S: ScrollContainer + 'static> Hook for AutoScroller<S> {
    fn name(&self) -> &'static str {
        "AutoScroller"
    }

    fn is_attached(&self) -> bool {
        self.observer.get().is_some()
    }

    fn updated(&self) {
        AutoScroller::updated(self);
    }

    fn handle_event(&self, _event: &InboundEvent) {}

    fn detach(&self) {
        AutoScroller::detach(self);
    }
}

impl<S: ScrollContainer + 'static> Drop for AutoScroller<S> {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::testing::{FakeScrollContainer, ManualScheduler};
    use pretty_assertions::assert_eq;

    fn attach(
        container: &FakeScrollContainer,
    ) -> (AutoScroller<FakeScrollContainer>, Rc<ManualScheduler>) {
        let scheduler = Rc::new(ManualScheduler::new());
        let scroller = AutoScroller::attach(
            container.clone(),
            scheduler.clone(),
            &HookSettings::default(),
        );
        (scroller, scheduler)
    }

    #[test]
    fn test_attach_scrolls_on_first_frame() {
        let container = FakeScrollContainer::new("messages");
        container.append_child(300.0);
        let (_scroller, scheduler) = attach(&container);

        assert!(container.scrolls().is_empty());
        scheduler.run_frame();
        assert_eq!(container.scrolls(), vec![(300.0, ScrollBehavior::Smooth)]);
    }

    #[test]
    fn test_burst_collapses_to_one_scroll() {
        let container = FakeScrollContainer::new("messages");
        let (_scroller, scheduler) = attach(&container);
        scheduler.run_frame();

        container.append_child(40.0);
        container.append_child(40.0);
        container.append_child(40.0);
        assert_eq!(scheduler.pending(), 1);

        scheduler.run_frame();
        assert_eq!(
            container.scrolls(),
            vec![(0.0, ScrollBehavior::Smooth), (120.0, ScrollBehavior::Smooth)]
        );
    }

    #[test]
    fn test_updated_requests_jump() {
        let container = FakeScrollContainer::new("messages");
        let (scroller, scheduler) = attach(&container);
        scheduler.run_frame();

        scroller.updated();
        scheduler.run_frame();
        assert_eq!(container.scrolls().len(), 2);
    }

    #[test]
    fn test_instant_behavior_from_settings() {
        let container = FakeScrollContainer::new("messages");
        let scheduler = Rc::new(ManualScheduler::new());
        let settings = HookSettings {
            smooth_scroll: false,
            ..HookSettings::default()
        };
        let _scroller = AutoScroller::attach(container.clone(), scheduler.clone(), &settings);
        scheduler.run_frame();
        assert_eq!(container.scrolls(), vec![(0.0, ScrollBehavior::Instant)]);
    }

    #[test]
    fn test_detach_disconnects_and_cancels() {
        let container = FakeScrollContainer::new("messages");
        let (scroller, scheduler) = attach(&container);
        assert_eq!(container.observer_count(), 1);

        scroller.detach();
        scroller.detach();
        assert_eq!(container.observer_count(), 0);
        assert_eq!(scheduler.pending(), 0);

        container.append_child(50.0);
        scroller.updated();
        scheduler.run_frame();
        assert!(container.scrolls().is_empty());
        assert!(!scroller.is_attached());
    }

    #[test]
    fn test_drop_releases_observer() {
        let container = FakeScrollContainer::new("messages");
        let (scroller, scheduler) = attach(&container);
        drop(scroller);
        assert_eq!(container.observer_count(), 0);
        assert_eq!(scheduler.pending(), 0);
    }
}
