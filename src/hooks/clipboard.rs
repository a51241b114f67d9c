// SPDX-License-Identifier: MPL-2.0

//! Copies server-supplied text to the clipboard.
//!
//! After a successful copy the hook tells its own element `copied-to-clipboard`
//! and, once the reset delay has passed, `reset-copied`, so the server can show
//! and then clear a "Copied!" state.

use super::Hook;
use super::host::{ClipboardWriter, Scheduler, TaskId};
use crate::channel::{ElementId, InboundEvent, OutboundEvent, RemoteChannel};
use crate::state::HookSettings;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, warn};

pub struct ClipboardHook {
    id: ElementId,
    clipboard: Rc<dyn ClipboardWriter>,
    channel: Rc<dyn RemoteChannel>,
    scheduler: Rc<dyn Scheduler>,
    reset_delay: Duration,
    /// Shared with the scheduled reset so it can clear itself when it fires.
    pending_reset: Rc<Cell<Option<TaskId>>>,
    attached: Cell<bool>,
}

impl ClipboardHook {
    pub fn attach(
        id: ElementId,
        clipboard: Rc<dyn ClipboardWriter>,
        channel: Rc<dyn RemoteChannel>,
        scheduler: Rc<dyn Scheduler>,
        settings: &HookSettings,
    ) -> Self {
        debug!("clipboard hook attached to {id}");
        Self {
            id,
            clipboard,
            channel,
            scheduler,
            reset_delay: settings.copy_reset_delay(),
            pending_reset: Rc::new(Cell::new(None)),
            attached: Cell::new(true),
        }
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn copy(&self, text: &str) {
        if !self.attached.get() {
            return;
        }
        if let Err(e) = self.clipboard.write_text(text) {
            warn!("{}: copy failed: {e}", self.id);
            return;
        }

        self.channel.push_to(
            &self.id,
            OutboundEvent::CopiedToClipboard {
                text: text.to_string(),
            },
        );
        self.schedule_reset();
    }

    /// A newer copy restarts the reset delay.
    fn schedule_reset(&self) {
        self.cancel_reset();

        let channel = self.channel.clone();
        let id = self.id.clone();
        let pending = self.pending_reset.clone();
        let task = self.scheduler.schedule(
            self.reset_delay,
            Box::new(move || {
                pending.set(None);
                channel.push_to(&id, OutboundEvent::ResetCopied);
            }),
        );
        self.pending_reset.set(Some(task));
    }

    fn cancel_reset(&self) {
        if let Some(task) = self.pending_reset.take() {
            self.scheduler.cancel(task);
        }
    }

    pub fn detach(&self) {
        if self.attached.replace(false) {
            self.cancel_reset();
            debug!("clipboard hook detached from {}", self.id);
        }
    }
}

impl Hook for ClipboardHook {
    fn name(&self) -> &'static str {
        "Clipboard"
    }

    fn is_attached(&self) -> bool {
        self.attached.get()
    }

    fn handle_event(&self, event: &InboundEvent) {
        if let InboundEvent::CopyToClipboard { text } = event {
            self.copy(text);
        }
    }

    fn detach(&self) {
        ClipboardHook::detach(self);
    }
}
