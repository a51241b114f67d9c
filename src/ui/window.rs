// SPDX-License-Identifier: MPL-2.0

//! Demo window: a transcript, a "copy last" button and the chat input, each
//! with its hook mounted.

use super::host::{GdkClipboard, GlibScheduler, GtkInputHost, GtkScrollContainer};
use super::input::GtkInputAssistant;
use crate::channel::{ElementId, InboundEvent, InboundReceiver, OutboundEvent, RemoteChannel};
use crate::config::{APP_NAME, IS_DEVEL};
use crate::hooks::host::HostSignal;
use crate::hooks::{AutoScroller, ClipboardHook, HookRegistry};
use crate::state::HookSettings;
use gtk4::prelude::*;
use gtk4::subclass::prelude::*;
use gtk4::{gio, glib};
use libadwaita as adw;
use libadwaita::prelude::*;
use libadwaita::subclass::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::warn;

const TRANSCRIPT_ID: &str = "transcript";
const COPY_ID: &str = "copy-last";
const INPUT_ID: &str = "copilot-input";

mod imp {
    use super::*;

    #[derive(Default)]
    pub struct ChatHooksWindow {
        pub registry: RefCell<HookRegistry>,
        pub input: RefCell<Option<Rc<GtkInputAssistant>>>,
        pub transcript_scrolled: RefCell<Option<gtk4::ScrolledWindow>>,
        pub transcript_box: RefCell<Option<gtk4::Box>>,
        pub input_row: RefCell<Option<gtk4::Box>>,
        pub send_button: RefCell<Option<gtk4::Button>>,
        pub mention_button: RefCell<Option<gtk4::Button>>,
        pub copy_button: RefCell<Option<gtk4::Button>>,
        pub last_question: RefCell<Option<String>>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for ChatHooksWindow {
        const NAME: &'static str = "ChatHooksWindow";
        type Type = super::ChatHooksWindow;
        type ParentType = adw::ApplicationWindow;
    }

    impl ObjectImpl for ChatHooksWindow {
        fn constructed(&self) {
            self.parent_constructed();
            let obj = self.obj();
            obj.setup_ui();
        }
    }

    impl WidgetImpl for ChatHooksWindow {}
    impl WindowImpl for ChatHooksWindow {
        fn close_request(&self) -> glib::Propagation {
            self.registry.borrow_mut().destroy_all();
            self.parent_close_request()
        }
    }
    impl ApplicationWindowImpl for ChatHooksWindow {}
    impl AdwApplicationWindowImpl for ChatHooksWindow {}
}

glib::wrapper! {
    pub struct ChatHooksWindow(ObjectSubclass<imp::ChatHooksWindow>)
        @extends adw::ApplicationWindow, gtk4::ApplicationWindow, gtk4::Window, gtk4::Widget,
        @implements gio::ActionGroup, gio::ActionMap;
}

/// Forwards to the real channel and echoes submitted questions into the
/// transcript.
struct TranscriptChannel {
    inner: Rc<dyn RemoteChannel>,
    window: glib::WeakRef<ChatHooksWindow>,
}

impl RemoteChannel for TranscriptChannel {
    fn push(&self, event: OutboundEvent) {
        if let OutboundEvent::SubmitQuestion { question } = &event
            && let Some(window) = self.window.upgrade()
        {
            window.append_message(question);
        }
        self.inner.push(event);
    }

    fn push_to(&self, target: &ElementId, event: OutboundEvent) {
        self.inner.push_to(target, event);
    }
}

impl ChatHooksWindow {
    pub fn new(app: &adw::Application) -> Self {
        let title = if IS_DEVEL {
            format!("{APP_NAME} (Devel)")
        } else {
            APP_NAME.to_string()
        };
        glib::Object::builder()
            .property("application", app)
            .property("default-width", 480)
            .property("default-height", 640)
            .property("title", title)
            .build()
    }

    fn setup_ui(&self) {
        let content = gtk4::Box::new(gtk4::Orientation::Vertical, 0);

        let header = adw::HeaderBar::new();
        let copy_btn = gtk4::Button::from_icon_name("edit-copy-symbolic");
        copy_btn.set_widget_name(COPY_ID);
        copy_btn.set_tooltip_text(Some("Copy last question"));
        header.pack_end(&copy_btn);
        content.append(&header);

        let transcript_box = gtk4::Box::new(gtk4::Orientation::Vertical, 6);
        transcript_box.set_margin_start(12);
        transcript_box.set_margin_end(12);
        transcript_box.set_margin_top(12);
        transcript_box.set_margin_bottom(12);

        let transcript_scrolled = gtk4::ScrolledWindow::new();
        transcript_scrolled.set_widget_name(TRANSCRIPT_ID);
        transcript_scrolled.set_vexpand(true);
        transcript_scrolled.set_hscrollbar_policy(gtk4::PolicyType::Never);
        transcript_scrolled.set_child(Some(&transcript_box));
        content.append(&transcript_scrolled);

        let input_row = gtk4::Box::new(gtk4::Orientation::Horizontal, 6);
        input_row.set_widget_name(INPUT_ID);
        input_row.set_margin_start(12);
        input_row.set_margin_end(12);
        input_row.set_margin_top(6);
        input_row.set_margin_bottom(12);
        input_row.set_valign(gtk4::Align::End);

        let text_view = gtk4::TextView::new();
        text_view.set_wrap_mode(gtk4::WrapMode::WordChar);
        text_view.set_left_margin(8);
        text_view.set_right_margin(8);
        text_view.set_top_margin(6);
        text_view.set_bottom_margin(6);

        let input_scrolled = gtk4::ScrolledWindow::new();
        input_scrolled.set_hexpand(true);
        input_scrolled.set_hscrollbar_policy(gtk4::PolicyType::Never);
        input_scrolled.set_child(Some(&text_view));
        input_row.append(&input_scrolled);

        let mention_btn = gtk4::Button::with_label("@");
        mention_btn.set_tooltip_text(Some("Add context"));
        mention_btn.set_valign(gtk4::Align::End);
        input_row.append(&mention_btn);

        let send_btn = gtk4::Button::with_label("Send");
        send_btn.add_css_class("suggested-action");
        send_btn.set_valign(gtk4::Align::End);
        input_row.append(&send_btn);

        content.append(&input_row);

        self.set_content(Some(&content));
        if IS_DEVEL {
            self.add_css_class("devel");
        }

        let imp = self.imp();
        imp.transcript_scrolled.replace(Some(transcript_scrolled));
        imp.transcript_box.replace(Some(transcript_box));
        imp.input_row.replace(Some(input_row));
        imp.send_button.replace(Some(send_btn));
        imp.mention_button.replace(Some(mention_btn));
        imp.copy_button.replace(Some(copy_btn));
    }

    /// Mount every hook and start polling `inbound` for server messages.
    pub fn connect_hooks(
        &self,
        channel: Rc<dyn RemoteChannel>,
        inbound: InboundReceiver,
        settings: &HookSettings,
    ) {
        let imp = self.imp();
        let scheduler = Rc::new(GlibScheduler::new());
        let channel: Rc<dyn RemoteChannel> = Rc::new(TranscriptChannel {
            inner: channel,
            window: self.downgrade(),
        });

        let mut registry = imp.registry.borrow_mut();

        if let Some(scrolled) = imp.transcript_scrolled.borrow().as_ref() {
            let scroller = AutoScroller::attach(
                GtkScrollContainer::new(scrolled),
                scheduler.clone(),
                settings,
            );
            registry.mount(ElementId::new(TRANSCRIPT_ID), Box::new(scroller));
        }

        if let Some(btn) = imp.copy_button.borrow().as_ref() {
            let hook = ClipboardHook::attach(
                ElementId::new(COPY_ID),
                Rc::new(GdkClipboard::new(btn)),
                channel.clone(),
                scheduler.clone(),
                settings,
            );
            registry.mount(ElementId::new(COPY_ID), Box::new(hook));

            // Stands in for the server's copy-to-clipboard push.
            btn.connect_clicked(glib::clone!(
                #[weak(rename_to = window)]
                self,
                move |_| {
                    let imp = window.imp();
                    let Some(text) = imp.last_question.borrow().clone() else {
                        return;
                    };
                    imp.registry.borrow().dispatch(
                        &InboundEvent::CopyToClipboard { text },
                        Some(&ElementId::new(COPY_ID)),
                    );
                }
            ));
        }

        if let Some(row) = imp.input_row.borrow().as_ref() {
            let input = Rc::new(GtkInputAssistant::attach(
                &GtkInputHost::new(row),
                channel.clone(),
                settings,
            ));
            registry.mount(ElementId::new(INPUT_ID), Box::new(input.clone()));

            if let Some(btn) = imp.send_button.borrow().as_ref() {
                let input = input.clone();
                btn.connect_clicked(move |_| input.signal(HostSignal::DispatchQuestion));
            }
            if let Some(btn) = imp.mention_button.borrow().as_ref() {
                let input = input.clone();
                btn.connect_clicked(move |_| input.signal(HostSignal::InsertAtSymbol));
            }
            imp.input.replace(Some(input));
        }

        drop(registry);
        self.poll_inbound(inbound);
    }

    fn poll_inbound(&self, mut inbound: InboundReceiver) {
        let window_weak = self.downgrade();
        glib::timeout_add_local(std::time::Duration::from_millis(50), move || {
            let Some(window) = window_weak.upgrade() else {
                return glib::ControlFlow::Break;
            };
            match inbound.drain() {
                Ok(messages) => {
                    let registry = window.imp().registry.borrow();
                    for message in &messages {
                        if let Err(e) = registry.deliver(message) {
                            warn!("dropping inbound {}: {e}", message.event);
                        }
                    }
                    glib::ControlFlow::Continue
                }
                Err(e) => {
                    warn!("inbound channel: {e}");
                    glib::ControlFlow::Break
                }
            }
        });
    }

    pub fn append_message(&self, text: &str) {
        let imp = self.imp();
        imp.last_question.replace(Some(text.to_string()));

        if let Some(transcript) = imp.transcript_box.borrow().as_ref() {
            let label = gtk4::Label::new(Some(text));
            label.set_wrap(true);
            label.set_wrap_mode(gtk4::pango::WrapMode::WordChar);
            label.set_xalign(0.0);
            label.set_selectable(true);
            label.add_css_class("card");
            transcript.append(&label);
        }
    }
}
