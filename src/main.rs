// SPDX-License-Identifier: MPL-2.0

use chat_hooks::channel::loopback;
use chat_hooks::config::APP_ID;
use chat_hooks::state::HookSettings;
use chat_hooks::ui::ChatHooksWindow;
use gtk4::glib;
use gtk4::prelude::*;
use libadwaita as adw;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

/// Contacts the loopback controller can pin.
const DEMO_CONTACTS: &[&str] = &["Amy", "John", "Joanna", "Priya", "Sam"];

fn main() -> glib::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let app = adw::Application::builder().application_id(APP_ID).build();

    app.connect_activate(|app| {
        let settings = HookSettings::load();
        let contacts = DEMO_CONTACTS.iter().map(|c| c.to_string()).collect();
        let (channel, inbound) = loopback::spawn_loopback(contacts);

        let window = ChatHooksWindow::new(app);
        window.connect_hooks(Rc::new(channel), inbound, &settings);
        window.present();
    });

    app.run()
}
