// SPDX-License-Identifier: MPL-2.0

mod host;
mod input;
mod window;

pub use host::{GdkClipboard, GlibScheduler, GtkInputHost, GtkScrollContainer, GtkTextControl};
pub use input::GtkInputAssistant;
pub use window::ChatHooksWindow;
