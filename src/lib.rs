// SPDX-License-Identifier: MPL-2.0

//! Behavior hooks for a server-driven chat interface.
//!
//! Three independent attachments, each bound to one host element:
//!
//! - [`hooks::InputAssistant`]: auto-growing chat input with Enter-to-send,
//!   `@`-mention detection and server-driven contact pinning.
//! - [`hooks::ClipboardHook`]: copies server-supplied text and reports back.
//! - [`hooks::AutoScroller`]: keeps a container scrolled to its newest child.
//!
//! Hosts are abstracted behind the traits in [`hooks::host`]; the remote side is
//! a [`channel::RemoteChannel`]. The `gtk` feature adds GTK4 bindings in `ui`.

pub mod channel;
pub mod config;
pub mod hooks;
pub mod runtime;
pub mod state;
#[cfg(feature = "gtk")]
pub mod ui;
