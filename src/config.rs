// SPDX-License-Identifier: MPL-2.0

pub const APP_ID: &str = "io.github.sethcottle.ChatHooks";
pub const APP_NAME: &str = "Chat Hooks";

#[cfg(feature = "devel")]
pub const IS_DEVEL: bool = true;
#[cfg(not(feature = "devel"))]
pub const IS_DEVEL: bool = false;

/// Tallest the input may grow before it starts scrolling, in pixels.
pub const DEFAULT_MAX_INPUT_HEIGHT: u32 = 140;

/// How long the "copied" state lasts before the hook asks the server to reset it.
pub const DEFAULT_COPY_RESET_MS: u64 = 2000;

pub const SETTINGS_FILE: &str = "hooks.json";
