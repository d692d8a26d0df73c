// tray-icon-rect — Locate notification-area icons across the process boundary
// Copyright (C) 2026  Martin Gehrken (IamLumae)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Find where a tray icon sits on screen, given the start of its label.
//!
//! The icons live in a toolbar owned by the shell process. Reading them
//! means committing a page of memory inside that process, asking the toolbar
//! to fill it, and copying the result back out:
//!
//! 1. [`locator`] walks `Shell_TrayWnd > TrayNotifyWnd > SysPager > ToolbarWindow32`.
//! 2. [`arena::RemoteArena`] opens the shell process and commits the page.
//! 3. [`reader::ToolbarReader`] fetches buttons, texts and rectangles.
//! 4. [`matcher`] picks the first button whose text starts with the label.
//! 5. [`resolver`] moves the button rectangle into screen coordinates.
//!
//! Every call blocks until the shell answers. There is no timeout: a hung
//! explorer hangs the caller too.

pub mod arena;
pub mod error;
pub mod host;
pub mod locator;
pub mod matcher;
pub mod reader;
pub mod resolver;
pub mod types;
#[cfg(windows)]
pub mod win32;

#[cfg(test)]
mod sim;

use tracing::debug;

pub use arena::RemoteArena;
pub use error::{ButtonRef, Error, Result};
pub use host::Host;
pub use reader::ToolbarReader;
pub use types::{ButtonDescriptor, ButtonText, Rect, ScreenRect, TargetArch, WindowId};
#[cfg(windows)]
pub use win32::Win32Host;

/// Screen rectangle of the first tray icon whose label starts with `label`.
#[cfg(windows)]
pub fn locate_tray_icon_rect(label: &str) -> Result<ScreenRect> {
    locate_with(&Win32Host, label)
}

/// There is no notification-area toolbar outside Windows.
#[cfg(not(windows))]
pub fn locate_tray_icon_rect(label: &str) -> Result<ScreenRect> {
    debug!("locate({:?}): no shell tray on this platform", label);
    Err(Error::ControlNotFound { class: locator::TRAY_TOOLBAR_CHAIN[0].to_string() })
}

/// Same as [`locate_tray_icon_rect`] against any [`Host`].
pub fn locate_with<H: Host + ?Sized>(host: &H, label: &str) -> Result<ScreenRect> {
    let toolbar = locator::find_tray_toolbar(host)?;
    let arena = RemoteArena::open(host, toolbar, host.page_size())?;
    let reader = ToolbarReader::new(&arena);

    let button = matcher::find_button(&reader, label)?;
    let local = reader.button_rect(button.command_id)?;
    let rect = resolver::resolve(host, toolbar, local)?;

    debug!("locate({:?}) = {}", label, rect);
    Ok(rect)
}
