// tray-icon-rect — Locate notification-area icons across the process boundary
// Copyright (C) 2026  Martin Gehrken (IamLumae)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use tracing::debug;

use crate::error::{Error, Result};
use crate::host::Host;
use crate::types::WindowId;

/// Taskbar → notification area → pager → toolbar holding the icons.
pub const TRAY_TOOLBAR_CHAIN: [&str; 4] =
    ["Shell_TrayWnd", "TrayNotifyWnd", "SysPager", "ToolbarWindow32"];

/// Walk `chain` top to bottom, each class searched among the children of
/// the previous hit. The first class is a top-level window.
pub fn find_control<H: Host + ?Sized>(host: &H, chain: &[&str]) -> Result<WindowId> {
    let mut current = None;
    for class in chain {
        match host.find_child(current, class) {
            Some(hwnd) => current = Some(hwnd),
            None => {
                debug!("locator: `{}` missing under {:?}", class, current);
                return Err(Error::ControlNotFound { class: class.to_string() });
            }
        }
    }
    current.ok_or_else(|| Error::ControlNotFound { class: String::new() })
}

/// The toolbar that hosts the tray icons.
pub fn find_tray_toolbar<H: Host + ?Sized>(host: &H) -> Result<WindowId> {
    find_control(host, &TRAY_TOOLBAR_CHAIN)
}
