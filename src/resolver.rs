// tray-icon-rect — Locate notification-area icons across the process boundary
// Copyright (C) 2026  Martin Gehrken (IamLumae)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::error::{Error, Result};
use crate::host::Host;
use crate::types::{Rect, ScreenRect, WindowId};

/// Shift a client-area rectangle by the control's screen top-left.
///
/// `local` comes from the foreign process; `None` if an edge leaves `i32`.
pub fn to_screen(local: Rect, control: ScreenRect) -> Option<ScreenRect> {
    Some(ScreenRect {
        left: local.left.checked_add(control.left)?,
        top: local.top.checked_add(control.top)?,
        right: local.right.checked_add(control.left)?,
        bottom: local.bottom.checked_add(control.top)?,
    })
}

/// Screen rectangle of a button inside `window`.
pub fn resolve<H: Host + ?Sized>(host: &H, window: WindowId, local: Rect) -> Result<ScreenRect> {
    let control = host.window_rect(window).ok_or(Error::GeometryUnavailable)?;
    to_screen(local, control).ok_or(Error::GeometryUnavailable)
}
