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
use crate::reader::ToolbarReader;
use crate::types::ButtonDescriptor;

/// First button, by index, whose text starts with `label`.
///
/// Buttons that cannot be read are skipped, the scan goes on.
pub fn find_button<H: Host + ?Sized>(
    reader: &ToolbarReader<'_, '_, H>,
    label: &str,
) -> Result<ButtonDescriptor> {
    let prefix: Vec<u16> = label.encode_utf16().collect();
    let count = reader.button_count();

    for index in 0..count {
        let button = match reader.button(index) {
            Ok(b) => b,
            Err(e) => {
                debug!("matcher: skip #{}: {}", index, e);
                continue;
            }
        };
        let text = match reader.button_text(button.command_id) {
            Ok(t) => t,
            Err(e) => {
                debug!("matcher: skip #{}: {}", index, e);
                continue;
            }
        };
        if text.starts_with(&prefix) {
            debug!("matcher: #{} \"{}\" (command {})", index, text, button.command_id);
            return Ok(button);
        }
    }

    Err(Error::IconNotFound { label: label.to_string() })
}
