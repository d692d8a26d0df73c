// tray-icon-rect — Locate notification-area icons across the process boundary
// Copyright (C) 2026  Martin Gehrken (IamLumae)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Toolbar queries that go through the remote arena.
//!
//! Each read is two steps: the control writes a record into the arena, then
//! the record is copied out of the foreign process byte for byte.

use crate::arena::RemoteArena;
use crate::error::{ButtonRef, Error, Result};
use crate::host::{Host, ToolbarMessage};
use crate::types::{ButtonDescriptor, ButtonText, Rect};

pub struct ToolbarReader<'a, 'h, H: Host + ?Sized> {
    arena: &'a RemoteArena<'h, H>,
}

impl<'a, 'h, H: Host + ?Sized> ToolbarReader<'a, 'h, H> {
    pub fn new(arena: &'a RemoteArena<'h, H>) -> Self {
        Self { arena }
    }

    /// TB_BUTTONCOUNT. Nonsense replies count as an empty toolbar.
    pub fn button_count(&self) -> usize {
        usize::try_from(self.arena.query(ToolbarMessage::ButtonCount, 0)).unwrap_or(0)
    }

    pub fn button(&self, index: usize) -> Result<ButtonDescriptor> {
        let unavailable = Error::ButtonUnavailable(ButtonRef::Index(index));
        if self.arena.request(ToolbarMessage::GetButton, index) == 0 {
            return Err(unavailable);
        }
        let arch = self.arena.arch();
        let mut raw = vec![0u8; arch.descriptor_size()];
        if !self.arena.copy_out(&mut raw) {
            return Err(unavailable);
        }
        ButtonDescriptor::decode(arch, index, &raw).ok_or(unavailable)
    }

    /// Text of the button with `command_id`.
    ///
    /// The length is asked for first so an oversized text is refused before
    /// the control writes past the arena.
    pub fn button_text(&self, command_id: i32) -> Result<ButtonText> {
        let wparam = command_id as usize;
        let len = self.arena.query(ToolbarMessage::GetButtonText, wparam);
        let bytes = self.text_bytes(command_id, len)?;

        let written = self.arena.request(ToolbarMessage::GetButtonText, wparam);
        // text may have changed between the two calls
        let bytes = bytes.max(self.text_bytes(command_id, written)?);

        let mut raw = vec![0u8; bytes];
        if !self.arena.copy_out(&mut raw) {
            return Err(Error::ButtonUnavailable(ButtonRef::Command(command_id)));
        }
        Ok(ButtonText::from_le_bytes(&raw))
    }

    pub fn button_rect(&self, command_id: i32) -> Result<Rect> {
        let unavailable = Error::RectUnavailable { command_id };
        if self.arena.request(ToolbarMessage::GetRect, command_id as usize) == 0 {
            return Err(unavailable);
        }
        let mut raw = [0u8; Rect::SIZE];
        if !self.arena.copy_out(&mut raw) {
            return Err(unavailable);
        }
        Rect::from_le_bytes(&raw).ok_or(unavailable)
    }

    /// Serialized size of a text of `len` UTF-16 units plus terminator.
    fn text_bytes(&self, command_id: i32, len: isize) -> Result<usize> {
        let Ok(len) = usize::try_from(len) else {
            return Err(Error::ButtonUnavailable(ButtonRef::Command(command_id)));
        };
        let bytes = len.saturating_add(1).saturating_mul(2);
        let capacity = self.arena.capacity();
        if bytes > capacity {
            return Err(Error::TextTooLarge { command_id, bytes, capacity });
        }
        Ok(bytes)
    }
}
