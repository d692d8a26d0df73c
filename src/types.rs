// tray-icon-rect — Locate notification-area icons across the process boundary
// Copyright (C) 2026  Martin Gehrken (IamLumae)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fmt;

use serde::Serialize;

/// Raw window handle value (HWND on Windows). Referenced, never owned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub isize);

/// Rectangle relative to a control's client area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    /// Size of a native RECT.
    pub const SIZE: usize = 16;

    pub fn from_le_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            left: read_i32(bytes, 0),
            top: read_i32(bytes, 4),
            right: read_i32(bytes, 8),
            bottom: read_i32(bytes, 12),
        })
    }
}

/// Rectangle in absolute desktop coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ScreenRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl fmt::Display for ScreenRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.left, self.top, self.right, self.bottom)
    }
}

/// Pointer width of the process that owns the toolbar.
///
/// TBBUTTON carries pointer-sized fields, so the record the remote control
/// writes follows the remote layout, not ours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetArch {
    X86,
    X64,
}

impl TargetArch {
    #[cfg(target_pointer_width = "64")]
    pub const NATIVE: TargetArch = TargetArch::X64;
    #[cfg(not(target_pointer_width = "64"))]
    pub const NATIVE: TargetArch = TargetArch::X86;

    /// Size of TBBUTTON in this layout.
    pub const fn descriptor_size(self) -> usize {
        match self {
            TargetArch::X86 => 20,
            TargetArch::X64 => 32,
        }
    }
}

/// One toolbar button as reported by TB_GETBUTTON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonDescriptor {
    pub index: usize,
    pub command_id: i32,
    pub bitmap: i32,
    pub state: u8,
    pub style: u8,
    pub data: u64,
    pub string: i64,
}

impl ButtonDescriptor {
    /// Decode a TBBUTTON record written in `arch` layout.
    pub fn decode(arch: TargetArch, index: usize, bytes: &[u8]) -> Option<Self> {
        if bytes.len() < arch.descriptor_size() {
            return None;
        }
        // iBitmap, idCommand, fsState, fsStyle, bReserved[2|6], dwData, iString
        let (data, string) = match arch {
            TargetArch::X86 => (read_u32(bytes, 12) as u64, read_i32(bytes, 16) as i64),
            TargetArch::X64 => (read_u64(bytes, 16), read_u64(bytes, 24) as i64),
        };
        Some(Self {
            index,
            bitmap: read_i32(bytes, 0),
            command_id: read_i32(bytes, 4),
            state: bytes[8],
            style: bytes[9],
            data,
            string,
        })
    }
}

/// Button text as UTF-16 code units, without the terminator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ButtonText(Vec<u16>);

impl ButtonText {
    /// Decode little-endian UTF-16, stopping at the first NUL.
    pub fn from_le_bytes(bytes: &[u8]) -> Self {
        let units = bytes
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .take_while(|&u| u != 0)
            .collect();
        Self(units)
    }

    pub fn units(&self) -> &[u16] {
        &self.0
    }

    /// Ordinal, case-sensitive prefix test on code units.
    pub fn starts_with(&self, prefix: &[u16]) -> bool {
        self.0.starts_with(prefix)
    }
}

impl fmt::Display for ButtonText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf16_lossy(&self.0))
    }
}

fn read_i32(b: &[u8], at: usize) -> i32 {
    i32::from_le_bytes([b[at], b[at + 1], b[at + 2], b[at + 3]])
}

fn read_u32(b: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([b[at], b[at + 1], b[at + 2], b[at + 3]])
}

fn read_u64(b: &[u8], at: usize) -> u64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&b[at..at + 8]);
    u64::from_le_bytes(raw)
}
