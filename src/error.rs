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

/// Identifies a toolbar button in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonRef {
    /// Positional index inside the toolbar.
    Index(usize),
    /// Command id the toolbar assigned to the button.
    Command(i32),
}

impl fmt::Display for ButtonRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ButtonRef::Index(i) => write!(f, "index {}", i),
            ButtonRef::Command(id) => write!(f, "command {}", id),
        }
    }
}

/// Everything that can go wrong between the label and the rectangle.
///
/// None of these are fatal; callers that only care about success can
/// collapse the result with `.ok()`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("window class `{class}` not found in the shell hierarchy")]
    ControlNotFound { class: String },

    #[error("could not open remote arena in process {pid}")]
    ArenaAllocationFailed { pid: u32 },

    #[error("toolbar button at {0} is unavailable")]
    ButtonUnavailable(ButtonRef),

    #[error("text of button {command_id} needs {bytes} bytes, arena holds {capacity}")]
    TextTooLarge {
        command_id: i32,
        bytes: usize,
        capacity: usize,
    },

    #[error("rectangle of button {command_id} is unavailable")]
    RectUnavailable { command_id: i32 },

    #[error("no tray icon with a label starting with `{label}`")]
    IconNotFound { label: String },

    #[error("screen position of the tray toolbar is unavailable")]
    GeometryUnavailable,
}

pub type Result<T> = std::result::Result<T, Error>;
