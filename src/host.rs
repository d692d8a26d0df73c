// tray-icon-rect — Locate notification-area icons across the process boundary
// Copyright (C) 2026  Martin Gehrken (IamLumae)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Boundary over the native window, process and memory calls.
//!
//! Everything above this trait is plain protocol logic; everything below it
//! is `unsafe` Win32 (see `win32.rs`) or the simulated shell used in tests.

use crate::types::{ScreenRect, TargetArch, WindowId};

/// Raw handle of a process opened by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessHandle(pub isize);

/// Address inside a foreign process. Meaningless in ours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteAddr(pub usize);

/// The toolbar messages the reader needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarMessage {
    /// TB_BUTTONCOUNT
    ButtonCount,
    /// TB_GETBUTTON, wparam = index
    GetButton,
    /// TB_GETBUTTONTEXTW, wparam = command id
    GetButtonText,
    /// TB_GETRECT, wparam = command id
    GetRect,
}

/// Native operations, all blocking, none with a timeout.
pub trait Host {
    /// Child of `parent` (or a top-level window) with the given class.
    fn find_child(&self, parent: Option<WindowId>, class: &str) -> Option<WindowId>;

    /// Screen rectangle of `window`, queried locally.
    fn window_rect(&self, window: WindowId) -> Option<ScreenRect>;

    /// Owning process of `window`.
    fn window_process_id(&self, window: WindowId) -> Option<u32>;

    /// System memory page size.
    fn page_size(&self) -> usize;

    /// SendMessage to a toolbar control.
    fn send_toolbar_message(
        &self,
        window: WindowId,
        message: ToolbarMessage,
        wparam: usize,
        lparam: isize,
    ) -> isize;

    /// Open `pid` with full access.
    fn open_process(&self, pid: u32) -> Option<ProcessHandle>;

    fn close_process(&self, process: ProcessHandle);

    /// Pointer width of the opened process.
    fn process_arch(&self, process: ProcessHandle) -> Option<TargetArch>;

    /// Commit `size` bytes of read/write memory in `process`.
    fn alloc_remote(&self, process: ProcessHandle, size: usize) -> Option<RemoteAddr>;

    /// Release a whole allocation made by `alloc_remote`.
    fn free_remote(&self, process: ProcessHandle, addr: RemoteAddr);

    /// Copy `buf.len()` bytes starting at `addr`. False on any failure.
    fn read_remote(&self, process: ProcessHandle, addr: RemoteAddr, buf: &mut [u8]) -> bool;
}
