// tray-icon-rect — Locate notification-area icons across the process boundary
// Copyright (C) 2026  Martin Gehrken (IamLumae)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::host::{Host, ProcessHandle, RemoteAddr, ToolbarMessage};
use crate::types::{TargetArch, WindowId};

/// Scratch memory committed inside the process that owns a control.
///
/// The remote address never leaves this type: it is only handed to the
/// control as a message argument and read back with `copy_out`. Dropping the
/// arena frees the region and closes the process handle.
pub struct RemoteArena<'h, H: Host + ?Sized> {
    host: &'h H,
    window: WindowId,
    process: ProcessHandle,
    addr: RemoteAddr,
    capacity: usize,
    arch: TargetArch,
}

impl<'h, H: Host + ?Sized> RemoteArena<'h, H> {
    /// Open the owner of `window` and commit `size` bytes in it.
    pub fn open(host: &'h H, window: WindowId, size: usize) -> Result<Self> {
        let pid = host
            .window_process_id(window)
            .ok_or(Error::ArenaAllocationFailed { pid: 0 })?;
        let process = host
            .open_process(pid)
            .ok_or(Error::ArenaAllocationFailed { pid })?;

        let Some(addr) = host.alloc_remote(process, size) else {
            host.close_process(process);
            return Err(Error::ArenaAllocationFailed { pid });
        };

        let arch = host.process_arch(process).unwrap_or_else(|| {
            debug!("arena: arch of pid {} unknown, assuming {:?}", pid, TargetArch::NATIVE);
            TargetArch::NATIVE
        });
        trace!("arena: {} bytes in pid {} ({:?})", size, pid, arch);

        Ok(Self { host, window, process, addr, capacity: size, arch })
    }

    /// Ask the control to write into the arena (`lparam` = arena address).
    pub fn request(&self, message: ToolbarMessage, wparam: usize) -> isize {
        self.host
            .send_toolbar_message(self.window, message, wparam, self.addr.0 as isize)
    }

    /// Send a message that carries no buffer (`lparam` = 0).
    pub fn query(&self, message: ToolbarMessage, wparam: usize) -> isize {
        self.host.send_toolbar_message(self.window, message, wparam, 0)
    }

    /// Copy the first `buf.len()` bytes of the arena into `buf`.
    pub fn copy_out(&self, buf: &mut [u8]) -> bool {
        if buf.len() > self.capacity {
            return false;
        }
        self.host.read_remote(self.process, self.addr, buf)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn arch(&self) -> TargetArch {
        self.arch
    }
}

impl<H: Host + ?Sized> Drop for RemoteArena<'_, H> {
    fn drop(&mut self) {
        self.host.free_remote(self.process, self.addr);
        self.host.close_process(self.process);
        trace!("arena: released {} bytes", self.capacity);
    }
}
