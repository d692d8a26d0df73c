// tray-icon-rect — Locate notification-area icons across the process boundary
// Copyright (C) 2026  Martin Gehrken (IamLumae)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The real shell: Win32 calls behind the `Host` trait.

use std::ffi::c_void;
use std::mem;

use tracing::debug;
use windows::core::PCWSTR;
use windows::Win32::Foundation::{CloseHandle, BOOL, FALSE, HANDLE, HWND, LPARAM, RECT, WPARAM};
use windows::Win32::System::Diagnostics::Debug::ReadProcessMemory;
use windows::Win32::System::Memory::{
    VirtualAllocEx, VirtualFreeEx, MEM_COMMIT, MEM_RELEASE, PAGE_READWRITE,
};
use windows::Win32::System::SystemInformation::{GetSystemInfo, SYSTEM_INFO};
use windows::Win32::System::Threading::{
    GetCurrentProcess, IsWow64Process, OpenProcess, PROCESS_ALL_ACCESS,
};
use windows::Win32::UI::Controls::{
    TBBUTTON, TB_BUTTONCOUNT, TB_GETBUTTON, TB_GETBUTTONTEXTW, TB_GETRECT,
};
use windows::Win32::UI::WindowsAndMessaging::{
    FindWindowExW, GetWindowRect, GetWindowThreadProcessId, SendMessageW,
};

use crate::host::{Host, ProcessHandle, RemoteAddr, ToolbarMessage};
use crate::types::{ScreenRect, TargetArch, WindowId};

// Our own TBBUTTON must match the layout we decode for same-width targets.
const _: () = assert!(mem::size_of::<TBBUTTON>() == TargetArch::NATIVE.descriptor_size());

fn hwnd(id: WindowId) -> HWND {
    HWND(id.0 as *mut _)
}

fn handle(p: ProcessHandle) -> HANDLE {
    HANDLE(p.0 as *mut _)
}

fn message_id(message: ToolbarMessage) -> u32 {
    match message {
        ToolbarMessage::ButtonCount => TB_BUTTONCOUNT,
        ToolbarMessage::GetButton => TB_GETBUTTON,
        ToolbarMessage::GetButtonText => TB_GETBUTTONTEXTW,
        ToolbarMessage::GetRect => TB_GETRECT,
    }
}

/// Log a failed call and turn it into `None`.
fn checked<T>(what: &str, r: windows::core::Result<T>) -> Option<T> {
    r.map_err(|e| debug!("win32: {} failed: {}", what, e)).ok()
}

/// Host backed by the running desktop session.
///
/// Needs the right to open the shell process with PROCESS_ALL_ACCESS;
/// without it every lookup ends in `ArenaAllocationFailed`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Host;

impl Host for Win32Host {
    fn find_child(&self, parent: Option<WindowId>, class: &str) -> Option<WindowId> {
        let wide: Vec<u16> = class.encode_utf16().chain(std::iter::once(0)).collect();
        let parent = parent.map(hwnd).unwrap_or_default();
        let found = unsafe {
            FindWindowExW(parent, HWND::default(), PCWSTR(wide.as_ptr()), PCWSTR::null())
        };
        let found = checked(class, found)?;
        if found == HWND::default() {
            return None;
        }
        Some(WindowId(found.0 as isize))
    }

    fn window_rect(&self, window: WindowId) -> Option<ScreenRect> {
        let mut rc = RECT::default();
        checked("GetWindowRect", unsafe { GetWindowRect(hwnd(window), &mut rc) })?;
        Some(ScreenRect { left: rc.left, top: rc.top, right: rc.right, bottom: rc.bottom })
    }

    fn window_process_id(&self, window: WindowId) -> Option<u32> {
        let mut pid = 0u32;
        unsafe { GetWindowThreadProcessId(hwnd(window), Some(&mut pid as *mut u32)) };
        (pid != 0).then_some(pid)
    }

    fn page_size(&self) -> usize {
        let mut info = SYSTEM_INFO::default();
        unsafe { GetSystemInfo(&mut info) };
        info.dwPageSize as usize
    }

    fn send_toolbar_message(
        &self,
        window: WindowId,
        message: ToolbarMessage,
        wparam: usize,
        lparam: isize,
    ) -> isize {
        // blocks until the owning thread has processed the message
        unsafe { SendMessageW(hwnd(window), message_id(message), WPARAM(wparam), LPARAM(lparam)).0 }
    }

    fn open_process(&self, pid: u32) -> Option<ProcessHandle> {
        let h = checked("OpenProcess", unsafe { OpenProcess(PROCESS_ALL_ACCESS, FALSE, pid) })?;
        Some(ProcessHandle(h.0 as isize))
    }

    fn close_process(&self, process: ProcessHandle) {
        checked("CloseHandle", unsafe { CloseHandle(handle(process)) });
    }

    fn process_arch(&self, process: ProcessHandle) -> Option<TargetArch> {
        let mut wow64 = BOOL::default();
        checked("IsWow64Process", unsafe { IsWow64Process(handle(process), &mut wow64) })?;
        if wow64.as_bool() {
            return Some(TargetArch::X86);
        }
        // not emulated, so it runs at the OS width
        if cfg!(target_pointer_width = "64") {
            return Some(TargetArch::X64);
        }
        let mut self_wow64 = BOOL::default();
        checked("IsWow64Process", unsafe { IsWow64Process(GetCurrentProcess(), &mut self_wow64) })?;
        Some(if self_wow64.as_bool() { TargetArch::X64 } else { TargetArch::X86 })
    }

    fn alloc_remote(&self, process: ProcessHandle, size: usize) -> Option<RemoteAddr> {
        let ptr = unsafe { VirtualAllocEx(handle(process), None, size, MEM_COMMIT, PAGE_READWRITE) };
        if ptr.is_null() {
            debug!("win32: VirtualAllocEx({} bytes) failed", size);
            return None;
        }
        Some(RemoteAddr(ptr as usize))
    }

    fn free_remote(&self, process: ProcessHandle, addr: RemoteAddr) {
        // MEM_RELEASE wants size 0: the whole reservation goes
        checked("VirtualFreeEx", unsafe {
            VirtualFreeEx(handle(process), addr.0 as *mut c_void, 0, MEM_RELEASE)
        });
    }

    fn read_remote(&self, process: ProcessHandle, addr: RemoteAddr, buf: &mut [u8]) -> bool {
        let r = unsafe {
            ReadProcessMemory(
                handle(process),
                addr.0 as *const c_void,
                buf.as_mut_ptr() as *mut c_void,
                buf.len(),
                None,
            )
        };
        checked("ReadProcessMemory", r).is_some()
    }
}
